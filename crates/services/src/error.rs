//! Shared error types for the services crate.

use thiserror::Error;
use tracing::{error, warn};

use game_core::ValidationError;
use game_core::model::{QuizId, TopicId, UserId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Coarse classification a transport layer can map onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    StorageUnavailable,
    ValidationFailure,
    AlreadyExists,
}

/// Errors emitted by the learning services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServiceError {
    #[error("topic {0} not found")]
    TopicNotFound(TopicId),
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("no experience ledger for user {0}")]
    LedgerNotFound(UserId),
    #[error("no completion record for user {0}")]
    CompletionsNotFound(UserId),
    #[error("game already started for user {0}")]
    AlreadyStarted(UserId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GameServiceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameServiceError::TopicNotFound(_)
            | GameServiceError::QuizNotFound(_)
            | GameServiceError::LedgerNotFound(_)
            | GameServiceError::CompletionsNotFound(_) => ErrorKind::NotFound,
            GameServiceError::AlreadyStarted(_) => ErrorKind::AlreadyExists,
            GameServiceError::Validation(_) => ErrorKind::ValidationFailure,
            GameServiceError::Storage(err) => match err {
                StorageError::Conflict => ErrorKind::AlreadyExists,
                StorageError::Serialization(_) => ErrorKind::ValidationFailure,
                _ => ErrorKind::StorageUnavailable,
            },
        }
    }
}

/// Log a storage failure where it is observed and wrap it unchanged.
pub(crate) fn storage_failure(operation: &'static str, err: StorageError) -> GameServiceError {
    match &err {
        StorageError::Connection(_) => error!(operation, error = %err, "storage unavailable"),
        _ => warn!(operation, error = %err, "storage operation failed"),
    }
    GameServiceError::Storage(err)
}

/// Errors emitted while bootstrapping services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

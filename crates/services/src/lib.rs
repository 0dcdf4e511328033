#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod completion_service;
pub mod config;
pub mod error;
pub mod learning_service;
pub mod progress_service;
pub mod quiz_service;
pub mod responses;
pub mod xp_service;

pub use game_core::Clock;

pub use catalog_service::CatalogService;
pub use completion_service::{CompletionService, IncrementOutcome};
pub use config::GameConfig;
pub use error::{AppServicesError, ErrorKind, GameServiceError};
pub use learning_service::LearningService;
pub use progress_service::ProgressService;
pub use quiz_service::QuizService;
pub use responses::{ActivityReply, QuizReply, StartGameReply};
pub use xp_service::XpService;

use game_core::model::{CompletionRecord, UserId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

/// Decode a stored JSON document into its schema type. Shape mismatches are
/// reported rather than defaulted.
pub(crate) fn decode_document<T: DeserializeOwned>(
    collection: &'static str,
    raw: &str,
) -> Result<T, StorageError> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::Serialization(format!("invalid {collection} document: {e}")))
}

pub(crate) fn encode_document<T: Serialize>(
    collection: &'static str,
    value: &T,
) -> Result<String, StorageError> {
    serde_json::to_string(value)
        .map_err(|e| StorageError::Serialization(format!("cannot encode {collection} document: {e}")))
}

pub(crate) fn map_completion_row(row: &SqliteRow) -> Result<CompletionRecord, StorageError> {
    Ok(CompletionRecord {
        user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?).map_err(ser)?,
        topics_completed: u32_from_i64(
            "topics_completed",
            row.try_get("topics_completed").map_err(ser)?,
        )?,
        quizzes_completed: u32_from_i64(
            "quizzes_completed",
            row.try_get("quizzes_completed").map_err(ser)?,
        )?,
        resources_completed: u32_from_i64(
            "resources_completed",
            row.try_get("resources_completed").map_err(ser)?,
        )?,
    })
}

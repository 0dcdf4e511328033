use game_core::model::Feedback;

use super::SqliteRepository;
use super::mapping::conn;
use crate::repository::{FeedbackRepository, StorageError};

#[async_trait::async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO feedbacks (id, user_id, topic_id, rating, comment, submitted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(feedback.id().to_string())
        .bind(feedback.user_id().as_str())
        .bind(feedback.topic_id().as_str())
        .bind(i64::from(feedback.rating().value()))
        .bind(feedback.comment())
        .bind(feedback.submitted_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }
}

use game_core::model::{CompletionDelta, CompletionRecord, UserId};

use super::SqliteRepository;
use super::mapping::{conn, map_completion_row};
use crate::repository::{CompletionRepository, StorageError};

#[async_trait::async_trait]
impl CompletionRepository for SqliteRepository {
    async fn ensure_completions(&self, user_id: &UserId) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO "Complateds" (user_id, topics_completed, quizzes_completed, resources_completed)
            VALUES (?1, 0, 0, 0)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn get_completions(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, topics_completed, quizzes_completed, resources_completed
            FROM "Complateds" WHERE user_id = ?1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_completion_row).transpose()
    }

    async fn increment_completions(
        &self,
        user_id: &UserId,
        delta: &CompletionDelta,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        let columns = [
            ("topics_completed", delta.positive_topics()),
            ("quizzes_completed", delta.positive_quizzes()),
            ("resources_completed", delta.positive_resources()),
        ];

        let mut assignments = Vec::new();
        let mut amounts = Vec::new();
        for (column, amount) in columns {
            if let Some(amount) = amount {
                amounts.push(i64::from(amount));
                // Saturates at u32::MAX, like `CompletionRecord::apply`.
                assignments.push(format!(
                    "{column} = MIN({column} + ?{}, 4294967295)",
                    amounts.len()
                ));
            }
        }

        if assignments.is_empty() {
            return self.get_completions(user_id).await;
        }

        let sql = format!(
            r#"
            UPDATE "Complateds" SET {}
            WHERE user_id = ?{}
            RETURNING user_id, topics_completed, quizzes_completed, resources_completed
            "#,
            assignments.join(", "),
            amounts.len() + 1
        );

        let mut q = sqlx::query(&sql);
        for amount in amounts {
            q = q.bind(amount);
        }
        let row = q
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_completion_row).transpose()
    }
}

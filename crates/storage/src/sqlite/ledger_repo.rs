use game_core::model::{UserId, UserLedger};
use game_core::xp::XpFormula;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{LedgerRepository, StorageError};

#[async_trait::async_trait]
impl LedgerRepository for SqliteRepository {
    async fn insert_ledger(&self, ledger: &UserLedger) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO user_levels (user_id, user_xp, required_xp, started_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO NOTHING
            ",
        )
        .bind(ledger.user_id().as_str())
        .bind(i64::from(ledger.experience_total()))
        .bind(i64::from(ledger.required_xp()))
        .bind(ledger.started_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn apply_xp(
        &self,
        user_id: &UserId,
        delta: u32,
        formula: XpFormula,
    ) -> Result<Option<u32>, StorageError> {
        // One statement, so concurrent awards cannot interleave a read and a write.
        let sql = match formula {
            XpFormula::Baseline => {
                r"
                UPDATE user_levels SET user_xp = MIN(?1 + required_xp, 4294967295)
                WHERE user_id = ?2
                RETURNING user_xp
                "
            }
            XpFormula::Cumulative => {
                r"
                UPDATE user_levels SET user_xp = MIN(user_xp + ?1, 4294967295)
                WHERE user_id = ?2
                RETURNING user_xp
                "
            }
        };

        let row = sqlx::query(sql)
            .bind(i64::from(delta))
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let total: i64 = row.try_get("user_xp").map_err(ser)?;
        u32::try_from(total)
            .map(Some)
            .map_err(|_| StorageError::Serialization(format!("user_xp out of range: {total}")))
    }
}

use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the consolidated migration for the current schema.
///
/// Catalog collections hold one JSON document per row keyed by id; user
/// collections are plain columns so counters can be updated in place.
#[allow(clippy::too_many_lines)]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for collection in ["topics", "resources", "challenges", "recommendations"] {
            let ddl = format!(
                r"
                CREATE TABLE IF NOT EXISTS {collection} (
                    id TEXT PRIMARY KEY,
                    document TEXT NOT NULL CHECK (json_valid(document)),
                    updated_at TEXT NOT NULL
                );
                "
            );
            sqlx::query(&ddl).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS user_levels (
                    user_id TEXT PRIMARY KEY,
                    user_xp INTEGER NOT NULL CHECK (user_xp >= 0),
                    required_xp INTEGER NOT NULL CHECK (required_xp >= 0),
                    started_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
                CREATE TABLE IF NOT EXISTS "Complateds" (
                    user_id TEXT PRIMARY KEY,
                    topics_completed INTEGER NOT NULL DEFAULT 0 CHECK (topics_completed >= 0),
                    quizzes_completed INTEGER NOT NULL DEFAULT 0 CHECK (quizzes_completed >= 0),
                    resources_completed INTEGER NOT NULL DEFAULT 0 CHECK (resources_completed >= 0)
                );
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS feedbacks (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    topic_id TEXT NOT NULL,
                    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                    comment TEXT NOT NULL,
                    submitted_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_feedbacks_topic_submitted
                    ON feedbacks (topic_id, submitted_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}

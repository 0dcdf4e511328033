use chrono::Utc;
use game_core::model::{Challenge, Quiz, QuizId, Recommendation, Resource, Topic, TopicId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, decode_document, encode_document, ser};
use crate::repository::{CatalogRepository, StorageError};

/// Catalog tables. Names are fixed so they can be interpolated into SQL.
#[derive(Debug, Clone, Copy)]
enum Collection {
    Topics,
    Resources,
    Challenges,
    Recommendations,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::Topics => "topics",
            Collection::Resources => "resources",
            Collection::Challenges => "challenges",
            Collection::Recommendations => "recommendations",
        }
    }
}

impl SqliteRepository {
    async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StorageError> {
        let sql = format!("SELECT document FROM {} ORDER BY id ASC", collection.table());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row.try_get("document").map_err(ser)?;
            out.push(decode_document(collection.table(), &raw)?);
        }
        Ok(out)
    }

    async fn upsert_document<T: Serialize + Sync>(
        &self,
        collection: Collection,
        id: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let document = encode_document(collection.table(), value)?;
        let sql = format!(
            r"
            INSERT INTO {} (id, document, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at
            ",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(document)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SqliteRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        self.list_documents(Collection::Topics).await
    }

    async fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>, StorageError> {
        let row = sqlx::query("SELECT document FROM topics WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("document").map_err(ser)?;
                decode_document("topics", &raw).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn find_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        // Quizzes live inside topic documents; match on the nested id.
        let row = sqlx::query(
            r"
            SELECT quiz.value AS quiz
            FROM topics, json_each(topics.document, '$.quizzes') AS quiz
            WHERE json_extract(quiz.value, '$.id') = ?1
            ORDER BY topics.id ASC
            LIMIT 1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("quiz").map_err(ser)?;
                decode_document("topics.quizzes", &raw).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError> {
        self.list_documents(Collection::Resources).await
    }

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        self.list_documents(Collection::Challenges).await
    }

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>, StorageError> {
        self.list_documents(Collection::Recommendations).await
    }

    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        self.upsert_document(Collection::Topics, topic.id.as_str(), topic)
            .await
    }

    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError> {
        self.upsert_document(Collection::Resources, resource.id.as_str(), resource)
            .await
    }

    async fn upsert_challenge(&self, challenge: &Challenge) -> Result<(), StorageError> {
        self.upsert_document(Collection::Challenges, challenge.id.as_str(), challenge)
            .await
    }

    async fn upsert_recommendation(
        &self,
        recommendation: &Recommendation,
    ) -> Result<(), StorageError> {
        self.upsert_document(
            Collection::Recommendations,
            recommendation.topic_id.as_str(),
            recommendation,
        )
        .await
    }
}

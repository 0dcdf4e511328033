use std::sync::Arc;

use game_core::model::{
    CatalogTotals, Challenge, Quiz, QuizId, Recommendation, Resource, Topic, TopicId,
};
use storage::repository::CatalogRepository;
use tracing::debug;

use crate::error::{GameServiceError, storage_failure};

/// Read-through access to topics, quizzes, resources, challenges and
/// recommendations.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// All topics ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, GameServiceError> {
        let topics = self
            .catalog
            .list_topics()
            .await
            .map_err(|e| storage_failure("list_topics", e))?;
        debug!(count = topics.len(), "listed topics");
        Ok(topics)
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::TopicNotFound` when no topic has this id.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_topic(&self, topic_id: &TopicId) -> Result<Topic, GameServiceError> {
        self.catalog
            .get_topic(topic_id)
            .await
            .map_err(|e| storage_failure("get_topic", e))?
            .ok_or_else(|| GameServiceError::TopicNotFound(topic_id.clone()))
    }

    /// Look a quiz up across every topic.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::QuizNotFound` when no topic holds this quiz.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, quiz_id: &QuizId) -> Result<Quiz, GameServiceError> {
        self.catalog
            .find_quiz(quiz_id)
            .await
            .map_err(|e| storage_failure("get_quiz", e))?
            .ok_or_else(|| GameServiceError::QuizNotFound(quiz_id.clone()))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn list_resources(&self) -> Result<Vec<Resource>, GameServiceError> {
        self.catalog
            .list_resources()
            .await
            .map_err(|e| storage_failure("list_resources", e))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn list_challenges(&self) -> Result<Vec<Challenge>, GameServiceError> {
        self.catalog
            .list_challenges()
            .await
            .map_err(|e| storage_failure("list_challenges", e))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn list_recommendations(&self) -> Result<Vec<Recommendation>, GameServiceError> {
        self.catalog
            .list_recommendations()
            .await
            .map_err(|e| storage_failure("list_recommendations", e))
    }

    /// Current catalog sizes, read live on every call.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn totals(&self) -> Result<CatalogTotals, GameServiceError> {
        let topics = self.list_topics().await?;
        let resources = self.list_resources().await?;
        Ok(CatalogTotals::from_catalog(&topics, &resources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use storage::seed::CatalogSnapshot;

    async fn seeded() -> CatalogService {
        let repo = InMemoryRepository::new();
        CatalogSnapshot::sample()
            .unwrap()
            .load_into(&repo)
            .await
            .unwrap();
        CatalogService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = seeded().await;
        let err = service
            .get_topic(&TopicId::new("cooking").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::TopicNotFound(_)));

        let err = service
            .get_quiz(&QuizId::new("no-such-quiz").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::QuizNotFound(_)));
    }

    #[tokio::test]
    async fn totals_count_quizzes_across_topics() {
        let totals = seeded().await.totals().await.unwrap();
        assert_eq!(
            totals,
            CatalogTotals {
                topics: 2,
                quizzes: 3,
                resources: 3,
            }
        );
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let service = CatalogService::new(Arc::new(InMemoryRepository::new()));
        assert!(service.list_topics().await.unwrap().is_empty());
        assert!(service.list_challenges().await.unwrap().is_empty());
        assert_eq!(service.totals().await.unwrap().total(), 0);
    }
}

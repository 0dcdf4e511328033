use std::sync::Arc;

use game_core::model::{CompletionDelta, CompletionRecord, UserId};
use storage::repository::CompletionRepository;
use tracing::{debug, info};

use crate::error::{GameServiceError, storage_failure};

/// Result of `CompletionService::increment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// Every category was absent or zero; storage was not touched.
    NothingToUpdate,
    Updated(CompletionRecord),
}

/// Relative updates to per-user completion counters.
#[derive(Clone)]
pub struct CompletionService {
    completions: Arc<dyn CompletionRepository>,
}

impl CompletionService {
    #[must_use]
    pub fn new(completions: Arc<dyn CompletionRepository>) -> Self {
        Self { completions }
    }

    /// Add every positive category of `delta` to the user's counters.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::CompletionsNotFound` if the user has no record.
    /// Returns `GameServiceError::Storage` if the update fails.
    pub async fn increment(
        &self,
        user_id: &UserId,
        delta: CompletionDelta,
    ) -> Result<IncrementOutcome, GameServiceError> {
        if delta.is_noop() {
            debug!(user_id = %user_id, "no completion counters to update");
            return Ok(IncrementOutcome::NothingToUpdate);
        }

        let record = self
            .completions
            .increment_completions(user_id, &delta)
            .await
            .map_err(|e| storage_failure("increment_completions", e))?
            .ok_or_else(|| GameServiceError::CompletionsNotFound(user_id.clone()))?;

        info!(
            user_id = %user_id,
            topics = record.topics_completed,
            quizzes = record.quizzes_completed,
            resources = record.resources_completed,
            "completions updated"
        );
        Ok(IncrementOutcome::Updated(record))
    }

    /// Create a zeroed record unless one exists.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if the insert fails.
    pub async fn ensure(&self, user_id: &UserId) -> Result<(), GameServiceError> {
        self.completions
            .ensure_completions(user_id)
            .await
            .map_err(|e| storage_failure("ensure_completions", e))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::CompletionsNotFound` if the user has no record.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn record(&self, user_id: &UserId) -> Result<CompletionRecord, GameServiceError> {
        self.completions
            .get_completions(user_id)
            .await
            .map_err(|e| storage_failure("get_completions", e))?
            .ok_or_else(|| GameServiceError::CompletionsNotFound(user_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::repository::{InMemoryRepository, StorageError};

    /// Counts every call so tests can assert storage was never reached.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryRepository,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionRepository for CountingRepository {
        async fn ensure_completions(&self, user_id: &UserId) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.ensure_completions(user_id).await
        }

        async fn get_completions(
            &self,
            user_id: &UserId,
        ) -> Result<Option<CompletionRecord>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_completions(user_id).await
        }

        async fn increment_completions(
            &self,
            user_id: &UserId,
            delta: &CompletionDelta,
        ) -> Result<Option<CompletionRecord>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.increment_completions(user_id, delta).await
        }
    }

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    #[tokio::test]
    async fn zero_delta_never_touches_storage() {
        let repo = Arc::new(CountingRepository::default());
        let service = CompletionService::new(Arc::clone(&repo) as Arc<dyn CompletionRepository>);

        let absent = service
            .increment(&user(), CompletionDelta::default())
            .await
            .unwrap();
        let zeros = service
            .increment(
                &user(),
                CompletionDelta {
                    topics: Some(0),
                    quizzes: Some(0),
                    resources: Some(0),
                },
            )
            .await
            .unwrap();

        assert_eq!(absent, IncrementOutcome::NothingToUpdate);
        assert_eq!(zeros, IncrementOutcome::NothingToUpdate);
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn quiz_increment_leaves_other_counters() {
        let service = CompletionService::new(Arc::new(InMemoryRepository::new()));
        service.ensure(&user()).await.unwrap();
        service
            .increment(&user(), CompletionDelta::topics(1))
            .await
            .unwrap();

        let outcome = service
            .increment(&user(), CompletionDelta::quizzes(3))
            .await
            .unwrap();
        let IncrementOutcome::Updated(record) = outcome else {
            panic!("expected an update");
        };
        assert_eq!(record.topics_completed, 1);
        assert_eq!(record.quizzes_completed, 3);
        assert_eq!(record.resources_completed, 0);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let service = CompletionService::new(Arc::new(InMemoryRepository::new()));
        let err = service
            .increment(&user(), CompletionDelta::resources(1))
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::CompletionsNotFound(_)));
        assert!(matches!(
            service.record(&user()).await,
            Err(GameServiceError::CompletionsNotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let service = CompletionService::new(Arc::new(InMemoryRepository::new()));
        service.ensure(&user()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .increment(&user(), CompletionDelta::resources(1))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.record(&user()).await.unwrap().resources_completed, 32);
    }
}

use async_trait::async_trait;
use game_core::model::{
    Challenge, ChallengeId, CompletionDelta, CompletionRecord, Feedback, Quiz, QuizId,
    Recommendation, Resource, ResourceId, Topic, TopicId, UserId, UserLedger,
};
use game_core::xp::XpFormula;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to the catalog, plus the writes used when seeding it.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All topics ordered by id. Empty when the catalog has none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or a document cannot be decoded.
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError>;

    /// Fetch a topic by id. Returns `Ok(None)` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or the document cannot be decoded.
    async fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>, StorageError>;

    /// Find a quiz nested in any topic. Returns `Ok(None)` when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or the document cannot be decoded.
    async fn find_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError>;

    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError>;

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError>;

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>, StorageError>;

    /// Insert or replace a topic document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the topic cannot be stored.
    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError>;

    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError>;

    async fn upsert_challenge(&self, challenge: &Challenge) -> Result<(), StorageError>;

    async fn upsert_recommendation(
        &self,
        recommendation: &Recommendation,
    ) -> Result<(), StorageError>;
}

/// Per-user XP ledgers.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Insert a new ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the user already has a ledger.
    async fn insert_ledger(&self, ledger: &UserLedger) -> Result<(), StorageError>;

    /// Apply an award in a single atomic step and return the new total.
    ///
    /// Returns `Ok(None)` when the user has no ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn apply_xp(
        &self,
        user_id: &UserId,
        delta: u32,
        formula: XpFormula,
    ) -> Result<Option<u32>, StorageError>;
}

/// Per-user completion counters.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Create a zeroed record unless one already exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    async fn ensure_completions(&self, user_id: &UserId) -> Result<(), StorageError>;

    async fn get_completions(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CompletionRecord>, StorageError>;

    /// Atomically add every positive category of `delta` and return the
    /// updated record. Returns `Ok(None)` when the user has no record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the update fails.
    async fn increment_completions(
        &self,
        user_id: &UserId,
        delta: &CompletionDelta,
    ) -> Result<Option<CompletionRecord>, StorageError>;
}

/// Insert-only feedback store.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store new feedback.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if feedback with the same id exists.
    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError>;
}

#[derive(Default)]
struct MemoryState {
    topics: BTreeMap<TopicId, Topic>,
    resources: BTreeMap<ResourceId, Resource>,
    challenges: BTreeMap<ChallengeId, Challenge>,
    recommendations: BTreeMap<TopicId, Recommendation>,
    ledgers: HashMap<UserId, UserLedger>,
    completions: HashMap<UserId, CompletionRecord>,
    feedback: Vec<Feedback>,
}

/// In-memory repository for tests and prototyping.
///
/// All state sits behind one mutex, so read-modify-write updates are atomic.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> Result<T, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        self.with_state(|s| s.topics.values().cloned().collect())
    }

    async fn get_topic(&self, id: &TopicId) -> Result<Option<Topic>, StorageError> {
        self.with_state(|s| s.topics.get(id).cloned())
    }

    async fn find_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        self.with_state(|s| {
            s.topics
                .values()
                .find_map(|topic| topic.find_quiz(id))
                .cloned()
        })
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, StorageError> {
        self.with_state(|s| s.resources.values().cloned().collect())
    }

    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        self.with_state(|s| s.challenges.values().cloned().collect())
    }

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>, StorageError> {
        self.with_state(|s| s.recommendations.values().cloned().collect())
    }

    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.topics.insert(topic.id.clone(), topic.clone());
        })
    }

    async fn upsert_resource(&self, resource: &Resource) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.resources.insert(resource.id.clone(), resource.clone());
        })
    }

    async fn upsert_challenge(&self, challenge: &Challenge) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.challenges.insert(challenge.id.clone(), challenge.clone());
        })
    }

    async fn upsert_recommendation(
        &self,
        recommendation: &Recommendation,
    ) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.recommendations
                .insert(recommendation.topic_id.clone(), recommendation.clone());
        })
    }
}

#[async_trait]
impl LedgerRepository for InMemoryRepository {
    async fn insert_ledger(&self, ledger: &UserLedger) -> Result<(), StorageError> {
        self.with_state(|s| {
            if s.ledgers.contains_key(ledger.user_id()) {
                return Err(StorageError::Conflict);
            }
            s.ledgers.insert(ledger.user_id().clone(), ledger.clone());
            Ok(())
        })?
    }

    async fn apply_xp(
        &self,
        user_id: &UserId,
        delta: u32,
        formula: XpFormula,
    ) -> Result<Option<u32>, StorageError> {
        self.with_state(|s| {
            s.ledgers
                .get_mut(user_id)
                .map(|ledger| ledger.apply_award(delta, formula))
        })
    }
}

#[async_trait]
impl CompletionRepository for InMemoryRepository {
    async fn ensure_completions(&self, user_id: &UserId) -> Result<(), StorageError> {
        self.with_state(|s| {
            s.completions
                .entry(user_id.clone())
                .or_insert_with(|| CompletionRecord::empty(user_id.clone()));
        })
    }

    async fn get_completions(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        self.with_state(|s| s.completions.get(user_id).cloned())
    }

    async fn increment_completions(
        &self,
        user_id: &UserId,
        delta: &CompletionDelta,
    ) -> Result<Option<CompletionRecord>, StorageError> {
        self.with_state(|s| {
            s.completions.get_mut(user_id).map(|record| {
                record.apply(delta);
                record.clone()
            })
        })
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepository {
    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        self.with_state(|s| {
            if s.feedback.iter().any(|f| f.id() == feedback.id()) {
                return Err(StorageError::Conflict);
            }
            s.feedback.push(feedback.clone());
            Ok(())
        })?
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
    pub ledgers: Arc<dyn LedgerRepository>,
    pub completions: Arc<dyn CompletionRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Share one repository value across all four roles.
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: CatalogRepository
            + LedgerRepository
            + CompletionRepository
            + FeedbackRepository
            + Clone
            + 'static,
    {
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let ledgers: Arc<dyn LedgerRepository> = Arc::new(repo.clone());
        let completions: Arc<dyn CompletionRepository> = Arc::new(repo.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(repo);
        Self {
            catalog,
            ledgers,
            completions,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::model::{Question, QuestionId, Rating};
    use game_core::time::fixed_now;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn topic_with_quiz(topic: &str, quiz: &str) -> Topic {
        Topic {
            id: TopicId::new(topic).unwrap(),
            title: topic.to_owned(),
            description: None,
            quizzes: vec![Quiz {
                id: QuizId::new(quiz).unwrap(),
                title: quiz.to_owned(),
                questions: vec![
                    Question::new(QuestionId::new("q1").unwrap(), "?", vec!["A".into()], "A")
                        .unwrap(),
                ],
            }],
            resources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn finds_quiz_nested_in_any_topic() {
        let repo = InMemoryRepository::new();
        repo.upsert_topic(&topic_with_quiz("t1", "quiz-a")).await.unwrap();
        repo.upsert_topic(&topic_with_quiz("t2", "quiz-b")).await.unwrap();

        let found = repo.find_quiz(&QuizId::new("quiz-b").unwrap()).await.unwrap();
        assert_eq!(found.unwrap().title, "quiz-b");
        assert!(repo.find_quiz(&QuizId::new("nope").unwrap()).await.unwrap().is_none());
        assert_eq!(repo.list_topics().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_ledger_is_a_conflict() {
        let repo = InMemoryRepository::new();
        let ledger = UserLedger::new(user("u1"), 0, fixed_now());
        repo.insert_ledger(&ledger).await.unwrap();
        assert!(matches!(
            repo.insert_ledger(&ledger).await,
            Err(StorageError::Conflict)
        ));
    }

    #[tokio::test]
    async fn apply_xp_uses_baseline_formula() {
        let repo = InMemoryRepository::new();
        repo.insert_ledger(&UserLedger::new(user("u1"), 100, fixed_now()))
            .await
            .unwrap();

        let first = repo.apply_xp(&user("u1"), 50, XpFormula::Baseline).await.unwrap();
        let second = repo.apply_xp(&user("u1"), 10, XpFormula::Baseline).await.unwrap();
        assert_eq!(first, Some(150));
        assert_eq!(second, Some(110));
        assert_eq!(
            repo.apply_xp(&user("ghost"), 10, XpFormula::Baseline).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn increments_are_relative_and_ensure_is_idempotent() {
        let repo = InMemoryRepository::new();
        let u = user("u1");
        assert!(repo
            .increment_completions(&u, &CompletionDelta::topics(1))
            .await
            .unwrap()
            .is_none());

        repo.ensure_completions(&u).await.unwrap();
        repo.increment_completions(&u, &CompletionDelta::topics(2))
            .await
            .unwrap();
        repo.ensure_completions(&u).await.unwrap();

        let record = repo.get_completions(&u).await.unwrap().unwrap();
        assert_eq!(record.topics_completed, 2);
    }

    #[tokio::test]
    async fn feedback_ids_are_unique() {
        let repo = InMemoryRepository::new();
        let rating = Rating::new(5).unwrap();
        let topic = TopicId::new("t1").unwrap();
        let first = Feedback::new(user("u1"), topic.clone(), rating, "ok", fixed_now()).unwrap();
        let second = Feedback::new(user("u1"), topic, rating, "ok", fixed_now()).unwrap();

        repo.insert_feedback(&first).await.unwrap();
        repo.insert_feedback(&second).await.unwrap();
        assert!(matches!(
            repo.insert_feedback(&first).await,
            Err(StorageError::Conflict)
        ));
    }
}

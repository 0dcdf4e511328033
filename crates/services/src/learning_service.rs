use std::sync::Arc;

use game_core::grading::QuizGrader;
use game_core::model::{
    Answer, Challenge, CompletionDelta, Feedback, ProgressReport, Quiz, QuizId, Rating,
    Recommendation, Resource, Submission, Topic, TopicId, UserId,
};
use storage::repository::{FeedbackRepository, Storage};
use tracing::info;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::completion_service::CompletionService;
use crate::config::GameConfig;
use crate::error::{AppServicesError, GameServiceError, storage_failure};
use crate::progress_service::ProgressService;
use crate::quiz_service::QuizService;
use crate::responses::{
    ActivityReply, FEEDBACK_SUBMITTED, GAME_STARTED, QuizReply, RESOURCE_COMPLETED,
    StartGameReply, TOPIC_COMPLETED,
};
use crate::xp_service::XpService;

/// Every operation the learning platform exposes, wired over one `Storage`.
#[derive(Clone)]
pub struct LearningService {
    clock: Clock,
    config: GameConfig,
    catalog: CatalogService,
    xp: XpService,
    completions: CompletionService,
    progress: ProgressService,
    quizzes: QuizService,
    feedback: Arc<dyn FeedbackRepository>,
}

impl LearningService {
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, config: GameConfig) -> Self {
        let catalog = CatalogService::new(Arc::clone(&storage.catalog));
        let xp = XpService::new(
            clock,
            config.xp_formula,
            config.starting_required_xp,
            Arc::clone(&storage.ledgers),
        );
        let completions = CompletionService::new(Arc::clone(&storage.completions));
        let progress = ProgressService::new(catalog.clone(), completions.clone());
        let quizzes = QuizService::new(
            QuizGrader::new(config.grading_mode, config.rewards.per_correct_answer),
            catalog.clone(),
            xp.clone(),
            completions.clone(),
        );

        Self {
            clock,
            config,
            catalog,
            xp,
            completions,
            progress,
            quizzes,
            feedback: Arc::clone(&storage.feedback),
        }
    }

    /// Build services backed by `SQLite` storage, running migrations first.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: GameConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, config))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_topics(&self) -> Result<Vec<Topic>, GameServiceError> {
        self.catalog.list_topics().await
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::TopicNotFound` when no topic has this id.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_topic(&self, topic_id: &TopicId) -> Result<Topic, GameServiceError> {
        self.catalog.get_topic(topic_id).await
    }

    /// Award topic XP and count one finished topic.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::TopicNotFound` if the topic does not exist.
    /// Returns `GameServiceError::LedgerNotFound` or
    /// `GameServiceError::CompletionsNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn complete_topic(
        &self,
        topic_id: &TopicId,
        user_id: &UserId,
    ) -> Result<ActivityReply, GameServiceError> {
        let topic = self.catalog.get_topic(topic_id).await?;
        let total = self.xp.award(user_id, self.config.rewards.topic).await?;
        self.completions
            .increment(user_id, CompletionDelta::topics(1))
            .await?;

        info!(user_id = %user_id, topic_id = %topic.id, xp = total, "topic completed");
        Ok(ActivityReply::new(TOPIC_COMPLETED, total))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::QuizNotFound` when no topic holds this quiz.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, quiz_id: &QuizId) -> Result<Quiz, GameServiceError> {
        self.catalog.get_quiz(quiz_id).await
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Validation` if an answer has no selected option.
    /// Returns `GameServiceError::QuizNotFound` if no topic holds the quiz.
    /// Returns `GameServiceError::LedgerNotFound` or
    /// `GameServiceError::CompletionsNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn submit_quiz(
        &self,
        quiz_id: &QuizId,
        user_id: &UserId,
        answers: Vec<Answer>,
    ) -> Result<QuizReply, GameServiceError> {
        let submission = Submission::new(answers)?;
        let graded = self.quizzes.submit(quiz_id, user_id, &submission).await?;
        Ok(QuizReply::from(graded))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_resources(&self) -> Result<Vec<Resource>, GameServiceError> {
        self.catalog.list_resources().await
    }

    /// Award resource XP and count one finished resource.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::LedgerNotFound` or
    /// `GameServiceError::CompletionsNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn complete_resource(
        &self,
        user_id: &UserId,
    ) -> Result<ActivityReply, GameServiceError> {
        let total = self.xp.award(user_id, self.config.rewards.resource).await?;
        self.completions
            .increment(user_id, CompletionDelta::resources(1))
            .await?;

        info!(user_id = %user_id, xp = total, "resource completed");
        Ok(ActivityReply::new(RESOURCE_COMPLETED, total))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::CompletionsNotFound` if the user has no record.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_progress(&self, user_id: &UserId) -> Result<ProgressReport, GameServiceError> {
        self.progress.progress(user_id).await
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_recommendations(&self) -> Result<Vec<Recommendation>, GameServiceError> {
        self.catalog.list_recommendations().await
    }

    /// Store feedback on a topic and award feedback XP.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::Validation` if the rating is outside 1..=5 or
    /// the comment is too long.
    /// Returns `GameServiceError::LedgerNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn submit_feedback(
        &self,
        user_id: &UserId,
        topic_id: &TopicId,
        rating: u8,
        comment: &str,
    ) -> Result<ActivityReply, GameServiceError> {
        let rating = Rating::new(rating)?;
        let feedback = Feedback::new(
            user_id.clone(),
            topic_id.clone(),
            rating,
            comment,
            self.clock.now(),
        )?;
        self.feedback
            .insert_feedback(&feedback)
            .await
            .map_err(|e| storage_failure("insert_feedback", e))?;

        let total = self.xp.award(user_id, self.config.rewards.feedback).await?;

        info!(
            user_id = %user_id,
            topic_id = %topic_id,
            rating = rating.value(),
            xp = total,
            "feedback submitted"
        );
        Ok(ActivityReply::new(FEEDBACK_SUBMITTED, total))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn get_challenges(&self) -> Result<Vec<Challenge>, GameServiceError> {
        self.catalog.list_challenges().await
    }

    /// Create the user's ledger and an empty completion record.
    ///
    /// The completion record is created first; creating it again is a no-op,
    /// so a failed call can be retried.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::AlreadyStarted` if the user already has a ledger.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn start_game(&self, user_id: &UserId) -> Result<StartGameReply, GameServiceError> {
        self.completions.ensure(user_id).await?;
        self.xp.start(user_id).await?;
        Ok(StartGameReply {
            message: GAME_STARTED.to_owned(),
        })
    }
}

use game_core::grading::{GradedQuiz, QuizGrader};
use game_core::model::{CompletionDelta, QuizId, Submission, UserId};
use tracing::info;

use crate::catalog_service::CatalogService;
use crate::completion_service::CompletionService;
use crate::error::GameServiceError;
use crate::xp_service::XpService;

/// Grades quiz submissions and records their rewards.
#[derive(Clone)]
pub struct QuizService {
    grader: QuizGrader,
    catalog: CatalogService,
    xp: XpService,
    completions: CompletionService,
}

impl QuizService {
    #[must_use]
    pub fn new(
        grader: QuizGrader,
        catalog: CatalogService,
        xp: XpService,
        completions: CompletionService,
    ) -> Self {
        Self {
            grader,
            catalog,
            xp,
            completions,
        }
    }

    /// Grade `submission` against the quiz, award the earned XP and count
    /// every submitted answer as a completed quiz item.
    ///
    /// A submission that earns nothing leaves the ledger and counters untouched.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::QuizNotFound` if no topic holds the quiz.
    /// Returns `GameServiceError::LedgerNotFound` or
    /// `GameServiceError::CompletionsNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn submit(
        &self,
        quiz_id: &QuizId,
        user_id: &UserId,
        submission: &Submission,
    ) -> Result<GradedQuiz, GameServiceError> {
        let quiz = self.catalog.get_quiz(quiz_id).await?;
        let graded = self.grader.grade(&quiz, submission);

        info!(
            quiz_id = %quiz_id,
            user_id = %user_id,
            correct = graded.correct_answers.len(),
            submitted = graded.submitted,
            xp = graded.xp_earned,
            mode = ?self.grader.mode(),
            "quiz graded"
        );

        if graded.xp_earned == 0 {
            return Ok(graded);
        }

        self.xp.award(user_id, graded.xp_earned).await?;
        let answered = u32::try_from(graded.submitted).unwrap_or(u32::MAX);
        self.completions
            .increment(user_id, CompletionDelta::quizzes(answered))
            .await?;

        Ok(graded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use game_core::grading::{FeedbackTier, GradingMode};
    use game_core::model::{Answer, Question, QuestionId, Quiz, Topic, TopicId};
    use game_core::time::fixed_clock;
    use game_core::xp::{XP_PER_CORRECT_ANSWER, XpFormula};
    use storage::repository::{CatalogRepository, InMemoryRepository, LedgerRepository};

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn question(id: &str, correct: &str) -> Question {
        Question::new(
            QuestionId::new(id).unwrap(),
            format!("Question {id}"),
            vec!["A".into(), "B".into()],
            correct,
        )
        .unwrap()
    }

    async fn setup(mode: GradingMode) -> (QuizService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        repo.upsert_topic(&Topic {
            id: TopicId::new("t1").unwrap(),
            title: "Basics".into(),
            description: None,
            quizzes: vec![Quiz {
                id: QuizId::new("quiz-1").unwrap(),
                title: "Warm-up".into(),
                questions: vec![question("Q1", "A"), question("Q2", "B")],
            }],
            resources: Vec::new(),
        })
        .await
        .unwrap();

        let xp = XpService::new(fixed_clock(), XpFormula::Baseline, 0, Arc::new(repo.clone()));
        let completions = CompletionService::new(Arc::new(repo.clone()));
        xp.start(&user()).await.unwrap();
        completions.ensure(&user()).await.unwrap();

        let service = QuizService::new(
            QuizGrader::new(mode, XP_PER_CORRECT_ANSWER),
            CatalogService::new(Arc::new(repo.clone())),
            xp,
            completions,
        );
        (service, repo)
    }

    fn submission(pairs: &[(&str, &str)]) -> Submission {
        Submission::new(
            pairs
                .iter()
                .map(|(q, o)| Answer::new(*q, *o).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn matching_submission_is_excellent() {
        let (service, repo) = setup(GradingMode::Positional).await;
        let graded = service
            .submit(
                &QuizId::new("quiz-1").unwrap(),
                &user(),
                &submission(&[("Q1", "A"), ("Q2", "B")]),
            )
            .await
            .unwrap();

        assert_eq!(graded.xp_earned, 20);
        assert_eq!(graded.feedback, FeedbackTier::Excellent);
        assert_eq!(graded.total_questions, 2);

        let completions = CompletionService::new(Arc::new(repo));
        assert_eq!(completions.record(&user()).await.unwrap().quizzes_completed, 2);
    }

    #[tokio::test]
    async fn zero_correct_keeps_earlier_progress() {
        let (service, repo) = setup(GradingMode::Positional).await;
        let u = user();
        let earned_before = repo.apply_xp(&u, 50, XpFormula::Baseline).await.unwrap();
        assert_eq!(earned_before, Some(50));

        let graded = service
            .submit(
                &QuizId::new("quiz-1").unwrap(),
                &user(),
                &submission(&[("Q1", "B"), ("Q2", "A")]),
            )
            .await
            .unwrap();

        assert_eq!(graded.xp_earned, 0);
        assert_eq!(graded.feedback, FeedbackTier::KeepPracticing);
        assert!(graded.correct_answers.is_empty());

        // A zero cumulative award reads the stored total back unchanged.
        let total = repo.apply_xp(&u, 0, XpFormula::Cumulative).await.unwrap();
        assert_eq!(total, Some(50));

        let completions = CompletionService::new(Arc::new(repo));
        assert_eq!(completions.record(&u).await.unwrap().quizzes_completed, 0);
    }

    #[tokio::test]
    async fn by_id_mode_credits_reordered_answers() {
        let (service, _repo) = setup(GradingMode::ById).await;
        let graded = service
            .submit(
                &QuizId::new("quiz-1").unwrap(),
                &user(),
                &submission(&[("Q2", "B"), ("Q1", "A")]),
            )
            .await
            .unwrap();
        assert_eq!(graded.xp_earned, 20);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let (service, _repo) = setup(GradingMode::Positional).await;
        let err = service
            .submit(
                &QuizId::new("missing").unwrap(),
                &user(),
                &submission(&[("Q1", "A")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::QuizNotFound(_)));
    }
}

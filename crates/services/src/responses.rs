//! Serializable replies returned by `LearningService` operations.

use game_core::grading::GradedQuiz;
use game_core::model::QuestionId;
use serde::Serialize;

pub const TOPIC_COMPLETED: &str = "Topic completed successfully";
pub const RESOURCE_COMPLETED: &str = "Resource completed successfully";
pub const FEEDBACK_SUBMITTED: &str = "Feedback submitted successfully";
pub const GAME_STARTED: &str = "Game started";

/// Reply to an activity that awards XP. `xp_earned` is the ledger total
/// after the award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReply {
    pub message: String,
    pub xp_earned: u32,
}

impl ActivityReply {
    #[must_use]
    pub fn new(message: &str, xp_earned: u32) -> Self {
        Self {
            message: message.to_owned(),
            xp_earned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizReply {
    pub total_questions: usize,
    pub xp_earned: u32,
    pub correct_answers: Vec<QuestionId>,
    pub feedback: String,
}

impl From<GradedQuiz> for QuizReply {
    fn from(graded: GradedQuiz) -> Self {
        Self {
            total_questions: graded.total_questions,
            xp_earned: graded.xp_earned,
            correct_answers: graded.correct_answers,
            feedback: graded.feedback.message().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartGameReply {
    pub message: String,
}

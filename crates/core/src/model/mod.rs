mod catalog;
mod feedback;
mod ids;
mod progress;
mod submission;
mod topic;

pub use catalog::{Challenge, Recommendation, Resource, ResourceKind};
pub use feedback::{Feedback, MAX_COMMENT_CHARS, Rating};
pub use ids::{ChallengeId, QuestionId, QuizId, ResourceId, TopicId, UserId};
pub use progress::{
    CatalogTotals, CompletionDelta, CompletionRecord, ProgressReport, UserLedger,
    overall_percentage,
};
pub use submission::{Answer, Submission};
pub use topic::{Question, Quiz, Topic, count_quizzes};

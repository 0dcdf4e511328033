use thiserror::Error;

/// Domain validation failures for identifiers, submissions, and feedback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("{0} id cannot be empty")]
    EmptyId(&'static str),

    #[error("answer for question {question_id} has no selected option")]
    EmptySelection { question_id: String },

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("comment exceeds {max} characters")]
    CommentTooLong { max: usize },

    #[error("question {question_id} has no options")]
    NoOptions { question_id: String },

    #[error("correct option for question {question_id} is not one of its options")]
    UnknownCorrectOption { question_id: String },
}

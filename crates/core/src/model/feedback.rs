use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::ids::{TopicId, UserId};

pub const MAX_COMMENT_CHARS: usize = 2000;

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// # Errors
    ///
    /// Returns `ValidationError::RatingOutOfRange` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::RatingOutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A learner's rating and comment on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    id: Uuid,
    user_id: UserId,
    topic_id: TopicId,
    rating: Rating,
    comment: String,
    submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Creates feedback with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CommentTooLong` if the comment exceeds
    /// `MAX_COMMENT_CHARS` characters.
    pub fn new(
        user_id: UserId,
        topic_id: TopicId,
        rating: Rating,
        comment: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let comment = comment.into().trim().to_owned();
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(ValidationError::CommentTooLong {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            topic_id,
            rating,
            comment,
            submitted_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn long_comment_is_rejected() {
        let comment = "x".repeat(MAX_COMMENT_CHARS + 1);
        let result = Feedback::new(
            UserId::new("u1").unwrap(),
            TopicId::new("t1").unwrap(),
            Rating::new(4).unwrap(),
            comment,
            fixed_now(),
        );
        assert_eq!(
            result,
            Err(ValidationError::CommentTooLong {
                max: MAX_COMMENT_CHARS
            })
        );
    }
}

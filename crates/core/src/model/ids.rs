use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

// All catalog and user identifiers are opaque strings issued by the platform.
// Blank values are rejected both on construction and on deserialization.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a non-blank string.
            ///
            /// # Errors
            ///
            /// Returns `ValidationError::EmptyId` if the value is empty or whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyId($label));
                }
                if trimmed.len() == value.len() {
                    Ok(Self(value))
                } else {
                    Ok(Self(trimmed.to_owned()))
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a platform user.
    UserId,
    "user"
);
string_id!(
    /// Identifier of a topic in the catalog.
    TopicId,
    "topic"
);
string_id!(
    /// Identifier of a quiz nested under a topic.
    QuizId,
    "quiz"
);
string_id!(
    /// Identifier of a question inside a quiz.
    QuestionId,
    "question"
);
string_id!(
    /// Identifier of a learning resource.
    ResourceId,
    "resource"
);
string_id!(
    /// Identifier of a challenge.
    ChallengeId,
    "challenge"
);

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::QuestionId;

/// One submitted answer: which question, which option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub selected_option: String,
}

impl Answer {
    /// # Errors
    ///
    /// Returns `ValidationError` if the question id is blank or no option is selected.
    pub fn new(
        question_id: impl Into<String>,
        selected_option: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let question_id = QuestionId::new(question_id)?;
        let selected_option = selected_option.into();
        if selected_option.trim().is_empty() {
            return Err(ValidationError::EmptySelection {
                question_id: question_id.to_string(),
            });
        }
        Ok(Self {
            question_id,
            selected_option,
        })
    }
}

/// Ordered answers for a single quiz attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    answers: Vec<Answer>,
}

impl Submission {
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySelection` if any answer has a blank option.
    pub fn new(answers: Vec<Answer>) -> Result<Self, ValidationError> {
        if let Some(bad) = answers.iter().find(|a| a.selected_option.trim().is_empty()) {
            return Err(ValidationError::EmptySelection {
                question_id: bad.question_id.to_string(),
            });
        }
        Ok(Self { answers })
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_selection() {
        assert!(matches!(
            Answer::new("q1", "  "),
            Err(ValidationError::EmptySelection { .. })
        ));
        assert!(matches!(Answer::new("", "A"), Err(ValidationError::EmptyId("question"))));
    }

    #[test]
    fn submission_revalidates_deserialized_answers() {
        let answers: Vec<Answer> =
            serde_json::from_str(r#"[{"question_id":"q1","selected_option":""}]"#).unwrap();
        assert!(Submission::new(answers).is_err());
    }
}

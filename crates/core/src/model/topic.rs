use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::{QuestionId, QuizId, ResourceId, TopicId};

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDocument")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: String,
}

#[derive(Deserialize)]
struct QuestionDocument {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option: String,
}

impl TryFrom<QuestionDocument> for Question {
    type Error = ValidationError;

    fn try_from(doc: QuestionDocument) -> Result<Self, Self::Error> {
        Self::new(doc.id, doc.prompt, doc.options, doc.correct_option)
    }
}

impl Question {
    /// Creates a question, checking that the correct option is one of the options.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoOptions` if `options` is empty, or
    /// `ValidationError::UnknownCorrectOption` if `correct_option` is not listed.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let correct_option = correct_option.into();
        if options.is_empty() {
            return Err(ValidationError::NoOptions {
                question_id: id.to_string(),
            });
        }
        if !options.iter().any(|o| *o == correct_option) {
            return Err(ValidationError::UnknownCorrectOption {
                question_id: id.to_string(),
            });
        }
        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_option == selected
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A catalog topic: its quizzes and the resources that back it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quizzes: Vec<Quiz>,
    pub resources: Vec<ResourceId>,
}

impl Topic {
    #[must_use]
    pub fn find_quiz(&self, quiz_id: &QuizId) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| &q.id == quiz_id)
    }
}

/// Total number of quizzes across all topics.
#[must_use]
pub fn count_quizzes(topics: &[Topic]) -> u64 {
    topics.iter().map(|t| t.quizzes.len() as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(s: &str) -> QuestionId {
        QuestionId::new(s).unwrap()
    }

    #[test]
    fn question_requires_listed_correct_option() {
        let err = Question::new(qid("q1"), "2+2?", vec!["3".into(), "4".into()], "5");
        assert_eq!(
            err,
            Err(ValidationError::UnknownCorrectOption {
                question_id: "q1".into()
            })
        );
        assert!(Question::new(qid("q1"), "2+2?", vec![], "4").is_err());
    }

    #[test]
    fn decoding_rejects_missing_fields_instead_of_defaulting() {
        let missing_quizzes = r#"{"id":"t1","title":"Rust","resources":[]}"#;
        assert!(serde_json::from_str::<Topic>(missing_quizzes).is_err());

        let bad_question = r#"{"id":"q1","prompt":"?","options":["a"],"correct_option":"b"}"#;
        assert!(serde_json::from_str::<Question>(bad_question).is_err());
    }

    #[test]
    fn counts_quizzes_across_topics() {
        let quiz = |id: &str| Quiz {
            id: QuizId::new(id).unwrap(),
            title: id.to_owned(),
            questions: Vec::new(),
        };
        let topic = |id: &str, quizzes: Vec<Quiz>| Topic {
            id: TopicId::new(id).unwrap(),
            title: id.to_owned(),
            description: None,
            quizzes,
            resources: Vec::new(),
        };
        let topics = vec![
            topic("a", vec![quiz("a1"), quiz("a2")]),
            topic("b", vec![]),
            topic("c", vec![quiz("c1")]),
        ];
        assert_eq!(count_quizzes(&topics), 3);
        assert!(topics[0].find_quiz(&QuizId::new("a2").unwrap()).is_some());
        assert!(topics[1].find_quiz(&QuizId::new("a2").unwrap()).is_none());
    }
}

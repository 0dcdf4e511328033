//! Quiz grading: compares a submission against a quiz's answer key.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, Quiz, Submission};
use crate::xp::XP_PER_CORRECT_ANSWER;

//
// ─── MODE ──────────────────────────────────────────────────────────────────────
//

/// How submitted answers are paired with quiz questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradingMode {
    /// The i-th answer is graded against the i-th question, and only counts
    /// when its question id matches that position. Short or reordered
    /// submissions are under-graded.
    #[default]
    Positional,
    /// Each answer is graded against the question with the same id, wherever
    /// it sits in the quiz. A question is credited at most once.
    ById,
}

impl GradingMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positional" => Some(Self::Positional),
            "by-id" | "by_id" | "byid" => Some(Self::ById),
            _ => None,
        }
    }
}

//
// ─── FEEDBACK TIER ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Excellent,
    KeepPracticing,
}

impl FeedbackTier {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Excellent! You have a good understanding of this topic.",
            FeedbackTier::KeepPracticing => "Keep practicing! You can improve.",
        }
    }

    /// Nothing earned → keep practicing; every answer correct → excellent;
    /// anything in between also → keep practicing.
    #[must_use]
    pub fn select(xp_earned: u32, correct: usize, submitted: usize) -> Self {
        if xp_earned == 0 {
            FeedbackTier::KeepPracticing
        } else if correct == submitted {
            FeedbackTier::Excellent
        } else {
            FeedbackTier::KeepPracticing
        }
    }
}

//
// ─── GRADER ────────────────────────────────────────────────────────────────────
//

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedQuiz {
    pub total_questions: usize,
    pub submitted: usize,
    pub correct_answers: Vec<QuestionId>,
    pub xp_earned: u32,
    pub feedback: FeedbackTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizGrader {
    mode: GradingMode,
    xp_per_correct: u32,
}

impl Default for QuizGrader {
    fn default() -> Self {
        Self::new(GradingMode::default(), XP_PER_CORRECT_ANSWER)
    }
}

impl QuizGrader {
    #[must_use]
    pub fn new(mode: GradingMode, xp_per_correct: u32) -> Self {
        Self {
            mode,
            xp_per_correct,
        }
    }

    #[must_use]
    pub fn mode(&self) -> GradingMode {
        self.mode
    }

    /// Grade `submission` against `quiz`. Correct question ids are reported in
    /// submission order.
    #[must_use]
    pub fn grade(&self, quiz: &Quiz, submission: &Submission) -> GradedQuiz {
        let correct_answers = match self.mode {
            GradingMode::Positional => grade_positional(quiz, submission),
            GradingMode::ById => grade_by_id(quiz, submission),
        };

        let correct = correct_answers.len();
        let submitted = submission.answers().len();
        let xp_earned = u32::try_from(correct)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.xp_per_correct);

        GradedQuiz {
            total_questions: quiz.question_count(),
            submitted,
            feedback: FeedbackTier::select(xp_earned, correct, submitted),
            correct_answers,
            xp_earned,
        }
    }
}

fn grade_positional(quiz: &Quiz, submission: &Submission) -> Vec<QuestionId> {
    submission
        .answers()
        .iter()
        .zip(quiz.questions.iter())
        .filter(|(answer, question)| {
            answer.question_id == *question.id() && question.is_correct(&answer.selected_option)
        })
        .map(|(answer, _)| answer.question_id.clone())
        .collect()
}

fn grade_by_id(quiz: &Quiz, submission: &Submission) -> Vec<QuestionId> {
    let mut credited: HashSet<&QuestionId> = HashSet::new();
    let mut correct = Vec::new();

    for answer in submission.answers() {
        let Some(question) = quiz.questions.iter().find(|q| *q.id() == answer.question_id) else {
            continue;
        };
        if question.is_correct(&answer.selected_option) && credited.insert(question.id()) {
            correct.push(answer.question_id.clone());
        }
    }

    correct
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::catalog::Resource;
use crate::model::ids::UserId;
use crate::model::topic::{Topic, count_quizzes};
use crate::xp::XpFormula;

//
// ─── LEDGER ────────────────────────────────────────────────────────────────────
//

/// Per-user experience ledger.
///
/// `required_xp` is a fixed baseline set when the game starts; with the
/// default formula every award resets the total relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLedger {
    user_id: UserId,
    experience_total: u32,
    required_xp: u32,
    started_at: DateTime<Utc>,
}

impl UserLedger {
    /// A fresh ledger with zero experience.
    #[must_use]
    pub fn new(user_id: UserId, required_xp: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            experience_total: 0,
            required_xp,
            started_at,
        }
    }

    /// Apply an award and return the new total.
    pub fn apply_award(&mut self, delta: u32, formula: XpFormula) -> u32 {
        self.experience_total = formula.next_total(self.experience_total, self.required_xp, delta);
        self.experience_total
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn experience_total(&self) -> u32 {
        self.experience_total
    }

    #[must_use]
    pub fn required_xp(&self) -> u32 {
        self.required_xp
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

//
// ─── COMPLETIONS ───────────────────────────────────────────────────────────────
//

/// Per-user counters of finished topics, quizzes, and resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: UserId,
    pub topics_completed: u32,
    pub quizzes_completed: u32,
    pub resources_completed: u32,
}

impl CompletionRecord {
    #[must_use]
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            topics_completed: 0,
            quizzes_completed: 0,
            resources_completed: 0,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.topics_completed)
            + u64::from(self.quizzes_completed)
            + u64::from(self.resources_completed)
    }

    /// Add every positive category of `delta`. Counters only grow.
    pub fn apply(&mut self, delta: &CompletionDelta) {
        if let Some(n) = delta.positive_topics() {
            self.topics_completed = self.topics_completed.saturating_add(n);
        }
        if let Some(n) = delta.positive_quizzes() {
            self.quizzes_completed = self.quizzes_completed.saturating_add(n);
        }
        if let Some(n) = delta.positive_resources() {
            self.resources_completed = self.resources_completed.saturating_add(n);
        }
    }
}

/// Relative increments for a completion record. Absent or zero categories
/// are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionDelta {
    pub topics: Option<u32>,
    pub quizzes: Option<u32>,
    pub resources: Option<u32>,
}

impl CompletionDelta {
    #[must_use]
    pub fn topics(n: u32) -> Self {
        Self {
            topics: Some(n),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn quizzes(n: u32) -> Self {
        Self {
            quizzes: Some(n),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn resources(n: u32) -> Self {
        Self {
            resources: Some(n),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn positive_topics(&self) -> Option<u32> {
        self.topics.filter(|n| *n > 0)
    }

    #[must_use]
    pub fn positive_quizzes(&self) -> Option<u32> {
        self.quizzes.filter(|n| *n > 0)
    }

    #[must_use]
    pub fn positive_resources(&self) -> Option<u32> {
        self.resources.filter(|n| *n > 0)
    }

    /// True when no category carries a positive increment.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.positive_topics().is_none()
            && self.positive_quizzes().is_none()
            && self.positive_resources().is_none()
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Live catalog sizes used as the progress denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogTotals {
    pub topics: u64,
    pub quizzes: u64,
    pub resources: u64,
}

impl CatalogTotals {
    /// Quizzes are counted across all topics.
    #[must_use]
    pub fn from_catalog(topics: &[Topic], resources: &[Resource]) -> Self {
        Self {
            topics: topics.len() as u64,
            quizzes: count_quizzes(topics),
            resources: resources.len() as u64,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.topics + self.quizzes + self.resources
    }
}

/// Percentage of `completed` over `total`; an empty catalog yields `0.0`.
///
/// Counters are not capped, so the result can exceed 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overall_percentage(completed: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64 * 100.0) as f32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub topics_completed: u32,
    pub total_topics: u64,
    pub quizzes_completed: u32,
    pub total_quizzes: u64,
    pub resources_completed: u32,
    pub total_resources: u64,
    pub overall_progress: f32,
}

impl ProgressReport {
    #[must_use]
    pub fn compute(record: &CompletionRecord, totals: CatalogTotals) -> Self {
        Self {
            topics_completed: record.topics_completed,
            total_topics: totals.topics,
            quizzes_completed: record.quizzes_completed,
            total_quizzes: totals.quizzes,
            resources_completed: record.resources_completed,
            total_resources: totals.resources,
            overall_progress: overall_percentage(record.total(), totals.total()),
        }
    }
}

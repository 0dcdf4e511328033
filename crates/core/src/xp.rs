//! Experience point rules: how much each activity is worth and how an award
//! changes a ledger's total.

use serde::{Deserialize, Serialize};

pub const TOPIC_XP: u32 = 50;
pub const RESOURCE_XP: u32 = 10;
pub const FEEDBACK_XP: u32 = 10;
pub const XP_PER_CORRECT_ANSWER: u32 = 10;

/// How an award is folded into a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XpFormula {
    /// `total = delta + required_xp`. The previous total is ignored, so
    /// repeated awards do not accumulate. Displays downstream rely on this.
    #[default]
    Baseline,
    /// `total = previous_total + delta`.
    Cumulative,
}

impl XpFormula {
    /// Computes the ledger total after awarding `delta`. Saturates at `u32::MAX`.
    #[must_use]
    pub fn next_total(self, previous_total: u32, required_xp: u32, delta: u32) -> u32 {
        match self {
            XpFormula::Baseline => delta.saturating_add(required_xp),
            XpFormula::Cumulative => previous_total.saturating_add(delta),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            XpFormula::Baseline => "baseline",
            XpFormula::Cumulative => "cumulative",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "baseline" => Some(Self::Baseline),
            "cumulative" => Some(Self::Cumulative),
            _ => None,
        }
    }
}

/// XP granted per activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRewards {
    pub topic: u32,
    pub resource: u32,
    pub feedback: u32,
    pub per_correct_answer: u32,
}

impl Default for XpRewards {
    fn default() -> Self {
        Self {
            topic: TOPIC_XP,
            resource: RESOURCE_XP,
            feedback: FEEDBACK_XP,
            per_correct_answer: XP_PER_CORRECT_ANSWER,
        }
    }
}

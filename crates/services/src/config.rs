use std::env;
use std::str::FromStr;

use game_core::grading::GradingMode;
use game_core::xp::{XpFormula, XpRewards};
use tracing::warn;

/// Tunables for XP awards and grading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub rewards: XpRewards,
    pub starting_required_xp: u32,
    pub grading_mode: GradingMode,
    pub xp_formula: XpFormula,
}

impl GameConfig {
    /// Read overrides from `LEARN_*` variables. Unparsable values are logged
    /// and replaced by defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, fallback: u32| {
            parse_or(&lookup, key, fallback, |raw| u32::from_str(raw.trim()).ok())
        };

        Self {
            rewards: XpRewards {
                topic: number("LEARN_TOPIC_XP", defaults.rewards.topic),
                resource: number("LEARN_RESOURCE_XP", defaults.rewards.resource),
                feedback: number("LEARN_FEEDBACK_XP", defaults.rewards.feedback),
                per_correct_answer: number("LEARN_QUIZ_XP", defaults.rewards.per_correct_answer),
            },
            starting_required_xp: number("LEARN_REQUIRED_XP", defaults.starting_required_xp),
            grading_mode: parse_or(
                &lookup,
                "LEARN_GRADING_MODE",
                defaults.grading_mode,
                GradingMode::parse,
            ),
            xp_formula: parse_or(&lookup, "LEARN_XP_FORMULA", defaults.xp_formula, XpFormula::parse),
        }
    }
}

fn parse_or<T: Copy + std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    fallback: T,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match lookup(key) {
        None => fallback,
        Some(raw) => parse(&raw).unwrap_or_else(|| {
            warn!(key, value = %raw, ?fallback, "ignoring invalid config value");
            fallback
        }),
    }
}

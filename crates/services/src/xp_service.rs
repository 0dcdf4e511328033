use std::sync::Arc;

use game_core::model::{UserId, UserLedger};
use game_core::xp::XpFormula;
use storage::repository::{LedgerRepository, StorageError};
use tracing::info;

use crate::Clock;
use crate::error::{GameServiceError, storage_failure};

/// Applies XP awards to per-user ledgers.
#[derive(Clone)]
pub struct XpService {
    clock: Clock,
    formula: XpFormula,
    starting_required_xp: u32,
    ledgers: Arc<dyn LedgerRepository>,
}

impl XpService {
    #[must_use]
    pub fn new(
        clock: Clock,
        formula: XpFormula,
        starting_required_xp: u32,
        ledgers: Arc<dyn LedgerRepository>,
    ) -> Self {
        Self {
            clock,
            formula,
            starting_required_xp,
            ledgers,
        }
    }

    /// Apply `delta` to the user's ledger and return the stored total.
    ///
    /// With the baseline formula the total becomes `delta + required_xp`
    /// regardless of what was stored before.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::LedgerNotFound` if the user never started a game.
    /// Returns `GameServiceError::Storage` if the update fails.
    pub async fn award(&self, user_id: &UserId, delta: u32) -> Result<u32, GameServiceError> {
        let total = self
            .ledgers
            .apply_xp(user_id, delta, self.formula)
            .await
            .map_err(|e| storage_failure("apply_xp", e))?
            .ok_or_else(|| GameServiceError::LedgerNotFound(user_id.clone()))?;

        info!(
            user_id = %user_id,
            xp = delta,
            total,
            formula = self.formula.as_str(),
            "xp awarded"
        );
        Ok(total)
    }

    /// Create a zero-XP ledger for the user.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::AlreadyStarted` if a ledger exists.
    /// Returns `GameServiceError::Storage` if the insert fails.
    pub async fn start(&self, user_id: &UserId) -> Result<UserLedger, GameServiceError> {
        let ledger = UserLedger::new(user_id.clone(), self.starting_required_xp, self.clock.now());
        match self.ledgers.insert_ledger(&ledger).await {
            Ok(()) => {
                info!(user_id = %user_id, required_xp = ledger.required_xp(), "ledger created");
                Ok(ledger)
            }
            Err(StorageError::Conflict) => Err(GameServiceError::AlreadyStarted(user_id.clone())),
            Err(err) => Err(storage_failure("insert_ledger", err)),
        }
    }
}

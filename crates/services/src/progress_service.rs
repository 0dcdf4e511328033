use game_core::model::{ProgressReport, UserId};
use tracing::debug;

use crate::catalog_service::CatalogService;
use crate::completion_service::CompletionService;
use crate::error::GameServiceError;

/// Combines a user's completion counters with live catalog sizes.
#[derive(Clone)]
pub struct ProgressService {
    catalog: CatalogService,
    completions: CompletionService,
}

impl ProgressService {
    #[must_use]
    pub fn new(catalog: CatalogService, completions: CompletionService) -> Self {
        Self {
            catalog,
            completions,
        }
    }

    /// # Errors
    ///
    /// Returns `GameServiceError::CompletionsNotFound` if the user has no record.
    /// Returns `GameServiceError::Storage` if repository access fails.
    pub async fn progress(&self, user_id: &UserId) -> Result<ProgressReport, GameServiceError> {
        let record = self.completions.record(user_id).await?;
        let totals = self.catalog.totals().await?;
        let report = ProgressReport::compute(&record, totals);
        debug!(
            user_id = %user_id,
            overall = report.overall_progress,
            "progress computed"
        );
        Ok(report)
    }
}

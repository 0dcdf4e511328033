//! Catalog snapshots used to populate a store for development and tests.

use game_core::model::{Challenge, Recommendation, Resource, Topic};
use serde::{Deserialize, Serialize};

use crate::repository::{CatalogRepository, StorageError};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// Every catalog collection in one JSON document. Missing collections load
/// as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// Counts of documents written by `CatalogSnapshot::load_into`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub topics: usize,
    pub resources: usize,
    pub challenges: usize,
    pub recommendations: usize,
}

impl CatalogSnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any document does not match
    /// its schema.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw)
            .map_err(|e| StorageError::Serialization(format!("invalid catalog snapshot: {e}")))
    }

    /// The bundled sample catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the bundled file is malformed.
    pub fn sample() -> Result<Self, StorageError> {
        Self::from_json(SAMPLE_CATALOG)
    }

    /// Upsert every document into `catalog`.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` raised by the repository.
    pub async fn load_into(
        &self,
        catalog: &dyn CatalogRepository,
    ) -> Result<SeedReport, StorageError> {
        for topic in &self.topics {
            catalog.upsert_topic(topic).await?;
        }
        for resource in &self.resources {
            catalog.upsert_resource(resource).await?;
        }
        for challenge in &self.challenges {
            catalog.upsert_challenge(challenge).await?;
        }
        for recommendation in &self.recommendations {
            catalog.upsert_recommendation(recommendation).await?;
        }

        Ok(SeedReport {
            topics: self.topics.len(),
            resources: self.resources.len(),
            challenges: self.challenges.len(),
            recommendations: self.recommendations.len(),
        })
    }
}

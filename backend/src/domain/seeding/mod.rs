//! Sample data seeding orchestration.
//!
//! Generates a deterministic dataset with the `seed-data` crate, writes it
//! parents-first in the order the [`RelationshipManager`] derives, and
//! finishes with a full validation pass. Operators use the same service to
//! inspect data without writing: validation, statistics, ordering, and
//! deletion checks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use seed_data::{GenerationError, SeedDataset, SeedDefinition, SeedProfile, generate_dataset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{CollectionStore, CollectionStoreError};
use crate::domain::{
    CollectionName, CollectionNameError, CollectionStats, CycleDetected, DataValidator,
    DeletionCheck, Document, DocumentId, RelationshipManager, ValidationReport,
};

/// How a seeding run behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedOptions {
    /// Dataset size.
    pub profile: SeedProfile,
    /// RNG seed; equal seeds and profiles produce equal datasets.
    pub seed: u64,
    /// Add to existing data instead of replacing it.
    pub incremental: bool,
    /// Leave existing data in place even for a full run.
    pub skip_cleanup: bool,
}

/// Seed used when a run does not name one.
pub const DEFAULT_SEED_VALUE: u64 = 2026;

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            profile: SeedProfile::Standard,
            seed: DEFAULT_SEED_VALUE,
            incremental: false,
            skip_cleanup: false,
        }
    }
}

impl SeedOptions {
    /// Options for a named registry seed.
    pub fn from_definition(definition: &SeedDefinition) -> Self {
        Self {
            profile: definition.profile(),
            seed: definition.seed(),
            ..Self::default()
        }
    }

    fn clears_existing(&self) -> bool {
        !self.incremental && !self.skip_cleanup
    }
}

/// Timing for one collection written during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSeedMetrics {
    pub collection: CollectionName,
    pub records: u64,
    pub duration_ms: u64,
    pub records_per_second: f64,
}

impl CollectionSeedMetrics {
    fn measure(collection: CollectionName, records: u64, elapsed: Duration) -> Self {
        #[expect(
            clippy::cast_precision_loss,
            reason = "throughput is an approximate figure"
        )]
        let records_per_second = records as f64 / elapsed.as_secs_f64().max(0.001);
        Self {
            collection,
            records,
            duration_ms: millis(elapsed),
            records_per_second,
        }
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    /// True when the post-seed validation found no errors.
    pub success: bool,
    pub profile: SeedProfile,
    pub seed: u64,
    pub total_records: u64,
    pub total_duration_ms: u64,
    /// Per-collection metrics in write order.
    pub collections: Vec<CollectionSeedMetrics>,
    /// SHA-256 over the generated documents, hex encoded.
    pub dataset_digest: String,
    pub validation: ValidationReport,
}

/// Record counts a profile produces, for operator listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub name: &'static str,
    pub partners: usize,
    pub customers: usize,
    pub menus_per_partner: usize,
    pub items_per_menu: usize,
    pub orders_per_customer: usize,
}

impl From<SeedProfile> for ProfileInfo {
    fn from(profile: SeedProfile) -> Self {
        let volumes = profile.volumes();
        Self {
            name: profile.as_str(),
            partners: volumes.partners,
            customers: volumes.customers,
            menus_per_partner: volumes.menus_per_partner,
            items_per_menu: volumes.items_per_menu,
            orders_per_customer: volumes.orders_per_customer,
        }
    }
}

/// Every profile in ascending size.
pub fn profiles() -> Vec<ProfileInfo> {
    SeedProfile::ALL.into_iter().map(ProfileInfo::from).collect()
}

/// Errors that abort a seeding run.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// The relationship rules loop, so no write order exists.
    #[error(transparent)]
    Cycle(#[from] CycleDetected),
    /// Dataset generation failed.
    #[error("sample data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// The generator produced a collection name the store cannot hold.
    #[error("generated collection name '{name}' is invalid: {source}")]
    InvalidCollection {
        name: String,
        #[source]
        source: CollectionNameError,
    },
    /// A generated document was not a JSON object.
    #[error("generated {collection} document is not an object")]
    MalformedDocument { collection: CollectionName },
    /// The store rejected a read or write.
    #[error("seeding store operation failed: {0}")]
    Store(#[from] CollectionStoreError),
}

/// Seeding and inspection service over a [`CollectionStore`].
#[derive(Clone)]
pub struct Seeder {
    store: Arc<dyn CollectionStore>,
    relationships: RelationshipManager,
    validator: DataValidator,
}

impl Seeder {
    /// Seeder with the marketplace relationship and validation rules.
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self::with_rules(store, RelationshipManager::standard(), DataValidator::standard())
    }

    pub fn with_rules(
        store: Arc<dyn CollectionStore>,
        relationships: RelationshipManager,
        validator: DataValidator,
    ) -> Self {
        Self {
            store,
            relationships,
            validator,
        }
    }

    pub fn relationships(&self) -> &RelationshipManager {
        &self.relationships
    }

    /// Generate and write a dataset, then validate the store.
    ///
    /// # Errors
    /// [`SeedingError`] when generation fails, the rules are cyclic, or the
    /// store rejects a write. Validation findings never fail the run; they
    /// are reported in the summary.
    pub async fn seed(&self, options: &SeedOptions) -> Result<SeedSummary, SeedingError> {
        let started = Instant::now();
        let definition = SeedDefinition::new(
            format!("{}-{}", options.profile, options.seed),
            options.seed,
            options.profile,
        );
        info!(profile = %options.profile, seed = options.seed, "seeding sample data");
        let dataset = generate_dataset(&definition)?;
        let dataset_digest = digest(&dataset);
        let collections = named_collections(dataset)?;

        let names: Vec<CollectionName> = collections.iter().map(|(name, _)| name.clone()).collect();
        let order = self.relationships.seeding_order(&names)?;

        if options.clears_existing() {
            for name in order.iter().rev() {
                let removed = self.store.delete_all(name).await?;
                info!(collection = %name, removed, "collection cleared");
            }
        }

        let mut pending = collections;
        let mut metrics = Vec::with_capacity(order.len());
        for name in order {
            let Some(position) = pending.iter().position(|(candidate, _)| *candidate == name) else {
                continue;
            };
            let (_, documents) = pending.swap_remove(position);
            let collection_started = Instant::now();
            self.store.ensure_collection(&name).await?;
            let written = self.store.insert_many(&name, documents).await?;
            let entry = CollectionSeedMetrics::measure(name, written, collection_started.elapsed());
            info!(
                collection = %entry.collection,
                records = entry.records,
                duration_ms = entry.duration_ms,
                "collection seeded"
            );
            metrics.push(entry);
        }

        let validation = self.validate().await;
        let summary = SeedSummary {
            success: validation.is_valid(),
            profile: options.profile,
            seed: options.seed,
            total_records: metrics.iter().map(|m| m.records).sum(),
            total_duration_ms: millis(started.elapsed()),
            collections: metrics,
            dataset_digest,
            validation,
        };
        if summary.success {
            info!(
                records = summary.total_records,
                duration_ms = summary.total_duration_ms,
                "seeding completed"
            );
        } else {
            warn!(
                errors = summary.validation.errors().len(),
                "seeding completed with validation errors"
            );
        }
        Ok(summary)
    }

    /// Relationship checks followed by rule and business checks.
    pub async fn validate(&self) -> ValidationReport {
        let mut report = self.relationships.validate_relationships(self.store.as_ref()).await;
        report.merge(self.validator.validate_all_collections(self.store.as_ref()).await);
        report
    }

    /// Statistics for every stored collection.
    pub async fn collection_stats(&self) -> Result<Vec<CollectionStats>, CollectionStoreError> {
        self.validator.collection_stats(self.store.as_ref()).await
    }

    /// Parent-first order for every collection currently stored.
    pub async fn stored_order(&self) -> Result<Vec<CollectionName>, SeedingError> {
        let stored = self.store.collections().await?;
        Ok(self.relationships.seeding_order(&stored)?)
    }

    /// Whether a record (or any record) of `collection` can be deleted.
    pub async fn can_delete(
        &self,
        collection: &CollectionName,
        record_id: Option<&DocumentId>,
    ) -> Result<DeletionCheck, CollectionStoreError> {
        self.relationships
            .can_delete(collection, self.store.as_ref(), record_id)
            .await
    }
}

fn named_collections(
    dataset: SeedDataset,
) -> Result<Vec<(CollectionName, Vec<Document>)>, SeedingError> {
    dataset
        .into_collections()
        .into_iter()
        .map(|(raw, values)| {
            let name = CollectionName::new(&raw)
                .map_err(|source| SeedingError::InvalidCollection { name: raw, source })?;
            let documents = values
                .into_iter()
                .map(|value| match value {
                    Value::Object(document) => Ok(document),
                    _ => Err(SeedingError::MalformedDocument {
                        collection: name.clone(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((name, documents))
        })
        .collect()
}

/// Fingerprint of a dataset: collection names and document bodies in
/// lexical collection order.
fn digest(dataset: &SeedDataset) -> String {
    let mut hasher = Sha256::new();
    for (collection, documents) in dataset.iter() {
        hasher.update(collection.as_bytes());
        hasher.update([0]);
        for document in documents {
            hasher.update(document.to_string().as_bytes());
            hasher.update([b'\n']);
        }
    }
    hex::encode(hasher.finalize())
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests;

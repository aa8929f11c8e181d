//! Generated dataset container.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::profile::SeedProfile;

/// Documents generated for one seed, grouped by collection name.
///
/// Every document is a JSON object carrying an `_id`. References between
/// collections use those ids, so the dataset is internally consistent as long
/// as collections are written parents-first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeedDataset {
    seed: u64,
    profile: SeedProfile,
    collections: BTreeMap<String, Vec<Value>>,
}

impl SeedDataset {
    pub(crate) const fn new(seed: u64, profile: SeedProfile) -> Self {
        Self {
            seed,
            profile,
            collections: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, collection: &str, documents: Vec<Value>) {
        self.collections.insert(collection.to_owned(), documents);
    }

    /// RNG seed the dataset was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Profile the dataset was generated with.
    #[must_use]
    pub const fn profile(&self) -> SeedProfile {
        self.profile
    }

    /// Collection names in lexical order.
    #[must_use]
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Documents for one collection; empty when the collection was not
    /// generated.
    #[must_use]
    pub fn documents(&self, collection: &str) -> &[Value] {
        self.collections.get(collection).map_or(&[], Vec::as_slice)
    }

    /// Total number of documents across all collections.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Iterate collections and their documents in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.collections
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.as_slice()))
    }

    /// Consume the dataset, yielding owned collections.
    #[must_use]
    pub fn into_collections(self) -> BTreeMap<String, Vec<Value>> {
        self.collections
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_collection_is_empty() {
        let dataset = SeedDataset::new(1, SeedProfile::Minimal);
        assert!(dataset.documents("users").is_empty());
        assert_eq!(dataset.total_records(), 0);
    }

    #[test]
    fn counts_documents_across_collections() {
        let mut dataset = SeedDataset::new(1, SeedProfile::Minimal);
        dataset.insert("users", vec![json!({"_id": "a"}), json!({"_id": "b"})]);
        dataset.insert("menus", vec![json!({"_id": "c"})]);

        assert_eq!(dataset.total_records(), 3);
        assert_eq!(dataset.collection_names(), vec!["menus", "users"]);
    }
}

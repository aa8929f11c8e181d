//! Process-local collection store used by tests and fixture mode.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{CollectionStore, CollectionStoreError};
use crate::domain::{CollectionName, Document, DocumentId, Filter, ID_FIELD};

/// Collections held in a map behind a lock; documents keep insertion order.
///
/// Locks are only held across synchronous sections, never across `.await`.
#[derive(Debug, Default)]
pub struct InMemoryCollectionStore {
    collections: RwLock<BTreeMap<CollectionName, Vec<Document>>>,
}

impl InMemoryCollectionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<RwLockReadGuard<'_, BTreeMap<CollectionName, Vec<Document>>>, CollectionStoreError>
    {
        self.collections
            .read()
            .map_err(|_| CollectionStoreError::connection("in-memory store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<CollectionName, Vec<Document>>>, CollectionStoreError>
    {
        self.collections
            .write()
            .map_err(|_| CollectionStoreError::connection("in-memory store lock poisoned"))
    }
}

fn has_id(document: &Document, id: &DocumentId) -> bool {
    DocumentId::of(document).as_ref() == Some(id)
}

/// Grouping key for duplicate detection; ids compare by value in either form.
fn group_key(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(match DocumentId::from_value(value) {
        Some(id) if value.is_object() => format!("\"{id}\""),
        _ => value.to_string(),
    })
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn collections(&self) -> Result<Vec<CollectionName>, CollectionStoreError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    async fn has_collection(&self, name: &CollectionName) -> Result<bool, CollectionStoreError> {
        Ok(self.read()?.contains_key(name))
    }

    async fn ensure_collection(&self, name: &CollectionName) -> Result<(), CollectionStoreError> {
        self.write()?.entry(name.clone()).or_default();
        Ok(())
    }

    async fn count(
        &self,
        name: &CollectionName,
        filter: &Filter,
    ) -> Result<u64, CollectionStoreError> {
        let guard = self.read()?;
        let matching = guard
            .get(name)
            .map_or(0, |docs| docs.iter().filter(|doc| filter.matches(doc)).count());
        Ok(u64::try_from(matching).unwrap_or(u64::MAX))
    }

    async fn find(
        &self,
        name: &CollectionName,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, CollectionStoreError> {
        let guard = self.read()?;
        let Some(docs) = guard.get(name) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError> {
        let guard = self.read()?;
        Ok(guard
            .get(name)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn insert_many(
        &self,
        name: &CollectionName,
        documents: Vec<Document>,
    ) -> Result<u64, CollectionStoreError> {
        let mut guard = self.write()?;
        let existing = guard.entry(name.clone()).or_default();
        let mut seen: HashSet<DocumentId> = existing.iter().filter_map(DocumentId::of).collect();

        let mut staged = Vec::with_capacity(documents.len());
        for mut document in documents {
            let id = match DocumentId::of(&document) {
                Some(id) => id,
                None => {
                    let id = DocumentId::generate();
                    document.insert(ID_FIELD.to_owned(), Value::from(id.clone()));
                    id
                }
            };
            if !seen.insert(id.clone()) {
                return Err(CollectionStoreError::query(format!(
                    "duplicate id {id} in {name}"
                )));
            }
            staged.push(document);
        }
        let written = u64::try_from(staged.len()).unwrap_or(u64::MAX);
        existing.extend(staged);
        Ok(written)
    }

    async fn update_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
        changes: Document,
    ) -> Result<Option<Document>, CollectionStoreError> {
        let mut guard = self.write()?;
        let Some(document) = guard
            .get_mut(name)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(None);
        };
        for (field, value) in changes {
            if field != ID_FIELD {
                document.insert(field, value);
            }
        }
        Ok(Some(document.clone()))
    }

    async fn delete_by_id(
        &self,
        name: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, CollectionStoreError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(name) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|doc| has_id(doc, id))
            .map(|index| docs.remove(index)))
    }

    async fn delete_all(&self, name: &CollectionName) -> Result<u64, CollectionStoreError> {
        let mut guard = self.write()?;
        let removed = guard.get_mut(name).map_or(0, |docs| {
            let count = docs.len();
            docs.clear();
            count
        });
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn duplicate_groups(
        &self,
        name: &CollectionName,
        field: &str,
    ) -> Result<u64, CollectionStoreError> {
        let guard = self.read()?;
        let mut groups: HashMap<String, usize> = HashMap::new();
        for value in guard
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|doc| doc.get(field))
            .filter_map(group_key)
        {
            *groups.entry(value).or_default() += 1;
        }
        let duplicated = groups.values().filter(|count| **count > 1).count();
        Ok(u64::try_from(duplicated).unwrap_or(u64::MAX))
    }
}

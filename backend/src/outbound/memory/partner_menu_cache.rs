//! Process-local partner menu cache with per-entry expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::MenuItem;
use crate::domain::ports::{PartnerMenuCache, PartnerMenuCacheError, PartnerMenuCacheKey};

#[derive(Debug)]
struct Entry {
    items: Vec<MenuItem>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

/// Map-backed cache; expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct InMemoryPartnerMenuCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryPartnerMenuCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, PartnerMenuCacheError> {
        self.entries
            .lock()
            .map_err(|_| PartnerMenuCacheError::backend("in-memory cache lock poisoned"))
    }
}

#[async_trait]
impl PartnerMenuCache for InMemoryPartnerMenuCache {
    async fn get(
        &self,
        key: &PartnerMenuCacheKey,
    ) -> Result<Option<Vec<MenuItem>>, PartnerMenuCacheError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        match entries.get(key.as_str()) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.items.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &PartnerMenuCacheKey,
        items: &[MenuItem],
        ttl: Duration,
    ) -> Result<(), PartnerMenuCacheError> {
        let entry = Entry {
            items: items.to_vec(),
            expires_at: Instant::now().checked_add(ttl),
        };
        self.lock()?.insert(key.as_str().to_owned(), entry);
        Ok(())
    }

    async fn evict(&self, key: &PartnerMenuCacheKey) -> Result<(), PartnerMenuCacheError> {
        self.lock()?.remove(key.as_str());
        Ok(())
    }
}

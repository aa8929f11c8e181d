//! Port interface for caching partner-scoped menu item listings.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::MenuItem;

use super::{PartnerMenuCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum PartnerMenuCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "partner menu cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "partner menu cache serialisation failed: {message}",
    }
}

/// Key-value cache for [`MenuItem`] listings with per-entry expiry.
///
/// Concurrent writers for the same key race; the last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartnerMenuCache: Send + Sync {
    /// Read the cached listing, if present and not expired.
    async fn get(
        &self,
        key: &PartnerMenuCacheKey,
    ) -> Result<Option<Vec<MenuItem>>, PartnerMenuCacheError>;

    /// Store a listing that expires after `ttl`.
    async fn put(
        &self,
        key: &PartnerMenuCacheKey,
        items: &[MenuItem],
        ttl: Duration,
    ) -> Result<(), PartnerMenuCacheError>;

    /// Drop the entry for the key, if any.
    async fn evict(&self, key: &PartnerMenuCacheKey) -> Result<(), PartnerMenuCacheError>;
}

/// Cache that never stores anything; every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPartnerMenuCache;

#[async_trait]
impl PartnerMenuCache for DisabledPartnerMenuCache {
    async fn get(
        &self,
        _key: &PartnerMenuCacheKey,
    ) -> Result<Option<Vec<MenuItem>>, PartnerMenuCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &PartnerMenuCacheKey,
        _items: &[MenuItem],
        _ttl: Duration,
    ) -> Result<(), PartnerMenuCacheError> {
        Ok(())
    }

    async fn evict(&self, _key: &PartnerMenuCacheKey) -> Result<(), PartnerMenuCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentId;

    #[tokio::test]
    async fn disabled_cache_always_misses() {
        let cache = DisabledPartnerMenuCache;
        let key = PartnerMenuCacheKey::for_partner(&DocumentId::new("p1").expect("id"));
        cache
            .put(&key, &[], Duration::from_secs(60))
            .await
            .expect("put succeeds");
        assert!(cache.get(&key).await.expect("get succeeds").is_none());
    }
}

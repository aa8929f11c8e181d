//! Redis-backed partner menu cache.
//!
//! Listings are stored as JSON strings with `SET .. EX`. Expiry carries up to
//! ten per cent of random jitter so entries written together do not all
//! expire in the same second.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{AsyncCommands, RedisError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::domain::MenuItem;
use crate::domain::ports::{PartnerMenuCache, PartnerMenuCacheError, PartnerMenuCacheKey};

const JITTER_DIVISOR: u64 = 10;

/// Connection settings for [`RedisPartnerMenuCache`].
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisCacheConfig {
    /// Settings for the given `redis://` URL with default pool sizing.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 8,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Cap the number of pooled connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Bound how long a checkout may wait.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// [`PartnerMenuCache`] backed by a pooled Redis connection.
#[derive(Clone)]
pub struct RedisPartnerMenuCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisPartnerMenuCache {
    /// Build the connection pool.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, PartnerMenuCacheError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| PartnerMenuCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PartnerMenuCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }
}

fn map_run_error(error: RunError<RedisError>) -> PartnerMenuCacheError {
    match error {
        RunError::User(err) => PartnerMenuCacheError::backend(err.to_string()),
        RunError::TimedOut => PartnerMenuCacheError::backend("connection checkout timed out"),
    }
}

fn map_redis_error(error: RedisError) -> PartnerMenuCacheError {
    PartnerMenuCacheError::backend(error.to_string())
}

/// Expiry in whole seconds with up to a tenth added at random; never zero
/// and saturating at `u64::MAX`.
fn jittered_seconds(ttl: Duration, rng: &mut impl Rng) -> u64 {
    let base = ttl.as_secs().max(1);
    let spread = base / JITTER_DIVISOR;
    base.saturating_add(rng.gen_range(0..=spread))
}

#[async_trait]
impl PartnerMenuCache for RedisPartnerMenuCache {
    async fn get(
        &self,
        key: &PartnerMenuCacheKey,
    ) -> Result<Option<Vec<MenuItem>>, PartnerMenuCacheError> {
        let mut conn = self.pool.get().await.map_err(map_run_error)?;
        let payload: Option<String> = (*conn).get(key.as_str()).await.map_err(map_redis_error)?;
        payload
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|err| PartnerMenuCacheError::serialization(err.to_string()))
            })
            .transpose()
    }

    async fn put(
        &self,
        key: &PartnerMenuCacheKey,
        items: &[MenuItem],
        ttl: Duration,
    ) -> Result<(), PartnerMenuCacheError> {
        let payload = serde_json::to_string(items)
            .map_err(|err| PartnerMenuCacheError::serialization(err.to_string()))?;
        let seconds = jittered_seconds(ttl, &mut SmallRng::from_entropy());
        let mut conn = self.pool.get().await.map_err(map_run_error)?;
        (*conn)
            .set_ex::<_, _, ()>(key.as_str(), payload, seconds)
            .await
            .map_err(map_redis_error)?;
        debug!(key = %key, seconds, "partner menu cached");
        Ok(())
    }

    async fn evict(&self, key: &PartnerMenuCacheKey) -> Result<(), PartnerMenuCacheError> {
        let mut conn = self.pool.get().await.map_err(map_run_error)?;
        (*conn)
            .del::<_, ()>(key.as_str())
            .await
            .map_err(map_redis_error)
    }
}

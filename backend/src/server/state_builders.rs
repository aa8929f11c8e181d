//! Builders turning settings into adapters and handler state.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use backend::domain::ports::PartnerMenuCacheError;
use backend::domain::{MenuService, Seeder};
use backend::inbound::http::auth::JwtVerifier;
use backend::inbound::http::state::HttpState;
use backend::outbound::cache::{RedisCacheConfig, RedisPartnerMenuCache};
use backend::outbound::documents::{DocumentMenuRepository, DocumentPartnerDirectory};
use backend::outbound::persistence::{
    DbPool, DieselCollectionStore, MigrationError, PoolConfig, PoolError, run_migrations,
};
use backend::settings::ServerSettings;

use super::ServerConfig;

/// Failures while connecting the configured adapters.
#[derive(Debug, Error)]
pub enum AdapterSetupError {
    #[error("database migrations failed: {0}")]
    Migrations(#[from] MigrationError),
    #[error("database pool setup failed: {0}")]
    Pool(#[from] PoolError),
    #[error("menu cache setup failed: {0}")]
    Cache(#[from] PartnerMenuCacheError),
}

/// Build a [`ServerConfig`] from settings, connecting PostgreSQL and Redis
/// when their URLs are present.
///
/// # Errors
/// Returns [`AdapterSetupError`] when migrations fail or a pool cannot be
/// built.
pub async fn connect_adapters(
    settings: &ServerSettings,
    tokens: JwtVerifier,
) -> Result<ServerConfig, AdapterSetupError> {
    let mut config = ServerConfig::new(settings.bind_addr(), tokens)
        .with_menu_cache_ttl(settings.menu_cache_ttl());

    match settings.database_url.as_deref() {
        Some(url) => {
            let applied = run_migrations(url).await?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            config = config.with_store(Arc::new(DieselCollectionStore::new(pool)));
        }
        None => info!("no database configured; using the in-memory document store"),
    }

    match settings.redis_url.as_deref() {
        Some(url) => {
            let cache = RedisPartnerMenuCache::connect(RedisCacheConfig::new(url)).await?;
            config = config.with_cache(Arc::new(cache));
        }
        None => info!("no redis configured; using the in-memory menu cache"),
    }

    Ok(config)
}

/// Assemble handler state over the configured store and cache.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let store = config.store();
    let menus = MenuService::new(
        Arc::new(DocumentMenuRepository::new(Arc::clone(&store))),
        Arc::new(DocumentPartnerDirectory::new(Arc::clone(&store))),
        Arc::clone(&config.cache),
        Arc::new(DefaultClock),
    )
    .with_cache_ttl(config.menu_cache_ttl);
    HttpState::new(menus, Seeder::new(store), config.tokens.clone())
}

//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use backend::domain::DEFAULT_MENU_CACHE_TTL;
use backend::domain::ports::{CollectionStore, PartnerMenuCache};
use backend::inbound::http::auth::JwtVerifier;
use backend::outbound::memory::{InMemoryCollectionStore, InMemoryPartnerMenuCache};

/// Builder-style configuration for creating the HTTP server.
///
/// Defaults to the in-memory adapters; attach real ones with
/// [`ServerConfig::with_store`] and [`ServerConfig::with_cache`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: JwtVerifier,
    pub(crate) menu_cache_ttl: Duration,
    pub(crate) store: Arc<dyn CollectionStore>,
    pub(crate) cache: Arc<dyn PartnerMenuCache>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: JwtVerifier) -> Self {
        Self {
            bind_addr,
            tokens,
            menu_cache_ttl: DEFAULT_MENU_CACHE_TTL,
            store: Arc::new(InMemoryCollectionStore::new()),
            cache: Arc::new(InMemoryPartnerMenuCache::new()),
        }
    }

    /// Attach the document store shared by the catalogue and the seeder.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CollectionStore>) -> Self {
        self.store = store;
        self
    }

    /// Attach the partner listing cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn PartnerMenuCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_menu_cache_ttl(mut self, ttl: Duration) -> Self {
        self.menu_cache_ttl = ttl;
        self
    }

    /// Return the configured document store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn CollectionStore> {
        Arc::clone(&self.store)
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Read by the server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

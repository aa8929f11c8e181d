//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they only depend
//! on domain services and stay testable over the in-memory adapters.

use std::sync::Arc;

use crate::domain::{MenuService, Seeder};
use crate::inbound::http::auth::JwtVerifier;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub menus: Arc<MenuService>,
    pub seeder: Arc<Seeder>,
    /// Verifies bearer tokens for the [`Authenticated`] extractor.
    ///
    /// [`Authenticated`]: crate::inbound::http::auth::Authenticated
    pub tokens: Arc<JwtVerifier>,
}

impl HttpState {
    pub fn new(menus: MenuService, seeder: Seeder, tokens: JwtVerifier) -> Self {
        Self {
            menus: Arc::new(menus),
            seeder: Arc::new(seeder),
            tokens: Arc::new(tokens),
        }
    }
}

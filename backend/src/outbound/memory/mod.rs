//! In-process adapters used in tests and when no external services are
//! configured.

mod collection_store;
mod partner_menu_cache;

pub use collection_store::InMemoryCollectionStore;
pub use partner_menu_cache::InMemoryPartnerMenuCache;

//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod collection_store;
mod menu_repository;
mod partner_directory;
mod partner_menu_cache;

pub use cache_key::{PartnerMenuCacheKey, PartnerMenuCacheKeyValidationError};
#[cfg(test)]
pub use collection_store::MockCollectionStore;
pub use collection_store::{CollectionStore, CollectionStoreError};
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
pub use menu_repository::{MenuRepository, MenuRepositoryError};
#[cfg(test)]
pub use partner_directory::MockPartnerDirectory;
pub use partner_directory::{PartnerDirectory, PartnerDirectoryError};
#[cfg(test)]
pub use partner_menu_cache::MockPartnerMenuCache;
pub use partner_menu_cache::{DisabledPartnerMenuCache, PartnerMenuCache, PartnerMenuCacheError};

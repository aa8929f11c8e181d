//! PostgreSQL document store via Diesel.
//!
//! Documents live as JSONB rows behind `diesel-async` connections pooled with
//! `bb8`. Row structs and the table schema stay private to this module; the
//! domain only sees the [`CollectionStore`] port.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselCollectionStore, PoolConfig, run_migrations};
//!
//! run_migrations("postgres://localhost/tiffin").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tiffin")).await?;
//! let store = DieselCollectionStore::new(pool);
//! ```
//!
//! [`CollectionStore`]: crate::domain::ports::CollectionStore

mod diesel_basic_error_mapping;
mod diesel_collection_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_collection_store::DieselCollectionStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

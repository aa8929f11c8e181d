//! Deterministic sample marketplace data for the tiffin backend seeder.
//!
//! The crate turns a named seed definition into a complete, cross-referenced
//! dataset of JSON documents: users, partners, menus, menu items,
//! subscriptions, orders, payments, and chat records. It knows nothing about
//! storage or the backend domain; the backend seeder decides where and in
//! which order the documents are written.
//!
//! # Overview
//!
//! - [`SeedRegistry`] loads named seeds from JSON.
//! - [`SeedProfile`] scales the number of generated records.
//! - [`generate_dataset`] produces a [`SeedDataset`]; the same seed value and
//!   profile always yield the same documents.
//!
//! # Example
//!
//! ```
//! use seed_data::{SeedRegistry, generate_dataset};
//!
//! let json = r#"{
//!     "version": 1,
//!     "seeds": [{"name": "quick-thali", "seed": 7, "profile": "minimal"}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("quick-thali").expect("seed exists");
//! let dataset = generate_dataset(seed_def).expect("generation succeeds");
//!
//! assert!(dataset.total_records() > 0);
//! assert_eq!(dataset, generate_dataset(seed_def).expect("generation succeeds"));
//! ```

mod dataset;
mod error;
mod generator;
mod ids;
mod profile;
mod registry;

pub use dataset::SeedDataset;
pub use error::{GenerationError, RegistryError};
pub use generator::generate_dataset;
pub use profile::{ProfileVolumes, SeedProfile, UnknownProfile};
pub use registry::{SeedDefinition, SeedRegistry};

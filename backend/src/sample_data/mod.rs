//! Startup wiring for sample data seeding.

mod startup;

pub use startup::{StartupSeedingError, load_registry, seed_on_startup};

//! Backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the document model
//! and services, [`inbound`] adapts HTTP requests onto them, and [`outbound`]
//! implements the storage and cache ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod sample_data;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

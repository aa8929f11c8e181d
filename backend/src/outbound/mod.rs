//! Outbound adapters implementing the domain ports.
//!
//! - **memory**: process-local store and cache for tests and fixture mode
//! - **documents**: typed catalogue repositories over any collection store
//! - **persistence**: PostgreSQL JSONB collection store using Diesel
//! - **cache**: Redis partner menu cache
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod cache;
pub mod documents;
pub mod memory;
pub mod persistence;

//! Actix middleware shared by every route.
//!
//! [`Trace`] scopes a [`TraceId`](crate::domain::TraceId) over each request
//! so error payloads and log lines carry the same correlation id.

pub mod trace;

pub use trace::Trace;

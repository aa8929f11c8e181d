//! Port for resolving the partner profile behind an authenticated user.
use async_trait::async_trait;

use crate::domain::{DocumentId, Partner};

use super::define_port_error;

define_port_error! {
    /// Errors raised while looking up partner profiles.
    pub enum PartnerDirectoryError {
        /// Directory backend could not be reached.
        Connection { message: String } => "partner directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "partner directory query failed: {message}",
    }
}

/// Lookup of partner profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    /// The partner profile owned by the given user account.
    async fn find_by_user_id(
        &self,
        user_id: &DocumentId,
    ) -> Result<Option<Partner>, PartnerDirectoryError>;
}

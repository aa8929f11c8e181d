//! Authenticated callers and the roles they act under.
//!
//! Token parsing lives in the inbound adapter; the domain only sees a
//! [`Principal`] once a bearer token has been verified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentId;

/// Marketplace role carried in the `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Partner,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether a caller holding `self` may use an endpoint reserved for
    /// `required`.
    ///
    /// Super administrators pass every admin check; all other roles only
    /// satisfy themselves.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Role;
    ///
    /// assert!(Role::SuperAdmin.satisfies(Role::Admin));
    /// assert!(!Role::Partner.satisfies(Role::Admin));
    /// ```
    pub fn satisfies(self, required: Self) -> bool {
        self == required || (self == Self::SuperAdmin && required == Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Partner => "partner",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "partner" => Ok(Self::Partner),
            "admin" => Ok(Self::Admin),
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: DocumentId,
    role: Role,
}

impl Principal {
    pub fn new(user_id: DocumentId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Id of the authenticated user document.
    pub fn user_id(&self) -> &DocumentId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::SuperAdmin, Role::Admin, true)]
    #[case(Role::Admin, Role::SuperAdmin, false)]
    #[case(Role::Customer, Role::Partner, false)]
    #[case(Role::Partner, Role::Partner, true)]
    fn role_checks(#[case] held: Role, #[case] required: Role, #[case] allowed: bool) {
        assert_eq!(held.satisfies(required), allowed);
    }

    #[rstest]
    #[case("partner", Role::Partner)]
    #[case(" ADMIN ", Role::Admin)]
    #[case("super_admin", Role::SuperAdmin)]
    fn roles_parse_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let err = "chef".parse::<Role>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown role: chef");
    }

    #[test]
    fn roles_serialise_in_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).expect("serialise");
        assert_eq!(json, "\"super_admin\"");
    }
}

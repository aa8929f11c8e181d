//! Cache key type shared by partner menu cache adapters.
use thiserror::Error;

use crate::domain::DocumentId;

const PARTNER_MENU_PREFIX: &str = "menu:partner:";

/// Key under which one partner's menu items are cached.
///
/// # Examples
/// ```
/// use backend::domain::DocumentId;
/// use backend::domain::ports::PartnerMenuCacheKey;
///
/// let partner = DocumentId::new("65f0c0ffee0000000000abcd").expect("id");
/// let key = PartnerMenuCacheKey::for_partner(&partner);
/// assert_eq!(key.as_str(), "menu:partner:65f0c0ffee0000000000abcd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartnerMenuCacheKey(String);

impl PartnerMenuCacheKey {
    /// Key for the items owned by the given partner user id.
    pub fn for_partner(partner: &DocumentId) -> Self {
        Self(format!("{PARTNER_MENU_PREFIX}{partner}"))
    }

    /// Construct a key from raw text, rejecting blank or padded values.
    pub fn new(value: impl Into<String>) -> Result<Self, PartnerMenuCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(PartnerMenuCacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(PartnerMenuCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PartnerMenuCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PartnerMenuCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`PartnerMenuCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartnerMenuCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("partner menu cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("partner menu cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

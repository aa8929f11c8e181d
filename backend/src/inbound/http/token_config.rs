//! Bearer token secret resolution.
//!
//! Release builds require a configured secret of at least
//! [`JWT_SECRET_MIN_LEN`] bytes. Debug builds fall back to a random
//! per-process secret and warn, so tokens minted elsewhere will not verify.

use rand::RngCore;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

use crate::inbound::http::auth::JwtVerifier;

/// Shortest secret accepted by release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;

/// Build mode used when validating the token secret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret.
    Debug,
    /// Release builds require an explicit, long enough secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("missing required setting: TIFFIN_JWT_SECRET")]
    MissingSecret,
    #[error("jwt secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Build the bearer token verifier from the configured secret.
///
/// # Errors
/// [`TokenConfigError`] when a release build has no secret or a short one.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::token_config::{BuildMode, token_verifier};
///
/// let secret = "a".repeat(32);
/// assert!(token_verifier(Some(&secret), BuildMode::Release).is_ok());
/// assert!(token_verifier(None, BuildMode::Release).is_err());
/// ```
pub fn token_verifier(
    secret: Option<&str>,
    mode: BuildMode,
) -> Result<JwtVerifier, TokenConfigError> {
    match (secret.filter(|value| !value.is_empty()), mode) {
        (Some(value), BuildMode::Release) if value.len() < JWT_SECRET_MIN_LEN => {
            Err(TokenConfigError::SecretTooShort {
                length: value.len(),
                min_len: JWT_SECRET_MIN_LEN,
            })
        }
        (Some(value), _) => Ok(JwtVerifier::from_secret(value.as_bytes())),
        (None, BuildMode::Release) => Err(TokenConfigError::MissingSecret),
        (None, BuildMode::Debug) => {
            warn!("TIFFIN_JWT_SECRET not set; using a temporary secret (dev only)");
            let mut bytes = Zeroizing::new(vec![0_u8; JWT_SECRET_MIN_LEN * 2]);
            rand::thread_rng().fill_bytes(&mut bytes);
            Ok(JwtVerifier::from_secret(&bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, BuildMode::Release, Some(TokenConfigError::MissingSecret))]
    #[case(Some(""), BuildMode::Release, Some(TokenConfigError::MissingSecret))]
    #[case(
        Some("short"),
        BuildMode::Release,
        Some(TokenConfigError::SecretTooShort { length: 5, min_len: JWT_SECRET_MIN_LEN })
    )]
    #[case(Some("short"), BuildMode::Debug, None)]
    #[case(None, BuildMode::Debug, None)]
    fn secrets_are_validated_per_build_mode(
        #[case] secret: Option<&str>,
        #[case] mode: BuildMode,
        #[case] expected: Option<TokenConfigError>,
    ) {
        let outcome = token_verifier(secret, mode);
        assert_eq!(outcome.err(), expected);
    }
}

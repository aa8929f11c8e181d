//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `TIFFIN_*` environment variables, an optional config
//! file, and command-line flags. Every field is optional; accessors supply
//! the defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use seed_data::SeedProfile;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_MENU_CACHE_TTL, DEFAULT_SEED_VALUE, SeedOptions};

const DEFAULT_PORT: u16 = 8080;

/// Longest accepted partner listing cache TTL (30 days).
pub const MAX_MENU_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Settings values that load but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The cache TTL is longer than [`MAX_MENU_CACHE_TTL_SECS`].
    #[error("menu_cache_ttl_secs must be at most {max} seconds, got {secs}")]
    CacheTtlTooLong { secs: u64, max: u64 },
}

/// Configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TIFFIN")]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Redis URL for the partner listing cache; in-memory when absent.
    pub redis_url: Option<String>,
    /// HS256 secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Expiry of cached partner listings.
    pub menu_cache_ttl_secs: Option<u64>,
    /// Seed sample data before accepting traffic.
    #[ortho_config(default = false)]
    pub seed_on_startup: bool,
    /// Registry seed to apply on startup. Takes precedence over
    /// `seed_profile` and `seed_value`.
    pub seed_name: Option<String>,
    pub seed_profile: Option<SeedProfile>,
    pub seed_value: Option<u64>,
    /// Seed registry location.
    pub registry_path: Option<PathBuf>,
}

impl ServerSettings {
    /// Registry bundled with the crate.
    pub fn default_registry_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("seed-data")
            .join("seeds.json")
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn menu_cache_ttl(&self) -> Duration {
        self.menu_cache_ttl_secs
            .map_or(DEFAULT_MENU_CACHE_TTL, Duration::from_secs)
    }

    /// Reject values that would misbehave at runtime.
    ///
    /// # Errors
    /// [`SettingsError::CacheTtlTooLong`] when the cache TTL exceeds
    /// [`MAX_MENU_CACHE_TTL_SECS`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.menu_cache_ttl_secs {
            Some(secs) if secs > MAX_MENU_CACHE_TTL_SECS => Err(SettingsError::CacheTtlTooLong {
                secs,
                max: MAX_MENU_CACHE_TTL_SECS,
            }),
            _ => Ok(()),
        }
    }

    /// Options for a startup run that does not name a registry seed.
    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            profile: self.seed_profile.unwrap_or_default(),
            seed: self.seed_value.unwrap_or(DEFAULT_SEED_VALUE),
            ..SeedOptions::default()
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.registry_path
            .clone()
            .unwrap_or_else(Self::default_registry_path)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 10] = [
        "TIFFIN_BIND_ADDR",
        "TIFFIN_DATABASE_URL",
        "TIFFIN_REDIS_URL",
        "TIFFIN_JWT_SECRET",
        "TIFFIN_MENU_CACHE_TTL_SECS",
        "TIFFIN_SEED_ON_STARTUP",
        "TIFFIN_SEED_NAME",
        "TIFFIN_SEED_PROFILE",
        "TIFFIN_SEED_VALUE",
        "TIFFIN_REGISTRY_PATH",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("tiffin-backend")])
            .expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(cleared());

        let settings = load();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert!(settings.database_url.is_none());
        assert!(!settings.seed_on_startup);
        assert_eq!(settings.menu_cache_ttl(), DEFAULT_MENU_CACHE_TTL);
        assert_eq!(settings.seed_options(), SeedOptions::default());
        assert_eq!(settings.registry_path(), ServerSettings::default_registry_path());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        for (name, value) in [
            ("TIFFIN_BIND_ADDR", "127.0.0.1:9090"),
            ("TIFFIN_MENU_CACHE_TTL_SECS", "60"),
            ("TIFFIN_SEED_ON_STARTUP", "true"),
            ("TIFFIN_SEED_PROFILE", "minimal"),
            ("TIFFIN_SEED_VALUE", "7"),
        ] {
            if let Some(slot) = vars.iter_mut().find(|(var, _)| *var == name) {
                slot.1 = Some(value.to_owned());
            }
        }
        let _guard = lock_env(vars);

        let settings = load();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert_eq!(settings.menu_cache_ttl(), Duration::from_secs(60));
        assert!(settings.seed_on_startup);
        let options = settings.seed_options();
        assert_eq!(options.profile, SeedProfile::Minimal);
        assert_eq!(options.seed, 7);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("60"), true)]
    #[case(Some("2592000"), true)]
    #[case(Some("2592001"), false)]
    #[case(Some("18446744073709551615"), false)]
    fn cache_ttls_are_bounded(#[case] ttl: Option<&str>, #[case] accepted: bool) {
        let mut vars = cleared();
        if let Some(slot) = vars
            .iter_mut()
            .find(|(var, _)| *var == "TIFFIN_MENU_CACHE_TTL_SECS")
        {
            slot.1 = ttl.map(str::to_owned);
        }
        let _guard = lock_env(vars);

        let outcome = load().validate();

        assert_eq!(outcome.is_ok(), accepted, "{outcome:?}");
    }
}

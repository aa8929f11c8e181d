//! Seed registry types and JSON parsing.
//!
//! The registry names reproducible datasets: each entry pairs an RNG seed with
//! a [`SeedProfile`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::profile::SeedProfile;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A seed registry containing named seed definitions.
///
/// # Example
///
/// ```
/// use seed_data::{SeedProfile, SeedRegistry};
///
/// let json = r#"{
///     "version": 1,
///     "seeds": [{"name": "masala-morning", "seed": 2026, "profile": "standard"}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// let seed = registry.find_seed("masala-morning").expect("seed exists");
/// assert_eq!(seed.profile(), SeedProfile::Standard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON is malformed, the version is
    /// unsupported, the seeds array is empty, or a seed name repeats.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let mut seen = HashSet::new();
        let mut seeds = Vec::with_capacity(raw.seeds.len());
        for entry in raw.seeds {
            if !seen.insert(entry.name.clone()) {
                return Err(RegistryError::DuplicateSeed { name: entry.name });
            }
            seeds.push(SeedDefinition::new(entry.name, entry.seed, entry.profile));
        }

        Ok(Self {
            version: raw.version,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named seed definition for deterministic dataset generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    profile: SeedProfile,
}

impl SeedDefinition {
    /// Build a definition directly, bypassing the registry.
    #[must_use]
    pub fn new(name: impl Into<String>, seed: u64, profile: SeedProfile) -> Self {
        Self {
            name: name.into(),
            seed,
            profile,
        }
    }

    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the dataset profile.
    #[must_use]
    pub const fn profile(&self) -> SeedProfile {
        self.profile
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    #[serde(default)]
    profile: SeedProfile,
}

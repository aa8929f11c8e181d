//! Startup seeding orchestration.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use seed_data::{RegistryError, SeedRegistry};
use thiserror::Error;
use tracing::info;

use crate::domain::{SeedOptions, SeedSummary, Seeder, SeedingError};
use crate::settings::ServerSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Registry parsing or lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// The seeding run itself failed.
    #[error("sample data seeding error: {0}")]
    Seeding(#[from] SeedingError),
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Seed sample data when `seed_on_startup` is enabled.
///
/// A configured `seed_name` is resolved through the registry; otherwise the
/// run uses `seed_profile` and `seed_value`.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use backend::domain::Seeder;
/// use backend::outbound::memory::InMemoryCollectionStore;
/// use backend::sample_data::seed_on_startup;
/// use backend::settings::ServerSettings;
///
/// # async fn run(settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let seeder = Seeder::new(Arc::new(InMemoryCollectionStore::new()));
/// if let Some(summary) = seed_on_startup(&settings, &seeder).await? {
///     println!("seeded {} records", summary.total_records);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn seed_on_startup(
    settings: &ServerSettings,
    seeder: &Seeder,
) -> Result<Option<SeedSummary>, StartupSeedingError> {
    if !settings.seed_on_startup {
        info!(reason = "disabled", "sample data seeding skipped");
        return Ok(None);
    }

    let options = match settings.seed_name.as_deref().map(str::trim) {
        Some("") => return Err(StartupSeedingError::EmptySeedName),
        Some(name) => {
            let registry = load_registry(&settings.registry_path())?;
            let definition = registry.find_seed(name)?;
            info!(seed_name = name, "resolved startup seed from registry");
            SeedOptions::from_definition(definition)
        }
        None => settings.seed_options(),
    };

    let summary = seeder.seed(&options).await?;
    info!(
        profile = %summary.profile,
        seed = summary.seed,
        records = summary.total_records,
        valid = summary.success,
        "startup seeding finished"
    );
    Ok(Some(summary))
}

/// Read a seed registry through a capability handle on its directory.
pub fn load_registry(path: &Path) -> Result<SeedRegistry, StartupSeedingError> {
    let read_error = |source: std::io::Error| StartupSeedingError::RegistryRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "registry path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    Ok(SeedRegistry::from_json(&contents)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use rstest::rstest;
    use seed_data::SeedProfile;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::outbound::memory::InMemoryCollectionStore;

    fn settings(
        enabled: bool,
        seed_name: Option<&str>,
        registry: Option<PathBuf>,
    ) -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            redis_url: None,
            jwt_secret: None,
            menu_cache_ttl_secs: None,
            seed_on_startup: enabled,
            seed_name: seed_name.map(str::to_owned),
            seed_profile: Some(SeedProfile::Minimal),
            seed_value: Some(11),
            registry_path: registry,
        }
    }

    fn registry_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"version": 1, "seeds": [{{"name": "quick-thali", "seed": 7, "profile": "minimal"}}]}}"#
        )
        .expect("write registry");
        file
    }

    fn seeder() -> Seeder {
        Seeder::new(Arc::new(InMemoryCollectionStore::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_is_skipped() {
        let outcome = seed_on_startup(&settings(false, None, None), &seeder())
            .await
            .expect("skip succeeds");
        assert!(outcome.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn registry_seeds_take_precedence() {
        let file = registry_file();
        let settings = settings(true, Some("quick-thali"), Some(file.path().to_path_buf()));

        let summary = seed_on_startup(&settings, &seeder())
            .await
            .expect("seeding succeeds")
            .expect("seeding ran");

        assert_eq!(summary.seed, 7);
        assert_eq!(summary.profile, SeedProfile::Minimal);
    }

    #[rstest]
    #[tokio::test]
    async fn configured_profile_is_used_without_a_seed_name() {
        let summary = seed_on_startup(&settings(true, None, None), &seeder())
            .await
            .expect("seeding succeeds")
            .expect("seeding ran");

        assert_eq!(summary.seed, 11);
    }

    #[rstest]
    #[case(Some("  "))]
    #[case(Some("missing-seed"))]
    #[tokio::test]
    async fn bad_seed_names_fail(#[case] name: Option<&str>) {
        let file = registry_file();
        let settings = settings(true, name, Some(file.path().to_path_buf()));

        let err = seed_on_startup(&settings, &seeder())
            .await
            .expect_err("seeding fails");

        assert!(matches!(
            err,
            StartupSeedingError::EmptySeedName
                | StartupSeedingError::Registry(RegistryError::SeedNotFound { .. })
        ));
    }

    #[rstest]
    fn missing_registries_report_the_path() {
        let path = PathBuf::from("/definitely/not/here/seeds.json");
        let err = load_registry(&path).expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here/seeds.json"));
    }
}

//! Operator CLI for sample data: seed, validate, or inspect a document store.
//!
//! Without `--database-url` (or `TIFFIN_DATABASE_URL`) the commands run
//! against a throwaway in-memory store, which is handy for previewing a
//! profile's summary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use backend::domain::ports::CollectionStore;
use backend::domain::{SeedOptions, SeedProfile, Seeder, TraceId};
use backend::outbound::memory::InMemoryCollectionStore;
use backend::outbound::persistence::{DbPool, DieselCollectionStore, PoolConfig, run_migrations};
use backend::sample_data::load_registry;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "TIFFIN_DATABASE_URL";

/// `tiffin-seed` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tiffin-seed",
    about = "Seed and inspect marketplace sample data",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `TIFFIN_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a dataset and write it to the store.
    Seed(SeedArgs),
    /// Report relationship and field findings for the stored data.
    Validate,
    /// Per-collection record counts.
    Stats,
}

#[derive(Debug, Args)]
struct SeedArgs {
    #[arg(long, value_name = "minimal|standard|extensive")]
    profile: Option<SeedProfile>,
    #[arg(long, value_name = "n")]
    seed: Option<u64>,
    /// Registry seed to apply instead of `--profile`/`--seed`.
    #[arg(long = "seed-name", value_name = "name", conflicts_with_all = ["profile", "seed"])]
    seed_name: Option<String>,
    #[arg(long, value_name = "path", requires = "seed_name")]
    registry: Option<PathBuf>,
    /// Add to existing data instead of replacing it.
    #[arg(long)]
    incremental: bool,
    /// Keep existing data even for a full run.
    #[arg(long = "skip-cleanup")]
    skip_cleanup: bool,
}

impl SeedArgs {
    fn options(&self) -> Result<SeedOptions> {
        let base = match self.seed_name.as_deref() {
            Some(name) => {
                let path = self
                    .registry
                    .clone()
                    .unwrap_or_else(backend::settings::ServerSettings::default_registry_path);
                let registry = load_registry(&path)?;
                SeedOptions::from_definition(registry.find_seed(name)?)
            }
            None => {
                let defaults = SeedOptions::default();
                SeedOptions {
                    profile: self.profile.unwrap_or(defaults.profile),
                    seed: self.seed.unwrap_or(defaults.seed),
                    ..defaults
                }
            }
        };
        Ok(SeedOptions {
            incremental: self.incremental,
            skip_cleanup: self.skip_cleanup,
            ..base
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    // stdout carries the JSON report, so logs go to stderr
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(TraceId::scope(TraceId::generate(), run(args)))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url =
        resolve_database_url(args.database_url, std::env::var(DATABASE_URL_ENV).ok())?;
    let seeder = Seeder::new(open_store(database_url.as_deref()).await?);

    match args.command {
        Command::Seed(seed_args) => {
            let summary = seeder.seed(&seed_args.options()?).await?;
            emit(&summary)
        }
        Command::Validate => emit(&seeder.validate().await),
        Command::Stats => emit(&seeder.collection_stats().await?),
    }
}

async fn open_store(database_url: Option<&str>) -> Result<Arc<dyn CollectionStore>> {
    let Some(url) = database_url else {
        return Ok(Arc::new(InMemoryCollectionStore::new()));
    };
    run_migrations(url).await?;
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .wrap_err("failed to create database pool")?;
    Ok(Arc::new(DieselCollectionStore::new(pool)))
}

fn resolve_database_url(
    explicit: Option<String>,
    from_env: Option<String>,
) -> Result<Option<String>> {
    match explicit {
        Some(value) if value.trim().is_empty() => {
            Err(eyre!("--database-url must not be empty when provided"))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(from_env.filter(|value| !value.trim().is_empty())),
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(io::stdout().lock(), "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("arguments parse")
    }

    #[rstest]
    fn seed_flags_become_options() {
        let args = parse(&[
            "tiffin-seed",
            "seed",
            "--profile",
            "minimal",
            "--seed",
            "7",
            "--incremental",
        ]);
        let Command::Seed(seed_args) = args.command else {
            panic!("expected the seed command");
        };

        let options = seed_args.options().expect("options resolve");

        assert_eq!(options.profile, SeedProfile::Minimal);
        assert_eq!(options.seed, 7);
        assert!(options.incremental);
        assert!(!options.skip_cleanup);
    }

    #[rstest]
    fn seed_names_conflict_with_explicit_profiles() {
        let outcome = CliArgs::try_parse_from([
            "tiffin-seed",
            "seed",
            "--seed-name",
            "quick-thali",
            "--seed",
            "3",
        ]);
        assert!(outcome.is_err());
    }

    #[rstest]
    fn registry_seeds_resolve_from_the_bundled_fixture() {
        let args = parse(&["tiffin-seed", "seed", "--seed-name", "grand-feast"]);
        let Command::Seed(seed_args) = args.command else {
            panic!("expected the seed command");
        };

        let options = seed_args.options().expect("registry seed resolves");

        assert_eq!(options.profile, SeedProfile::Extensive);
        assert_eq!(options.seed, 99);
    }

    #[rstest]
    #[case(Some(String::new()), None, true, None)]
    #[case(None, Some("  ".to_owned()), false, None)]
    #[case(None, Some("postgres://env".to_owned()), false, Some("postgres://env"))]
    #[case(
        Some("postgres://flag".to_owned()),
        Some("postgres://env".to_owned()),
        false,
        Some("postgres://flag")
    )]
    fn database_urls_prefer_the_flag(
        #[case] explicit: Option<String>,
        #[case] from_env: Option<String>,
        #[case] fails: bool,
        #[case] expected: Option<&str>,
    ) {
        match resolve_database_url(explicit, from_env) {
            Ok(url) => {
                assert!(!fails);
                assert_eq!(url.as_deref(), expected);
            }
            Err(_) => assert!(fails),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_runs_report_a_summary() {
        let seeder = Seeder::new(open_store(None).await.expect("memory store"));
        let options = SeedOptions {
            profile: SeedProfile::Minimal,
            ..SeedOptions::default()
        };

        let summary = seeder.seed(&options).await.expect("seeding succeeds");

        assert!(summary.total_records > 0);
    }
}

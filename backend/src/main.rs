//! Backend entry-point: loads settings, wires adapters, seeds sample data
//! when asked, and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::token_config::{BuildMode, token_verifier};
use backend::sample_data::seed_on_startup;
use backend::settings::ServerSettings;
use server::{build_http_state, connect_adapters, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    settings.validate()?;
    let tokens = token_verifier(
        settings.jwt_secret.as_deref(),
        BuildMode::from_debug_assertions(),
    )?;
    let config = connect_adapters(&settings, tokens)
        .await
        .wrap_err("failed to connect adapters")?;
    let http_state = build_http_state(&config);

    if let Some(summary) = seed_on_startup(&settings, &http_state.seeder)
        .await
        .wrap_err("startup seeding failed")?
    {
        info!(digest = %summary.dataset_digest, "sample data ready");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, &config)?;
    info!(addr = %config.bind_addr, "listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

//! Climate data extraction API server.
//!
//! Serves per-region daily climate series with extreme-percentile flags as
//! CSV or ZIP downloads.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use climate_api::config::{ApiConfig, Args};
use climate_api::startup_validation::validate_startup;
use climate_api::state::AppState;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = ApiConfig::load(args)?;

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = config.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(run_server(config))
}

async fn run_server(config: ApiConfig) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    info!(
        data_dir = %config.data_dir.display(),
        download_dir = %config.download_dir.display(),
        region_file = %config.region_file.display(),
        "Starting climate extraction API"
    );

    let listen = config.listen;
    let state = match AppState::from_config(config) {
        Ok(state) => state.with_prometheus(prometheus_handle),
        Err(e) => {
            error!(error = %e, "Failed to load region catalog");
            return Err(e.into());
        }
    };

    if let Err(e) = validate_startup(&state) {
        error!(error = %e, "Startup validation failed");
        return Err(e.into());
    }

    let app = climate_api::create_router(Arc::new(state));

    info!(address = %listen, "Listening");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

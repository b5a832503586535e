use quake_backend::config;
use quake_backend::logging;
use quake_backend::module::acquisition::AcquisitionChain;
use quake_backend::module::scheduled::FeedPoller;
use quake_backend::service;

use anyhow::{Context, Result};
use std::sync::Arc;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config(CONFIG_PATH)?;

    // Initialize logging
    let _logging_guard = logging::init_logging("logs", "quake-backend", &config.log_level)?;

    tracing::info!("Quake backend starting...");
    tracing::info!("Upstream report: {}", config.acquisition.upstream_url);

    let chain = AcquisitionChain::from_config(&config.acquisition)
        .context("Failed to build acquisition chain")?;
    let poller = Arc::new(FeedPoller::new(chain));

    // Initial cycle runs right away, then every refresh interval
    let _refresh_task = poller.clone().start(config.acquisition.refresh_interval());

    let app = service::router(poller);
    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("HTTP API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

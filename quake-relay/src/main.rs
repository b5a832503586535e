use quake_backend::logging;
use quake_backend::module::acquisition::{build_client, HttpSource};
use quake_common::FeedSource;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod relay;
use config::Config;
use relay::RelayState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load("relay.toml")?;

    let _logging_guard = logging::init_logging("logs", "quake-relay", &config.log_level)?;
    info!("Loaded configuration: {:?}", config);

    let client = build_client(&config.user_agent, config.timeout())?;
    let upstream = HttpSource::new(FeedSource::Direct, config.upstream_url.clone(), client);

    let state = Arc::new(RelayState {
        source: Arc::new(upstream),
        timeout: config.timeout(),
    });
    let app = relay::router(&config.route, state);

    // Bind to address
    let addr = SocketAddr::from((config.bind_ip(), config.port));
    info!("Starting relay on http://{}", addr);
    info!("Relaying {} at {}", config.upstream_url, config.route);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

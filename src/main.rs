//! Storefront API — margin simulation and lead capture backend
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the lead sinks and serves the HTTP API until Ctrl+C.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use storefront::config::AppConfig;
use storefront::server::{self, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let config_path =
        std::env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let mut cfg = AppConfig::load_or_default(&config_path)?;
    cfg.apply_env_overrides()?;

    let state = ServerState::from_config(&cfg)?;

    info!(
        service = %cfg.server.name,
        port = cfg.server.port,
        leads_file = %cfg.leads.csv_path,
        webhook = if cfg.leads.webhook_url().is_some() { "configured" } else { "not configured" },
        stripe = if state.stripe_key.is_some() { "configured" } else { "not configured" },
        "Storefront API starting up"
    );

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .with_context(|| {
            format!("Invalid listen address {}:{}", cfg.server.host, cfg.server.port)
        })?;

    server::serve(Arc::new(state), addr).await?;

    info!("Storefront API shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("storefront=info,tower_http=info"));

    let json_logging = std::env::var("STOREFRONT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

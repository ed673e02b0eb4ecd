//! HTTP server — Axum router for the storefront backend.
//!
//! Serves the margin simulator, lead capture and listing endpoints.
//! CORS is open so the marketing front-ends can call it from any origin.

pub mod error;
pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use error::ApiError;
pub use routes::{AppState, ServerState};

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/simulate", post(routes::simulate))
        .route("/api/leads", post(routes::capture_lead))
        .route("/api/optimize-listing", post(routes::optimize_listing))
        .route("/api/stripe-connect-test", post(routes::stripe_connect_test))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Storefront API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received.");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

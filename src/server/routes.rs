//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>`.

use anyhow::{Context, Result};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use secrecy::SecretString;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ApiError;
use crate::config::AppConfig;
use crate::leads::{CsvLeadSink, Lead, LeadRecorder, LeadSubmission, WebhookLeadSink};
use crate::listing::{self, ListingOptimization, ListingRequest};
use crate::simulator;
use crate::types::{SimulationRequest, SimulationResponse};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub service_name: String,
    pub leads: LeadRecorder,
    pub stripe_key: Option<SecretString>,
}

pub type AppState = Arc<ServerState>;

impl ServerState {
    pub fn new(service_name: impl Into<String>, leads: LeadRecorder) -> Self {
        Self {
            service_name: service_name.into(),
            leads,
            stripe_key: None,
        }
    }

    pub fn with_stripe_key(mut self, key: Option<SecretString>) -> Self {
        self.stripe_key = key;
        self
    }

    /// Wire sinks and secrets from configuration and the environment.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let mut leads = LeadRecorder::new(Arc::new(CsvLeadSink::new(&cfg.leads.csv_path)));

        match cfg.leads.webhook_url() {
            Some(url) => {
                let sink = WebhookLeadSink::new(url, cfg.leads.webhook_timeout())
                    .context("Failed to build webhook client")?;
                leads = leads.with_forwarder(Arc::new(sink));
            }
            None => info!(env = %cfg.leads.webhook_url_env, "Webhook not configured"),
        }

        Ok(Self::new(cfg.server.name.clone(), leads).with_stripe_key(cfg.stripe.secret_key()))
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
    pub lead: Lead,
}

#[derive(Debug, Clone, Serialize)]
pub struct StripeStatusResponse {
    pub success: bool,
    pub message: String,
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.service_name.clone(),
    })
}

/// POST /api/simulate
pub async fn simulate(
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let Json(request) = payload?;

    let result = simulator::simulate_request(&request).inspect_err(|e| {
        if e.is_client_error() {
            warn!(error = %e, "Simulation rejected");
        }
    })?;

    info!(
        email = request.email.as_deref().unwrap_or("-"),
        order_amount = %result.order_amount,
        supplier_cost = %result.supplier_cost,
        profit = %result.profit,
        margin = %result.margin,
        hold_days = result.hold_days,
        "Simulation"
    );

    Ok(Json(SimulationResponse {
        success: true,
        result,
    }))
}

/// POST /api/leads
pub async fn capture_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<LeadResponse>, ApiError> {
    let Json(submission) = payload?;
    let lead = submission.validate(Utc::now())?;

    let report = state
        .leads
        .capture(&lead)
        .await
        .map_err(|e| ApiError::internal("Failed to process lead", e))?;

    info!(
        forwarded = report.forwarded,
        forward_failures = report.forward_failures,
        "Lead captured"
    );

    Ok(Json(LeadResponse {
        success: true,
        message: "Lead captured successfully".into(),
        lead: lead.redacted(),
    }))
}

/// POST /api/optimize-listing
pub async fn optimize_listing(
    payload: Result<Json<ListingRequest>, JsonRejection>,
) -> Result<Json<ListingOptimization>, ApiError> {
    let Json(request) = payload?;
    let optimization = listing::optimize_listing(request)?;
    info!(title = %optimization.optimized.title, "Listing optimized");
    Ok(Json(optimization))
}

/// POST /api/stripe-connect-test
///
/// Reports whether a Stripe key is configured. No Stripe calls are made.
pub async fn stripe_connect_test(State(state): State<AppState>) -> Json<StripeStatusResponse> {
    let resp = match state.stripe_key {
        Some(_) => StripeStatusResponse {
            success: true,
            message: "Stripe Connect test mode".into(),
            mode: "test",
            note: Some("Key configured; Connect onboarding is not enabled".into()),
        },
        None => StripeStatusResponse {
            success: false,
            message: "Stripe not configured. Add STRIPE_SECRET_KEY to .env to enable.".into(),
            mode: "disabled",
            note: None,
        },
    };
    Json(resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! HTTP error mapping.
//!
//! Client input errors become 400 `{ "error": .. }`. Anything else becomes
//! 500 `{ "error": <operation> failed, "details": .. }` and is logged.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::leads::LeadError;
use crate::listing::ListingError;
use crate::types::SimulationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Lead(#[from] LeadError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("{context}: {details}")]
    Internal {
        context: &'static str,
        details: String,
    },
}

impl ApiError {
    pub fn internal(context: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            context,
            details: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Simulation(e) if !e.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Simulation(e) if !e.is_client_error() => {
                error!(error = %e, "Simulation error");
                json!({ "error": "Simulation failed", "details": e.to_string() })
            }
            ApiError::Internal { context, details } => {
                error!(context, details = %details, "Request failed");
                json!({ "error": context, "details": details })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

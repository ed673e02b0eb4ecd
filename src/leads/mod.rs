//! Lead capture.
//!
//! Defines the `LeadSink` trait and the `LeadRecorder` that fans a captured
//! lead out to sinks:
//! - a primary sink (CSV file) whose failure fails the request
//! - any number of forwarders (webhook) that are best-effort only

pub mod csv_sink;
pub mod webhook;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub use csv_sink::CsvLeadSink;
pub use webhook::WebhookLeadSink;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw lead form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadSubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub details: Option<String>,
}

/// A validated, timestamped lead. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub project: String,
    pub details: String,
}

impl Lead {
    /// Copy of the lead safe to echo back: details reduced to a marker.
    pub fn redacted(&self) -> Lead {
        let marker = if self.details.is_empty() { "(none)" } else { "(provided)" };
        Lead {
            details: marker.to_string(),
            ..self.clone()
        }
    }
}

impl LeadSubmission {
    /// Check required fields and stamp the lead.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Lead, LeadError> {
        fn required(field: Option<String>) -> Result<String, LeadError> {
            match field {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(LeadError::MissingFields),
            }
        }

        Ok(Lead {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: required(self.name)?,
            phone: required(self.phone)?,
            zip: required(self.zip)?,
            project: required(self.project)?,
            details: self.details.unwrap_or_default(),
        })
    }
}

/// Accept strings, numbers and booleans (ZIP codes often arrive as numbers).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadError {
    #[error("Missing required fields: name, phone, zip, project")]
    MissingFields,
}

/// Failure to persist or forward a lead.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    WebhookStatus(u16),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

// ---------------------------------------------------------------------------
// Sink trait
// ---------------------------------------------------------------------------

/// Somewhere a captured lead can be written to or forwarded to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Persist or forward one lead.
    async fn record(&self, lead: &Lead) -> Result<(), SinkError>;

    /// Sink name for logging.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Outcome of a capture after the primary sink succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub forwarded: usize,
    pub forward_failures: usize,
}

pub struct LeadRecorder {
    primary: Arc<dyn LeadSink>,
    forwarders: Vec<Arc<dyn LeadSink>>,
}

impl LeadRecorder {
    pub fn new(primary: Arc<dyn LeadSink>) -> Self {
        Self {
            primary,
            forwarders: Vec::new(),
        }
    }

    /// Add a best-effort forwarder.
    pub fn with_forwarder(mut self, sink: Arc<dyn LeadSink>) -> Self {
        self.forwarders.push(sink);
        self
    }

    pub fn forwarder_names(&self) -> Vec<&'static str> {
        self.forwarders.iter().map(|s| s.name()).collect()
    }

    /// Record a lead in the primary sink, then forward it.
    ///
    /// Only a primary failure is returned. Forwarders run concurrently and
    /// their failures are logged and counted.
    pub async fn capture(&self, lead: &Lead) -> Result<CaptureReport, SinkError> {
        self.primary.record(lead).await?;
        info!(
            sink = self.primary.name(),
            name = %lead.name,
            zip = %lead.zip,
            project = %lead.project,
            "Lead saved"
        );

        let outcomes = join_all(
            self.forwarders
                .iter()
                .map(|sink| async move { (sink.name(), sink.record(lead).await) }),
        )
        .await;

        let mut report = CaptureReport::default();
        for (sink, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    report.forwarded += 1;
                    info!(sink, "Lead forwarded");
                }
                Err(e) => {
                    report.forward_failures += 1;
                    warn!(sink, error = %e, "Lead forward failed");
                }
            }
        }

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Webhook lead forwarding.
//!
//! POSTs each lead as JSON to a configured URL (Zapier, Make, a CRM
//! intake endpoint). Used as a best-effort forwarder.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Lead, LeadSink, SinkError};

pub struct WebhookLeadSink {
    client: Client,
    url: String,
}

impl WebhookLeadSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LeadSink for WebhookLeadSink {
    async fn record(&self, lead: &Lead) -> Result<(), SinkError> {
        let resp = self.client.post(&self.url).json(lead).send().await?;
        let status = resp.status();
        debug!(url = %self.url, status = status.as_u16(), "Webhook sent");

        if !status.is_success() {
            return Err(SinkError::WebhookStatus(status.as_u16()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (webhook URL, Stripe key) are referenced by env-var name in the
//! config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub leads: LeadsConfig,
    pub stripe: StripeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Reported by `/health`.
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Storefront API".into(),
            host: "0.0.0.0".into(),
            port: 5201,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LeadsConfig {
    pub csv_path: String,
    /// Env var holding the webhook URL. Unset or empty disables forwarding.
    pub webhook_url_env: String,
    pub webhook_timeout_secs: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            csv_path: "leads.csv".into(),
            webhook_url_env: "WEBHOOK_URL".into(),
            webhook_timeout_secs: 10,
        }
    }
}

impl LeadsConfig {
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    /// Resolve the webhook URL from the environment.
    pub fn webhook_url(&self) -> Option<String> {
        non_empty_env(&self.webhook_url_env)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StripeConfig {
    pub secret_key_env: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key_env: "STRIPE_SECRET_KEY".into(),
        }
    }
}

impl StripeConfig {
    /// Resolve the Stripe secret key from the environment.
    pub fn secret_key(&self) -> Option<SecretString> {
        non_empty_env(&self.secret_key_env).map(SecretString::new)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply the `PORT` environment override.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(port) = non_empty_env("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

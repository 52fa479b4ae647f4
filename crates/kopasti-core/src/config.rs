//! Client configuration.
//!
//! Everything has a built-in default. The only value read from the
//! environment is the endpoint base URL (`KOPASTI_API_BASE_URL`, also
//! accepted from a `.env` file).

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::DEFAULT_TTL_SECS;
use crate::models::DEFAULT_LIMIT;

/// Environment variable that overrides the endpoint base URL
pub const BASE_URL_ENV: &str = "KOPASTI_API_BASE_URL";

/// Default read-only query endpoint
const DEFAULT_API_BASE_URL: &str = "https://script.google.com/macros/s/AKfycbx5jXv2kE_w6lvryNWJixZ4AUvj9FxeU_nUV9Mk1RqoEGugmOKFhMAewaYISAYivirXRA/exec";

/// Origin printed into member card QR codes (the frontend dev server)
const DEFAULT_CARD_ORIGIN: &str = "http://localhost:5173";

/// Sheet that holds the raw assessment scores
const DEFAULT_SPREADSHEET_ID: &str = "1Qz8V11JuwdI32oOmMxbyizRulFKKCJqB2njC0FW-xIk";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: i64,
    pub page_size: u64,
    pub card_origin: String,
    pub spreadsheet_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            page_size: DEFAULT_LIMIT,
            card_origin: DEFAULT_CARD_ORIGIN.to_string(),
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
        }
    }
}

impl Config {
    /// Defaults, with the base URL taken from the environment when set.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "No .env file loaded");
        }

        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values no client can run with.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.cache_ttl_secs < 0 {
            anyhow::bail!("cache_ttl_secs must not be negative: {}", self.cache_ttl_secs);
        }
        Ok(())
    }

    /// Parsed endpoint URL. Only http(s) URLs are accepted.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow::anyhow!("Unsupported API URL scheme: {}", other)),
        }
    }

    /// Cache lifetime. Negative values count as zero; values beyond what
    /// `chrono` can represent saturate.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.cache_ttl_secs.max(0)).unwrap_or(chrono::Duration::MAX)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

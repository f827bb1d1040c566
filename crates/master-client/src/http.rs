//! HTTP client for the master's change endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use pipeline::{ChangeId, ChangeQueue, ChangeRecord, QueueError};

/// Tracing target for master traffic.
const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::http");

/// Request timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Location of the master's change endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Absolute URL changes are posted to.
    pub url: String,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl MasterConfig {
    /// Configuration for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Errors raised while constructing an [`HttpChangeQueue`].
#[derive(Debug, Error)]
pub enum MasterClientError {
    /// The configured URL is not an absolute HTTP(S) URL.
    #[error("invalid master url '{url}': {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Why it was refused.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChangeAccepted {
    changeid: u64,
}

/// [`ChangeQueue`] that posts every change to the master over HTTP.
///
/// Records are validated before they are sent, so a malformed change is
/// rejected without a round trip.
#[derive(Debug, Clone)]
pub struct HttpChangeQueue {
    client: Client,
    endpoint: Url,
}

impl HttpChangeQueue {
    /// Creates a client for the endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MasterClientError::InvalidUrl`] if the URL does not parse or
    /// is not HTTP(S), and [`MasterClientError::Client`] if the underlying
    /// client cannot be initialised.
    pub fn new(config: &MasterConfig) -> Result<Self, MasterClientError> {
        let endpoint = Url::parse(&config.url).map_err(|e| MasterClientError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(MasterClientError::InvalidUrl {
                url: config.url.clone(),
                reason: format!("unsupported scheme '{}'", endpoint.scheme()),
            });
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint changes are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChangeQueue for HttpChangeQueue {
    async fn add_change(&self, change: &ChangeRecord) -> Result<ChangeId, QueueError> {
        change.validate()?;

        debug!(target: CLIENT_TARGET, endpoint = %self.endpoint, "posting change to master");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(change)
            .send()
            .await
            .map_err(|e| QueueError::unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| QueueError::unavailable(e.to_string()))?;

        if !status.is_success() {
            let reason = String::from_utf8_lossy(&body);
            return Err(QueueError::rejected(format!(
                "master answered {status}: {}",
                reason.trim()
            )));
        }

        let accepted: ChangeAccepted = serde_json::from_slice(&body).map_err(|e| {
            QueueError::unavailable(format!("unreadable response from master: {e}"))
        })?;
        let id = ChangeId::new(accepted.changeid);
        info!(target: CLIENT_TARGET, change_id = %id, "master accepted change");
        Ok(id)
    }
}

#[cfg(test)]
mod tests;

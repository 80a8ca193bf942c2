//! Streaming GET with bounded transient-status retries
//!
//! One fetch call issues a GET and classifies the outcome: success returns
//! the open response for streaming, a transient server status sleeps a fixed
//! interval and retries up to a bounded ceiling, any other status or a
//! transport failure returns immediately. The fetcher never touches the
//! filesystem.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::constants::limits;
use crate::errors::{AppError, FetchError, FetchResult, Result, TransportKind};

/// Retry behavior for one fetch call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum attempts per URL, initial attempt included
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: limits::FETCH_MAX_ATTEMPTS,
            retry_delay: limits::FETCH_RETRY_DELAY,
        }
    }
}

impl FetchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(AppError::Configuration {
                reason: "fetch max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Whether a status code is in the transient (safe to retry) set
pub fn is_transient(status: u16) -> bool {
    limits::TRANSIENT_STATUSES.contains(&status)
}

/// HTTP fetcher with a bounded retry loop over transient server statuses
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    config: FetchConfig,
}

impl RetryingFetcher {
    /// Create a fetcher over an already-built client
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Issue a streaming GET for a resolved download URL
    ///
    /// Returns the open response on any 2xx status; the caller must consume
    /// the body. Transient statuses (`{500, 503, 504}`) are retried after a
    /// fixed delay until the attempt ceiling; exactly `max_attempts - 1`
    /// sleeps happen when every attempt is transient.
    ///
    /// # Errors
    ///
    /// - `FetchError::RetriesExhausted` when the ceiling is hit on a
    ///   transient status (the last status is preserved)
    /// - `FetchError::HttpStatus` for any other non-2xx status, not retried
    /// - `FetchError::Transport` for timeouts, refused connections, TLS and
    ///   redirect failures, not retried
    pub async fn fetch(&self, url: &Url) -> FetchResult<reqwest::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    kind: TransportKind::from_error(&e),
                    source: e,
                })?;

            let status = response.status();
            if status.is_success() {
                debug!("Fetched {} on attempt {}", url, attempt);
                return Ok(response);
            }

            let code = status.as_u16();
            if !is_transient(code) {
                return Err(FetchError::HttpStatus { status: code });
            }

            if attempt >= self.config.max_attempts {
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last_status: code,
                });
            }

            warn!(
                "Transient status {} from {} (attempt {}/{}), retrying in {:?}",
                code, url, attempt, self.config.max_attempts, self.config.retry_delay
            );
            tokio::time::sleep(self.config.retry_delay).await;
        }
    }

    /// The underlying HTTP client, shared with the lookup resolver
    pub fn client(&self) -> &Client {
        &self.client
    }
}

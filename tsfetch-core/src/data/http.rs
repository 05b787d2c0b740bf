//! HTTP fetcher backed by a blocking reqwest client.
//!
//! Issues exactly one GET per call. A non-success status is a transport
//! failure, so the resolver falls through to the next source. A client that
//! could not be built fails every fetch the same way.

use super::source::{Fetcher, SourceError};
use std::time::Duration;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("tsfetch/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`Fetcher`].
pub struct HttpFetcher {
    client: Result<reqwest::blocking::Client, String>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Self {
        // Per-request timeouts are set in `fetch`; the client carries none.
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                tracing::warn!(error = %e, "failed to build HTTP client, remote sources disabled");
                e.to_string()
            });
        Self { client }
    }

    fn classify(err: reqwest::Error, timeout: Duration) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout { timeout }
        } else if err.is_connect() {
            SourceError::Transport(format!("connection failed: {err}"))
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, SourceError> {
        let client = self
            .client
            .as_ref()
            .map_err(|e| SourceError::Transport(format!("HTTP client unavailable: {e}")))?;
        let resp = client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| Self::classify(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!("HTTP {status} for {url}")));
        }

        resp.text().map_err(|e| Self::classify(e, timeout))
    }
}

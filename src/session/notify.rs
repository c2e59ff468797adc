//! Session transition notifications.
//!
//! Announces start/stop transitions to a companion endpoint with empty-body
//! HTTP POSTs. The response body is opaque to this component; it is returned
//! as text for the caller to log. Each transition is announced exactly once,
//! with no retry and no reconciliation of failures into session state.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Announces session state transitions, returning the response body text.
pub trait SessionNotifier: Send + Sync + 'static {
    /// Announces that a recording session started.
    fn notify_start(&self) -> impl Future<Output = Result<String>> + Send;

    /// Announces that a recording session stopped.
    fn notify_stop(&self) -> impl Future<Output = Result<String>> + Send;
}

/// Notifier that POSTs to a configured companion endpoint.
pub struct HttpNotifier {
    client: reqwest::Client,
    start_url: String,
    stop_url: String,
}

impl HttpNotifier {
    /// Creates a notifier for the given base URL and endpoint paths.
    ///
    /// # Errors
    /// - If the HTTP client cannot be constructed
    pub fn new(base_url: &str, start_path: &str, stop_path: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            client,
            start_url: join_endpoint(base_url, start_path),
            stop_url: join_endpoint(base_url, stop_path),
        })
    }

    /// POSTs with an empty body and reads the response as text.
    ///
    /// Network failures, non-success statuses and undecodable bodies all
    /// collapse into the same single error kind.
    async fn post(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    anyhow!("Failed to connect to {url}")
                } else if e.is_timeout() {
                    anyhow!("Request to {url} timed out")
                } else {
                    anyhow!("Request to {url} failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Request to {url} failed with status {status}"));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response from {url}: {e}"))
    }
}

impl SessionNotifier for HttpNotifier {
    async fn notify_start(&self) -> Result<String> {
        tracing::debug!("POST {}", self.start_url);
        self.post(&self.start_url).await
    }

    async fn notify_stop(&self) -> Result<String> {
        tracing::debug!("POST {}", self.stop_url);
        self.post(&self.stop_url).await
    }
}

/// Runtime-selected notifier: a live endpoint, or disabled in configuration.
pub enum Notifier {
    Http(HttpNotifier),
    Disabled,
}

impl SessionNotifier for Notifier {
    async fn notify_start(&self) -> Result<String> {
        match self {
            Notifier::Http(http) => http.notify_start().await,
            Notifier::Disabled => Ok(String::new()),
        }
    }

    async fn notify_stop(&self) -> Result<String> {
        match self {
            Notifier::Http(http) => http.notify_stop().await,
            Notifier::Disabled => Ok(String::new()),
        }
    }
}

/// Joins a base URL and an endpoint path without doubling the slash.
fn join_endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_handles_slash_variants() {
        assert_eq!(
            join_endpoint("http://localhost:8787", "/record"),
            "http://localhost:8787/record"
        );
        assert_eq!(
            join_endpoint("http://localhost:8787/", "record"),
            "http://localhost:8787/record"
        );
        assert_eq!(
            join_endpoint("http://localhost:8787/", "/stop_recording"),
            "http://localhost:8787/stop_recording"
        );
    }
}

//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;
use crate::types::config::ScraperConfig;

/// Fetches pages over HTTP with a browser-like header set and a
/// bounded timeout.
///
/// Redirects are followed (reqwest default). Non-success statuses are
/// reported as [`FetchError::Status`] rather than returned as text.
pub struct HttpFetcher {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
}

impl HttpFetcher {
    /// Create a fetcher from the injected configuration.
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            headers: config.headers.clone(),
        }
    }

    /// Use a custom reqwest client (proxy, TLS settings, etc.).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, extra_headers: &[(String, String)]) -> FetchResult<String> {
        debug!(url = %url, "HTTP fetch starting");

        let mut request = self.client.get(url);
        for (key, value) in self.headers.iter().chain(extra_headers) {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "upstream returned non-success status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        debug!(url = %url, bytes = text.len(), "HTTP fetch completed");
        Ok(text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

//! Mock fetcher for testing.
//!
//! Allows configuring canned responses per URL and records every call
//! for verification.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;

enum Canned {
    Body(String),
    Status(u16),
    Timeout,
}

/// Mock fetcher with canned per-URL responses.
///
/// URLs with no canned response fail with a network error, which makes
/// unexpected fetches visible in tests. Clones share state, so a test
/// can hand one clone to the scraper and keep another for assertions.
#[derive(Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, Canned>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `url` with `body` (builder form).
    pub fn with_response(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.add_response(url, body);
        self
    }

    /// Respond to `url` with a bare HTTP status (builder form).
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Status(status));
        self
    }

    /// Make `url` time out (builder form).
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Timeout);
        self
    }

    /// Respond to `url` with `body`.
    pub fn add_response(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), Canned::Body(body.into()));
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of fetches made for `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|c| *c == url).count()
    }

    /// Total number of fetches made.
    pub fn total_calls(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str, _extra_headers: &[(String, String)]) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        let responses = self.responses.read().unwrap();
        match responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            None => Err(FetchError::Network {
                url: url.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::NotFound, "no canned response")),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

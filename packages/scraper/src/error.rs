//! Typed errors for the scraper library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only two conditions ever reach the caller of a scrape operation:
//! an upstream fetch fault and invalid caller input. Extraction and
//! stream-resolution faults are recovered internally and show up only
//! as reduced field richness in the result.

use thiserror::Error;

/// Errors surfaced by the top-level scrape operations.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Upstream page fetch failed (non-success status, network fault, timeout)
    #[error("upstream fetch failed: {0}")]
    Upstream(#[from] FetchError),

    /// Caller-supplied input was rejected before any network activity
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Errors that can occur while fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with a non-success HTTP status
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    /// Request failed at the transport level
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request exceeded the configured timeout
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// URL failed security validation
    #[error("security error: {0}")]
    Security(#[from] SecurityError),
}

/// Security-related errors, primarily for SSRF protection on URLs that
/// originate in untrusted page content.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, cloud metadata)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for scrape operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security validation.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

//! Injected configuration for the scraper.
//!
//! Everything environment-specific lives here: base URLs, the
//! browser-like header set sent upstream, the fetch timeout, cache
//! TTLs per resource class, and the stream-resolution concurrency cap.
//! The library never reads these from the environment itself; the
//! embedding application constructs a config and passes it in.

use serde::{Deserialize, Serialize};

/// Cache TTLs in seconds, one per resource class.
///
/// The random class has no TTL on purpose: it bypasses the cache in
/// both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtl {
    /// Landing page sections. Default: 300.
    pub landing: u64,

    /// Single video detail. Default: 600.
    pub video: u64,

    /// Search results. Default: 90 (result sets churn quickly).
    pub search: u64,

    /// Trending listings. Default: 240.
    pub trending: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            landing: 300,
            video: 600,
            search: 90,
            trending: 240,
        }
    }
}

/// Scraper configuration.
///
/// `Default` carries the production upstream values; tests and
/// alternate deployments override what they need via the `with_*`
/// builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site base URL, no trailing slash.
    pub base_url: String,

    /// Upstream JSON API base, exposed for callers that talk to the
    /// API endpoints directly.
    pub api_base_url: String,

    /// CDN base URL used to reconstruct cover art when the fallback
    /// path has only a slug to work with.
    pub cdn_base_url: String,

    /// Header set applied to every upstream request.
    pub headers: Vec<(String, String)>,

    /// Fetch timeout in seconds. Default: 10.
    pub timeout_secs: u64,

    /// Per-resource-class cache TTLs.
    pub ttl: CacheTtl,

    /// Whether the result cache is consulted at all.
    pub cache_enabled: bool,

    /// Maximum simultaneous manifest fetches per video request.
    pub stream_concurrency: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let base = "https://hanime.tv";
        Self {
            base_url: base.to_string(),
            api_base_url: format!("{base}/api/v8"),
            cdn_base_url: "https://cdn.htv-services.com".to_string(),
            headers: vec![
                (
                    "User-Agent".to_string(),
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                        .to_string(),
                ),
                (
                    "Accept".to_string(),
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
                ),
                ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
                ("Referer".to_string(), format!("{base}/")),
                ("Origin".to_string(), base.to_string()),
            ],
            timeout_secs: 10,
            ttl: CacheTtl::default(),
            cache_enabled: true,
            stream_concurrency: 4,
        }
    }
}

impl ScraperConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the site base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the CDN base URL.
    pub fn with_cdn_base_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_base_url = url.into();
        self
    }

    /// Replace the upstream header set.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the fetch timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set per-class cache TTLs.
    pub fn with_ttl(mut self, ttl: CacheTtl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enable or disable the result cache.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the manifest-fetch concurrency cap.
    pub fn with_stream_concurrency(mut self, n: usize) -> Self {
        self.stream_concurrency = n;
        self
    }

    /// Canonical watch URL for a video slug.
    pub fn video_url(&self, slug: &str) -> String {
        format!("{}/videos/hentai/{}", self.base_url, slug)
    }

    /// CDN cover-art URL reconstructed from a slug alone.
    pub fn cover_url(&self, slug: &str) -> String {
        format!("{}/images/covers/{}-cv1.webp", self.cdn_base_url, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ScraperConfig::default();
        assert_eq!(config.video_url("some-video-1"), "https://hanime.tv/videos/hentai/some-video-1");
        assert!(config.cover_url("some-video-1").ends_with("/images/covers/some-video-1-cv1.webp"));
    }

    #[test]
    fn test_builders() {
        let config = ScraperConfig::new()
            .with_base_url("https://mirror.example")
            .with_cache_enabled(false)
            .with_stream_concurrency(2);
        assert_eq!(config.video_url("x"), "https://mirror.example/videos/hentai/x");
        assert!(!config.cache_enabled);
        assert_eq!(config.stream_concurrency, 2);
    }
}

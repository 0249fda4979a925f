//! Public scrape operations.
//!
//! Every operation follows the same pipeline: cache lookup (skipped
//! for random), fetch, extract/parse, cache store. The video
//! operation additionally fans out over declared stream candidates
//! before caching the finished record.

use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::cache::ResultCache;
use crate::error::{Result, ScrapeError};
use crate::fetchers::HttpFetcher;
use crate::pages::{self, ParseContext};
use crate::streams;
use crate::traits::fetcher::{Fetcher, UrlValidator};
use crate::types::config::ScraperConfig;
use crate::types::page::{
    LandingPage, RandomPage, ScrapeOutcome, SearchPage, TrendingPage, TrendingPeriod,
};
use crate::types::video::VideoRecord;

const KEY_LANDING: &str = "landing";

/// Scraper over an injected fetcher.
///
/// Owns its cache: two scrapers never share entries, which keeps tests
/// isolated and allows multi-tenant embedding.
pub struct Scraper<F: Fetcher = HttpFetcher> {
    config: ScraperConfig,
    fetcher: F,
    cache: ResultCache,
    validator: UrlValidator,
}

impl Scraper<HttpFetcher> {
    /// Create a scraper backed by the HTTP fetcher.
    pub fn new(config: ScraperConfig) -> Self {
        let fetcher = HttpFetcher::new(&config);
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: Fetcher> Scraper<F> {
    /// Create a scraper with a custom fetcher.
    pub fn with_fetcher(config: ScraperConfig, fetcher: F) -> Self {
        let cache = ResultCache::new(config.cache_enabled);
        Self {
            config,
            fetcher,
            cache,
            validator: UrlValidator::new(),
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape the landing page into named sections.
    pub async fn home(&self) -> Result<ScrapeOutcome<LandingPage>> {
        if let Some(hit) = self.cache.get::<LandingPage>(KEY_LANDING) {
            debug!(key = KEY_LANDING, "cache hit");
            return Ok(ScrapeOutcome::cached(hit));
        }

        let html = self.fetcher.fetch_text(&self.config.base_url, &[]).await?;
        let page = pages::landing::parse(&html, &ParseContext::new(&self.config));
        info!(sections = page.sections.len(), "landing scrape complete");

        self.cache
            .set(KEY_LANDING, &page, Duration::from_secs(self.config.ttl.landing));
        Ok(ScrapeOutcome::live(page))
    }

    /// Scrape a trending listing for a period and 1-indexed page.
    pub async fn trending(
        &self,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<ScrapeOutcome<TrendingPage>> {
        let page = page.max(1);
        let key = format!("trending:{period}:{page}");
        if let Some(hit) = self.cache.get::<TrendingPage>(&key) {
            debug!(key = %key, "cache hit");
            return Ok(ScrapeOutcome::cached(hit));
        }

        let mut params = vec![("time", period.as_str().to_string())];
        if page > 1 {
            params.push(("page", page.to_string()));
        }
        let url = self.page_url("/browse/trending", &params);

        let html = self.fetcher.fetch_text(&url, &[]).await?;
        let result = pages::trending::parse(&html, &ParseContext::new(&self.config));
        info!(period = %period, page, videos = result.videos.len(), "trending scrape complete");

        self.cache
            .set(&key, &result, Duration::from_secs(self.config.ttl.trending));
        Ok(ScrapeOutcome::live(result))
    }

    /// Scrape the random listing. Never cached, in either direction:
    /// every call is a fresh upstream draw.
    pub async fn random(&self) -> Result<ScrapeOutcome<RandomPage>> {
        let url = self.page_url("/browse/random", &[]);
        let html = self.fetcher.fetch_text(&url, &[]).await?;
        let page = pages::random::parse(&html, &ParseContext::new(&self.config));
        info!(videos = page.videos.len(), "random scrape complete");
        Ok(ScrapeOutcome::live(page))
    }

    /// Scrape one video detail page, resolving its declared streams
    /// into quality variants.
    pub async fn video(&self, slug: &str) -> Result<ScrapeOutcome<VideoRecord>> {
        let slug = sanitize_slug(slug)?;
        let key = format!("video:{slug}");
        if let Some(hit) = self.cache.get::<VideoRecord>(&key) {
            debug!(key = %key, "cache hit");
            return Ok(ScrapeOutcome::cached(hit));
        }

        let url = self.config.video_url(&slug);
        let html = self.fetcher.fetch_text(&url, &[]).await?;
        let parsed = pages::video::parse(&html, &ParseContext::for_slug(&self.config, &slug));

        let mut record = parsed.record;
        record.streams = streams::resolve_all(
            &self.fetcher,
            &self.validator,
            parsed.candidates,
            self.config.stream_concurrency,
        )
        .await;
        info!(slug = %slug, streams = record.streams.len(), "video scrape complete");

        self.cache
            .set(&key, &record, Duration::from_secs(self.config.ttl.video));
        Ok(ScrapeOutcome::live(record))
    }

    /// Scrape search results for a query, optionally narrowed by tags.
    pub async fn search(&self, query: &str, tags: &[String]) -> Result<ScrapeOutcome<SearchPage>> {
        let key = format!("search:{}:{}", query, tags.join(","));
        if let Some(hit) = self.cache.get::<SearchPage>(&key) {
            debug!(key = %key, "cache hit");
            return Ok(ScrapeOutcome::cached(hit));
        }

        let mut params = vec![("search_text", query.to_string())];
        for tag in tags {
            params.push(("tags[]", tag.clone()));
        }
        let url = self.page_url("/search", &params);

        let html = self.fetcher.fetch_text(&url, &[]).await?;
        let page = pages::search::parse(&html, &ParseContext::new(&self.config));
        info!(query = %query, results = page.videos.len(), "search scrape complete");

        self.cache
            .set(&key, &page, Duration::from_secs(self.config.ttl.search));
        Ok(ScrapeOutcome::live(page))
    }

    fn page_url(&self, path: &str, params: &[(&str, String)]) -> String {
        match Url::parse(&self.config.base_url).and_then(|base| base.join(path)) {
            Ok(mut url) => {
                if !params.is_empty() {
                    let mut pairs = url.query_pairs_mut();
                    for (key, value) in params {
                        pairs.append_pair(key, value);
                    }
                    drop(pairs);
                }
                url.to_string()
            }
            Err(_) => format!("{}{}", self.config.base_url, path),
        }
    }
}

/// Allow only lowercase alphanumerics and hyphens, as upstream slugs
/// do. Anything that sanitizes to nothing is rejected.
fn sanitize_slug(raw: &str) -> Result<String> {
    let clean: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    if clean.is_empty() {
        return Err(ScrapeError::InvalidInput {
            reason: "slug must contain letters, digits, or hyphens".to_string(),
        });
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("Some-Ep-1").unwrap(), "some-ep-1");
        assert_eq!(sanitize_slug("../../etc/passwd").unwrap(), "etcpasswd");
        assert!(sanitize_slug("../..").is_err());
        assert!(sanitize_slug("").is_err());
    }

    #[test]
    fn test_page_url_building() {
        let scraper = Scraper::new(ScraperConfig::default());
        let url = scraper.page_url(
            "/browse/trending",
            &[("time", "week".to_string()), ("page", "2".to_string())],
        );
        assert_eq!(url, "https://hanime.tv/browse/trending?time=week&page=2");

        let url = scraper.page_url("/search", &[("search_text", "a b".to_string())]);
        assert_eq!(url, "https://hanime.tv/search?search_text=a+b");
    }
}

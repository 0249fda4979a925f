//! Catalog and stream scraper for server-rendered hanime.tv pages.
//!
//! The site embeds its client-hydration state as an inline
//! immediately-invoked function expression. This library reconstructs
//! that state as a typed value tree **without executing any script**,
//! parses each page kind into one canonical record shape (with a
//! pattern-based fallback when extraction fails), resolves adaptive
//! stream manifests into concrete quality variants, and memoizes
//! results in a short-lived per-resource-class cache.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hanime_scraper::{Scraper, ScraperConfig, TrendingPeriod};
//!
//! let scraper = Scraper::new(ScraperConfig::default());
//!
//! let home = scraper.home().await?;
//! let trending = scraper.trending(TrendingPeriod::Week, 1).await?;
//! let video = scraper.video("some-episode-1").await?;
//! ```
//!
//! # Modules
//!
//! - [`state`] - hydration-state extraction (the safe literal parser)
//! - [`traits`] - the `Fetcher` seam and URL validation
//! - [`fetchers`] - HTTP and mock fetcher implementations
//! - [`cache`] - the TTL result cache
//! - [`types`] - configuration and data model
//! - [`testing`] - fixture builders for tests

pub mod cache;
pub mod error;
pub mod fetchers;
mod pages;
mod scraper;
pub mod state;
mod streams;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use cache::ResultCache;
pub use error::{FetchError, Result, ScrapeError, SecurityError};
pub use fetchers::{HttpFetcher, MockFetcher};
pub use scraper::Scraper;
pub use state::{extract_state, Value};
pub use traits::fetcher::{Fetcher, UrlValidator};
pub use types::{
    config::{CacheTtl, ScraperConfig},
    page::{
        LandingPage, RandomPage, ScrapeOutcome, SearchPage, Source, TrendingPage, TrendingPeriod,
    },
    stream::{StreamCandidate, StreamKind, StreamVariant},
    video::{AltTitle, Brand, Franchise, Section, Storyboard, Tag, VideoRecord},
};

//! Page parsers, one module per page kind.
//!
//! Each page kind runs an ordered list of extraction strategies: the
//! hydration-state path first, then the pattern-based fallback over
//! raw text. Both paths produce the same shape; the fallback simply
//! leaves enrichment fields empty, and that degradation is kept as-is.

pub mod landing;
pub mod normalize;
pub mod random;
pub mod search;
pub mod trending;
pub mod video;

use regex::Regex;
use tracing::debug;

use crate::types::config::ScraperConfig;
use crate::types::video::VideoRecord;

/// Everything a parser needs besides the page text.
pub(crate) struct ParseContext<'a> {
    pub config: &'a ScraperConfig,
    /// Slug of the requested video, for parsers that need it to
    /// reconstruct a record from degraded markup.
    pub slug: Option<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(config: &'a ScraperConfig) -> Self {
        Self { config, slug: None }
    }

    pub(crate) fn for_slug(config: &'a ScraperConfig, slug: &'a str) -> Self {
        Self {
            config,
            slug: Some(slug),
        }
    }
}

/// One way of extracting a page result from raw text.
///
/// Returning `None` means "try the next strategy", not an error.
pub(crate) trait ExtractStrategy<T> {
    fn name(&self) -> &'static str;
    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<T>;
}

/// Run strategies in order; the first one that produces a result wins.
pub(crate) fn run_strategies<T>(
    html: &str,
    cx: &ParseContext<'_>,
    strategies: &[&dyn ExtractStrategy<T>],
) -> Option<T> {
    for strategy in strategies {
        if let Some(result) = strategy.extract(html, cx) {
            debug!(strategy = strategy.name(), "extraction strategy succeeded");
            return Some(result);
        }
        debug!(
            strategy = strategy.name(),
            "extraction strategy yielded nothing, trying next"
        );
    }
    None
}

/// Parse a human-formatted count like `1,234,567`.
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

/// Scan catalog card markup for minimal records: slug, name, views.
///
/// This is all the fallback path can see on listing pages; enrichment
/// fields stay empty.
pub(crate) fn card_records(chunk: &str, cx: &ParseContext<'_>) -> Vec<VideoRecord> {
    let card_rx = Regex::new(
        r#"(?s)href="/videos/hentai/([\w-]+)"[^>]*?title="Watch ([^"]+) hentai.*?mdi-eye-outline[^>]*></i>\s*([\d,]+)"#,
    )
    .unwrap();

    card_rx
        .captures_iter(chunk)
        .filter_map(|caps| {
            let slug = caps.get(1)?.as_str().to_string();
            Some(VideoRecord {
                name: caps.get(2).map(|m| m.as_str().trim().to_string()),
                views: caps.get(3).and_then(|m| parse_count(m.as_str())),
                cover_url: Some(cx.config.cover_url(&slug)),
                url: cx.config.video_url(&slug),
                slug,
                ..Default::default()
            })
        })
        .collect()
}

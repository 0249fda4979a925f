//! Random page parser.
//!
//! Primary path: the hydration state's `random` node with full
//! records. Fallback path: the card markup carries only hrefs, so the
//! degraded records are slug + reconstructed cover art and nothing
//! else.

use std::collections::HashSet;

use regex::Regex;

use crate::pages::{normalize, run_strategies, ExtractStrategy, ParseContext};
use crate::state::{extract_state, Value};
use crate::types::page::RandomPage;
use crate::types::video::VideoRecord;

pub(crate) fn parse(html: &str, cx: &ParseContext<'_>) -> RandomPage {
    run_strategies(html, cx, &[&StatePath, &HtmlPath]).unwrap_or_default()
}

struct StatePath;

impl ExtractStrategy<RandomPage> for StatePath {
    fn name(&self) -> &'static str {
        "nuxt-state"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<RandomPage> {
        let state = extract_state(html)?;
        let videos = state
            .path(&["state", "data", "random"])?
            .get("hentai_videos")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(|hv| normalize::normalize_video(hv, cx))
            .collect();
        Some(RandomPage { videos })
    }
}

struct HtmlPath;

impl ExtractStrategy<RandomPage> for HtmlPath {
    fn name(&self) -> &'static str {
        "html-regex"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<RandomPage> {
        let href_rx = Regex::new(r#"href="/videos/hentai/([\w-]+)""#).unwrap();

        let mut seen = HashSet::new();
        let videos = href_rx
            .captures_iter(html)
            .filter_map(|caps| {
                let slug = caps.get(1)?.as_str().to_string();
                if !seen.insert(slug.clone()) {
                    return None;
                }
                Some(VideoRecord {
                    cover_url: Some(cx.config.cover_url(&slug)),
                    url: cx.config.video_url(&slug),
                    slug,
                    ..Default::default()
                })
            })
            .collect();

        Some(RandomPage { videos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ScraperConfig;

    #[test]
    fn test_html_fallback_dedupes_slugs_in_order() {
        let html = r#"
            <a href="/videos/hentai/alpha-1"></a>
            <a href="/videos/hentai/beta-2"></a>
            <a href="/videos/hentai/alpha-1"></a>
        "#;

        let config = ScraperConfig::default();
        let page = parse(html, &ParseContext::new(&config));

        let slugs: Vec<_> = page.videos.iter().map(|v| v.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha-1", "beta-2"]);
        assert!(page.videos[0].name.is_none());
    }
}

//! Search results parser.

use crate::pages::{card_records, normalize, run_strategies, ExtractStrategy, ParseContext};
use crate::state::extract_state;
use crate::types::page::SearchPage;

pub(crate) fn parse(html: &str, cx: &ParseContext<'_>) -> SearchPage {
    run_strategies(html, cx, &[&StatePath, &HtmlPath]).unwrap_or_default()
}

struct StatePath;

impl ExtractStrategy<SearchPage> for StatePath {
    fn name(&self) -> &'static str {
        "nuxt-state"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<SearchPage> {
        let state = extract_state(html)?;
        let videos = state
            .path(&["state", "data", "search_results"])?
            .as_array()?
            .iter()
            .filter_map(|hv| normalize::normalize_video(hv, cx))
            .collect();
        Some(SearchPage { videos })
    }
}

struct HtmlPath;

impl ExtractStrategy<SearchPage> for HtmlPath {
    fn name(&self) -> &'static str {
        "html-regex"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<SearchPage> {
        Some(SearchPage {
            videos: card_records(html, cx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ScraperConfig;

    #[test]
    fn test_state_path_keeps_upstream_order() {
        let html = r#"window.__NUXT__=(function(a,b){return {state:{data:{search_results:[
            {id:2,slug:"match-two",name:b,views:5},
            {id:1,slug:"match-one",name:a,views:9}
        ]}}}}("One","Two"));"#;

        let config = ScraperConfig::default();
        let page = parse(html, &ParseContext::new(&config));

        let slugs: Vec<_> = page.videos.iter().map(|v| v.slug.as_str()).collect();
        assert_eq!(slugs, vec!["match-two", "match-one"]);
    }

    #[test]
    fn test_html_fallback_zero_matches_is_empty_not_error() {
        let config = ScraperConfig::default();
        let page = parse("<html><body>nothing here</body></html>", &ParseContext::new(&config));
        assert!(page.videos.is_empty());
    }
}

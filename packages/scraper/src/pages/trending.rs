//! Trending page parser.
//!
//! Primary path: the hydration state's `trending` node with full
//! paging metadata and enriched records (monthly rank, interest
//! counts). Fallback path: the rank badge each trending card renders;
//! paging metadata falls back to defaults.

use regex::Regex;

use crate::pages::{normalize, parse_count, run_strategies, ExtractStrategy, ParseContext};
use crate::state::{extract_state, Value};
use crate::types::page::TrendingPage;
use crate::types::video::VideoRecord;

pub(crate) fn parse(html: &str, cx: &ParseContext<'_>) -> TrendingPage {
    run_strategies(html, cx, &[&StatePath, &HtmlPath]).unwrap_or_default()
}

struct StatePath;

impl ExtractStrategy<TrendingPage> for StatePath {
    fn name(&self) -> &'static str {
        "nuxt-state"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<TrendingPage> {
        let state = extract_state(html)?;
        let trending = state.path(&["state", "data", "trending"])?;

        let videos = trending
            .get("hentai_videos")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|hv| normalize::normalize_video(hv, cx))
                    .collect()
            })
            .unwrap_or_default();

        let defaults = TrendingPage::default();
        Some(TrendingPage {
            period: normalize::str_field(trending, "time").unwrap_or(defaults.period),
            page: normalize::u64_field(trending, "page")
                .map(|p| p as u32)
                .unwrap_or(defaults.page),
            page_size: normalize::u64_field(trending, "page_size")
                .map(|p| p as u32)
                .unwrap_or(defaults.page_size),
            number_of_pages: normalize::u64_field(trending, "number_of_pages")
                .map(|p| p as u32)
                .unwrap_or(defaults.number_of_pages),
            videos,
        })
    }
}

struct HtmlPath;

impl ExtractStrategy<TrendingPage> for HtmlPath {
    fn name(&self) -> &'static str {
        "html-regex"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<TrendingPage> {
        let rank_rx = Regex::new(
            r#"(?s)href="/videos/hentai/([\w-]+)"[^>]*?title="Watch ([^"]+) hentai.*?hvc__slot_data">\s*Rank\s*([\d,]+)"#,
        )
        .unwrap();

        let videos: Vec<VideoRecord> = rank_rx
            .captures_iter(html)
            .filter_map(|caps| {
                let slug = caps.get(1)?.as_str().to_string();
                Some(VideoRecord {
                    name: caps.get(2).map(|m| m.as_str().trim().to_string()),
                    monthly_rank: caps.get(3).and_then(|m| parse_count(m.as_str())),
                    cover_url: Some(cx.config.cover_url(&slug)),
                    url: cx.config.video_url(&slug),
                    slug,
                    ..Default::default()
                })
            })
            .collect();

        Some(TrendingPage {
            videos,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ScraperConfig;

    #[test]
    fn test_state_path_paging_metadata() {
        let html = r#"window.__NUXT__=(function(a){return {state:{data:{trending:{
            time:"week",page:2,page_size:24,number_of_pages:9,
            hentai_videos:[{id:5,slug:"hot-1",name:a,views:100,monthly_rank:1,interests:7}]
        }}}}}("Hot One"));"#;

        let config = ScraperConfig::default();
        let page = parse(html, &ParseContext::new(&config));

        assert_eq!(page.period, "week");
        assert_eq!(page.page, 2);
        assert_eq!(page.number_of_pages, 9);
        assert_eq!(page.videos.len(), 1);
        assert_eq!(page.videos[0].monthly_rank, Some(1));
        assert_eq!(page.videos[0].interests, Some(7));
    }

    #[test]
    fn test_html_fallback_rank_badges_only() {
        let html = r#"
            <a href="/videos/hentai/top-ep-1" title="Watch Top Ep 1 hentai stream">
              <div class="hvc__slot_data"> Rank 1 </div>
            </a>
            <a href="/videos/hentai/second-ep" title="Watch Second Ep hentai stream">
              <div class="hvc__slot_data"> Rank 2 </div>
            </a>
        "#;

        let config = ScraperConfig::default();
        let page = parse(html, &ParseContext::new(&config));

        assert_eq!(page.period, "month"); // default, not inferred
        assert_eq!(page.videos.len(), 2);
        assert_eq!(page.videos[0].monthly_rank, Some(1));
        assert_eq!(page.videos[0].views, None); // badge is all the fallback sees
        assert_eq!(page.videos[1].slug, "second-ep");
    }
}

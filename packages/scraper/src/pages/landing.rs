//! Landing page parser.
//!
//! Primary path: the hydration state's `landing` node, a list of named
//! sections holding video ids against a flat id → video map. Ids that
//! do not resolve are dropped, not errored. Fallback path: carousel
//! markup scanning, which only sees slug/name/views per card.

use std::collections::HashMap;

use regex::Regex;

use crate::pages::{card_records, normalize, run_strategies, ExtractStrategy, ParseContext};
use crate::state::{extract_state, Value};
use crate::types::page::LandingPage;
use crate::types::video::{Section, VideoRecord};

pub(crate) fn parse(html: &str, cx: &ParseContext<'_>) -> LandingPage {
    run_strategies(html, cx, &[&StatePath, &HtmlPath]).unwrap_or_default()
}

struct StatePath;

impl ExtractStrategy<LandingPage> for StatePath {
    fn name(&self) -> &'static str {
        "nuxt-state"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<LandingPage> {
        let state = extract_state(html)?;
        let landing = state.path(&["state", "data", "landing"])?;

        let mut by_id: HashMap<u64, VideoRecord> = HashMap::new();
        if let Some(videos) = landing.get("hentai_videos").and_then(Value::as_array) {
            for hv in videos {
                if let Some(record) = normalize::normalize_video(hv, cx) {
                    if let Some(id) = record.id {
                        by_id.insert(id, record);
                    }
                }
            }
        }

        let mut sections = Vec::new();
        if let Some(raw_sections) = landing.get("sections").and_then(Value::as_array) {
            for raw in raw_sections {
                let Some(title) =
                    normalize::str_field(raw, "title").filter(|t| !t.trim().is_empty())
                else {
                    continue;
                };
                let videos = raw
                    .get("hentai_video_ids")
                    .and_then(Value::as_array)
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|id| id.as_u64().and_then(|id| by_id.get(&id).cloned()))
                            .collect()
                    })
                    .unwrap_or_default();
                sections.push(Section { title, videos });
            }
        }

        Some(LandingPage { sections })
    }
}

struct HtmlPath;

impl ExtractStrategy<LandingPage> for HtmlPath {
    fn name(&self) -> &'static str {
        "html-regex"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<LandingPage> {
        let section_rx = Regex::new(
            r#"<span>([^<]+)</span>\s*<span class="htv-carousel__header__title__subtitle">"#,
        )
        .unwrap();

        let mut positions: Vec<(String, usize)> = Vec::new();
        for caps in section_rx.captures_iter(html) {
            if let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) {
                positions.push((title.as_str().trim().to_string(), whole.start()));
            }
        }

        let mut sections = Vec::new();
        for (i, (title, start)) in positions.iter().enumerate() {
            let end = positions.get(i + 1).map(|(_, p)| *p).unwrap_or(html.len());
            sections.push(Section {
                title: title.clone(),
                videos: card_records(&html[*start..end], cx),
            });
        }

        Some(LandingPage { sections })
    }
}

//! Video detail page parser.
//!
//! Primary path: the hydration state's video container, which carries
//! the record plus page-level enrichment (rich tag dictionary,
//! storyboards, franchise siblings, brand block, next/next-random
//! pointers, declared stream manifest). Fallback path: title, view
//! count, cover art, tag hrefs, description meta, and whatever
//! manifest URLs appear verbatim in the raw text.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::pages::{normalize, parse_count, run_strategies, ExtractStrategy, ParseContext};
use crate::state::{extract_state, Value};
use crate::types::stream::{StreamCandidate, StreamKind};
use crate::types::video::{Brand, Franchise, Storyboard, Tag, VideoRecord};

/// Parse result: the record plus its declared stream candidates,
/// which the caller resolves separately.
#[derive(Debug, Default)]
pub(crate) struct ParsedVideo {
    pub record: VideoRecord,
    pub candidates: Vec<StreamCandidate>,
}

pub(crate) fn parse(html: &str, cx: &ParseContext<'_>) -> ParsedVideo {
    run_strategies(html, cx, &[&StatePath, &HtmlPath]).unwrap_or_else(|| {
        let slug = cx.slug.unwrap_or_default();
        ParsedVideo {
            record: VideoRecord {
                slug: slug.to_string(),
                url: cx.config.video_url(slug),
                ..Default::default()
            },
            candidates: Vec::new(),
        }
    })
}

struct StatePath;

impl ExtractStrategy<ParsedVideo> for StatePath {
    fn name(&self) -> &'static str {
        "nuxt-state"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<ParsedVideo> {
        let state = extract_state(html)?;
        let data = state.path(&["state", "data"])?;

        // Current pages nest the record in a `video` container next to
        // page-level enrichment; older shapes store it directly.
        let (container, hv) = match data.get("video") {
            Some(v) if v.get("hentai_video").is_some() => (v, v.get("hentai_video")?),
            Some(v) => (data, v),
            None => (data, data.get("hentai_video")?),
        };

        let mut record = normalize::normalize_video(hv, cx)?;
        record.tags = merge_tags(record.tags, container.get("hentai_tags"));
        record.player_url = player_url(hv, container, &record.slug);
        record.storyboards = storyboards(container.get("hentai_video_storyboards"));
        record.franchise = franchise(container, cx);
        record.brand_detail = brand(container.get("brand"));
        record.next_video = container
            .get("next_hentai_video")
            .and_then(|v| normalize::normalize_video(v, cx))
            .map(Box::new);
        record.next_random = container
            .get("next_random_hentai_video")
            .and_then(|v| normalize::normalize_video(v, cx))
            .map(Box::new);

        let candidates = stream_candidates(container.get("videos_manifest"));
        Some(ParsedVideo { record, candidates })
    }
}

/// Enrich compact per-video tag references from the page-level tag
/// dictionary, matching by id. Unknown ids keep their bare text.
fn merge_tags(refs: Vec<Tag>, dictionary: Option<&Value>) -> Vec<Tag> {
    let Some(items) = dictionary.and_then(Value::as_array) else {
        return refs;
    };
    if refs.is_empty() {
        // No compact list on the record: the dictionary is the list
        return normalize::normalize_tag_refs(dictionary);
    }

    let by_id: HashMap<u64, &Value> = items
        .iter()
        .filter_map(|t| Some((t.get("id")?.as_u64()?, t)))
        .collect();

    refs.into_iter()
        .map(|mut tag| {
            if let Some(rich) = tag.id.and_then(|id| by_id.get(&id)) {
                tag.count = tag.count.or_else(|| normalize::u64_field(rich, "count"));
                tag.description = tag
                    .description
                    .or_else(|| normalize::str_field(rich, "description"));
                tag.wide_image_url = tag
                    .wide_image_url
                    .or_else(|| normalize::str_field(rich, "wide_image_url"));
                tag.tall_image_url = tag
                    .tall_image_url
                    .or_else(|| normalize::str_field(rich, "tall_image_url"));
            }
            tag
        })
        .collect()
}

fn player_url(hv: &Value, container: &Value, slug: &str) -> Option<String> {
    normalize::str_field(hv, "player_url").or_else(|| {
        normalize::str_field(container, "player_base_url")
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), slug))
    })
}

fn storyboards(value: Option<&Value>) -> Vec<Storyboard> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|s| Storyboard {
            id: normalize::u64_field(s, "id"),
            url: normalize::str_field(s, "url"),
            frame_width: normalize::u64_field(s, "frame_width"),
            frame_height: normalize::u64_field(s, "frame_height"),
            num_total_frames: normalize::u64_field(s, "num_total_storyboard_frames"),
        })
        .collect()
}

fn franchise(container: &Value, cx: &ParseContext<'_>) -> Option<Franchise> {
    let f = container.get("hentai_franchise")?;
    let videos = container
        .get("hentai_franchise_hentai_videos")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|hv| normalize::normalize_video(hv, cx))
                .collect()
        })
        .unwrap_or_default();
    Some(Franchise {
        id: normalize::u64_field(f, "id"),
        name: normalize::str_field(f, "name"),
        slug: normalize::str_field(f, "slug"),
        title: normalize::str_field(f, "title"),
        videos,
    })
}

fn brand(value: Option<&Value>) -> Option<Brand> {
    let b = value?;
    b.as_object()?;
    Some(Brand {
        id: normalize::u64_field(b, "id"),
        title: normalize::str_field(b, "title").or_else(|| normalize::str_field(b, "name")),
        slug: normalize::str_field(b, "slug"),
        upload_count: normalize::u64_field(b, "count_uploads"),
        website_url: normalize::str_field(b, "website_url"),
    })
}

fn stream_candidates(manifest: Option<&Value>) -> Vec<StreamCandidate> {
    let Some(servers) = manifest
        .and_then(|m| m.get("servers"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for server in servers {
        let server_name = normalize::str_field(server, "name");
        let server_slug = normalize::str_field(server, "slug");
        let Some(streams) = server.get("streams").and_then(Value::as_array) else {
            continue;
        };
        for s in streams {
            // Premium-only entries ship without a URL; nothing to resolve
            let Some(url) = normalize::str_field(s, "url").filter(|u| !u.is_empty()) else {
                continue;
            };
            let extension =
                normalize::str_field(s, "extension").or_else(|| extension_from_url(&url));
            let kind_str = normalize::str_field(s, "kind");
            out.push(StreamCandidate {
                id: normalize::u64_field(s, "id"),
                server_name: server_name.clone(),
                server_slug: server_slug.clone(),
                slug: normalize::str_field(s, "slug"),
                kind: StreamKind::from_signals(kind_str.as_deref(), extension.as_deref()),
                mime_type: normalize::str_field(s, "mime_type"),
                width: normalize::u64_field(s, "width").map(|w| w as u32),
                height: normalize::u64_field(s, "height").map(|h| h as u32),
                duration_ms: normalize::u64_field(s, "duration_in_ms"),
                filesize_mbs: s.get("filesize_mbs").and_then(Value::as_f64),
                is_guest_allowed: normalize::bool_field(s, "is_guest_allowed"),
                is_member_allowed: normalize::bool_field(s, "is_member_allowed"),
                is_premium_allowed: normalize::bool_field(s, "is_premium_allowed"),
                is_downloadable: normalize::bool_field(s, "is_downloadable"),
                extension,
                url,
            });
        }
    }
    out
}

fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

struct HtmlPath;

impl ExtractStrategy<ParsedVideo> for HtmlPath {
    fn name(&self) -> &'static str {
        "html-regex"
    }

    fn extract(&self, html: &str, cx: &ParseContext<'_>) -> Option<ParsedVideo> {
        let slug = cx.slug.unwrap_or_default();

        let title_rx = Regex::new(r"(?i)<title>Watch ([^<]+) hentai").unwrap();
        let views_rx = Regex::new(r#"mdi-eye-outline[^>]*></i>\s*([\d,]+)"#).unwrap();
        let cover_rx = Regex::new(r#"cover_url:"([^"]+)""#).unwrap();
        let desc_rx = Regex::new(r#"<meta name="description" content="([^"]*)""#).unwrap();
        let tag_rx = Regex::new(r#"href="/browse/tags/([^"?]+)""#).unwrap();
        let manifest_rx = Regex::new(r#"https?://[^"'\s\\]+\.m3u8[^"'\s\\]*"#).unwrap();

        let name = title_rx
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| slug.to_string());

        let mut seen_tags = HashSet::new();
        let tags: Vec<Tag> = tag_rx
            .captures_iter(html)
            .filter_map(|caps| {
                let raw = caps.get(1)?.as_str();
                let text = urlencoding::decode(raw)
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                seen_tags.insert(text.clone()).then(|| Tag::bare(text))
            })
            .collect();

        let mut seen_urls = HashSet::new();
        let candidates: Vec<StreamCandidate> = manifest_rx
            .find_iter(html)
            .filter_map(|m| {
                let url = m.as_str().to_string();
                seen_urls.insert(url.clone()).then(|| StreamCandidate {
                    kind: StreamKind::AdaptiveManifest,
                    extension: Some("m3u8".to_string()),
                    url,
                    ..Default::default()
                })
            })
            .collect();

        let record = VideoRecord {
            slug: slug.to_string(),
            name: Some(name),
            url: cx.config.video_url(slug),
            views: views_rx
                .captures(html)
                .and_then(|c| c.get(1))
                .and_then(|m| parse_count(m.as_str())),
            cover_url: Some(
                cover_rx
                    .captures(html)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| cx.config.cover_url(slug)),
            ),
            description: desc_rx
                .captures(html)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            tags,
            ..Default::default()
        };

        Some(ParsedVideo { record, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ScraperConfig;

    #[test]
    fn test_state_path_merges_tag_dictionary() {
        let html = r#"window.__NUXT__=(function(a,b){return {state:{data:{video:{
            hentai_video:{id:1,slug:"ep-1",name:a,views:50,
                hentai_tags:[{id:10,text:b},{id:99,text:"unknown"}]},
            hentai_tags:[{id:10,text:b,count:1234,description:"desc",
                wide_image_url:"https://cdn.example/w.png",tall_image_url:"https://cdn.example/t.png"}]
        }}}}}("Ep 1","vanilla"));"#;

        let config = ScraperConfig::default();
        let parsed = parse(html, &ParseContext::for_slug(&config, "ep-1"));

        assert_eq!(parsed.record.tags.len(), 2);
        let rich = &parsed.record.tags[0];
        assert_eq!(rich.text, "vanilla");
        assert_eq!(rich.count, Some(1234));
        assert_eq!(rich.description.as_deref(), Some("desc"));
        let bare = &parsed.record.tags[1];
        assert_eq!(bare.text, "unknown");
        assert_eq!(bare.count, None);
    }

    #[test]
    fn test_state_path_collects_stream_candidates() {
        let html = r#"window.__NUXT__=(function(a){return {state:{data:{video:{
            hentai_video:{id:2,slug:"ep-2",name:"Ep 2"},
            videos_manifest:{servers:[{name:a,slug:"srv-1",streams:[
                {id:101,slug:"720",url:"https://m.example.com/720.m3u8",kind:"hls",extension:"m3u8",
                 width:1280,height:720,is_guest_allowed:true},
                {id:102,slug:"mp4",url:"https://m.example.com/file.mp4",extension:"mp4",height:480},
                {id:103,slug:"premium",url:"",extension:"m3u8"}
            ]}]}
        }}}}}("Main"));"#;

        let config = ScraperConfig::default();
        let parsed = parse(html, &ParseContext::for_slug(&config, "ep-2"));

        assert_eq!(parsed.candidates.len(), 2); // empty-url entry skipped
        let hls = &parsed.candidates[0];
        assert!(hls.is_adaptive());
        assert_eq!(hls.server_name.as_deref(), Some("Main"));
        assert_eq!(hls.height, Some(720));
        assert!(!parsed.candidates[1].is_adaptive());
    }

    #[test]
    fn test_state_path_franchise_and_pointers() {
        let html = r#"window.__NUXT__=(function(){return {state:{data:{video:{
            hentai_video:{id:3,slug:"ep-3",name:"Ep 3"},
            hentai_franchise:{id:44,name:"series",slug:"series",title:"Series"},
            hentai_franchise_hentai_videos:[{id:3,slug:"ep-3",name:"Ep 3"},{id:4,slug:"ep-4",name:"Ep 4"}],
            brand:{id:9,title:"Studio",slug:"studio",count_uploads:12},
            next_hentai_video:{id:4,slug:"ep-4",name:"Ep 4"}
        }}}}}());"#;

        let config = ScraperConfig::default();
        let parsed = parse(html, &ParseContext::for_slug(&config, "ep-3"));

        let franchise = parsed.record.franchise.unwrap();
        assert_eq!(franchise.title.as_deref(), Some("Series"));
        assert_eq!(franchise.videos.len(), 2);
        assert_eq!(parsed.record.brand_detail.unwrap().upload_count, Some(12));
        assert_eq!(parsed.record.next_video.unwrap().slug, "ep-4");
        assert!(parsed.record.next_random.is_none());
    }

    #[test]
    fn test_html_fallback_degraded_record() {
        let html = r#"<html><head>
            <title>Watch Some Ep 1 hentai stream online</title>
            <meta name="description" content="An episode synopsis.">
        </head><body>
            <i class="mdi-eye-outline"></i> 4,321
            <a href="/browse/tags/vanilla">vanilla</a>
            <a href="/browse/tags/school%20life">school life</a>
            <a href="/browse/tags/vanilla">vanilla again</a>
            <script>x.src="https://m.example.com/some-ep-1/master.m3u8?tk=1"</script>
        </body></html>"#;

        let config = ScraperConfig::default();
        let parsed = parse(html, &ParseContext::for_slug(&config, "some-ep-1"));

        assert_eq!(parsed.record.name.as_deref(), Some("Some Ep 1"));
        assert_eq!(parsed.record.views, Some(4321));
        assert_eq!(parsed.record.description.as_deref(), Some("An episode synopsis."));
        let tags: Vec<_> = parsed.record.tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(tags, vec!["vanilla", "school life"]);
        // Degraded: no enrichment invented
        assert!(parsed.record.franchise.is_none());
        assert!(parsed.record.storyboards.is_empty());
        assert_eq!(parsed.candidates.len(), 1);
        assert!(parsed.candidates[0].is_adaptive());
    }
}

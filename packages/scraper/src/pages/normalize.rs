//! Canonicalization of raw video-like values.
//!
//! Every page kind funnels its video objects through
//! [`normalize_video`] so the whole API speaks one record shape.

use crate::pages::ParseContext;
use crate::state::Value;
use crate::types::video::{AltTitle, Tag, VideoRecord};

pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn u64_field(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(Value::as_u64)
}

pub(crate) fn i64_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

pub(crate) fn bool_field(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

/// Canonicalize one raw video value.
///
/// `slug` is the one hard requirement: a record without it is not
/// usable as a catalog entry and normalization returns `None`.
pub(crate) fn normalize_video(hv: &Value, cx: &ParseContext<'_>) -> Option<VideoRecord> {
    let slug = str_field(hv, "slug")?;

    Some(VideoRecord {
        id: u64_field(hv, "id"),
        name: str_field(hv, "name"),
        url: cx.config.video_url(&slug),
        description: str_field(hv, "description"),
        views: u64_field(hv, "views"),
        interests: u64_field(hv, "interests"),
        likes: u64_field(hv, "likes"),
        dislikes: u64_field(hv, "dislikes"),
        downloads: u64_field(hv, "downloads"),
        monthly_rank: u64_field(hv, "monthly_rank"),
        cover_url: str_field(hv, "cover_url"),
        poster_url: str_field(hv, "poster_url"),
        duration_ms: u64_field(hv, "duration_in_ms"),
        is_censored: bool_field(hv, "is_censored"),
        brand: str_field(hv, "brand"),
        brand_id: u64_field(hv, "brand_id"),
        released_at: str_field(hv, "released_at"),
        released_at_unix: i64_field(hv, "released_at_unix"),
        created_at: str_field(hv, "created_at"),
        created_at_unix: i64_field(hv, "created_at_unix"),
        titles: normalize_titles(hv.get("titles")),
        tags: normalize_tag_refs(hv.get("hentai_tags")),
        slug,
        ..Default::default()
    })
}

fn normalize_titles(titles: Option<&Value>) -> Vec<AltTitle> {
    let Some(items) = titles.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|t| {
            Some(AltTitle {
                lang: str_field(t, "lang"),
                kind: str_field(t, "kind"),
                title: str_field(t, "title")?,
            })
        })
        .collect()
}

/// Compact per-video tag references, order preserved, ids unique.
pub(crate) fn normalize_tag_refs(tags: Option<&Value>) -> Vec<Tag> {
    let Some(items) = tags.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter_map(|t| {
            let tag = Tag {
                id: u64_field(t, "id"),
                text: str_field(t, "text")?,
                count: u64_field(t, "count"),
                description: str_field(t, "description"),
                wide_image_url: str_field(t, "wide_image_url"),
                tall_image_url: str_field(t, "tall_image_url"),
            };
            if let Some(id) = tag.id {
                if !seen.insert(id) {
                    return None;
                }
            }
            Some(tag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::extract_state;
    use crate::types::config::ScraperConfig;

    fn hv_value(body: &str) -> Value {
        let html = format!("window.__NUXT__=(function(){{return {body}}}());");
        extract_state(&html).unwrap()
    }

    #[test]
    fn test_requires_slug() {
        let config = ScraperConfig::default();
        let cx = ParseContext::new(&config);

        let hv = hv_value(r#"{id:1,name:"No Slug"}"#);
        assert!(normalize_video(&hv, &cx).is_none());
    }

    #[test]
    fn test_counters_and_urls() {
        let config = ScraperConfig::default();
        let cx = ParseContext::new(&config);

        let hv = hv_value(
            r#"{id:7,slug:"ep-1",name:"Ep 1",views:1200,likes:30,duration_in_ms:1380000,
                is_censored:true,released_at:"2024-05-01",released_at_unix:1714521600,
                monthly_rank:3,cover_url:"https://cdn.example/c.webp"}"#,
        );
        let record = normalize_video(&hv, &cx).unwrap();

        assert_eq!(record.slug, "ep-1");
        assert_eq!(record.url, "https://hanime.tv/videos/hentai/ep-1");
        assert_eq!(record.views, Some(1200));
        assert_eq!(record.likes, Some(30));
        assert_eq!(record.dislikes, None); // absent is not zero
        assert_eq!(record.duration_ms, Some(1_380_000));
        assert_eq!(record.monthly_rank, Some(3));
        assert_eq!(record.is_censored, Some(true));
        assert_eq!(record.released_at_unix, Some(1_714_521_600));
    }

    #[test]
    fn test_tag_ids_unique_order_kept() {
        let tags = hv_value(r#"{hentai_tags:[{id:2,text:"b"},{id:1,text:"a"},{id:2,text:"dup"}]}"#);
        let tags = normalize_tag_refs(tags.get("hentai_tags"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].text, "b");
        assert_eq!(tags[1].text, "a");
    }
}

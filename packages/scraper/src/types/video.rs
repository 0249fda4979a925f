//! Canonical catalog records.
//!
//! One record shape is shared by every page kind; the fallback
//! extraction path simply leaves enrichment fields empty. Counters are
//! `Option<u64>` because absent is not the same as zero.

use serde::{Deserialize, Serialize};

use crate::types::stream::StreamVariant;

/// Canonical video entity.
///
/// `slug` is always present when the record is usable as a catalog
/// entry; everything else degrades to `None`/empty depending on which
/// extraction path produced the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Option<u64>,
    pub slug: String,
    pub name: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub player_url: Option<String>,

    // Stats
    pub views: Option<u64>,
    pub interests: Option<u64>,
    pub likes: Option<u64>,
    pub dislikes: Option<u64>,
    pub downloads: Option<u64>,
    pub monthly_rank: Option<u64>,

    // Media
    pub cover_url: Option<String>,
    pub poster_url: Option<String>,
    pub duration_ms: Option<u64>,

    // Classification
    pub is_censored: Option<bool>,
    pub brand: Option<String>,
    pub brand_id: Option<u64>,

    // Dates, both human and unix-epoch forms
    pub released_at: Option<String>,
    pub released_at_unix: Option<i64>,
    pub created_at: Option<String>,
    pub created_at_unix: Option<i64>,

    // Enrichment, primary extraction path only
    pub titles: Vec<AltTitle>,
    pub tags: Vec<Tag>,
    pub streams: Vec<StreamVariant>,
    pub storyboards: Vec<Storyboard>,
    pub franchise: Option<Franchise>,
    pub brand_detail: Option<Brand>,
    pub next_video: Option<Box<VideoRecord>>,
    pub next_random: Option<Box<VideoRecord>>,
}

/// Alternate/official title with language and kind codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AltTitle {
    pub lang: Option<String>,
    pub kind: Option<String>,
    pub title: String,
}

/// Tag attached to a video.
///
/// The primary path merges the compact per-video reference with the
/// page-level tag dictionary; the fallback path carries bare text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<u64>,
    pub text: String,
    pub count: Option<u64>,
    pub description: Option<String>,
    pub wide_image_url: Option<String>,
    pub tall_image_url: Option<String>,
}

impl Tag {
    /// A tag known only by its text, as the fallback path produces.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Sprite sheet for timeline scrubbing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storyboard {
    pub id: Option<u64>,
    pub url: Option<String>,
    pub frame_width: Option<u64>,
    pub frame_height: Option<u64>,
    pub num_total_frames: Option<u64>,
}

/// Series block with sibling episodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub videos: Vec<VideoRecord>,
}

/// Studio block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub upload_count: Option<u64>,
    pub website_url: Option<String>,
}

/// A named carousel of videos in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub videos: Vec<VideoRecord>,
}

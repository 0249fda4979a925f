//! Stream candidates and resolved quality variants.

use serde::{Deserialize, Serialize};

/// What a declared stream claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// Direct progressive file (mp4 and friends)
    Progressive,
    /// Adaptive master manifest that must be resolved into variants
    AdaptiveManifest,
}

impl StreamKind {
    /// Classify from the upstream's declared kind and extension.
    pub fn from_signals(kind: Option<&str>, extension: Option<&str>) -> Self {
        let is_hls = kind.is_some_and(|k| {
            let k = k.to_ascii_lowercase();
            k.contains("hls") || k.contains("m3u8")
        });
        let is_manifest_ext = extension.is_some_and(|e| e.eq_ignore_ascii_case("m3u8"));
        if is_hls || is_manifest_ext {
            Self::AdaptiveManifest
        } else {
            Self::Progressive
        }
    }
}

impl Default for StreamKind {
    fn default() -> Self {
        Self::Progressive
    }
}

/// A stream as declared on the page, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamCandidate {
    pub id: Option<u64>,
    pub server_name: Option<String>,
    pub server_slug: Option<String>,
    pub slug: Option<String>,
    pub url: String,
    pub kind: StreamKind,
    pub extension: Option<String>,
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_ms: Option<u64>,
    pub filesize_mbs: Option<f64>,
    pub is_guest_allowed: Option<bool>,
    pub is_member_allowed: Option<bool>,
    pub is_premium_allowed: Option<bool>,
    pub is_downloadable: Option<bool>,
}

impl StreamCandidate {
    pub fn is_adaptive(&self) -> bool {
        self.kind == StreamKind::AdaptiveManifest
    }
}

/// A playable entry, either passed through from a candidate or
/// resolved out of a master manifest.
///
/// `is_master=true` marks an adaptive source that could not be broken
/// into variants; `resolve_error=true` additionally marks that the
/// attempt faulted rather than merely yielding nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamVariant {
    pub id: Option<u64>,
    pub server_name: Option<String>,
    pub server_slug: Option<String>,
    pub slug: Option<String>,
    pub url: String,
    pub extension: Option<String>,
    pub mime_type: Option<String>,

    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resolution: Option<String>,
    pub bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub frame_rate: Option<f64>,
    pub filesize_mbs: Option<f64>,

    pub is_guest_allowed: Option<bool>,
    pub is_member_allowed: Option<bool>,
    pub is_premium_allowed: Option<bool>,
    pub is_downloadable: Option<bool>,

    pub is_master: bool,
    pub resolve_error: bool,
}

impl StreamVariant {
    fn inherit(candidate: &StreamCandidate) -> Self {
        Self {
            id: candidate.id,
            server_name: candidate.server_name.clone(),
            server_slug: candidate.server_slug.clone(),
            slug: candidate.slug.clone(),
            url: candidate.url.clone(),
            extension: candidate.extension.clone(),
            mime_type: candidate.mime_type.clone(),
            width: candidate.width,
            height: candidate.height,
            resolution: match (candidate.width, candidate.height) {
                (Some(w), Some(h)) => Some(format!("{w}x{h}")),
                _ => None,
            },
            filesize_mbs: candidate.filesize_mbs,
            is_guest_allowed: candidate.is_guest_allowed,
            is_member_allowed: candidate.is_member_allowed,
            is_premium_allowed: candidate.is_premium_allowed,
            is_downloadable: candidate.is_downloadable,
            ..Default::default()
        }
    }

    /// A non-manifest candidate passed through unchanged.
    pub fn passthrough(candidate: &StreamCandidate) -> Self {
        Self::inherit(candidate)
    }

    /// An adaptive candidate that stays unresolved.
    pub fn unresolved(candidate: &StreamCandidate, resolve_error: bool) -> Self {
        Self {
            is_master: true,
            resolve_error,
            ..Self::inherit(candidate)
        }
    }
}

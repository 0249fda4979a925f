//! Stream resolution: adaptive manifests into concrete quality
//! variants.
//!
//! Resolution never fails outward. Whatever goes wrong with a
//! candidate — blocked URL, fetch fault, timeout, unparseable
//! manifest — degrades to the original entry with `is_master` /
//! `resolve_error` flags, so one bad stream can never sink a video
//! request. All candidates of a request resolve concurrently under a
//! bounded fan-out.

mod hls;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::traits::fetcher::{Fetcher, UrlValidator};
use crate::types::stream::{StreamCandidate, StreamVariant};

/// Resolve every candidate concurrently and return the variants in
/// playback-preference order: descending bandwidth, ties broken by
/// descending height.
pub(crate) async fn resolve_all<F: Fetcher>(
    fetcher: &F,
    validator: &UrlValidator,
    candidates: Vec<StreamCandidate>,
    concurrency: usize,
) -> Vec<StreamVariant> {
    let resolved: Vec<Vec<StreamVariant>> = stream::iter(candidates)
        .map(|candidate| resolve_candidate(fetcher, validator, candidate))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut variants: Vec<StreamVariant> = resolved.into_iter().flatten().collect();
    variants.sort_by(|a, b| {
        b.bandwidth
            .unwrap_or(0)
            .cmp(&a.bandwidth.unwrap_or(0))
            .then_with(|| b.height.unwrap_or(0).cmp(&a.height.unwrap_or(0)))
    });
    variants
}

/// Resolve one candidate. Always returns at least one variant.
async fn resolve_candidate<F: Fetcher>(
    fetcher: &F,
    validator: &UrlValidator,
    candidate: StreamCandidate,
) -> Vec<StreamVariant> {
    if !candidate.is_adaptive() {
        return vec![StreamVariant::passthrough(&candidate)];
    }

    // Manifest URLs come from untrusted page content
    if let Err(e) = validator.validate(&candidate.url) {
        let err = FetchError::from(e);
        warn!(url = %candidate.url, error = %err, "manifest URL rejected");
        return vec![StreamVariant::unresolved(&candidate, true)];
    }

    let text = match fetcher.fetch_text(&candidate.url, &[]).await {
        Ok(text) => text,
        Err(e) => {
            warn!(url = %candidate.url, error = %e, "manifest fetch failed");
            return vec![StreamVariant::unresolved(&candidate, true)];
        }
    };

    if !hls::is_master_playlist(&text) {
        // A media playlist or a direct file: playable as-is
        return vec![StreamVariant::passthrough(&candidate)];
    }

    let parsed = hls::parse_master_playlist(&text, &candidate.url);
    if parsed.is_empty() {
        debug!(url = %candidate.url, "master playlist with no parseable variants");
        return vec![StreamVariant::unresolved(&candidate, false)];
    }

    parsed
        .into_iter()
        .map(|master| {
            let mut variant = StreamVariant::passthrough(&candidate);
            variant.url = master.uri;
            variant.bandwidth = master.bandwidth;
            variant.codecs = master.codecs;
            variant.frame_rate = master.frame_rate;
            if master.width.is_some() || master.height.is_some() {
                variant.width = master.width;
                variant.height = master.height;
            }
            if let Some(resolution) = master.resolution {
                variant.resolution = Some(resolution);
            }
            variant
        })
        .collect()
}

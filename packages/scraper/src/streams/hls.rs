//! HLS master-playlist parsing.
//!
//! Only the variant declarations matter here: `#EXT-X-STREAM-INF`
//! attribute lines followed by a URI line. Media playlists (segment
//! lists) have no such marker and are not masters.

use url::Url;

/// Marker that makes a playlist a master playlist.
pub(crate) const STREAM_INF: &str = "#EXT-X-STREAM-INF:";

/// One declared quality variant.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MasterVariant {
    pub uri: String,
    pub bandwidth: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resolution: Option<String>,
    pub codecs: Option<String>,
    pub frame_rate: Option<f64>,
}

pub(crate) fn is_master_playlist(text: &str) -> bool {
    text.contains(STREAM_INF)
}

/// Parse all declaration + URI pairs. Relative URIs resolve against
/// the manifest's own URL.
pub(crate) fn parse_master_playlist(text: &str, manifest_url: &str) -> Vec<MasterVariant> {
    let mut variants = Vec::new();
    let mut pending: Option<Vec<(String, String)>> = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(attrs) = line.strip_prefix(STREAM_INF) {
            pending = Some(parse_attribute_list(attrs));
        } else if line.is_empty() || line.starts_with('#') {
            continue;
        } else if let Some(attrs) = pending.take() {
            variants.push(build_variant(attrs, resolve_uri(line, manifest_url)));
        }
    }
    variants
}

fn build_variant(attrs: Vec<(String, String)>, uri: String) -> MasterVariant {
    let mut variant = MasterVariant {
        uri,
        bandwidth: None,
        width: None,
        height: None,
        resolution: None,
        codecs: None,
        frame_rate: None,
    };
    for (key, value) in attrs {
        match key.as_str() {
            "BANDWIDTH" => variant.bandwidth = value.parse().ok(),
            "RESOLUTION" => {
                if let Some((w, h)) = value.split_once(['x', 'X']) {
                    variant.width = w.trim().parse().ok();
                    variant.height = h.trim().parse().ok();
                }
                variant.resolution = Some(value);
            }
            "CODECS" => variant.codecs = Some(value),
            "FRAME-RATE" => variant.frame_rate = value.parse().ok(),
            _ => {}
        }
    }
    variant
}

/// Split a `KEY=value,KEY="quoted,value"` attribute list. Commas
/// inside quotes do not split; quotes are stripped from values.
fn parse_attribute_list(raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let bytes = raw.as_bytes();
    let mut start = 0;
    let mut in_quotes = false;

    let mut push = |segment: &str| {
        if let Some((key, value)) = segment.split_once('=') {
            attrs.push((
                key.trim().to_ascii_uppercase(),
                value.trim().trim_matches('"').to_string(),
            ));
        }
    };

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => {
                push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push(&raw[start..]);
    attrs
}

fn resolve_uri(uri: &str, manifest_url: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return uri.to_string();
    }
    match Url::parse(manifest_url).and_then(|base| base.join(uri)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2000000,RESOLUTION=1280x720,CODECS=\"avc1.64001f,mp4a.40.2\",FRAME-RATE=29.970\n\
        720/index.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\n\
        https://other.example.com/360/index.m3u8\n";

    #[test]
    fn test_detects_master_playlists() {
        assert!(is_master_playlist(MASTER));
        assert!(!is_master_playlist(
            "#EXTM3U\n#EXTINF:6.0,\nsegment0.ts\n"
        ));
    }

    #[test]
    fn test_parses_declaration_uri_pairs() {
        let variants =
            parse_master_playlist(MASTER, "https://m.example.com/videos/ep-1/master.m3u8");

        assert_eq!(variants.len(), 2);
        let hd = &variants[0];
        assert_eq!(hd.bandwidth, Some(2_000_000));
        assert_eq!((hd.width, hd.height), (Some(1280), Some(720)));
        assert_eq!(hd.resolution.as_deref(), Some("1280x720"));
        assert_eq!(hd.codecs.as_deref(), Some("avc1.64001f,mp4a.40.2"));
        assert_eq!(hd.frame_rate, Some(29.97));
        // Relative URI resolves against the manifest URL
        assert_eq!(hd.uri, "https://m.example.com/videos/ep-1/720/index.m3u8");

        let sd = &variants[1];
        assert_eq!((sd.width, sd.height), (Some(640), Some(360)));
        assert_eq!(sd.uri, "https://other.example.com/360/index.m3u8");
    }

    #[test]
    fn test_quoted_commas_do_not_split_attributes() {
        let attrs = parse_attribute_list("BANDWIDTH=100,CODECS=\"a,b\",FRAME-RATE=30");
        assert_eq!(
            attrs,
            vec![
                ("BANDWIDTH".to_string(), "100".to_string()),
                ("CODECS".to_string(), "a,b".to_string()),
                ("FRAME-RATE".to_string(), "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_marker_without_uri_yields_nothing() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=100\n#EXT-X-ENDLIST\n";
        assert!(parse_master_playlist(text, "https://m.example.com/m.m3u8").is_empty());
    }
}

//! Testing utilities: fixture builders for hydrated pages and stream
//! manifests.
//!
//! These produce synthetic but structurally faithful page text, so
//! tests can drive the full pipeline through a mock fetcher without
//! touching the network.

/// Wrap a templated object body into a complete hydrated page.
///
/// `params` is the comma-separated formal parameter list, `args` the
/// literal call-site arguments.
pub fn hydrated_page(params: &str, body: &str, args: &str) -> String {
    format!(
        "<!doctype html><html><head><title>fixture</title></head><body>\
         <div id=\"app\"></div>\
         <script>window.__NUXT__=(function({params}){{return {body}}}({args}));</script>\
         </body></html>"
    )
}

/// A landing page with two sections over three videos; video id 99 is
/// referenced but never declared.
pub fn landing_page() -> String {
    hydrated_page(
        "a,b,c",
        r#"{state:{data:{landing:{
            sections:[
                {title:"Trending",hentai_video_ids:[1,2,99]},
                {title:"New Releases",hentai_video_ids:[3,1]}
            ],
            hentai_videos:[
                {id:1,slug:"first-ep-1",name:a,views:1000,cover_url:b},
                {id:2,slug:"second-ep-1",name:"Second Ep 1",views:500,cover_url:c},
                {id:3,slug:"third-ep-1",name:"Third Ep 1",views:250,cover_url:c}
            ]
        }}}}"#,
        r#""First Ep 1","https://cdn.example.com/1.webp","https://cdn.example.com/x.webp""#,
    )
}

/// A video detail page declaring one adaptive and one progressive
/// stream on a single server.
pub fn video_page(slug: &str, manifest_url: &str, mp4_url: &str) -> String {
    hydrated_page(
        "a,b",
        &format!(
            r#"{{state:{{data:{{video:{{
                hentai_video:{{id:11,slug:"{slug}",name:a,views:7777,likes:90,
                    duration_in_ms:1500000,is_censored:false,
                    released_at:"2024-01-01",released_at_unix:1704067200,
                    titles:[{{lang:"ja",kind:"kanji",title:"フィクスチャ"}}],
                    hentai_tags:[{{id:5,text:b}}]}},
                hentai_tags:[{{id:5,text:b,count:321,description:"tag info"}}],
                hentai_video_storyboards:[{{id:31,url:"https://cdn.example.com/sb.png",
                    frame_width:160,frame_height:90,num_total_storyboard_frames:120}}],
                videos_manifest:{{servers:[{{name:"s1",slug:"s1",streams:[
                    {{id:201,slug:"hls",url:"{manifest_url}",kind:"hls",extension:"m3u8",height:1080,is_guest_allowed:true}},
                    {{id:202,slug:"mp4-480",url:"{mp4_url}",extension:"mp4",width:854,height:480}}
                ]}}]}}
            }}}}}}}}"#
        ),
        r#""Fixture Ep 1","vanilla""#,
    )
}

/// A random page listing the given slugs.
pub fn random_page(slugs: &[&str]) -> String {
    let videos = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| format!(r#"{{id:{},slug:"{slug}",name:"V{}",views:{}}}"#, i + 1, i + 1, i + 1))
        .collect::<Vec<_>>()
        .join(",");
    hydrated_page(
        "",
        &format!(r#"{{state:{{data:{{random:{{hentai_videos:[{videos}]}}}}}}}}"#),
        "",
    )
}

/// A master playlist from `(width, height, bandwidth)` triples, with
/// relative URIs.
pub fn master_playlist(variants: &[(u32, u32, u64)]) -> String {
    let mut out = String::from("#EXTM3U\n");
    for (width, height, bandwidth) in variants {
        out.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={bandwidth},RESOLUTION={width}x{height},CODECS=\"avc1.64001f,mp4a.40.2\"\n{height}/index.m3u8\n"
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::extract_state;

    #[test]
    fn test_fixtures_carry_extractable_state() {
        assert!(extract_state(&landing_page()).is_some());
        assert!(extract_state(&video_page(
            "ep",
            "https://m.example.com/master.m3u8",
            "https://m.example.com/480.mp4"
        ))
        .is_some());
        assert!(extract_state(&random_page(&["a-1", "b-2"])).is_some());
    }
}

//! Locating the caption track inside the player response embedded in a watch page.
//!
//! The watch page carries a `var ytInitialPlayerResponse = {...};` assignment inside one of
//! its `<script>` elements. Nothing guarantees how that script is formatted, so every
//! failure here is reported as "no caption track" instead of an error.

use scraper::{ElementRef, Html};
use serde::Deserialize;
use tracing::{debug, trace, warn};

/// Marker preceding the embedded player response object
pub const PLAYER_RESPONSE_MARKER: &str = "var ytInitialPlayerResponse = {";

/// One caption track advertised by the player response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub language_code: String,
    pub base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerResponse {
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// Find the base URL of the caption track to download from a watch page.
///
/// Returns `None` when the page has no player response script, the embedded JSON does not
/// parse, or the video has no caption tracks.
pub fn locate_caption_url(html: &str, preferred_language: Option<&str>) -> Option<String> {
    let script = find_player_script(html)?;
    let tracks = caption_tracks(&script)?;
    select_track(&tracks, preferred_language).map(|track| track.base_url.clone())
}

/// Text content of the first `<script>` containing the player response marker
pub fn find_player_script(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let scripts: Vec<String> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "script")
        .map(|element| element.text().collect::<String>())
        .collect();
    trace!("Watch page has {} script elements", scripts.len());

    let script = scripts
        .into_iter()
        .find(|text| text.contains(PLAYER_RESPONSE_MARKER));

    if script.is_none() {
        warn!("Failed to find player response script");
    }
    script
}

/// Parse the caption tracks out of the player response script
pub fn caption_tracks(script: &str) -> Option<Vec<CaptionTrack>> {
    let blob = extract_player_response(script)?;
    trace!("Extracted player response blob of {} bytes", blob.len());

    match serde_json::from_str::<PlayerResponse>(blob.trim()) {
        Ok(response) => {
            let tracks = response
                .captions
                .and_then(|captions| captions.player_captions_tracklist_renderer)
                .map(|renderer| renderer.caption_tracks)
                .unwrap_or_default();
            debug!("Player response lists {} caption tracks", tracks.len());
            Some(tracks)
        }
        Err(err) => {
            warn!("Failed to parse player response JSON: {}", err);
            None
        }
    }
}

/// Pick the first track whose language code contains `preferred_language`, else the first track
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    preferred_language: Option<&str>,
) -> Option<&'a CaptionTrack> {
    let first = tracks.first()?;

    let preferred = preferred_language
        .filter(|lang| !lang.is_empty())
        .and_then(|lang| tracks.iter().find(|track| track.language_code.contains(lang)));

    Some(preferred.unwrap_or(first))
}

/// Cut the JSON object following the player response marker out of a script body.
///
/// Braces are balanced while skipping string literals. A truncated object falls back to
/// cutting at the first `};` and closing the brace again.
pub fn extract_player_response(script: &str) -> Option<String> {
    let marker_at = script.find(PLAYER_RESPONSE_MARKER)?;
    let object = &script[marker_at + PLAYER_RESPONSE_MARKER.len() - 1..];

    if let Some(end) = balanced_object_end(object) {
        return Some(object[..end].to_string());
    }

    debug!("Player response object is unbalanced, cutting at first `}};`");
    object
        .find("};")
        .map(|end| format!("{}}}", &object[..end]))
}

/// Byte offset just past the `}` closing the object that `text` starts with
fn balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_page(tracks_json: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>video</title>
<script>window.ytcfg = {{"foo": 1}};</script>
</head><body>
<script nonce="abc">var ytInitialPlayerResponse = {{"videoDetails":{{"title":"demo"}},"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{}}}}}}};var meta = document.createElement('meta');</script>
</body></html>"#,
            tracks_json
        )
    }

    const TWO_TRACKS: &str =
        r#"[{"languageCode":"en","baseUrl":"u1"},{"languageCode":"pt-BR","baseUrl":"u2"}]"#;

    #[test]
    fn test_preferred_language_matches_by_substring() {
        assert_eq!(locate_caption_url(&watch_page(TWO_TRACKS), Some("pt")), Some("u2".to_string()));
    }

    #[test]
    fn test_unmatched_language_falls_back_to_first_track() {
        assert_eq!(locate_caption_url(&watch_page(TWO_TRACKS), Some("fr")), Some("u1".to_string()));
    }

    #[test]
    fn test_no_preference_takes_first_track() {
        assert_eq!(locate_caption_url(&watch_page(TWO_TRACKS), None), Some("u1".to_string()));
        assert_eq!(locate_caption_url(&watch_page(TWO_TRACKS), Some("")), Some("u1".to_string()));
    }

    #[test]
    fn test_page_without_player_script_is_absent() {
        let html = "<html><body><script>var somethingElse = {};</script></body></html>";
        assert_eq!(locate_caption_url(html, Some("en")), None);
    }

    #[test]
    fn test_empty_track_list_is_absent() {
        assert_eq!(locate_caption_url(&watch_page("[]"), Some("en")), None);
    }

    #[test]
    fn test_missing_captions_section_is_absent() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"}};</script>"#;
        assert_eq!(locate_caption_url(html, None), None);
    }

    #[test]
    fn test_malformed_json_is_absent() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions": nope};</script>"#;
        assert_eq!(locate_caption_url(html, None), None);
    }

    #[test]
    fn test_extraction_ignores_braces_inside_strings() {
        let script = r#"var ytInitialPlayerResponse = {"title":"a }; b {","n":{"x":"\"}"}};var x = 1;"#;
        assert_eq!(
            extract_player_response(script).as_deref(),
            Some(r#"{"title":"a }; b {","n":{"x":"\"}"}}"#)
        );
    }

    #[test]
    fn test_unbalanced_object_falls_back_to_first_terminator() {
        let script = r#"var ytInitialPlayerResponse = {"a":{"b":1};"#;
        assert_eq!(extract_player_response(script).as_deref(), Some(r#"{"a":{"b":1}"#));
    }

    #[test]
    fn test_select_track_on_empty_list() {
        assert_eq!(select_track(&[], Some("en")), None);
    }
}

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub mod player_response;
pub mod youtube;

pub use player_response::{locate_caption_url, CaptionTrack};
pub use youtube::YoutubeExtractor;

use crate::TranscriptError;

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#)
        .expect("video URL pattern is valid")
});

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a video URL or a bare identifier to a [`VideoId`].
///
/// Input of exactly 11 characters is taken verbatim. Anything else must match one of the
/// watch, `/v/`, `/embed/`, `/e/`, `youtu.be/` or nested path URL shapes.
pub fn resolve_video_id(input: &str) -> Result<VideoId, TranscriptError> {
    if input.chars().count() == VIDEO_ID_LEN {
        return Ok(VideoId(input.to_string()));
    }

    YOUTUBE_URL
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|id| VideoId(id.as_str().to_string()))
        .ok_or_else(|| TranscriptError::InvalidVideoReference(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_characters_are_taken_verbatim() {
        for input in ["dQw4w9WgXcQ", "abc def ghi", "???????????"] {
            assert_eq!(resolve_video_id(input).unwrap().as_str(), input);
        }
    }

    #[test]
    fn test_supported_url_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ?version=3",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/e/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/user/someone/dQw4w9WgXcQ",
            "HTTPS://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ",
        ];

        for url in cases {
            assert_eq!(resolve_video_id(url).unwrap().as_str(), "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn test_identifier_stops_at_delimiters() {
        let id = resolve_video_id("https://www.youtube.com/watch?v=3TiDAWmkhts&t=10s").unwrap();
        assert_eq!(id.as_str(), "3TiDAWmkhts");
    }

    #[test]
    fn test_unrecognized_input_fails() {
        for input in ["", "short", "https://vimeo.com/123456789", "https://youtu.be/tooshort"] {
            let err = resolve_video_id(input).unwrap_err();
            assert!(matches!(err, TranscriptError::InvalidVideoReference(ref s) if s == input));
        }
    }

    #[test]
    fn test_display_matches_inner_value() {
        let id = resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
    }
}

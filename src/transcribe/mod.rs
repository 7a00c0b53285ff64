use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ScraperConfig;
use crate::extractors::{resolve_video_id, VideoId, YoutubeExtractor};
use crate::fetch::{HttpTransport, Transport};
use crate::TranscriptError;

pub mod processor;

pub use processor::decode_timed_text;

/// One caption span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Caption text
    pub text: String,

    /// Start offset in milliseconds
    pub offset: u64,

    /// Duration in milliseconds
    pub duration: u64,
}

impl TranscriptEntry {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.duration)
    }
}

/// Transcript of one video, entries in caption order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub video_id: VideoId,
    pub entries: Vec<TranscriptEntry>,
}

/// Resolves a video reference, locates its caption track and decodes it
pub struct TranscriptPipeline {
    extractor: YoutubeExtractor,
    preferred_language: Option<String>,
}

impl TranscriptPipeline {
    /// Create a pipeline backed by a real HTTP client
    pub fn new(config: &ScraperConfig) -> Result<Self, TranscriptError> {
        let transport = HttpTransport::new(config.request_timeout())
            .map_err(|err| TranscriptError::Unknown(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &ScraperConfig) -> Self {
        Self {
            extractor: YoutubeExtractor::new(transport, config),
            preferred_language: config.preferred_language.clone(),
        }
    }

    /// Fetch the transcript for a URL or identifier in the configured language
    pub async fn fetch_transcript(&self, input: &str) -> Result<TranscriptResult, TranscriptError> {
        self.fetch_transcript_in(input, self.preferred_language.as_deref())
            .await
    }

    /// Fetch the transcript, preferring tracks whose language code contains `language`
    pub async fn fetch_transcript_in(
        &self,
        input: &str,
        language: Option<&str>,
    ) -> Result<TranscriptResult, TranscriptError> {
        let video_id = resolve_video_id(input)?;
        tracing::info!("Fetching transcript for video: {}", video_id);

        let caption_url = self
            .extractor
            .caption_url(&video_id, language)
            .await?
            .ok_or_else(|| TranscriptError::CaptionEndpointNotFound(video_id.to_string()))?;

        let entries = self.fetch_and_decode(&caption_url).await?;
        tracing::info!("Fetched {} transcript entries for video: {}", entries.len(), video_id);

        Ok(TranscriptResult { video_id, entries })
    }

    /// Download a caption track and decode its timed text
    pub async fn fetch_and_decode(&self, caption_url: &str) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        let xml = self.extractor.fetch_caption_xml(caption_url).await?;
        Ok(decode_timed_text(&xml))
    }
}

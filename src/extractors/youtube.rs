use std::sync::Arc;

use super::{locate_caption_url, VideoId};
use crate::config::ScraperConfig;
use crate::fetch::{fetch_with_retry, FetchError, FetchRequest, RetryPolicy, Transport};
use crate::utils::accept_language_header;

/// Cookie accepting the regional consent interstitial
pub const CONSENT_COOKIE: &str = "CONSENT=YES+; PATH=/; DOMAIN=.youtube.com";

/// Scrapes YouTube watch pages and caption tracks
pub struct YoutubeExtractor {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    user_agent: String,
    watch_base_url: String,
}

impl YoutubeExtractor {
    pub fn new(transport: Arc<dyn Transport>, config: &ScraperConfig) -> Self {
        Self {
            transport,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_delay(),
            },
            user_agent: config.user_agent.clone(),
            watch_base_url: config.watch_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn watch_url(&self, video_id: &VideoId) -> String {
        format!(
            "{}/watch?v={}",
            self.watch_base_url,
            urlencoding::encode(video_id.as_str())
        )
    }

    /// Request for the watch page, with consent and language headers
    pub fn watch_page_request(&self, video_id: &VideoId, preferred_language: Option<&str>) -> FetchRequest {
        FetchRequest::new(self.watch_url(video_id))
            .header("User-Agent", self.user_agent.as_str())
            .header("Cookie", CONSENT_COOKIE)
            .header("Accept-Language", accept_language_header(preferred_language))
    }

    /// Fetch the watch page HTML
    pub async fn fetch_watch_page(
        &self,
        video_id: &VideoId,
        preferred_language: Option<&str>,
    ) -> Result<String, FetchError> {
        tracing::debug!("Fetching watch page for video: {}", video_id);

        let request = self.watch_page_request(video_id, preferred_language);
        fetch_with_retry(self.transport.as_ref(), &request, &self.retry).await
    }

    /// Find the caption track URL for a video.
    ///
    /// `Ok(None)` means the page was fetched but no usable caption track was found in it.
    pub async fn caption_url(
        &self,
        video_id: &VideoId,
        preferred_language: Option<&str>,
    ) -> Result<Option<String>, FetchError> {
        let html = self.fetch_watch_page(video_id, preferred_language).await?;
        let caption_url = locate_caption_url(&html, preferred_language);

        tracing::debug!("Caption URL for {}: {:?}", video_id, caption_url);
        Ok(caption_url)
    }

    /// Fetch the timed-text XML of a caption track
    pub async fn fetch_caption_xml(&self, caption_url: &str) -> Result<String, FetchError> {
        let request = FetchRequest::new(caption_url).header("User-Agent", self.user_agent.as_str());
        fetch_with_retry(self.transport.as_ref(), &request, &self.retry).await
    }
}

//! Transcript Scraper - extract timed captions from YouTube videos
//!
//! This library resolves a video reference, scrapes the player response embedded in the
//! watch page to find a caption track, and decodes the track's timed-text XML into
//! entries with millisecond offsets.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod fetch;
pub mod output;
pub mod server;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{resolve_video_id, VideoId};
pub use fetch::{FetchError, Transport};
pub use transcribe::{TranscriptEntry, TranscriptPipeline, TranscriptResult};

/// Result type used at the application edges (config, output, CLI)
pub type Result<T> = anyhow::Result<T>;

/// Error type returned by the transcript pipeline
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Impossible to retrieve YouTube video ID from: {0}")]
    InvalidVideoReference(String),

    #[error("Failed to locate a transcript for video {0}")]
    CaptionEndpointNotFound(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(#[from] FetchError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript-scraper",
    about = "Transcript Scraper - Extract timed captions from YouTube videos",
    version,
    long_about = "Fetches the caption track of a YouTube video by scraping its watch page and prints the timed captions. Can also serve the same extraction over HTTP."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./config.yaml or the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript of a video
    Transcribe {
        /// Video URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Preferred caption language, matched against track language codes
        #[arg(short, long, value_name = "LANG", env = "TRANSCRIPT_LANGUAGE")]
        language: Option<String>,

        /// Include timestamps in text output (srt/vtt formats always include timestamps)
        #[arg(long)]
        timestamps: bool,
    },

    /// Serve the transcript route over HTTP
    Serve {
        /// Listen address (overrides server.bind_address)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON with millisecond offsets
    Json,
    /// SRT subtitle format
    Srt,
    /// WebVTT format
    Vtt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Vtt => write!(f, "vtt"),
        }
    }
}

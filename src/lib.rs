//! YouTube transcript MCP server
//!
//! Exposes a single `get_transcript` tool over the Model Context Protocol. A video
//! URL is resolved to a video reference, captions are acquired through yt-dlp or
//! the in-process transcript API (with fallback between the two), and the timed
//! caption track is normalized into deduplicated plain text.

pub mod captions;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod server;
pub mod service;
pub mod utils;

pub use captions::{LanguageTag, Transcript};
pub use cli::{Cli, Commands};
pub use config::{AcquisitionMethod, Config};
pub use extractors::{CaptionExtractor, CaptionTrack, ExtractorKind};
pub use pipeline::{AcquisitionFailure, AcquisitionResult, TranscriptPipeline};
pub use resolver::VideoReference;
pub use service::{TranscriptResponse, TranscriptService};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Title reported when the video title could not be looked up
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Error types specific to transcript acquisition
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("The provided URL does not appear to be a YouTube link. Please provide a youtube.com or youtu.be URL.")]
    UnsupportedUrl(String),

    #[error("{0}")]
    ToolUnavailable(String),

    #[error("No {lang} subtitles found for this video. The video may not have subtitles available.")]
    NoCaptions { lang: String },

    #[error("Subtitles were empty after processing.")]
    EmptyTranscript,

    #[error("Could not extract a video ID from: {0}")]
    MissingVideoId(String),
}

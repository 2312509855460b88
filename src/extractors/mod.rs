use async_trait::async_trait;
use std::fmt;

pub mod transcript_api;
pub mod yt_dlp;

pub use transcript_api::TranscriptApiExtractor;
pub use yt_dlp::YtDlpExtractor;

use crate::captions::{LanguageTag, Transcript};
use crate::resolver::VideoReference;
use crate::Result;

/// Title and normalized captions for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Video title, or [`crate::UNKNOWN_TITLE`] when the lookup failed
    pub title: String,

    /// Normalized transcript text
    pub transcript: Transcript,
}

/// Available acquisition strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    YtDlp,
    TranscriptApi,
}

impl ExtractorKind {
    /// Method tag reported when this strategy produced the transcript
    pub fn method_name(&self) -> &'static str {
        match self {
            ExtractorKind::YtDlp => "yt-dlp",
            ExtractorKind::TranscriptApi => "youtube-transcript-api",
        }
    }

    /// Method tag reported when this strategy produced the transcript after another failed
    pub fn fallback_method_name(&self) -> &'static str {
        match self {
            ExtractorKind::YtDlp => "yt-dlp (fallback)",
            ExtractorKind::TranscriptApi => "youtube-transcript-api (fallback)",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Trait for acquiring captions of a video
///
/// The title lookup is best effort; failing to obtain a caption track is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionExtractor: Send + Sync {
    /// Fetch the title and normalized captions for a video
    async fn fetch(&self, video: &VideoReference, lang: &LanguageTag) -> Result<CaptionTrack>;

    /// Which strategy this is
    fn kind(&self) -> ExtractorKind;
}

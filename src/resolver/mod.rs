use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::TranscriptError;

static YOUTUBE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)youtube\.com|youtu\.be").expect("valid host pattern"));

static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid id pattern"));

/// Ordered by priority; the first capture wins.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]{11})",
        r"(?i)youtu\.be/([A-Za-z0-9_-]{11})",
        r"(?i)youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"(?i)youtube\.com/(?:shorts|live)/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid id pattern"))
    .collect()
});

/// A video on YouTube, resolved from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    /// URL handed to the downloader
    pub url: String,

    /// Canonical 11-character video id, when one could be extracted
    pub video_id: Option<String>,
}

impl VideoReference {
    /// Video id or a [`TranscriptError::MissingVideoId`] naming the input URL
    pub fn require_id(&self) -> Result<&str, TranscriptError> {
        self.video_id
            .as_deref()
            .ok_or_else(|| TranscriptError::MissingVideoId(self.url.clone()))
    }
}

/// Check whether the input names a YouTube host
pub fn is_youtube_url(input: &str) -> bool {
    YOUTUBE_HOST.is_match(input)
}

/// Extract the video id from a watch, short-link, embed or shorts URL, or a bare id
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    // Query parameters may appear in any order, so give the URL parser the first shot
    if let Ok(parsed) = Url::parse(input) {
        let on_youtube = parsed
            .host_str()
            .map(|host| host.to_lowercase().ends_with("youtube.com"))
            .unwrap_or(false);
        if on_youtube && parsed.path() == "/watch" {
            if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "v") {
                if BARE_ID.is_match(&id) {
                    return Some(id.into_owned());
                }
            }
        }
    }

    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .or_else(|| BARE_ID.is_match(input).then(|| input.to_string()))
}

/// Resolve user input into a [`VideoReference`]
///
/// YouTube URLs are accepted even when no id can be extracted, since yt-dlp is able
/// to work from the URL alone. Bare ids are expanded into a canonical watch URL.
/// Anything else is rejected with [`TranscriptError::UnsupportedUrl`].
pub fn resolve(input: &str) -> Result<VideoReference, TranscriptError> {
    let trimmed = input.trim();

    if is_youtube_url(trimmed) {
        return Ok(VideoReference {
            url: trimmed.to_string(),
            video_id: extract_video_id(trimmed),
        });
    }

    if BARE_ID.is_match(trimmed) {
        return Ok(VideoReference {
            url: format!("https://www.youtube.com/watch?v={}", trimmed),
            video_id: Some(trimmed.to_string()),
        });
    }

    Err(TranscriptError::UnsupportedUrl(input.to_string()))
}

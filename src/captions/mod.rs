use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub mod language;

pub use language::{select_track, LanguageTag};

use crate::TranscriptError;

/// Header, metadata, comment and cue timing lines of a WebVTT document
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        r"^WEBVTT",
        r"^Kind:",
        r"^Language:",
        r"^NOTE",
        r"^\d{2}:\d{2}:\d{2}\.\d{3}\s*-->",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid caption pattern"))
    .collect()
});

/// Inline markup such as `<c>`, `</c>` and `<00:00:01.250>`
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid caption pattern"));

/// Normalized plain-text transcript
///
/// Never empty, and no two adjacent lines are identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_noise(line: &str) -> bool {
    line.trim().is_empty() || NOISE_PATTERNS.iter().any(|pattern| pattern.is_match(line))
}

/// Convert a WebVTT caption document into plain text
///
/// Header, metadata, note, timing and blank lines are dropped, inline tags are
/// stripped, and runs of identical consecutive lines (the rolling-caption artifact
/// of auto-generated tracks) collapse to a single line. Repeats that are not
/// adjacent are kept.
pub fn normalize_vtt(raw: &str) -> Result<Transcript, TranscriptError> {
    let mut lines: Vec<String> = Vec::new();

    for line in raw.lines().filter(|line| !is_noise(line)) {
        let text = INLINE_TAG.replace_all(line, "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if lines.last().map(String::as_str) != Some(text) {
            lines.push(text.to_string());
        }
    }

    if lines.is_empty() {
        return Err(TranscriptError::EmptyTranscript);
    }

    Ok(Transcript(lines.join("\n")))
}

/// Join per-segment caption text with single spaces, dropping blank segments
pub fn join_segments<I, S>(segments: I) -> Result<Transcript, TranscriptError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<String> = segments
        .into_iter()
        .map(|segment| segment.as_ref().trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect();

    if parts.is_empty() {
        return Err(TranscriptError::EmptyTranscript);
    }

    Ok(Transcript(parts.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTO_SUBS: &str = "WEBVTT
Kind: captions
Language: en

00:00:00.000 --> 00:00:02.000 align:start position:0%
Hello<00:00:00.500><c> world</c>

00:00:02.000 --> 00:00:04.000 align:start position:0%
Hello world

00:00:04.000 --> 00:00:06.000
Goodbye
";

    #[test]
    fn test_normalize_collapses_rolling_duplicates() {
        let transcript = normalize_vtt(AUTO_SUBS).unwrap();
        assert_eq!(transcript.as_str(), "Hello world\nGoodbye");
    }

    #[test]
    fn test_normalize_keeps_non_adjacent_repeats() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nChorus\n\n00:00:01.000 --> 00:00:02.000\nVerse\n\n00:00:02.000 --> 00:00:03.000\nChorus\n";
        let transcript = normalize_vtt(vtt).unwrap();
        assert_eq!(transcript.lines().collect::<Vec<_>>(), vec!["Chorus", "Verse", "Chorus"]);
    }

    #[test]
    fn test_normalize_strips_inline_tags() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\n<v Speaker>Some <b>bold</b> text</v>\n<c.colorE5E5E5>tinted</c>\n";
        let transcript = normalize_vtt(vtt).unwrap();
        for line in transcript.lines() {
            assert!(!line.contains('<') && !line.contains('>'), "tag left in {:?}", line);
        }
        assert_eq!(transcript.as_str(), "Some bold text\ntinted");
    }

    #[test]
    fn test_normalize_drops_notes_and_tag_only_lines() {
        let vtt = "WEBVTT\n\nNOTE generated by a machine\n\n00:00:00.000 --> 00:00:01.000\n<c></c>\n   \nActual words\n";
        assert_eq!(normalize_vtt(vtt).unwrap().as_str(), "Actual words");
    }

    #[test]
    fn test_normalize_header_only_document_is_empty() {
        let vtt = "WEBVTT\n00:00:00.000 --> 00:00:01.000\n\n";
        assert!(matches!(normalize_vtt(vtt), Err(TranscriptError::EmptyTranscript)));
        assert!(matches!(normalize_vtt(""), Err(TranscriptError::EmptyTranscript)));
    }

    #[test]
    fn test_normalize_handles_crlf() {
        let vtt = "WEBVTT\r\n\r\n00:00:00.000 --> 00:00:01.000\r\nLine one\r\nLine one\r\nLine two\r\n";
        assert_eq!(normalize_vtt(vtt).unwrap().as_str(), "Line one\nLine two");
    }

    #[test]
    fn test_join_segments() {
        let transcript = join_segments(["Part one", " ", "Part two"]).unwrap();
        assert_eq!(transcript.as_str(), "Part one Part two");
    }

    #[test]
    fn test_join_segments_all_blank() {
        assert!(matches!(join_segments(["", "  "]), Err(TranscriptError::EmptyTranscript)));
        assert!(matches!(join_segments(Vec::<String>::new()), Err(TranscriptError::EmptyTranscript)));
    }
}

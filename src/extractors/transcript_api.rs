use anyhow::Context;
use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use super::{CaptionExtractor, CaptionTrack, ExtractorKind};
use crate::captions::{self, select_track, LanguageTag, Transcript};
use crate::resolver::VideoReference;
use crate::{Result, TranscriptError, UNKNOWN_TITLE};

/// Caption extractor talking to YouTube's transcript endpoints in-process
///
/// A fresh client is built for every request; nothing is shared between calls.
#[derive(Debug, Default)]
pub struct TranscriptApiExtractor;

impl TranscriptApiExtractor {
    pub fn new() -> Self {
        Self
    }

    async fn get_title(&self, api: &YouTubeTranscriptApi, video_id: &str) -> String {
        match api.fetch_video_details(video_id).await {
            Ok(details) if !details.title.trim().is_empty() => details.title.trim().to_string(),
            Ok(_) => UNKNOWN_TITLE.to_string(),
            Err(e) => {
                tracing::debug!(video_id = %video_id, error = %e, "Video details lookup failed");
                UNKNOWN_TITLE.to_string()
            }
        }
    }
}

/// Join fetched snippet texts into a transcript
///
/// No snippets at all means the track has no captions; snippets that are all blank
/// are an empty transcript.
fn transcript_from_snippets<'a, I>(texts: I, lang: &LanguageTag) -> Result<Transcript>
where
    I: ExactSizeIterator<Item = &'a str>,
{
    if texts.len() == 0 {
        return Err(TranscriptError::NoCaptions {
            lang: lang.to_string(),
        }
        .into());
    }

    Ok(captions::join_segments(texts)?)
}

#[async_trait]
impl CaptionExtractor for TranscriptApiExtractor {
    async fn fetch(&self, video: &VideoReference, lang: &LanguageTag) -> Result<CaptionTrack> {
        let video_id = video.require_id()?;
        let no_captions = || TranscriptError::NoCaptions {
            lang: lang.to_string(),
        };

        let api = YouTubeTranscriptApi::new(None, None, None)
            .context("Failed to create transcript API client")?;

        let title = self.get_title(&api, video_id).await;

        let listing = api
            .list_transcripts(video_id)
            .await
            .map_err(|e| anyhow::Error::new(no_captions()).context(e.to_string()))?;
        let codes: Vec<String> = listing
            .transcripts()
            .map(|transcript| transcript.language_code().to_string())
            .collect();
        tracing::debug!(video_id = %video_id, available = ?codes, "Listed caption tracks");

        let code = select_track(lang, codes.iter().map(String::as_str)).ok_or_else(no_captions)?;

        let fetched = api
            .fetch_transcript(video_id, &[code], false)
            .await
            .map_err(|e| anyhow::Error::new(no_captions()).context(e.to_string()))?;

        let transcript = transcript_from_snippets(
            fetched.snippets.iter().map(|snippet| snippet.text.as_str()),
            lang,
        )?;

        Ok(CaptionTrack { title, transcript })
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::TranscriptApi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requires_video_id() {
        let video = VideoReference {
            url: "https://www.youtube.com/@somechannel".to_string(),
            video_id: None,
        };
        let err = TranscriptApiExtractor::new()
            .fetch(&video, &LanguageTag::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptError>(),
            Some(TranscriptError::MissingVideoId(_))
        ));
    }

    #[test]
    fn test_no_snippets_is_no_captions() {
        let err = transcript_from_snippets(std::iter::empty(), &LanguageTag::new("de")).unwrap_err();
        match err.downcast_ref::<TranscriptError>() {
            Some(TranscriptError::NoCaptions { lang }) => assert_eq!(lang, "de"),
            other => panic!("expected NoCaptions, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_snippets_are_empty_transcript() {
        let err = transcript_from_snippets(["", " "].into_iter(), &LanguageTag::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TranscriptError>(),
            Some(TranscriptError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_snippets_joined_with_spaces() {
        let transcript =
            transcript_from_snippets(["Part one", " ", "Part two"].into_iter(), &LanguageTag::default())
                .unwrap();
        assert_eq!(transcript.as_str(), "Part one Part two");
    }

    #[test]
    fn test_kind() {
        assert_eq!(TranscriptApiExtractor::new().kind(), ExtractorKind::TranscriptApi);
        assert_eq!(ExtractorKind::TranscriptApi.method_name(), "youtube-transcript-api");
        assert_ne!(
            ExtractorKind::TranscriptApi.method_name(),
            ExtractorKind::TranscriptApi.fallback_method_name()
        );
    }
}

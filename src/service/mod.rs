use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;
use uuid::Uuid;

use crate::captions::LanguageTag;
use crate::config::Config;
use crate::pipeline::TranscriptPipeline;
use crate::resolver;

/// Outcome of one `get_transcript` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptResponse {
    Success {
        title: String,
        transcript: String,
        method: String,
    },
    Error(ErrorReport),
}

/// Why a request produced no transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not a recognized YouTube URL; nothing was attempted
    InvalidUrl,
    /// Required tools are missing from this machine
    Environment,
    /// Strategies ran but none produced a transcript
    Acquisition,
    /// Unexpected failure inside the service
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl TranscriptResponse {
    fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        TranscriptResponse::Error(ErrorReport {
            kind,
            message: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TranscriptResponse::Error(_))
    }
}

/// Entry point used by the protocol adapter and the CLI
///
/// Every outcome, including panics inside acquisition, is turned into a
/// [`TranscriptResponse`]; nothing escapes this boundary.
pub struct TranscriptService {
    pipeline: TranscriptPipeline,
    default_language: String,
}

impl TranscriptService {
    pub fn new(config: &Config) -> Self {
        Self::with_pipeline(
            TranscriptPipeline::new(&config.acquisition),
            config.acquisition.default_language.clone(),
        )
    }

    pub fn with_pipeline(pipeline: TranscriptPipeline, default_language: impl Into<String>) -> Self {
        Self {
            pipeline,
            default_language: default_language.into(),
        }
    }

    /// Fetch and normalize the transcript of a video
    pub async fn get_transcript(&self, url: &str, lang: Option<&str>) -> TranscriptResponse {
        let lang = LanguageTag::new(lang.unwrap_or(&self.default_language));
        let span = tracing::info_span!(
            "get_transcript",
            request_id = %Uuid::new_v4(),
            url = %url,
            lang = %lang
        );

        self.run(url, lang).instrument(span).await
    }

    async fn run(&self, url: &str, lang: LanguageTag) -> TranscriptResponse {
        let video = match resolver::resolve(url) {
            Ok(video) => video,
            Err(e) => {
                tracing::info!("Rejected input: {}", e);
                return TranscriptResponse::error(ErrorKind::InvalidUrl, e.to_string());
            }
        };

        let outcome = AssertUnwindSafe(self.pipeline.acquire(&video, &lang))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => TranscriptResponse::Success {
                title: result.title,
                transcript: result.transcript.into_string(),
                method: result.method,
            },
            Ok(Err(failure)) => {
                let kind = if failure.is_environment_error() {
                    ErrorKind::Environment
                } else {
                    ErrorKind::Acquisition
                };
                TranscriptResponse::error(kind, failure.to_string())
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("Transcript acquisition panicked: {}", message);
                TranscriptResponse::error(ErrorKind::Internal, format!("Internal error: {}", message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AcquisitionMethod;
    use crate::extractors::{CaptionTrack, ExtractorKind, MockCaptionExtractor};
    use crate::{captions, TranscriptError};
    use std::sync::Arc;

    const DEMO_VTT: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:00.000 --> 00:00:01.000\nHello world\n\n00:00:01.000 --> 00:00:02.000\nHello world\n\n00:00:02.000 --> 00:00:03.000\nGoodbye\n";

    fn service(first: MockCaptionExtractor, second: MockCaptionExtractor) -> TranscriptService {
        let pipeline = TranscriptPipeline::with_extractors(
            vec![Arc::new(first), Arc::new(second)],
            AcquisitionMethod::Auto,
        );
        TranscriptService::with_pipeline(pipeline, "en")
    }

    fn mock(kind: ExtractorKind) -> MockCaptionExtractor {
        let mut mock = MockCaptionExtractor::new();
        mock.expect_kind().return_const(kind);
        mock
    }

    #[tokio::test]
    async fn test_primary_success() {
        let mut yt_dlp = mock(ExtractorKind::YtDlp);
        yt_dlp.expect_fetch().times(1).returning(|video, lang| {
            assert_eq!(video.video_id.as_deref(), Some("abc12345678"));
            assert_eq!(lang.as_str(), "en");
            Ok(CaptionTrack {
                title: "Demo".to_string(),
                transcript: captions::normalize_vtt(DEMO_VTT).unwrap(),
            })
        });
        let mut api = mock(ExtractorKind::TranscriptApi);
        api.expect_fetch().never();

        let response = service(yt_dlp, api)
            .get_transcript("https://www.youtube.com/watch?v=abc12345678", Some("en"))
            .await;

        assert_eq!(
            response,
            TranscriptResponse::Success {
                title: "Demo".to_string(),
                transcript: "Hello world\nGoodbye".to_string(),
                method: "yt-dlp".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_url_skips_acquisition() {
        let mut yt_dlp = mock(ExtractorKind::YtDlp);
        yt_dlp.expect_fetch().never();
        let mut api = mock(ExtractorKind::TranscriptApi);
        api.expect_fetch().never();

        let response = service(yt_dlp, api).get_transcript("not a url", None).await;

        match response {
            TranscriptResponse::Error(report) => {
                assert_eq!(report.kind, ErrorKind::InvalidUrl);
                assert!(report.message.contains("does not appear to be a YouTube link"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fallback_success() {
        let mut yt_dlp = mock(ExtractorKind::YtDlp);
        yt_dlp.expect_fetch().times(1).returning(|_, _| {
            Err(TranscriptError::ToolUnavailable("tool not found".to_string()).into())
        });
        let mut api = mock(ExtractorKind::TranscriptApi);
        api.expect_fetch().times(1).returning(|_, _| {
            Ok(CaptionTrack {
                title: "Unknown".to_string(),
                transcript: captions::join_segments(["Part one", " ", "Part two"]).unwrap(),
            })
        });

        let response = service(yt_dlp, api)
            .get_transcript("https://youtu.be/abc12345678", None)
            .await;

        match response {
            TranscriptResponse::Success { transcript, method, title } => {
                assert_eq!(title, "Unknown");
                assert_eq!(transcript, "Part one Part two");
                assert_eq!(method, ExtractorKind::TranscriptApi.fallback_method_name());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_both_fail_reports_each_reason() {
        let mut yt_dlp = mock(ExtractorKind::YtDlp);
        yt_dlp.expect_fetch().times(1).returning(|_, _| {
            Err(TranscriptError::ToolUnavailable("tool not found".to_string()).into())
        });
        let mut api = mock(ExtractorKind::TranscriptApi);
        api.expect_fetch().times(1).returning(|_, lang| {
            Err(TranscriptError::NoCaptions { lang: lang.to_string() }.into())
        });

        let response = service(yt_dlp, api)
            .get_transcript("https://www.youtube.com/watch?v=abc12345678", Some("de"))
            .await;

        match response {
            TranscriptResponse::Error(report) => {
                assert_eq!(report.kind, ErrorKind::Acquisition);
                assert!(report.message.contains("yt-dlp: tool not found"));
                assert!(report.message.contains("youtube-transcript-api: No de subtitles found"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    struct PanickingExtractor;

    #[async_trait::async_trait]
    impl crate::extractors::CaptionExtractor for PanickingExtractor {
        async fn fetch(&self, _video: &crate::VideoReference, _lang: &LanguageTag) -> crate::Result<CaptionTrack> {
            panic!("caption parser exploded")
        }

        fn kind(&self) -> ExtractorKind {
            ExtractorKind::YtDlp
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let pipeline = TranscriptPipeline::with_extractors(
            vec![Arc::new(PanickingExtractor)],
            AcquisitionMethod::Auto,
        );
        let response = TranscriptService::with_pipeline(pipeline, "en")
            .get_transcript("https://youtu.be/abc12345678", None)
            .await;

        match response {
            TranscriptResponse::Error(report) => {
                assert_eq!(report.kind, ErrorKind::Internal);
                assert!(report.message.contains("caption parser exploded"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_language_uses_default() {
        let mut yt_dlp = mock(ExtractorKind::YtDlp);
        yt_dlp.expect_fetch().times(1).returning(|_, lang| {
            assert_eq!(lang.as_str(), "en");
            Ok(CaptionTrack {
                title: "Demo".to_string(),
                transcript: captions::join_segments(["Hi"]).unwrap(),
            })
        });
        let mut api = mock(ExtractorKind::TranscriptApi);
        api.expect_fetch().never();

        let response = tokio_test::block_on(
            service(yt_dlp, api).get_transcript("https://youtu.be/abc12345678", Some("  ")),
        );
        assert!(!response.is_error());
    }
}

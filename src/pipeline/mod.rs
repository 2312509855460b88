use std::fmt;
use std::sync::Arc;

use crate::captions::{LanguageTag, Transcript};
use crate::config::{AcquisitionConfig, AcquisitionMethod};
use crate::extractors::{CaptionExtractor, ExtractorKind, TranscriptApiExtractor, YtDlpExtractor};
use crate::resolver::VideoReference;
use crate::TranscriptError;

/// Transcript produced by exactly one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionResult {
    /// Video title, or [`crate::UNKNOWN_TITLE`]
    pub title: String,

    /// Normalized transcript text
    pub transcript: Transcript,

    /// Method tag of the strategy that produced it
    pub method: String,
}

/// Coarse classification of a strategy failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ToolUnavailable,
    NoCaptions,
    EmptyTranscript,
    MissingVideoId,
    Internal,
}

impl FailureKind {
    fn classify(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<TranscriptError>() {
            Some(TranscriptError::ToolUnavailable(_)) => FailureKind::ToolUnavailable,
            Some(TranscriptError::NoCaptions { .. }) => FailureKind::NoCaptions,
            Some(TranscriptError::EmptyTranscript) => FailureKind::EmptyTranscript,
            Some(TranscriptError::MissingVideoId(_)) => FailureKind::MissingVideoId,
            _ => FailureKind::Internal,
        }
    }
}

/// One failed strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub method: &'static str,
    pub kind: FailureKind,
    pub message: String,
}

/// Every strategy that was tried failed; attempts are kept in the order they ran
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct AcquisitionFailure {
    pub attempts: Vec<AttemptError>,
}

impl AcquisitionFailure {
    /// Whether every attempt failed because a required tool was missing
    pub fn is_environment_error(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|attempt| attempt.kind == FailureKind::ToolUnavailable)
    }
}

impl fmt::Display for AcquisitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.len() > 1 {
            write!(f, "All transcript methods failed. ")?;
        }
        let messages: Vec<String> = self
            .attempts
            .iter()
            .map(|attempt| format!("{}: {}", attempt.method, attempt.message))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Runs acquisition strategies under the configured policy
///
/// In `auto` mode strategies run strictly in order and the first success wins;
/// a success after a failure is tagged with the fallback method name. Forced modes
/// run only the named strategy. No strategy is retried within one call.
pub struct TranscriptPipeline {
    extractors: Vec<Arc<dyn CaptionExtractor>>,
    method: AcquisitionMethod,
}

impl TranscriptPipeline {
    /// Create a pipeline with yt-dlp first and the transcript API second
    pub fn new(config: &AcquisitionConfig) -> Self {
        Self::with_extractors(
            vec![
                Arc::new(YtDlpExtractor::new(config.clone())),
                Arc::new(TranscriptApiExtractor::new()),
            ],
            config.method,
        )
    }

    pub fn with_extractors(extractors: Vec<Arc<dyn CaptionExtractor>>, method: AcquisitionMethod) -> Self {
        Self { extractors, method }
    }

    pub fn method(&self) -> AcquisitionMethod {
        self.method
    }

    fn forced_kind(&self) -> Option<ExtractorKind> {
        match self.method {
            AcquisitionMethod::Auto => None,
            AcquisitionMethod::YtDlp => Some(ExtractorKind::YtDlp),
            AcquisitionMethod::TranscriptApi => Some(ExtractorKind::TranscriptApi),
        }
    }

    /// Strategies to try, in order
    fn plan(&self) -> Vec<&Arc<dyn CaptionExtractor>> {
        match self.forced_kind() {
            Some(kind) => self
                .extractors
                .iter()
                .filter(|extractor| extractor.kind() == kind)
                .take(1)
                .collect(),
            None => self.extractors.iter().collect(),
        }
    }

    /// Acquire a transcript for the video
    pub async fn acquire(
        &self,
        video: &VideoReference,
        lang: &LanguageTag,
    ) -> Result<AcquisitionResult, AcquisitionFailure> {
        let plan = self.plan();
        let mut attempts = Vec::with_capacity(plan.len());

        if plan.is_empty() {
            attempts.push(AttemptError {
                method: "pipeline",
                kind: FailureKind::Internal,
                message: format!("No extractor registered for method {}", self.method),
            });
        }

        for (index, extractor) in plan.into_iter().enumerate() {
            let kind = extractor.kind();
            tracing::info!(method = kind.method_name(), "Trying transcript method");

            match extractor.fetch(video, lang).await {
                Ok(track) => {
                    let method = if index == 0 {
                        kind.method_name()
                    } else {
                        kind.fallback_method_name()
                    };
                    tracing::info!(method, title = %track.title, "Transcript acquired");
                    return Ok(AcquisitionResult {
                        title: track.title,
                        transcript: track.transcript,
                        method: method.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(method = kind.method_name(), error = %format!("{:#}", e), "Transcript method failed");
                    attempts.push(AttemptError {
                        method: kind.method_name(),
                        kind: FailureKind::classify(&e),
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        Err(AcquisitionFailure { attempts })
    }
}

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{CaptionExtractor, CaptionTrack, ExtractorKind};
use crate::captions::{self, select_track, LanguageTag};
use crate::config::AcquisitionConfig;
use crate::resolver::VideoReference;
use crate::utils::run_with_timeout;
use crate::{Result, TranscriptError, UNKNOWN_TITLE};

/// Output template prefix; yt-dlp appends `.<lang>.vtt`
const SUBTITLE_PREFIX: &str = "sub";

/// Conventional install locations tried after `PATH`
const INSTALL_LOCATIONS: &[&str] = &[
    "/usr/local/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Caption extractor driving the yt-dlp executable
pub struct YtDlpExtractor {
    config: AcquisitionConfig,
}

impl YtDlpExtractor {
    pub fn new(config: AcquisitionConfig) -> Self {
        Self { config }
    }

    /// Executables to try, in order
    ///
    /// An explicitly configured path is the only candidate. In bundled mode the copy
    /// next to this executable (or one directory up) is tried before the usual
    /// install locations.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.config.yt_dlp_path {
            return vec![path.clone()];
        }

        let mut candidates = Vec::new();

        if self.config.bundled {
            if let Some(dir) = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
            {
                candidates.push(dir.join("yt-dlp"));
                if let Some(parent) = dir.parent() {
                    candidates.push(parent.join("yt-dlp"));
                }
            }
        }

        candidates.push(PathBuf::from("yt-dlp"));
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".local").join("bin").join("yt-dlp"));
        }
        candidates.extend(INSTALL_LOCATIONS.iter().map(PathBuf::from));

        candidates
    }

    /// Check if yt-dlp at the given path answers a version check
    pub async fn check_availability(&self, path: &Path) -> bool {
        match run_with_timeout(path, &["--version".to_string()], self.config.check_timeout()).await {
            Ok(output) if output.status.success() => {
                tracing::debug!(
                    "Found yt-dlp {} at {}",
                    String::from_utf8_lossy(&output.stdout).trim(),
                    path.display()
                );
                true
            }
            _ => false,
        }
    }

    /// Find a working yt-dlp executable
    pub async fn locate(&self) -> Result<PathBuf> {
        for candidate in self.candidate_paths() {
            if self.check_availability(&candidate).await {
                return Ok(candidate);
            }
        }

        Err(TranscriptError::ToolUnavailable(
            "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp".to_string(),
        )
        .into())
    }

    /// Flags that make requests look like the mobile client behind a regular browser
    fn request_shaping_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-check-certificates".to_string(),
            "--skip-download".to_string(),
        ];

        if self.config.mobile_client {
            args.extend([
                "--extractor-args".to_string(),
                "youtube:player_client=android".to_string(),
                "--add-header".to_string(),
                format!("User-Agent:{}", BROWSER_USER_AGENT),
            ]);
        }

        args
    }

    fn title_args(&self, url: &str) -> Vec<String> {
        let mut args = self.request_shaping_args();
        args.extend(["--print".to_string(), "title".to_string(), url.to_string()]);
        args
    }

    fn subtitle_args(&self, url: &str, lang: &LanguageTag, output_dir: &Path) -> Vec<String> {
        let mut args = self.request_shaping_args();
        args.extend([
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-lang".to_string(),
            lang.wildcard_pattern(),
            "--sub-format".to_string(),
            "vtt".to_string(),
            "-o".to_string(),
            output_dir.join(SUBTITLE_PREFIX).to_string_lossy().into_owned(),
            url.to_string(),
        ]);
        args
    }

    /// Look up the video title, falling back to [`UNKNOWN_TITLE`]
    async fn get_title(&self, yt_dlp: &Path, url: &str) -> String {
        match run_with_timeout(yt_dlp, &self.title_args(url), self.config.check_timeout()).await {
            Ok(output) if output.status.success() => {
                let title = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if title.is_empty() {
                    UNKNOWN_TITLE.to_string()
                } else {
                    title
                }
            }
            Ok(output) => {
                tracing::debug!(
                    "yt-dlp title lookup failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                UNKNOWN_TITLE.to_string()
            }
            Err(e) => {
                tracing::debug!("yt-dlp title lookup failed: {:#}", e);
                UNKNOWN_TITLE.to_string()
            }
        }
    }

    /// Download captions into a fresh temporary directory and normalize them
    ///
    /// The directory is removed when the guard drops, on every exit path.
    async fn download_subtitles(
        &self,
        yt_dlp: &Path,
        url: &str,
        lang: &LanguageTag,
    ) -> Result<captions::Transcript> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("yt-transcript-");
        let temp_dir = match &self.config.temp_dir {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }?;

        tracing::debug!("Downloading subtitles to: {}", temp_dir.path().display());

        let no_captions = || TranscriptError::NoCaptions {
            lang: lang.to_string(),
        };

        let args = self.subtitle_args(url, lang, temp_dir.path());
        let output = run_with_timeout(yt_dlp, &args, self.config.subtitle_timeout())
            .await
            .map_err(|e| anyhow::Error::new(no_captions()).context(format!("{:#}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("yt-dlp subtitle download failed: {}", stderr.trim());
            return Err(anyhow::Error::new(no_captions())
                .context(format!("yt-dlp exited with {}", output.status)));
        }

        let files = subtitle_files(temp_dir.path())?;
        let selected = select_track(lang, files.iter().map(|(code, _)| code.as_str()))
            .and_then(|code| files.iter().find(|(candidate, _)| candidate == code))
            .map(|(_, path)| path.clone())
            .ok_or_else(no_captions)?;

        tracing::debug!("Reading subtitles from {}", selected.display());
        let content = fs_err::read_to_string(&selected)?;

        Ok(captions::normalize_vtt(&content)?)
    }
}

/// Language code encoded in a subtitle file name such as `sub.en-US.vtt`
fn caption_language(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(SUBTITLE_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(".vtt")
        .filter(|code| !code.is_empty())
}

/// `.vtt` files in the output directory, keyed by language code
fn subtitle_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let path = entry?.path();
        let code = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(caption_language)
            .map(str::to_string);
        if let Some(code) = code {
            files.push((code, path));
        }
    }
    Ok(files)
}

#[async_trait]
impl CaptionExtractor for YtDlpExtractor {
    async fn fetch(&self, video: &VideoReference, lang: &LanguageTag) -> Result<CaptionTrack> {
        let yt_dlp = self.locate().await?;

        let title = self.get_title(&yt_dlp, &video.url).await;
        let transcript = self.download_subtitles(&yt_dlp, &video.url, lang).await?;

        Ok(CaptionTrack { title, transcript })
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::YtDlp
    }
}

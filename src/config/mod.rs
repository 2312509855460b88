use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::captions::language::DEFAULT_LANGUAGE;

/// Port used when HTTP transport is requested without an explicit port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transport settings
    pub server: ServerConfig,

    /// Transcript acquisition settings
    pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP transport binds to
    pub host: String,

    /// Serve over HTTP on this port; stdio when unset
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Which acquisition strategy to run
    pub method: AcquisitionMethod,

    /// Caption language used when a request does not name one
    pub default_language: String,

    /// Explicit path to the yt-dlp executable
    pub yt_dlp_path: Option<PathBuf>,

    /// Look for a yt-dlp shipped alongside this executable first
    pub bundled: bool,

    /// Wall-clock budget for the subtitle download
    pub subtitle_timeout_secs: u64,

    /// Wall-clock budget for version checks and title lookups
    pub check_timeout_secs: u64,

    /// Present as the mobile client with a browser user agent
    pub mobile_client: bool,

    /// Root for per-request temporary directories
    pub temp_dir: Option<PathBuf>,
}

/// Acquisition policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AcquisitionMethod {
    /// yt-dlp first, transcript API as fallback
    #[default]
    Auto,
    /// Only yt-dlp
    YtDlp,
    /// Only the in-process transcript API
    TranscriptApi,
}

impl fmt::Display for AcquisitionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionMethod::Auto => write!(f, "auto"),
            AcquisitionMethod::YtDlp => write!(f, "yt-dlp"),
            AcquisitionMethod::TranscriptApi => write!(f, "transcript-api"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            method: AcquisitionMethod::Auto,
            default_language: DEFAULT_LANGUAGE.to_string(),
            yt_dlp_path: None,
            bundled: false,
            subtitle_timeout_secs: 60,
            check_timeout_secs: 10,
            mobile_client: false,
            temp_dir: None,
        }
    }
}

impl AcquisitionConfig {
    pub fn subtitle_timeout(&self) -> Duration {
        Duration::from_secs(self.subtitle_timeout_secs)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub http: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub method: Option<AcquisitionMethod>,
    pub yt_dlp_path: Option<PathBuf>,
    pub bundled: bool,
}

impl Config {
    /// Load configuration from file, or fall back to defaults when none exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::config_path().filter(|path| path.exists()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let content = fs_err::read_to_string(&path)
                    .context("Failed to read config file")?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config file")
    }

    /// Apply command-line and environment overrides on top of the file configuration
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = Some(port);
        }
        if overrides.http && self.server.port.is_none() {
            self.server.port = Some(DEFAULT_HTTP_PORT);
        }
        if let Some(method) = overrides.method {
            self.acquisition.method = method;
        }
        if let Some(path) = overrides.yt_dlp_path {
            self.acquisition.yt_dlp_path = Some(path);
        }
        if overrides.bundled {
            self.acquisition.bundled = true;
        }

        self.validate()?;
        Ok(self)
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("yt-transcript-mcp").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == Some(0) {
            anyhow::bail!("Server port must be between 1 and 65535");
        }

        if self.acquisition.default_language.trim().is_empty() {
            anyhow::bail!("Default caption language must not be empty");
        }

        if self.acquisition.subtitle_timeout_secs == 0 || self.acquisition.check_timeout_secs == 0 {
            anyhow::bail!("Timeouts must be at least one second");
        }

        Ok(())
    }

    /// Whether the HTTP transport is selected
    pub fn use_http(&self) -> bool {
        self.server.port.is_some()
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        match self.server.port {
            Some(port) => println!("  Transport: http ({}:{})", self.server.host, port),
            None => println!("  Transport: stdio"),
        }
        println!("  Acquisition Method: {}", self.acquisition.method);
        println!("  Default Language: {}", self.acquisition.default_language);
        match &self.acquisition.yt_dlp_path {
            Some(path) => println!("  yt-dlp Path: {}", path.display()),
            None => println!("  yt-dlp Path: auto-detect"),
        }
        println!("  Bundled yt-dlp: {}", self.acquisition.bundled);
        println!("  Subtitle Timeout: {}s", self.acquisition.subtitle_timeout_secs);
        println!("  Mobile Client: {}", self.acquisition.mobile_client);
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AcquisitionMethod, ConfigOverrides};

#[derive(Parser)]
#[command(
    name = "yt-transcript-mcp",
    about = "MCP server that fetches plain-text transcripts of YouTube videos",
    version,
    long_about = "Exposes a get_transcript tool over the Model Context Protocol, on stdio by default or over HTTP. Captions are fetched with yt-dlp, falling back to YouTube's transcript API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Serve over HTTP instead of stdio
    #[arg(long, global = true)]
    pub http: bool,

    /// HTTP port (implies --http)
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "MCP_HOST", global = true)]
    pub host: Option<String>,

    /// Transcript acquisition method
    #[arg(long, env = "TRANSCRIPT_METHOD", value_enum, global = true)]
    pub method: Option<AcquisitionMethod>,

    /// Path to the yt-dlp executable
    #[arg(long, env = "YT_DLP_PATH", value_name = "PATH", global = true)]
    pub yt_dlp_path: Option<PathBuf>,

    /// Use the yt-dlp bundled next to this executable
    #[arg(
        long,
        env = "YT_DLP_BUNDLED",
        value_parser = clap::builder::BoolishValueParser::new(),
        global = true
    )]
    pub bundled: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server (default)
    Serve,

    /// Fetch one transcript and print it
    Fetch {
        /// YouTube URL or video id
        #[arg(value_name = "URL")]
        url: String,

        /// Subtitle language code
        #[arg(short, long, value_name = "LANG")]
        lang: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Settings that override the configuration file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            http: self.http,
            host: self.host.clone(),
            port: self.port,
            method: self.method,
            yt_dlp_path: self.yt_dlp_path.clone(),
            bundled: self.bundled,
        }
    }
}

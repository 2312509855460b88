use rmcp::schemars::{self, JsonSchema};
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*, tool,
    tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::output;
use crate::service::TranscriptService;

pub mod http;

pub use http::{router, serve_http};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTranscriptParams {
    #[schemars(
        description = "YouTube video URL (e.g. https://www.youtube.com/watch?v=... or https://youtu.be/...)"
    )]
    pub url: String,

    #[schemars(
        description = "Subtitle language code (default: \"en\"). Examples: \"en\", \"es\", \"fr\", \"de\", \"ja\""
    )]
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Clone)]
pub struct TranscriptMcpServer {
    service: Arc<TranscriptService>,
    tool_router: ToolRouter<Self>,
}

impl TranscriptMcpServer {
    pub fn new(service: Arc<TranscriptService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl TranscriptMcpServer {
    #[tool(
        description = "Fetch the transcript / subtitles of a YouTube video. Returns the full plain-text transcript that you can then summarize, analyze, or answer questions about.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = true
        )
    )]
    async fn get_transcript(
        &self,
        Parameters(params): Parameters<GetTranscriptParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = self
            .service
            .get_transcript(&params.url, params.lang.as_deref())
            .await;
        Ok(output::to_call_tool_result(&response))
    }
}

#[tool_handler]
impl ServerHandler for TranscriptMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "yt-transcript".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Fetches plain-text transcripts of YouTube videos. Call get_transcript with a video URL and an optional language code.".to_string(),
            ),
        }
    }
}

/// Serve a single session over stdin/stdout until the client disconnects
pub async fn serve_stdio(service: Arc<TranscriptService>) -> anyhow::Result<()> {
    let running = TranscriptMcpServer::new(service)
        .serve(rmcp::transport::stdio())
        .await?;
    tracing::info!("MCP server running on stdio");

    let reason = running.waiting().await?;
    tracing::info!("stdio session ended: {:?}", reason);
    Ok(())
}

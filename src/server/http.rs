use anyhow::Context;
use axum::{routing::get, Json, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::TranscriptMcpServer;
use crate::service::TranscriptService;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// HTTP routes: session-managed MCP endpoint at `/mcp` and a liveness check at `/health`
pub fn router(service: Arc<TranscriptService>) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(TranscriptMcpServer::new(service.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
}

/// Serve the HTTP transport until Ctrl-C
pub async fn serve_http(service: Arc<TranscriptService>, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    tracing::info!("MCP HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Endpoint: http://{}/mcp", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down HTTP server");
}

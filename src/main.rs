use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use yt_transcript_mcp::cli::{Cli, Commands};
use yt_transcript_mcp::config::Config;
use yt_transcript_mcp::service::TranscriptService;
use yt_transcript_mcp::{output, server, utils};

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "yt_transcript_mcp=debug"
    } else {
        "yt_transcript_mcp=info"
    };

    // stdout carries the stdio transport, so logs always go to stderr
    let fmt_layer = if cli.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.overrides())?;

    match cli.command {
        Some(Commands::Config) => {
            config.display();
        }
        Some(Commands::Fetch { ref url, ref lang }) => {
            let service = TranscriptService::new(&config);
            let response = service.get_transcript(url, lang.as_deref()).await;
            output::print_to_console(&response);
            if response.is_error() {
                std::process::exit(1);
            }
        }
        Some(Commands::Serve) | None => {
            // Missing tools are fatal only when no other method could serve requests
            let missing = utils::check_dependencies(&config).await?;
            for dep in &missing {
                tracing::warn!("Dependency check warning: {}", dep);
            }

            let service = Arc::new(TranscriptService::new(&config));
            tracing::info!(
                "Starting yt-transcript-mcp v{} (method: {})",
                env!("CARGO_PKG_VERSION"),
                config.acquisition.method
            );

            match config.server.port {
                Some(port) => server::serve_http(service, &config.server.host, port).await?,
                None => server::serve_stdio(service).await?,
            }
        }
    }

    Ok(())
}

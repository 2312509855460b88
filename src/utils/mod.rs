use anyhow::Result;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::config::{AcquisitionMethod, Config};
use crate::extractors::YtDlpExtractor;
use crate::TranscriptError;

/// Run a process under a wall-clock budget, killing it when the budget runs out
pub async fn run_with_timeout(program: &Path, args: &[String], budget: Duration) -> Result<Output> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(budget, output).await {
        Ok(output) => Ok(output?),
        Err(_) => anyhow::bail!(
            "{} timed out after {}s",
            program.display(),
            budget.as_secs()
        ),
    }
}

/// Check if a command answers `--version` within the budget
pub async fn check_command_available(command: &str, budget: Duration) -> bool {
    run_with_timeout(Path::new(command), &["--version".to_string()], budget)
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Check the environment for the tools the configured methods need
///
/// Returns warnings for missing tools. When yt-dlp is the only allowed method and
/// it cannot run, this is a hard [`TranscriptError::ToolUnavailable`] error.
pub async fn check_dependencies(config: &Config) -> Result<Vec<String>> {
    let acquisition = &config.acquisition;
    let mut missing = Vec::new();

    if acquisition.method == AcquisitionMethod::TranscriptApi {
        return Ok(missing);
    }

    // The bundled yt-dlp is a Python zipapp
    if acquisition.bundled
        && !check_command_available("python3", acquisition.check_timeout()).await
    {
        missing.push(
            "python3 - required to run the bundled yt-dlp (https://www.python.org/downloads/)"
                .to_string(),
        );
    }

    if let Err(e) = YtDlpExtractor::new(acquisition.clone()).locate().await {
        missing.push(format!("yt-dlp - {}", e));
    }

    if acquisition.method == AcquisitionMethod::YtDlp && !missing.is_empty() {
        return Err(TranscriptError::ToolUnavailable(missing.join("; ")).into());
    }

    Ok(missing)
}

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("yt-transcript-mcp").unwrap();
    for var in ["PORT", "MCP_HOST", "TRANSCRIPT_METHOD", "YT_DLP_PATH", "YT_DLP_BUNDLED"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_transport_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--http"))
        .stdout(predicate::str::contains("--method"))
        .stdout(predicate::str::contains("fetch"));
}

#[test]
fn test_config_shows_effective_settings() {
    cmd()
        .args(["config", "--method", "transcript-api", "--port", "8123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acquisition Method: transcript-api"))
        .stdout(predicate::str::contains("Transport: http (127.0.0.1:8123)"));
}

#[test]
fn test_config_reads_environment() {
    cmd()
        .arg("config")
        .env("TRANSCRIPT_METHOD", "yt-dlp")
        .env("YT_DLP_PATH", "/opt/yt-dlp")
        .assert()
        .success()
        .stdout(predicate::str::contains("Acquisition Method: yt-dlp"))
        .stdout(predicate::str::contains("yt-dlp Path: /opt/yt-dlp"))
        .stdout(predicate::str::contains("Transport: stdio"));
}

#[test]
fn test_bundled_env_accepts_common_truthy_values() {
    for value in ["1", "yes", "true", "on"] {
        cmd()
            .arg("config")
            .env("YT_DLP_BUNDLED", value)
            .assert()
            .success()
            .stdout(predicate::str::contains("Bundled yt-dlp: true"));
    }

    cmd()
        .arg("config")
        .env("YT_DLP_BUNDLED", "0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundled yt-dlp: false"));
}

#[test]
fn test_fetch_rejects_non_youtube_input() {
    cmd()
        .args(["fetch", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not appear to be a YouTube link"));
}

#[test]
fn test_missing_config_file_fails() {
    cmd()
        .args(["config", "--config", "/nonexistent/yt-transcript.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file does not exist"));
}

#[test]
fn test_invalid_method_rejected() {
    cmd().args(["--method", "whisper"]).assert().failure();
}

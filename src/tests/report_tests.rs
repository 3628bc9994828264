use super::*;
use crate::theme::Palette;
use std::path::PathBuf;
use tempfile::TempDir;

const FAR_FUTURE_MILLIS: i64 = 4_102_444_800_000;

const CLAUDE_BODY: &str = r#"{
    "five_hour": {"utilization": 37.0, "resets_at": "2099-01-01T00:00:00Z"},
    "seven_day": {"utilization": 55.0, "resets_at": "2099-01-01T00:00:00Z"},
    "extra_usage": {"is_enabled": false, "monthly_limit": 5000, "used_credits": 1234}
}"#;

const CODEX_BODY: &str = r#"{
    "plan_type": "plus",
    "rate_limit": {
        "primary_window": {"used_percent": 22, "reset_after_seconds": 3600},
        "secondary_window": {"used_percent": 64, "reset_after_seconds": 90000}
    },
    "credits": {"unlimited": false, "balance": "12.5"}
}"#;

fn write_auth_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("auth.json");
    let json = format!(
        r#"{{
            "anthropic": {{"type": "oauth", "refresh": "r", "access": "claude-tok", "expires": {expires}}},
            "openai": {{"type": "oauth", "refresh": "r", "access": "codex-tok", "expires": {expires}, "accountId": "acct-1"}}
        }}"#,
        expires = FAR_FUTURE_MILLIS
    );
    std::fs::write(&path, json).unwrap();
    path
}

fn config_for(server_url: &str, auth_paths: Vec<PathBuf>) -> Config {
    Config {
        auth_paths,
        claude_usage_url: format!("{}/api/oauth/usage", server_url),
        codex_usage_url: format!("{}/backend-api/wham/usage", server_url),
        palette: Palette::plain(),
    }
}

async fn run_to_string(config: &Config) -> String {
    let mut out = Vec::new();
    run(config, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_claude_failure_does_not_affect_codex_block() {
    let dir = TempDir::new().unwrap();
    let auth_path = write_auth_file(&dir);

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/oauth/usage")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("GET", "/backend-api/wham/usage")
        .match_header("authorization", "Bearer codex-tok")
        .match_header("chatgpt-account-id", "acct-1")
        .with_status(200)
        .with_body(CODEX_BODY)
        .create_async()
        .await;

    let output = run_to_string(&config_for(&server.url(), vec![auth_path])).await;

    assert!(output.contains("  ● Claude\n    Claude API error: 401 Unauthorized\n"));
    assert!(output.contains("  ● Codex  (plus)\n"));
    assert!(output.contains("  Primary"));
    assert!(output.contains("  Secondary"));
    assert!(output.contains("    Credits      $12.50\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_report_layout() {
    let dir = TempDir::new().unwrap();
    let auth_path = write_auth_file(&dir);

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/oauth/usage")
        .match_header("authorization", "Bearer claude-tok")
        .with_status(200)
        .with_body(CLAUDE_BODY)
        .create_async()
        .await;
    server
        .mock("GET", "/backend-api/wham/usage")
        .with_status(200)
        .with_body(CODEX_BODY)
        .create_async()
        .await;

    let output = run_to_string(&config_for(&server.url(), vec![auth_path])).await;
    let separator = "─".repeat(62);

    assert!(output.starts_with(&format!("\n  OpenCode Usage\n{}\n", separator)));
    assert!(output.ends_with(&format!("{}\n\n", separator)));

    let claude_at = output.find("  ● Claude").unwrap();
    let codex_at = output.find("  ● Codex").unwrap();
    assert!(claude_at < codex_at);

    assert!(output.contains("  5h window"));
    assert!(output.contains("  7d window"));
    // Overage is disabled upstream even though the amounts are non-zero.
    assert!(!output.contains("Overage"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_auth_store_reported_for_both_providers() {
    let dir = TempDir::new().unwrap();
    let config = config_for(
        "http://127.0.0.1:9",
        vec![dir.path().join("nope.json"), dir.path().join("also-nope.json")],
    );

    let output = run_to_string(&config).await;
    let message = "    No auth.json found. Is OpenCode installed and authenticated?\n";

    assert_eq!(output.matches(message).count(), 2);
    assert!(output.contains("  ● Claude\n"));
    assert!(output.contains("  ● Codex\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_key_entries_are_reported_as_missing_auth() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("auth.json");
    std::fs::write(
        &path,
        r#"{"anthropic":{"type":"api","key":"sk-ant"},"openai":{"type":"api","key":"sk"}}"#,
    )
    .unwrap();

    let output = run_to_string(&config_for("http://127.0.0.1:9", vec![path])).await;

    assert!(output.contains("    No Claude auth found\n"));
    assert!(output.contains("    No Codex auth found\n"));
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_failure_is_returned_to_caller() {
    let dir = TempDir::new().unwrap();
    let config = config_for("http://127.0.0.1:9", vec![dir.path().join("nope.json")]);

    let err = run(&config, &mut ClosedPipe).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

//! Per-provider pipelines: resolve the stored token, then fetch usage.

use super::api_client::{fetch_claude_usage, fetch_codex_usage};
use super::credentials::{resolve_auth, AuthStore};
use super::types::{ClaudeUsage, CodexUsage, Provider};
use crate::usage_error::UsageError;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

/// Auth store as loaded once per run, shared read-only by both pipelines.
pub type SharedAuthStore = Result<Arc<AuthStore>, UsageError>;

pub fn claude_pipeline(store: SharedAuthStore, endpoint: &str) -> Result<ClaudeUsage> {
    let store = store?;
    let auth = resolve_auth(&store, Provider::Claude, Utc::now().timestamp_millis());
    fetch_claude_usage(endpoint, auth)
}

pub fn codex_pipeline(store: SharedAuthStore, endpoint: &str) -> Result<CodexUsage> {
    let store = store?;
    let auth = resolve_auth(&store, Provider::Codex, Utc::now().timestamp_millis());
    fetch_codex_usage(endpoint, auth)
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;

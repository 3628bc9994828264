//! Orchestrates one report run: header, both provider pipelines in
//! parallel, one block per provider, footer.
//!
//! A provider's failure only ever replaces its own block with an error line.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use tokio::task::JoinError;

use crate::account_usage::credentials::load_auth_store;
use crate::account_usage::fetcher::{claude_pipeline, codex_pipeline, SharedAuthStore};
use crate::account_usage::types::Provider;
use crate::config::Config;
use crate::display::{Layout, Renderer};

/// Runs the report, writing every line to `out`.
///
/// Only write failures on `out` are returned; provider failures are
/// rendered inline.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> io::Result<()> {
    let renderer = Renderer::new(Layout::default(), config.palette);
    renderer.write_lines(out, &renderer.header_lines())?;

    let store: SharedAuthStore = load_auth_store(&config.auth_paths).map(Arc::new);

    let claude = tokio::task::spawn_blocking({
        let store = store.clone();
        let endpoint = config.claude_usage_url.clone();
        move || claude_pipeline(store, &endpoint)
    });
    let codex = tokio::task::spawn_blocking({
        let endpoint = config.codex_usage_url.clone();
        move || codex_pipeline(store, &endpoint)
    });
    let (claude, codex) = tokio::join!(claude, codex);

    let now = Utc::now();
    let claude_lines = match settle(Provider::Claude, claude) {
        Ok(usage) => renderer.claude_lines(&usage, now),
        Err(e) => failure_lines(&renderer, Provider::Claude, &e),
    };
    renderer.write_lines(out, &claude_lines)?;

    let codex_lines = match settle(Provider::Codex, codex) {
        Ok(usage) => renderer.codex_lines(&usage, now),
        Err(e) => failure_lines(&renderer, Provider::Codex, &e),
    };
    renderer.write_lines(out, &codex_lines)?;

    renderer.write_lines(out, &renderer.footer_lines())
}

/// Folds a task panic into the provider's own error.
fn settle<T>(provider: Provider, joined: Result<Result<T>, JoinError>) -> Result<T> {
    joined.map_err(|e| anyhow!("{} fetch task failed: {}", provider, e))?
}

fn failure_lines(renderer: &Renderer, provider: Provider, error: &anyhow::Error) -> Vec<String> {
    tracing::warn!("{} usage unavailable: {:#}", provider, error);
    renderer.error_lines(provider, &format!("{:#}", error))
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;

//! HTTP clients for the provider usage endpoints.
//!
//! Each fetch is a single GET with no retries and no explicit timeout. The
//! mapping from response body to usage record is kept separate from the
//! transport so it can be exercised without a server.

use super::types::{ClaudeUsage, CodexUsage, Credits, ExtraUsage, Provider, ResolvedAuth};
use crate::usage_error::UsageError;
use crate::usage_reset::UsageWindow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const CLAUDE_USAGE_URL: &str = "https://api.anthropic.com/api/oauth/usage";
pub const CODEX_USAGE_URL: &str = "https://chatgpt.com/backend-api/wham/usage";

const ANTHROPIC_BETA: &str = "oauth-2025-04-20";
const CODEX_ACCOUNT_HEADER: &str = "ChatGPT-Account-Id";

#[derive(Debug, Deserialize)]
struct ClaudeWindow {
    utilization: f64,
    resets_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ClaudeExtraUsage {
    is_enabled: bool,
    /// Minor currency units (cents)
    #[serde(default)]
    monthly_limit: Option<f64>,
    #[serde(default)]
    used_credits: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsageResponse {
    five_hour: ClaudeWindow,
    seven_day: ClaudeWindow,
    #[serde(default)]
    seven_day_sonnet: Option<ClaudeWindow>,
    #[serde(default)]
    seven_day_opus: Option<ClaudeWindow>,
    #[serde(default)]
    extra_usage: Option<ClaudeExtraUsage>,
}

#[derive(Debug, Deserialize)]
struct CodexWindow {
    used_percent: f64,
    reset_after_seconds: f64,
}

#[derive(Debug, Deserialize)]
struct CodexRateLimit {
    primary_window: CodexWindow,
    #[serde(default)]
    secondary_window: Option<CodexWindow>,
}

#[derive(Debug, Deserialize)]
struct CodexCredits {
    #[serde(default)]
    unlimited: bool,
    /// Arrives either as a number or as a numeric string
    #[serde(default)]
    balance: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CodexUsageResponse {
    plan_type: String,
    rate_limit: CodexRateLimit,
    #[serde(default)]
    credits: Option<CodexCredits>,
}

/// Fails fast when there is no usable token for `provider`.
fn usable_auth(provider: Provider, auth: Option<ResolvedAuth>) -> Result<ResolvedAuth> {
    let auth = auth.ok_or(UsageError::AuthMissing { provider })?;
    if auth.expired {
        return Err(UsageError::AuthExpired { provider }.into());
    }
    Ok(auth)
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

/// Returns the response body, or `ApiError` for any non-2xx status.
fn read_success_body(
    provider: Provider,
    mut response: ureq::http::Response<ureq::Body>,
) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(UsageError::ApiError {
            provider,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
        .into());
    }
    response
        .body_mut()
        .read_to_string()
        .with_context(|| format!("Failed to read {} usage response", provider))
}

/// Fetches Claude usage from `endpoint` with the resolved OAuth token.
pub fn fetch_claude_usage(endpoint: &str, auth: Option<ResolvedAuth>) -> Result<ClaudeUsage> {
    let provider = Provider::Claude;
    let auth = usable_auth(provider, auth)?;

    tracing::debug!("Fetching {} usage from {}", provider, endpoint);
    let response = agent()
        .get(endpoint)
        .header("Authorization", &format!("Bearer {}", auth.access_token))
        .header("anthropic-beta", ANTHROPIC_BETA)
        .call()
        .with_context(|| format!("Failed to fetch {} usage", provider))?;

    let body = read_success_body(provider, response)?;
    parse_claude_usage(&body)
}

/// Fetches Codex usage from `endpoint`, sending the account id header when known.
pub fn fetch_codex_usage(endpoint: &str, auth: Option<ResolvedAuth>) -> Result<CodexUsage> {
    let provider = Provider::Codex;
    let auth = usable_auth(provider, auth)?;

    tracing::debug!("Fetching {} usage from {}", provider, endpoint);
    let mut request = agent()
        .get(endpoint)
        .header("Authorization", &format!("Bearer {}", auth.access_token));
    if let Some(account_id) = &auth.account_id {
        request = request.header(CODEX_ACCOUNT_HEADER, account_id);
    }
    let response = request
        .call()
        .with_context(|| format!("Failed to fetch {} usage", provider))?;

    let body = read_success_body(provider, response)?;
    parse_codex_usage(&body, Utc::now())
}

/// Maps a Claude usage body. Reset instants are absolute; currency fields
/// arrive in cents.
pub fn parse_claude_usage(body: &str) -> Result<ClaudeUsage> {
    let data: ClaudeUsageResponse =
        serde_json::from_str(body).context("Failed to parse Claude usage response")?;

    Ok(ClaudeUsage {
        five_hour: UsageWindow::new(data.five_hour.utilization, data.five_hour.resets_at),
        seven_day: UsageWindow::new(data.seven_day.utilization, data.seven_day.resets_at),
        sonnet: data.seven_day_sonnet.map(|w| w.utilization),
        opus: data.seven_day_opus.map(|w| w.utilization),
        extra_usage: data.extra_usage.map(|extra| ExtraUsage {
            enabled: extra.is_enabled,
            used: extra.used_credits.unwrap_or(0.0) / 100.0,
            limit: extra.monthly_limit.unwrap_or(0.0) / 100.0,
        }),
    })
}

/// Maps a Codex usage body. Reset offsets are relative to `now`, the
/// instant the response was received.
pub fn parse_codex_usage(body: &str, now: DateTime<Utc>) -> Result<CodexUsage> {
    let data: CodexUsageResponse =
        serde_json::from_str(body).context("Failed to parse Codex usage response")?;

    let window =
        |w: &CodexWindow| UsageWindow::resetting_after(w.used_percent, now, w.reset_after_seconds);

    Ok(CodexUsage {
        plan_type: data.plan_type,
        primary: window(&data.rate_limit.primary_window),
        secondary: data.rate_limit.secondary_window.as_ref().map(window),
        credits: data.credits.map(|credits| Credits {
            balance: coerce_balance(&credits.balance),
            unlimited: credits.unlimited,
        }),
    })
}

/// Reads a balance given as a number or numeric string. Anything else
/// becomes 0.
fn coerce_balance(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) if s.trim().is_empty() => Some(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(balance) if balance.is_finite() => balance,
        _ => {
            tracing::debug!("Treating non-numeric credit balance {} as 0", value);
            0.0
        }
    }
}

#[cfg(test)]
#[path = "tests/api_client_tests.rs"]
mod tests;

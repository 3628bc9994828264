//! Data types for stored credentials and normalized provider usage.

use crate::usage_reset::UsageWindow;
use serde::Deserialize;
use std::fmt;

/// The platforms whose usage is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Claude,
    Codex,
}

impl Provider {
    /// Top-level key of this provider's entry in OpenCode's `auth.json`.
    pub fn auth_key(self) -> &'static str {
        match self {
            Provider::Claude => "anthropic",
            Provider::Codex => "openai",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One provider entry of the auth store.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum AuthEntry {
    #[serde(rename = "oauth")]
    OAuth {
        #[serde(default)]
        refresh: String,
        access: String,
        /// Expiry instant in Unix epoch milliseconds
        expires: i64,
        #[serde(rename = "accountId", default)]
        account_id: Option<String>,
    },
    #[serde(rename = "api")]
    Api { key: String },
}

// Tokens never reach log output.
impl fmt::Debug for AuthEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthEntry::OAuth {
                refresh,
                expires,
                account_id,
                ..
            } => f
                .debug_struct("OAuth")
                .field("has_refresh", &!refresh.is_empty())
                .field("expires", expires)
                .field("account_id", account_id)
                .finish_non_exhaustive(),
            AuthEntry::Api { .. } => f.debug_struct("Api").finish_non_exhaustive(),
        }
    }
}

/// Access token bundle derived from an OAuth entry.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedAuth {
    pub access_token: String,
    pub account_id: Option<String>,
    /// Whether the token's expiry instant was already in the past
    pub expired: bool,
}

impl fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAuth")
            .field("account_id", &self.account_id)
            .field("expired", &self.expired)
            .finish_non_exhaustive()
    }
}

/// Pay-as-you-go spend beyond the plan limits, in currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraUsage {
    pub enabled: bool,
    pub used: f64,
    pub limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaudeUsage {
    pub five_hour: UsageWindow,
    pub seven_day: UsageWindow,
    /// Per-model 7-day utilization, present only when reported
    pub sonnet: Option<f64>,
    pub opus: Option<f64>,
    pub extra_usage: Option<ExtraUsage>,
}

impl ClaudeUsage {
    pub fn max_percent(&self) -> f64 {
        self.five_hour.percent.max(self.seven_day.percent)
    }
}

/// Prepaid credit balance, in currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct Credits {
    pub balance: f64,
    pub unlimited: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodexUsage {
    pub plan_type: String,
    pub primary: UsageWindow,
    pub secondary: Option<UsageWindow>,
    pub credits: Option<Credits>,
}

impl CodexUsage {
    pub fn max_percent(&self) -> f64 {
        let secondary = self.secondary.as_ref().map_or(0.0, |w| w.percent);
        self.primary.percent.max(secondary)
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;

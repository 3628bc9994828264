//! Runtime configuration gathered from the environment.
//!
//! Built once in `main`; everything downstream receives its inputs from
//! this value rather than reading the environment itself.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::account_usage::api_client::{CLAUDE_USAGE_URL, CODEX_USAGE_URL};
use crate::account_usage::credentials::candidate_auth_paths;
use crate::theme::Palette;

/// Overrides the first auth store location (`$XDG_DATA_HOME/opencode/auth.json`).
pub const DATA_HOME_ENV: &str = "XDG_DATA_HOME";

/// Disables ANSI styling when set to any non-empty value.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone)]
pub struct Config {
    /// Auth store candidates, highest priority first
    pub auth_paths: Vec<PathBuf>,
    pub claude_usage_url: String,
    pub codex_usage_url: String,
    pub palette: Palette,
}

impl Config {
    pub fn from_env() -> Self {
        let data_home = non_empty_var(DATA_HOME_ENV).map(PathBuf::from);
        let home = dirs::home_dir();
        let palette = if non_empty_var(NO_COLOR_ENV).is_some() {
            Palette::plain()
        } else {
            Palette::default()
        };

        Self {
            auth_paths: candidate_auth_paths(data_home.as_deref(), home.as_deref()),
            claude_usage_url: CLAUDE_USAGE_URL.to_string(),
            codex_usage_url: CODEX_USAGE_URL.to_string(),
            palette,
        }
    }
}

fn non_empty_var(name: &str) -> Option<OsString> {
    std::env::var_os(name).filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

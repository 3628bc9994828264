//! Auth store lookup and per-provider token resolution.
//!
//! OpenCode keeps every provider's credentials in a single `auth.json`. The
//! file is probed at a few well-known locations; the first one that reads and
//! parses wins, and failures on earlier candidates are skipped quietly.

use super::types::{AuthEntry, Provider, ResolvedAuth};
use crate::usage_error::UsageError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "opencode";
const AUTH_FILE_NAME: &str = "auth.json";

/// Candidate auth store locations, highest priority first.
///
/// `$XDG_DATA_HOME/opencode/auth.json` leads when the variable is set, then
/// the Linux and macOS per-user data directories under `home`.
pub fn candidate_auth_paths(xdg_data_home: Option<&Path>, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(xdg) = xdg_data_home {
        paths.push(xdg.join(APP_DIR).join(AUTH_FILE_NAME));
    }
    if let Some(home) = home {
        paths.push(
            home.join(".local")
                .join("share")
                .join(APP_DIR)
                .join(AUTH_FILE_NAME),
        );
        paths.push(
            home.join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join(AUTH_FILE_NAME),
        );
    }
    paths
}

/// Parsed auth store keyed by provider identifier.
///
/// Entries stay as raw JSON until a provider asks for its own, so an entry
/// this tool does not understand never invalidates the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AuthStore {
    entries: HashMap<String, serde_json::Value>,
}

impl AuthStore {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Decodes the entry stored for `provider`, if any.
    pub fn entry(&self, provider: Provider) -> Option<AuthEntry> {
        let raw = self.entries.get(provider.auth_key())?;
        match AuthEntry::deserialize(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Ignoring unrecognized {} auth entry: {}", provider, e);
                None
            }
        }
    }
}

/// Loads the first readable, valid auth store among `paths`.
pub fn load_auth_store(paths: &[PathBuf]) -> Result<AuthStore, UsageError> {
    for path in paths {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        match AuthStore::from_json(&content) {
            Ok(store) => {
                tracing::debug!("Loaded auth store from {}", path.display());
                return Ok(store);
            }
            Err(e) => tracing::debug!("Skipping {}: invalid JSON: {}", path.display(), e),
        }
    }
    Err(UsageError::CredentialsNotFound)
}

/// Resolves the OAuth token for `provider`.
///
/// Returns `None` when there is no entry or the entry is a static API key,
/// which the usage endpoints do not accept. Expiry is only reported, never
/// refreshed.
pub fn resolve_auth(store: &AuthStore, provider: Provider, now_millis: i64) -> Option<ResolvedAuth> {
    match store.entry(provider)? {
        AuthEntry::OAuth {
            access,
            expires,
            account_id,
            ..
        } => Some(ResolvedAuth {
            access_token: access,
            account_id: match provider {
                Provider::Codex => account_id,
                Provider::Claude => None,
            },
            expired: now_millis > expires,
        }),
        AuthEntry::Api { .. } => None,
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;

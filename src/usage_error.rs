//! Error taxonomy for the per-provider fetch pipelines.
//!
//! Every variant is caught at the provider boundary and rendered as that
//! provider's error line; none of them end the process.

use thiserror::Error;

use crate::account_usage::types::Provider;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// None of the candidate paths held a readable, valid-JSON auth store.
    #[error("No auth.json found. Is OpenCode installed and authenticated?")]
    CredentialsNotFound,

    /// No OAuth entry for the provider (absent, or a static API key).
    #[error("No {provider} auth found")]
    AuthMissing { provider: Provider },

    #[error("{provider} token expired: re-authenticate with OpenCode")]
    AuthExpired { provider: Provider },

    /// The usage endpoint answered with a non-2xx status.
    #[error("{provider} API error: {status} {status_text}")]
    ApiError {
        provider: Provider,
        status: u16,
        status_text: String,
    },
}

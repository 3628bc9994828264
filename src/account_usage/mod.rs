//! Account usage lookup via the providers' HTTP usage endpoints.
//!
//! - `credentials`: locating OpenCode's auth store and resolving tokens
//! - `api_client`: one GET per provider and response mapping
//! - `fetcher`: the resolve-then-fetch pipeline run per provider

pub mod api_client;
pub mod credentials;
pub mod fetcher;
pub mod types;

//! Terminal usage report for the Claude and Codex accounts OpenCode is signed in to.

pub mod account_usage;
pub mod config;
pub mod display;
pub mod logging;
pub mod report;
pub mod theme;
pub mod usage_error;
pub mod usage_reset;

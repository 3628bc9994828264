//! Usage windows and reset countdown formatting.
//!
//! A `UsageWindow` pairs a utilization percentage with the absolute instant
//! the window resets. Countdowns are computed at render time against an
//! explicit `now` so the formatting stays deterministic under test.

use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_DAY: i64 = 1440;

/// A rate-limit accounting period.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageWindow {
    /// Percentage used as reported upstream (not clamped)
    pub percent: f64,
    /// When this window resets, if the provider reported it
    pub resets_at: Option<DateTime<Utc>>,
}

impl UsageWindow {
    pub fn new(percent: f64, resets_at: Option<DateTime<Utc>>) -> Self {
        Self { percent, resets_at }
    }

    /// Creates a window whose reset is expressed as an offset from `now`.
    ///
    /// Fractional seconds are kept down to the millisecond. An offset that
    /// lands outside the representable date range leaves the reset unknown.
    pub fn resetting_after(percent: f64, now: DateTime<Utc>, seconds: f64) -> Self {
        let resets_at = Duration::try_milliseconds((seconds * 1000.0).round() as i64)
            .and_then(|offset| now.checked_add_signed(offset));
        if resets_at.is_none() {
            tracing::debug!("Reset offset of {}s is out of range, dropping it", seconds);
        }
        Self { percent, resets_at }
    }
}

/// Formats a millisecond delta as a compact countdown label.
///
/// - `now` for zero or negative deltas
/// - `< 1m` when less than a full minute remains
/// - days and hours once at least a day remains (minutes dropped)
/// - hours and minutes otherwise, omitting zero components
///
/// Examples: "now", "< 1m", "45m", "1h 30m", "2h", "1d 1h", "3d"
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return "now".to_string();
    }

    let total_minutes = ms / MILLIS_PER_MINUTE;
    let days = total_minutes / MINUTES_PER_DAY;
    let hours = (total_minutes % MINUTES_PER_DAY) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 && days == 0 {
        parts.push(format!("{}m", minutes));
    }

    if parts.is_empty() {
        "< 1m".to_string()
    } else {
        parts.join(" ")
    }
}

/// Countdown label from `now` until `resets_at`.
pub fn format_time_until(resets_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_duration((resets_at - now).num_milliseconds())
}

#[cfg(test)]
#[path = "tests/usage_reset_tests.rs"]
mod tests;

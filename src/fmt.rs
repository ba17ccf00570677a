//! Shared formatting helpers for dashboard panels.
//!
//! All pure formatting functions (no ratatui styles, no UI layout) live here.

use chrono::{DateTime, Local, TimeZone};

/// Placeholder for a value that cannot be computed.
pub const NO_VALUE: &str = "--";

/// Format a packets-per-second rate truncated to a whole number, `"--"` for `None`.
pub fn format_packet_rate(rate: Option<f64>) -> String {
    match rate {
        Some(v) => format!("{:.0}", v.trunc()),
        None => NO_VALUE.to_string(),
    }
}

/// Format a megabytes-per-second rate with two decimals, `"--"` for `None`.
pub fn format_mb_rate(rate: Option<f64>) -> String {
    match rate {
        Some(v) => format!("{:.2}", v),
        None => NO_VALUE.to_string(),
    }
}

/// Format a cumulative counter.
pub fn format_count(v: u64) -> String {
    v.to_string()
}

/// Format a unix timestamp as local time (`"2025-01-31 12:00:00"`).
pub fn format_timestamp(epoch_secs: i64) -> String {
    Local
        .timestamp_opt(epoch_secs, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "----".to_string())
}

/// Format a refresh interval in seconds (`"5s"`).
pub fn format_interval(secs: u64) -> String {
    format!("{}s", secs)
}

/// Truncate string to max length with unicode ellipsis (`…`).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

//! Presentation helpers shared by front ends.
//!
//! Backend values are displayed as-is except where a field may be missing
//! or malformed; those helpers render a placeholder instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown for absent or unparseable values.
pub const PLACEHOLDER: &str = "-";

/// Medal for the podium, the plain rank number otherwise.
pub fn rank_badge(rank: u32) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        other => other.to_string(),
    }
}

/// Parse the date formats the backend emits: RFC 3339 timestamps, naive
/// timestamps, and bare `YYYY-MM-DD` dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(stamp.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Render a backend date as e.g. `Mar 9, 2024`, or `-`.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `start - end` with each side guarded independently.
pub fn format_period(start: Option<&str>, end: Option<&str>) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}

/// Kilometres with one decimal, or `-`.
pub fn format_distance(km: Option<f64>) -> String {
    match km {
        Some(km) if km.is_finite() => format!("{km:.1} km"),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_points(points: i64) -> String {
    format!("{points} pts")
}

/// The value, or `fallback` when it is missing or blank.
pub fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback,
    }
}

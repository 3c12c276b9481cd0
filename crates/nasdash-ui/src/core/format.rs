//! Display formatting and the chart data contract.
//!
//! # Design
//! - Pure helpers so cards, tables, and charts format identically.
//! - Charts receive plain `ChartPoint` series; rendering is a separate concern.

use chrono::{DateTime, NaiveDateTime};

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// One labelled value of a chart series.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    /// Category label (core, mount point, container).
    pub label: String,
    /// Plotted value.
    pub value: f64,
}

impl ChartPoint {
    /// Build a point.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Lossy conversion for display math.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn as_f64(value: u64) -> f64 {
    value as f64
}

/// Bytes as mebibytes.
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    as_f64(bytes) / MIB
}

/// `12.34 MB`.
#[must_use]
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes_to_mb(bytes))
}

/// `1.50 GB`.
#[must_use]
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", as_f64(bytes) / GIB)
}

/// Pick the largest unit that keeps the value at or above one.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = as_f64(bytes);
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// `42.5%`.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// `used / limit` as a percentage; zero when the limit is unknown.
#[must_use]
pub fn ratio_percent(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        0.0
    } else {
        as_f64(used) / as_f64(limit) * 100.0
    }
}

/// Round to two decimals for chart values.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `2024-03-01 10:00:00`.
#[must_use]
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format an RFC 3339 engine timestamp, falling back to the raw text.
#[must_use]
pub fn format_engine_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |parsed| parsed.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// First 12 characters of an engine id, without the `sha256:` prefix.
#[must_use]
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.get(..12).unwrap_or(id)
}

//! Display helpers shared by every renderer.
//!
//! Backend timestamps arrive as date-only, naive, or offset ISO-8601
//! strings. Anything that does not parse is shown verbatim.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::net::types::{Coordinates, SiteDifficulty, TemperatureTrend};

const MISSING: &str = "N/A";

/// Default map bounds `[[west, south], [east, north]]` around Oahu.
pub const OAHU_BOUNDS: [[f64; 2]; 2] = [[-158.3, 21.2], [-157.6, 21.7]];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

// =============================================================================
// TEMPERATURE & DHW
// =============================================================================

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// One decimal with unit suffix, or `N/A`.
#[must_use]
pub fn format_temperature(celsius: Option<f64>, unit: TemperatureUnit) -> String {
    match (celsius, unit) {
        (None, _) => MISSING.to_owned(),
        (Some(c), TemperatureUnit::Celsius) => format!("{c:.1}°C"),
        (Some(c), TemperatureUnit::Fahrenheit) => format!("{:.1}°F", celsius_to_fahrenheit(c)),
    }
}

#[must_use]
pub fn format_dhw(dhw: Option<f64>) -> String {
    dhw.map_or_else(|| MISSING.to_owned(), |v| format!("{v:.1} °C-weeks"))
}

/// Heat-stress band for a degree-heating-weeks value.
#[must_use]
pub fn dhw_description(dhw: Option<f64>) -> &'static str {
    match dhw {
        None => "Unknown",
        Some(v) if v < 4.0 => "Normal thermal conditions",
        Some(v) if v < 8.0 => "Elevated heat stress",
        Some(v) if v < 12.0 => "Significant thermal stress",
        Some(_) => "Extreme heat stress",
    }
}

// =============================================================================
// MAP
// =============================================================================

/// Hex marker color for a risk score; unknown or out-of-range is gray.
#[must_use]
pub fn marker_color(score: i8) -> &'static str {
    match score {
        0 => "#22c55e",
        1 => "#eab308",
        2 => "#f97316",
        3 => "#ef4444",
        _ => "#6b7280",
    }
}

/// Bounding box around `points` padded by 10% of each span.
/// Empty input yields [`OAHU_BOUNDS`].
#[must_use]
pub fn calculate_bounds(points: &[Coordinates]) -> [[f64; 2]; 2] {
    if points.is_empty() {
        return OAHU_BOUNDS;
    }
    let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_lon = min_lon.min(p.longitude);
        max_lon = max_lon.max(p.longitude);
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
    }
    let lon_pad = (max_lon - min_lon) * 0.1;
    let lat_pad = (max_lat - min_lat) * 0.1;
    [[min_lon - lon_pad, min_lat - lat_pad], [max_lon + lon_pad, max_lat + lat_pad]]
}

// =============================================================================
// SITE LABELS
// =============================================================================

#[must_use]
pub fn difficulty_label(difficulty: SiteDifficulty) -> &'static str {
    match difficulty {
        SiteDifficulty::Beginner => "Beginner",
        SiteDifficulty::Intermediate => "Intermediate",
        SiteDifficulty::Advanced => "Advanced",
        SiteDifficulty::AllLevels => "All Levels",
    }
}

/// Arrow glyph for a temperature trend; empty when unknown.
#[must_use]
pub fn trend_arrow(trend: Option<TemperatureTrend>) -> &'static str {
    match trend {
        Some(TemperatureTrend::Rising) => "↗",
        Some(TemperatureTrend::Falling) => "↘",
        Some(TemperatureTrend::Stable) => "→",
        Some(TemperatureTrend::Unknown) | None => "",
    }
}

// =============================================================================
// DATES
// =============================================================================

/// Parse any timestamp shape the backend emits. Offsets are normalized to UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0),
        Err(_) => None,
    }
}

fn format_with(raw: &str, pattern: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), |dt| dt.format(pattern).to_string())
}

/// `Jun 15, 2024`
#[must_use]
pub fn format_date(raw: &str) -> String {
    format_with(raw, "%b %-d, %Y")
}

/// `Jun 15, 2024 10:30 AM`
#[must_use]
pub fn format_date_time(raw: &str) -> String {
    format_with(raw, "%b %-d, %Y %-I:%M %p")
}

/// `Jun 15`
#[must_use]
pub fn format_short_date(raw: &str) -> String {
    format_with(raw, "%b %-d")
}

/// Coarse distance from `now`, e.g. `5 minutes ago`. Naive timestamps are
/// taken as UTC.
#[must_use]
pub fn format_relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.to_owned();
    };
    let secs = (now.naive_utc() - then).num_seconds();
    let (value, unit) = match secs.abs() {
        s if s < 60 => return "just now".to_owned(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    let plural = if value == 1 { "" } else { "s" };
    if secs >= 0 {
        format!("{value} {unit}{plural} ago")
    } else {
        format!("in {value} {unit}{plural}")
    }
}

use chrono::TimeZone;

use super::*;

// =============================================================
// Temperature & DHW
// =============================================================

#[test]
fn temperature_formats_in_both_units() {
    assert_eq!(format_temperature(Some(26.54), TemperatureUnit::Celsius), "26.5°C");
    assert_eq!(format_temperature(Some(25.0), TemperatureUnit::Fahrenheit), "77.0°F");
    assert_eq!(format_temperature(None, TemperatureUnit::Fahrenheit), "N/A");
}

#[test]
fn celsius_to_fahrenheit_known_points() {
    assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 1e-9);
    assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 1e-9);
}

#[test]
fn dhw_formats_with_unit() {
    assert_eq!(format_dhw(Some(4.26)), "4.3 °C-weeks");
    assert_eq!(format_dhw(None), "N/A");
}

#[test]
fn dhw_description_band_edges() {
    assert_eq!(dhw_description(None), "Unknown");
    assert_eq!(dhw_description(Some(0.0)), "Normal thermal conditions");
    assert_eq!(dhw_description(Some(3.99)), "Normal thermal conditions");
    assert_eq!(dhw_description(Some(4.0)), "Elevated heat stress");
    assert_eq!(dhw_description(Some(8.0)), "Significant thermal stress");
    assert_eq!(dhw_description(Some(12.0)), "Extreme heat stress");
}

// =============================================================
// Map
// =============================================================

#[test]
fn marker_color_falls_back_to_gray() {
    assert_eq!(marker_color(0), "#22c55e");
    assert_eq!(marker_color(3), "#ef4444");
    assert_eq!(marker_color(-1), "#6b7280");
    assert_eq!(marker_color(9), "#6b7280");
}

#[test]
fn empty_bounds_default_to_oahu() {
    assert_eq!(calculate_bounds(&[]), OAHU_BOUNDS);
}

#[test]
fn bounds_pad_each_axis_by_ten_percent() {
    let points = [
        Coordinates { latitude: 21.0, longitude: -158.0 },
        Coordinates { latitude: 22.0, longitude: -157.0 },
    ];
    let [[west, south], [east, north]] = calculate_bounds(&points);
    assert!((west - -158.1).abs() < 1e-9);
    assert!((south - 20.9).abs() < 1e-9);
    assert!((east - -156.9).abs() < 1e-9);
    assert!((north - 22.1).abs() < 1e-9);
}

#[test]
fn single_point_bounds_have_no_padding() {
    let p = Coordinates { latitude: 21.27, longitude: -157.69 };
    assert_eq!(calculate_bounds(&[p]), [[-157.69, 21.27], [-157.69, 21.27]]);
}

// =============================================================
// Labels
// =============================================================

#[test]
fn difficulty_labels() {
    assert_eq!(difficulty_label(SiteDifficulty::AllLevels), "All Levels");
    assert_eq!(difficulty_label(SiteDifficulty::Beginner), "Beginner");
}

#[test]
fn trend_arrows() {
    assert_eq!(trend_arrow(Some(TemperatureTrend::Rising)), "↗");
    assert_eq!(trend_arrow(Some(TemperatureTrend::Falling)), "↘");
    assert_eq!(trend_arrow(Some(TemperatureTrend::Stable)), "→");
    assert_eq!(trend_arrow(None), "");
}

// =============================================================
// Dates
// =============================================================

#[test]
fn parse_timestamp_accepts_backend_shapes() {
    assert!(parse_timestamp("2024-06-15").is_some());
    assert!(parse_timestamp("2024-06-15T10:30:00").is_some());
    assert!(parse_timestamp("2024-06-15T10:30:00.123456").is_some());
    assert!(parse_timestamp("2024-06-15T10:30:00Z").is_some());
    assert!(parse_timestamp("2024-06-15T10:30:00+02:00").is_some());
    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn date_formats() {
    assert_eq!(format_date("2024-06-05"), "Jun 5, 2024");
    assert_eq!(format_date_time("2024-06-15T14:05:00"), "Jun 15, 2024 2:05 PM");
    assert_eq!(format_short_date("2024-12-01T00:00:00Z"), "Dec 1");
}

#[test]
fn unparseable_dates_render_verbatim() {
    assert_eq!(format_date("soon"), "soon");
    assert_eq!(format_date_time(""), "");
}

#[test]
fn offset_timestamps_normalize_to_utc() {
    assert_eq!(format_date_time("2024-06-15T10:30:00-10:00"), "Jun 15, 2024 8:30 PM");
}

#[test]
fn relative_time_buckets() {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time("2024-06-15T11:59:30", now), "just now");
    assert_eq!(format_relative_time("2024-06-15T11:55:00", now), "5 minutes ago");
    assert_eq!(format_relative_time("2024-06-15T11:00:00Z", now), "1 hour ago");
    assert_eq!(format_relative_time("2024-06-13", now), "2 days ago");
    assert_eq!(format_relative_time("2024-06-15T15:00:00", now), "in 3 hours");
    assert_eq!(format_relative_time("garbage", now), "garbage");
}

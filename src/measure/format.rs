//! Human-readable lengths for measure labels.

use crate::core::{constants::KILOMETER_THRESHOLD_M, geo::LatLng, sphere};

/// Round to two decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a length in meters: kilometers above 100 m, meters otherwise,
/// both with at most two decimals and no trailing zeros.
///
/// ```
/// use mapruler::measure::format::format_meters;
///
/// assert_eq!(format_meters(45.678), "45.68 m");
/// assert_eq!(format_meters(1234.5), "1.23 km");
/// assert_eq!(format_meters(100.0), "100 m");
/// ```
pub fn format_meters(length: f64) -> String {
    if length > KILOMETER_THRESHOLD_M {
        format!("{} km", round2(length / 1000.0))
    } else {
        format!("{} m", round2(length))
    }
}

/// Label for the geodesic length of a line
pub fn format_length(line: &[LatLng]) -> String {
    format_meters(sphere::line_length(line))
}

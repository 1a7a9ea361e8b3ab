//! Planar-degree distance approximation.
//!
//! One degree of latitude or longitude is treated as 111 km and distance is
//! plain Euclidean in degree space, not haversine. The radius check and the
//! displayed distance share the same arithmetic, so they can never disagree
//! in sign. Accuracy degrades near the poles and for radii beyond roughly
//! 300 km.

use crate::types::Coord;

/// Approximate kilometers per degree of latitude/longitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Approximate distance between two coordinates in kilometers.
pub fn approximate_distance_km(a: Coord, b: Coord) -> f64 {
    let dlat = a.latitude - b.latitude;
    let dlng = a.longitude - b.longitude;
    (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
}

/// Whether `b` lies within `radius_km` of `a`.
///
/// Defined directly in terms of [`approximate_distance_km`] so eligibility
/// and the frozen display distance always agree.
pub fn is_within_radius(a: Coord, b: Coord, radius_km: f64) -> bool {
    approximate_distance_km(a, b) <= radius_km
}

/// Distance rounded to the nearest whole kilometer, as frozen into
/// notification records.
pub fn rounded_distance_km(a: Coord, b: Coord) -> u32 {
    approximate_distance_km(a, b).round() as u32
}

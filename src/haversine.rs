//! Great-circle distance between coordinates.
//!
//! Used for edge lengths when building a network from raw OSM ways, where
//! only node coordinates are known.

use crate::traits::LatLon;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two (lat, lon) points in meters.
pub fn haversine_m(from: LatLon, to: LatLon) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Lower bound on the ground distance from a point at latitude `lat` to any
/// point `offset_deg` away in plain (lon, lat) degree space.
///
/// Longitude degrees shrink toward the poles, so the bound uses the cosine of
/// the highest latitude either point can have, with a margin for the
/// equirectangular approximation.
pub fn ground_distance_floor_m(lat: f64, offset_deg: f64) -> f64 {
    let highest_lat = (lat.abs() + offset_deg).min(90.0);
    0.9 * EARTH_RADIUS_M * offset_deg.to_radians() * highest_lat.to_radians().cos()
}

/// Length of a polyline in meters.
pub fn polyline_length_m(points: &[LatLon]) -> f64 {
    points.windows(2).map(|pair| haversine_m(pair[0], pair[1])).sum()
}

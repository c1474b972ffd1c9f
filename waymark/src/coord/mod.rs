//! Geographic coordinate module
//!
//! Provides the position and bounding-box primitives shared by the search,
//! routing and geocoding components, plus great-circle distance math used
//! for placemark deduplication and route scoring.

mod types;

pub use types::{
    CoordError, GeoPoint, GeoRegion, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

/// Computes the central angle between two points in radians (haversine).
///
/// The central angle is a planet-radius independent distance measure: the
/// arc length is `angle * radius`. Thresholds expressed as central angles
/// therefore scale with the active celestial body.
#[inline]
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance between two points in metres, assuming Earth.
#[inline]
pub fn distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_M
}

/// Total length of a waypoint path in metres, assuming Earth.
pub fn path_length_m(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_m(&pair[0], &pair[1]))
        .sum()
}

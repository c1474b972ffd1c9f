//! Geographic type definitions

use std::fmt;
use thiserror::Error;

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Errors from coordinate validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside [-90, 90] degrees.
    #[error("Invalid latitude: {0} (must be between -90 and 90 degrees)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("Invalid longitude: {0} (must be between -180 and 180 degrees)")]
    InvalidLongitude(f64),
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point after validating the coordinate ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Creates a point without range validation.
    ///
    /// Intended for coordinates that are already known to be valid
    /// (e.g. produced by another `GeoPoint`).
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns a hashable key derived from the exact bit patterns.
    ///
    /// Two points compare equal iff their keys are equal, which makes the
    /// key suitable for memoizing per-coordinate results.
    pub fn bit_key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A latitude/longitude aligned bounding box in degrees.
///
/// The box never spans the antimeridian; callers feeding it coordinates
/// near the date line get a conservative (wide) box, which is acceptable
/// for its uses here (search bias regions and route rasterization).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRegion {
    /// Southern edge in degrees.
    pub south: f64,
    /// Northern edge in degrees.
    pub north: f64,
    /// Western edge in degrees.
    pub west: f64,
    /// Eastern edge in degrees.
    pub east: f64,
}

impl GeoRegion {
    /// Creates a region from explicit edges.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Builds the bounding box of a set of points.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut region = Self::new(first.lat, first.lat, first.lon, first.lon);
        for p in iter {
            region.expand(p);
        }
        Some(region)
    }

    /// Grows the region to include the given point.
    pub fn expand(&mut self, point: &GeoPoint) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lon);
        self.east = self.east.max(point.lon);
    }

    /// Returns the union of two regions.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            south: self.south.min(other.south),
            north: self.north.max(other.north),
            west: self.west.min(other.west),
            east: self.east.max(other.east),
        }
    }

    /// Checks whether the point lies inside the region (edges inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }

    /// North-south extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// East-west extent in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Returns the center point of the region.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::from_degrees(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

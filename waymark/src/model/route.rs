//! Route document result type.

use crate::coord::{self, GeoPoint, GeoRegion};

/// A calculated route produced by a routing runner.
///
/// Candidate routes from different runners are compared by the
/// alternative-routes ranker using their waypoint geometry
/// (see [`crate::routing`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDocument {
    /// Name of the runner that produced this route.
    pub runner_name: String,
    /// Display name for the route.
    pub name: String,
    /// The route geometry, ordered from departure to destination.
    pub waypoints: Vec<GeoPoint>,
    /// Whether the route carries turn-by-turn instructions.
    pub has_instructions: bool,
}

impl RouteDocument {
    /// Creates a route document.
    pub fn new(
        runner_name: impl Into<String>,
        name: impl Into<String>,
        waypoints: Vec<GeoPoint>,
        has_instructions: bool,
    ) -> Self {
        Self {
            runner_name: runner_name.into(),
            name: name.into(),
            waypoints,
            has_instructions,
        }
    }

    /// Total path length in metres.
    pub fn length_m(&self) -> f64 {
        coord::path_length_m(&self.waypoints)
    }

    /// Bounding box of the route geometry, `None` for an empty route.
    pub fn bounding_region(&self) -> Option<GeoRegion> {
        GeoRegion::from_points(self.waypoints.iter())
    }

    /// Returns true when the route has no geometry.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

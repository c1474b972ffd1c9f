//! Request payloads, one per work kind.
//!
//! Reverse geocoding takes a bare [`crate::coord::GeoPoint`] and has no
//! dedicated request struct.

use super::document::DocumentRole;
use crate::coord::{GeoPoint, GeoRegion};
use std::path::PathBuf;

/// A place search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// The search term.
    pub term: String,
    /// Preferred region to bias results towards, if any.
    pub region: Option<GeoRegion>,
}

impl SearchQuery {
    /// Creates an unbiased search query.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            region: None,
        }
    }

    /// Restricts the query to prefer the given region.
    pub fn with_region(mut self, region: GeoRegion) -> Self {
        self.region = Some(region);
        self
    }
}

/// A route calculation request over two or more waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    /// Waypoints to visit, in order. At least departure and destination.
    pub waypoints: Vec<GeoPoint>,
    /// Name of the transport profile (e.g. "car", "bicycle"), if any.
    ///
    /// The profile name is payload for the runners; eligibility
    /// restrictions attached to the active profile live on
    /// [`crate::runner::RunContext`].
    pub profile: Option<String>,
}

impl RouteQuery {
    /// Creates a route query without a named profile.
    pub fn new(waypoints: Vec<GeoPoint>) -> Self {
        Self {
            waypoints,
            profile: None,
        }
    }

    /// Sets the named transport profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// A file parsing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseQuery {
    /// Path of the file to parse.
    pub path: PathBuf,
    /// Role the parsed document will play.
    pub role: DocumentRole,
}

impl ParseQuery {
    /// Creates a parse query.
    pub fn new(path: impl Into<PathBuf>, role: DocumentRole) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }
}

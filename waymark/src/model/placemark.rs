//! Placemark result type.

use crate::coord::GeoPoint;

/// A named point of interest returned by search and parsing runners.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    /// Display name (e.g. "Cafe Central").
    pub name: String,
    /// Geographic position.
    pub position: GeoPoint,
    /// Optional longer description or address.
    pub description: Option<String>,
}

impl Placemark {
    /// Creates a placemark with no description.
    pub fn new(name: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            name: name.into(),
            position,
            description: None,
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

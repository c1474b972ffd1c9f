//! Parsed document result type.

use super::placemark::Placemark;

/// The role a parsed file plays in the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// A document opened by the user (shown and listed).
    UserDocument,
    /// A document loaded as part of the map itself.
    MapDocument,
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserDocument => write!(f, "UserDocument"),
            Self::MapDocument => write!(f, "MapDocument"),
        }
    }
}

/// The result of parsing a geodata file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Document name, usually derived from the file name.
    pub name: String,
    /// Placemarks extracted from the file.
    pub placemarks: Vec<Placemark>,
}

impl ParsedDocument {
    /// Creates a parsed document.
    pub fn new(name: impl Into<String>, placemarks: Vec<Placemark>) -> Self {
        Self {
            name: name.into(),
            placemarks,
        }
    }
}

//! Runner capability descriptors.
//!
//! Capabilities are explicit tagged records checked by pure functions
//! (see [`super::filter`]), not runtime type inspection over a plugin
//! hierarchy.

use super::types::WorkKind;
use std::collections::HashSet;

/// Immutable description of a runner's identity and capabilities.
///
/// Built once when the runner is registered and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunnerDescriptor {
    name: String,
    capabilities: HashSet<WorkKind>,
    offline_capable: bool,
    celestial_bodies: Vec<String>,
}

impl RunnerDescriptor {
    /// Creates a descriptor with no capabilities.
    ///
    /// By default the runner is treated as online-only and as supporting
    /// all celestial bodies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: HashSet::new(),
            offline_capable: false,
            celestial_bodies: Vec::new(),
        }
    }

    /// Adds a supported work kind.
    pub fn with_capability(mut self, kind: WorkKind) -> Self {
        self.capabilities.insert(kind);
        self
    }

    /// Marks the runner as usable without network access.
    pub fn offline_capable(mut self, offline_capable: bool) -> Self {
        self.offline_capable = offline_capable;
        self
    }

    /// Restricts the runner to the given celestial bodies.
    ///
    /// An empty set (the default) means all bodies are supported.
    pub fn with_celestial_bodies<I, S>(mut self, bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.celestial_bodies = bodies.into_iter().map(Into::into).collect();
        self
    }

    /// The runner's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks whether the runner supports the given work kind.
    pub fn supports(&self, kind: WorkKind) -> bool {
        self.capabilities.contains(&kind)
    }

    /// Returns true when the runner works without network access.
    pub fn is_offline_capable(&self) -> bool {
        self.offline_capable
    }

    /// Checks whether the runner supports the given celestial body.
    ///
    /// An empty supported set means every body is accepted.
    pub fn supports_celestial_body(&self, body: &str) -> bool {
        self.celestial_bodies.is_empty() || self.celestial_bodies.iter().any(|b| b == body)
    }
}

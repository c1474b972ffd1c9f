//! Runner work kinds and errors.

use std::fmt;
use thiserror::Error;

/// The four kinds of work a runner can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkKind {
    /// Place search by free-text term.
    Search,
    /// Coordinate to textual address resolution.
    ReverseGeocoding,
    /// Route calculation over waypoints.
    Routing,
    /// Geodata file parsing.
    Parsing,
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "Search"),
            Self::ReverseGeocoding => write!(f, "ReverseGeocoding"),
            Self::Routing => write!(f, "Routing"),
            Self::Parsing => write!(f, "Parsing"),
        }
    }
}

/// Errors reported by runner invocations.
///
/// A runner error is terminal for that runner's task only; sibling tasks
/// for the same request keep running and the error never escalates beyond
/// the aggregation step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunnerError {
    /// The runner does not implement this work kind.
    #[error("Runner does not support {0} requests")]
    Unsupported(WorkKind),

    /// The backend failed while performing the work.
    #[error("Backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_kind_display() {
        assert_eq!(format!("{}", WorkKind::Search), "Search");
        assert_eq!(format!("{}", WorkKind::ReverseGeocoding), "ReverseGeocoding");
        assert_eq!(format!("{}", WorkKind::Routing), "Routing");
        assert_eq!(format!("{}", WorkKind::Parsing), "Parsing");
    }

    #[test]
    fn test_runner_error_display() {
        let e = RunnerError::Unsupported(WorkKind::Routing);
        assert!(format!("{}", e).contains("Routing"));

        let e = RunnerError::Backend("connection refused".to_string());
        assert!(format!("{}", e).contains("connection refused"));
    }
}

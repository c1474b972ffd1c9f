//! Runner abstraction
//!
//! A runner is a pluggable backend implementing one or more work kinds
//! (search, reverse geocoding, routing, parsing). Runners are registered
//! with a [`RunnerRegistry`] and selected per request by the capability
//! filter in [`filter`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Orchestration Managers                   │
//! │  one request → eligible_runners() → one task per runner     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │ Registry     │  │ Capability     │  │ Runner trait   │  │
//! │  │ (enumerate)  │  │ Filter (pure)  │  │ (invoke)       │  │
//! │  └──────────────┘  └────────────────┘  └────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod descriptor;
mod filter;
mod registry;
mod types;

pub use descriptor::RunnerDescriptor;
pub use filter::{eligible_runners, RoutingProfile, RunContext};
pub use registry::{RunnerRegistry, StaticRunnerRegistry};
pub use types::{RunnerError, WorkKind};

use crate::coord::GeoPoint;
use crate::model::{ParseQuery, ParsedDocument, Placemark, RouteDocument, RouteQuery, SearchQuery};
use futures::future::BoxFuture;

/// A pluggable backend for one or more work kinds.
///
/// The invocation methods default to reporting [`RunnerError::Unsupported`],
/// so implementors only override the kinds their descriptor advertises.
/// Each method performs one complete unit of work and resolves exactly once;
/// runners never retry internally.
///
/// # Example
///
/// ```ignore
/// use waymark::runner::{Runner, RunnerDescriptor, RunnerError, WorkKind};
/// use waymark::model::{Placemark, SearchQuery};
/// use futures::future::BoxFuture;
///
/// struct LocalDbRunner {
///     descriptor: RunnerDescriptor,
/// }
///
/// impl Runner for LocalDbRunner {
///     fn descriptor(&self) -> &RunnerDescriptor {
///         &self.descriptor
///     }
///
///     fn search<'a>(
///         &'a self,
///         query: &'a SearchQuery,
///     ) -> BoxFuture<'a, Result<Vec<Placemark>, RunnerError>> {
///         Box::pin(async move { Ok(self.lookup(&query.term)) })
///     }
/// }
/// ```
pub trait Runner: Send + Sync + 'static {
    /// Returns the runner's capability descriptor.
    fn descriptor(&self) -> &RunnerDescriptor;

    /// Liveness/availability check, consulted by the capability filter.
    ///
    /// A runner that is registered but currently unable to work (missing
    /// data files, backend unreachable) returns false here and receives
    /// no tasks.
    fn can_work(&self) -> bool {
        true
    }

    /// Searches for placemarks matching the query.
    fn search<'a>(
        &'a self,
        _query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<Vec<Placemark>, RunnerError>> {
        Box::pin(async { Err(RunnerError::Unsupported(WorkKind::Search)) })
    }

    /// Resolves a coordinate to a textual address.
    ///
    /// `Ok(None)` means the runner completed but found nothing.
    fn reverse_geocode<'a>(
        &'a self,
        _position: &'a GeoPoint,
    ) -> BoxFuture<'a, Result<Option<String>, RunnerError>> {
        Box::pin(async { Err(RunnerError::Unsupported(WorkKind::ReverseGeocoding)) })
    }

    /// Calculates one or more route alternatives for the query.
    fn route<'a>(
        &'a self,
        _query: &'a RouteQuery,
    ) -> BoxFuture<'a, Result<Vec<RouteDocument>, RunnerError>> {
        Box::pin(async { Err(RunnerError::Unsupported(WorkKind::Routing)) })
    }

    /// Parses a geodata file into a document.
    fn parse<'a>(
        &'a self,
        _query: &'a ParseQuery,
    ) -> BoxFuture<'a, Result<ParsedDocument, RunnerError>> {
        Box::pin(async { Err(RunnerError::Unsupported(WorkKind::Parsing)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BareRunner {
        descriptor: RunnerDescriptor,
    }

    impl Runner for BareRunner {
        fn descriptor(&self) -> &RunnerDescriptor {
            &self.descriptor
        }
    }

    #[tokio::test]
    async fn test_default_methods_report_unsupported() {
        let runner = BareRunner {
            descriptor: RunnerDescriptor::new("bare"),
        };

        let query = SearchQuery::new("cafe");
        assert_eq!(
            runner.search(&query).await.unwrap_err(),
            RunnerError::Unsupported(WorkKind::Search)
        );

        let position = GeoPoint::from_degrees(0.0, 0.0);
        assert_eq!(
            runner.reverse_geocode(&position).await.unwrap_err(),
            RunnerError::Unsupported(WorkKind::ReverseGeocoding)
        );
    }

    #[test]
    fn test_default_can_work() {
        let runner = BareRunner {
            descriptor: RunnerDescriptor::new("bare"),
        };
        assert!(runner.can_work());
    }
}

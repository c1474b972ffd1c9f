//! Reverse geocoding orchestration.

use super::config::{ManagerConfig, DEFAULT_WAIT_TIMEOUT};
use super::events::EventSink;
use super::manager::Manager;
use super::task::Invoker;
use crate::aggregate::ReverseGeocodingAggregator;
use crate::coord::GeoPoint;
use crate::pool::WorkerPool;
use crate::runner::{RunContext, RunnerRegistry, WorkKind};
use std::sync::Arc;
use std::time::Duration;

/// Resolves a coordinate to a textual address, first non-empty answer wins.
///
/// Resolved coordinates are memoized, so asking again for a coordinate
/// completes immediately. An unresolvable coordinate is announced with
/// `NothingFound`.
pub struct ReverseGeocodingManager {
    inner: Manager<ReverseGeocodingAggregator>,
}

impl ReverseGeocodingManager {
    /// Creates a reverse geocoding manager on the given pool and registry.
    pub fn new(pool: Arc<WorkerPool>, registry: Arc<dyn RunnerRegistry>) -> Self {
        let invoke: Invoker<ReverseGeocodingAggregator> =
            Arc::new(|runner, position: GeoPoint| {
                Box::pin(async move { runner.reverse_geocode(&position).await })
            });
        Self {
            inner: Manager::new(
                ManagerConfig::new(WorkKind::ReverseGeocoding).notify_nothing_found(),
                pool,
                registry,
                ReverseGeocodingAggregator::new(),
                invoke,
            ),
        }
    }

    /// Submits a coordinate, superseding any resolution still in flight.
    pub fn submit(&self, position: GeoPoint) -> u64 {
        self.inner.submit(position)
    }

    /// Resolves a coordinate, waiting for completion or the timeout.
    ///
    /// Returns `None` when no runner produced an address in time; callers
    /// rendering a label typically fall back to an empty string.
    pub async fn resolve(&self, position: GeoPoint, timeout: Option<Duration>) -> Option<String> {
        let generation = self.inner.submit(position);
        self.inner
            .wait_finished(generation, timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT))
            .await
    }

    /// Waits until the given generation finished, returning the snapshot.
    pub async fn wait_finished(&self, generation: u64, timeout: Duration) -> Option<String> {
        self.inner.wait_finished(generation, timeout).await
    }

    /// The address recorded for the current coordinate, if any.
    pub fn address(&self) -> Option<String> {
        self.inner.snapshot()
    }

    /// Returns true when no resolution is in flight.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Registers an event sink.
    pub fn add_sink(&self, sink: Arc<dyn EventSink<Option<String>>>) {
        self.inner.add_sink(sink);
    }

    /// Replaces the run context for subsequent resolutions.
    pub fn set_context(&self, context: RunContext) {
        self.inner.set_context(context);
    }
}

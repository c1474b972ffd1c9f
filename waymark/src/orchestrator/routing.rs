//! Route calculation orchestration.

use super::config::{ManagerConfig, DEFAULT_WAIT_TIMEOUT};
use super::events::EventSink;
use super::manager::Manager;
use super::task::Invoker;
use crate::config::RoutingSettings;
use crate::model::{RouteDocument, RouteQuery};
use crate::pool::WorkerPool;
use crate::routing::{RankerConfig, RouteRanker};
use crate::runner::{RunContext, RunnerRegistry, WorkKind};
use std::sync::Arc;
use std::time::Duration;

/// Calculates route alternatives across all eligible runners.
///
/// Routes arriving within the buffering window after the first response
/// are ranked together, so the preferred default alternative reflects
/// quality rather than runner latency. When no runner produces a route
/// the request is announced with `NothingFound`.
pub struct RoutingManager {
    inner: Manager<RouteRanker>,
}

impl RoutingManager {
    /// Creates a routing manager on the given pool and registry.
    pub fn new(
        pool: Arc<WorkerPool>,
        registry: Arc<dyn RunnerRegistry>,
        settings: &RoutingSettings,
    ) -> Self {
        let invoke: Invoker<RouteRanker> = Arc::new(|runner, query: RouteQuery| {
            Box::pin(async move { runner.route(&query).await })
        });
        Self {
            inner: Manager::new(
                ManagerConfig::new(WorkKind::Routing).notify_nothing_found(),
                pool,
                registry,
                RouteRanker::new(RankerConfig::from(settings)),
                invoke,
            ),
        }
    }

    /// Submits a route query, superseding any calculation still in flight.
    pub fn submit(&self, query: RouteQuery) -> u64 {
        self.inner.submit(query)
    }

    /// Calculates routes, waiting for completion or the timeout.
    ///
    /// The first route of the returned list is the preferred default
    /// alternative.
    pub async fn route(&self, query: RouteQuery, timeout: Option<Duration>) -> Vec<RouteDocument> {
        let generation = self.inner.submit(query);
        self.inner
            .wait_finished(generation, timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT))
            .await
    }

    /// Waits until the given generation finished, returning the snapshot.
    pub async fn wait_finished(&self, generation: u64, timeout: Duration) -> Vec<RouteDocument> {
        self.inner.wait_finished(generation, timeout).await
    }

    /// The route alternatives visible for the current query.
    pub fn routes(&self) -> Vec<RouteDocument> {
        self.inner.snapshot()
    }

    /// Returns true when no calculation is in flight.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Registers an event sink.
    pub fn add_sink(&self, sink: Arc<dyn EventSink<Vec<RouteDocument>>>) {
        self.inner.add_sink(sink);
    }

    /// Replaces the run context for subsequent queries.
    pub fn set_context(&self, context: RunContext) {
        self.inner.set_context(context);
    }
}

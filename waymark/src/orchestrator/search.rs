//! Search orchestration.

use super::config::{ManagerConfig, DEFAULT_WAIT_TIMEOUT};
use super::events::EventSink;
use super::manager::Manager;
use super::task::Invoker;
use crate::aggregate::SearchAggregator;
use crate::config::SearchSettings;
use crate::model::{Placemark, SearchQuery};
use crate::pool::WorkerPool;
use crate::runner::{RunContext, RunnerRegistry, WorkKind};
use std::sync::Arc;
use std::time::Duration;

/// Fans a place search out to all eligible runners and merges their
/// placemarks with spatial dedup.
///
/// Resubmitting the identical query after completion is answered from the
/// previous result without dispatching tasks.
pub struct SearchManager {
    inner: Manager<SearchAggregator>,
}

impl SearchManager {
    /// Creates a search manager on the given pool and registry.
    pub fn new(
        pool: Arc<WorkerPool>,
        registry: Arc<dyn RunnerRegistry>,
        settings: &SearchSettings,
    ) -> Self {
        let invoke: Invoker<SearchAggregator> = Arc::new(|runner, query: SearchQuery| {
            Box::pin(async move { runner.search(&query).await })
        });
        Self {
            inner: Manager::new(
                ManagerConfig::new(WorkKind::Search),
                pool,
                registry,
                SearchAggregator::new(settings.dedup_angle),
                invoke,
            ),
        }
    }

    /// Submits a search, superseding any search still in flight.
    pub fn submit(&self, query: SearchQuery) -> u64 {
        self.inner.submit(query)
    }

    /// Submits a search and waits for completion or the timeout, returning
    /// the placemarks found (possibly partial on timeout).
    pub async fn search(&self, query: SearchQuery, timeout: Option<Duration>) -> Vec<Placemark> {
        let generation = self.inner.submit(query);
        self.inner
            .wait_finished(generation, timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT))
            .await
    }

    /// Waits until the given generation finished, returning the snapshot.
    pub async fn wait_finished(&self, generation: u64, timeout: Duration) -> Vec<Placemark> {
        self.inner.wait_finished(generation, timeout).await
    }

    /// The placemarks accumulated for the current search.
    pub fn placemarks(&self) -> Vec<Placemark> {
        self.inner.snapshot()
    }

    /// Returns true when no search is in flight.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Registers an event sink.
    pub fn add_sink(&self, sink: Arc<dyn EventSink<Vec<Placemark>>>) {
        self.inner.add_sink(sink);
    }

    /// Replaces the run context for subsequent searches.
    pub fn set_context(&self, context: RunContext) {
        self.inner.set_context(context);
    }
}

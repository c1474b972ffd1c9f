//! Geodata file parsing orchestration.

use super::config::{ManagerConfig, DEFAULT_WAIT_TIMEOUT};
use super::events::EventSink;
use super::manager::Manager;
use super::task::Invoker;
use crate::aggregate::{ParseReport, ParsingAggregator};
use crate::model::ParseQuery;
use crate::pool::WorkerPool;
use crate::runner::{RunContext, RunnerRegistry, WorkKind};
use std::sync::Arc;
use std::time::Duration;

/// Parses a geodata file by trying all eligible parser runners.
///
/// The first successfully parsed document wins; when every runner fails
/// the first error is kept for diagnostics.
pub struct ParsingManager {
    inner: Manager<ParsingAggregator>,
}

impl ParsingManager {
    /// Creates a parsing manager on the given pool and registry.
    pub fn new(pool: Arc<WorkerPool>, registry: Arc<dyn RunnerRegistry>) -> Self {
        let invoke: Invoker<ParsingAggregator> = Arc::new(|runner, query: ParseQuery| {
            Box::pin(async move { runner.parse(&query).await })
        });
        Self {
            inner: Manager::new(
                ManagerConfig::new(WorkKind::Parsing),
                pool,
                registry,
                ParsingAggregator::new(),
                invoke,
            ),
        }
    }

    /// Submits a file, superseding any parse still in flight.
    pub fn submit(&self, query: ParseQuery) -> u64 {
        self.inner.submit(query)
    }

    /// Parses a file, waiting for completion or the timeout.
    pub async fn parse(&self, query: ParseQuery, timeout: Option<Duration>) -> ParseReport {
        let generation = self.inner.submit(query);
        self.inner
            .wait_finished(generation, timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT))
            .await
    }

    /// Waits until the given generation finished, returning the snapshot.
    pub async fn wait_finished(&self, generation: u64, timeout: Duration) -> ParseReport {
        self.inner.wait_finished(generation, timeout).await
    }

    /// The report for the current parse.
    pub fn report(&self) -> ParseReport {
        self.inner.snapshot()
    }

    /// Returns true when no parse is in flight.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Registers an event sink.
    pub fn add_sink(&self, sink: Arc<dyn EventSink<ParseReport>>) {
        self.inner.add_sink(sink);
    }

    /// Replaces the run context for subsequent parses.
    pub fn set_context(&self, context: RunContext) {
        self.inner.set_context(context);
    }
}

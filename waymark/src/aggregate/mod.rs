//! Result aggregation strategies.
//!
//! The orchestration manager is generic over an [`Aggregator`]: per-kind
//! logic that folds individual task outcomes into the caller-visible
//! result. The manager serializes all calls into the aggregator behind its
//! state mutex, so implementations are free of interior locking.
//!
//! Strategies:
//! - [`SearchAggregator`] — merged placemark collection with spatial dedup
//! - [`ReverseGeocodingAggregator`] — first non-empty address wins
//! - [`ParsingAggregator`] — first successful document or first error
//! - [`crate::routing::RouteRanker`] — buffered, similarity-ranked routes

mod parse;
mod reverse;
mod search;

pub use parse::{ParseReport, ParsingAggregator};
pub use reverse::ReverseGeocodingAggregator;
pub use search::SearchAggregator;

use std::time::Duration;
use tokio::time::Instant;

/// What a fresh request means for the aggregator's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDisposition {
    /// The request needs tasks dispatched.
    Fresh,
    /// The aggregator already holds the answer (idempotent resubmission or
    /// a memoized result); the manager finishes without dispatching tasks.
    AlreadySatisfied,
}

/// Metadata accompanying a task outcome.
#[derive(Debug, Clone)]
pub struct OutcomeMeta {
    /// Name of the runner that produced the outcome.
    pub runner: String,
    /// Time from dispatch to outcome.
    pub latency: Duration,
}

/// Per-kind logic combining task outcomes into one result.
///
/// Lifecycle per request: one `reset`, then zero or more `on_outcome`
/// calls (one per task, arbitrary order), interleaved `flush` calls for
/// buffered strategies, and one `on_finished` when the outstanding set
/// drains. All calls are serialized by the owning manager.
pub trait Aggregator: Send + 'static {
    /// The request payload this strategy aggregates for.
    type Request: Clone + Send + Sync + 'static;
    /// One task's outcome.
    type Outcome: Send + 'static;
    /// The caller-visible result collection.
    type Snapshot: Clone + Send + Sync + 'static;

    /// Prepares for a new request, discarding the previous accumulation.
    ///
    /// Returning [`ResetDisposition::AlreadySatisfied`] short-circuits the
    /// request: the current snapshot is published as the final result and
    /// no tasks are created.
    fn reset(&mut self, request: &Self::Request) -> ResetDisposition;

    /// Folds one task outcome into the accumulation.
    ///
    /// Returns true when the visible snapshot changed.
    fn on_outcome(&mut self, outcome: Self::Outcome, meta: &OutcomeMeta) -> bool;

    /// Hands out a pending flush deadline, at most once per request.
    ///
    /// Buffered strategies (routing) return the instant at which the
    /// manager should call [`Aggregator::flush`]; others return `None`.
    fn take_flush_deadline(&mut self) -> Option<Instant> {
        None
    }

    /// Promotes buffered outcomes into the visible snapshot.
    ///
    /// Called when the flush deadline elapses and, in any case, before the
    /// request completes. Returns true when the snapshot changed.
    fn flush(&mut self) -> bool {
        false
    }

    /// Notifies the aggregator that the request completed.
    fn on_finished(&mut self) {}

    /// Returns true when the accumulation holds no result.
    fn is_empty(&self) -> bool;

    /// Returns the current caller-visible result.
    fn snapshot(&self) -> Self::Snapshot;
}

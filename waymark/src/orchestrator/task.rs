//! Runner task execution.
//!
//! One task pairs one runner with one request. A task waits for a pool
//! slot, invokes the runner, and reports the outcome back to its manager.
//! Cancellation (supersession) is observed at the two await points; a task
//! never interrupts a runner invocation that already completed.

use super::manager::Shared;
use crate::aggregate::{Aggregator, OutcomeMeta};
use super::events::RunEvent;
use crate::pool::WorkerPool;
use crate::runner::Runner;
use futures::future::BoxFuture;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Adapts a typed runner invocation to the aggregator's outcome type.
///
/// The closure owns its arguments so the resulting future is `'static`
/// and can be driven by a spawned task.
pub(crate) type Invoker<A> = Arc<
    dyn Fn(
            Arc<dyn Runner>,
            <A as Aggregator>::Request,
        ) -> BoxFuture<'static, <A as Aggregator>::Outcome>
        + Send
        + Sync,
>;

/// Spawns one task executing `request` on `runner`.
///
/// Latency is measured from dispatch, so queueing for a pool slot counts
/// toward it.
pub(crate) fn spawn_runner_task<A: Aggregator>(
    shared: Arc<Shared<A>>,
    pool: Arc<WorkerPool>,
    runner: Arc<dyn Runner>,
    request: A::Request,
    generation: u64,
    cancel: CancellationToken,
    invoke: Invoker<A>,
) {
    tokio::spawn(async move {
        let runner_name = runner.descriptor().name().to_string();
        let started = Instant::now();

        let permit = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(runner = %runner_name, generation, "task cancelled while queued");
                return;
            }
            permit = pool.acquire() => permit,
        };

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(runner = %runner_name, generation, "task cancelled mid-flight");
                return;
            }
            outcome = invoke(runner, request) => outcome,
        };
        drop(permit);

        complete(shared, generation, runner_name, started.elapsed(), outcome);
    });
}

/// Folds one outcome into the manager state and handles request completion.
fn complete<A: Aggregator>(
    shared: Arc<Shared<A>>,
    generation: u64,
    runner: String,
    latency: Duration,
    outcome: A::Outcome,
) {
    let mut events: Vec<RunEvent<A::Snapshot>> = Vec::new();
    let mut flush_at: Option<Instant> = None;
    {
        let mut st = shared.lock();
        if generation != shared.generation.load(Ordering::SeqCst) || st.finished {
            debug!(runner = %runner, generation, "stale outcome dropped");
            return;
        }

        let meta = OutcomeMeta { runner, latency };
        if st.aggregator.on_outcome(outcome, &meta) {
            events.push(RunEvent::ResultsChanged(st.aggregator.snapshot()));
        }

        if !st.flush_scheduled {
            if let Some(deadline) = st.aggregator.take_flush_deadline() {
                st.flush_scheduled = true;
                flush_at = Some(deadline);
            }
        }

        st.outstanding -= 1;
        if st.outstanding == 0 {
            shared.finish_locked(&mut st, generation, &mut events);
        }
        shared.enqueue(events);
    }
    shared.deliver();

    if let Some(deadline) = flush_at {
        spawn_flush_task(shared, generation, deadline);
    }
}

/// Waits for the flush deadline and promotes buffered outcomes.
///
/// A no-op when the request was superseded or finished in the meantime;
/// the completion path flushes on its own.
fn spawn_flush_task<A: Aggregator>(shared: Arc<Shared<A>>, generation: u64, deadline: Instant) {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let mut events: Vec<RunEvent<A::Snapshot>> = Vec::new();
        {
            let mut st = shared.lock();
            if generation != shared.generation.load(Ordering::SeqCst) || st.finished {
                return;
            }
            if st.aggregator.flush() {
                events.push(RunEvent::ResultsChanged(st.aggregator.snapshot()));
            }
            shared.enqueue(events);
        }
        shared.deliver();
    });
}

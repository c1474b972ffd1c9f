//! The generic orchestration manager.
//!
//! One manager owns one work kind. A request supersedes the previous one:
//! the manager bumps its generation counter, cancels outstanding tasks and
//! dispatches one task per eligible runner. Task outcomes are folded into
//! the manager's [`Aggregator`]; outcomes carrying a stale generation are
//! dropped without touching the result.
//!
//! All aggregator access happens behind a single state mutex. Events are
//! queued while the lock is held, so the queue order matches the order
//! state changes were applied, and delivered by a single drainer after the
//! lock is released; a sink may therefore call back into the manager.

use super::config::ManagerConfig;
use super::events::{EventSink, RunEvent};
use super::task::{self, Invoker};
use crate::aggregate::{Aggregator, ResetDisposition};
use crate::pool::WorkerPool;
use crate::runner::{eligible_runners, RunContext, Runner, RunnerRegistry, WorkKind};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Mutable per-request state, guarded by the manager's mutex.
pub(crate) struct ManagerState<A: Aggregator> {
    pub(crate) aggregator: A,
    pub(crate) context: RunContext,
    /// Tasks dispatched for the current generation and not yet accounted for.
    pub(crate) outstanding: usize,
    pub(crate) finished: bool,
    /// Cancels tasks of the current generation on supersession.
    pub(crate) cancel: CancellationToken,
    /// Whether a flush timer was already armed for the current generation.
    pub(crate) flush_scheduled: bool,
}

/// State shared between the manager handle and its spawned tasks.
pub(crate) struct Shared<A: Aggregator> {
    pub(crate) cfg: ManagerConfig,
    /// Monotonic request counter; outcomes tagged with an older value are
    /// stale.
    pub(crate) generation: AtomicU64,
    pub(crate) state: Mutex<ManagerState<A>>,
    /// Publishes the generation of the most recently finished request.
    pub(crate) finished_tx: watch::Sender<u64>,
    sinks: RwLock<Vec<Arc<dyn EventSink<A::Snapshot>>>>,
    /// Events awaiting delivery, in the order their state changes were
    /// applied.
    events: Mutex<VecDeque<RunEvent<A::Snapshot>>>,
    /// Held by the one task currently draining the event queue.
    delivering: Mutex<()>,
}

impl<A: Aggregator> Shared<A> {
    pub(crate) fn lock(&self) -> MutexGuard<'_, ManagerState<A>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues events for delivery.
    ///
    /// Call while holding the state lock so the queue order matches the
    /// order the corresponding state changes were applied.
    pub(crate) fn enqueue(&self, events: Vec<RunEvent<A::Snapshot>>) {
        if events.is_empty() {
            return;
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(events);
    }

    /// Delivers queued events to the sinks, one at a time, in queue order.
    ///
    /// Safe to call from several tasks at once: one caller drains while
    /// the others return immediately. Call without holding the state lock;
    /// sinks may call back into the manager.
    pub(crate) fn deliver(&self) {
        loop {
            {
                let _guard = match self.delivering.try_lock() {
                    Ok(guard) => guard,
                    Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                    // Another task is draining and will pick our events up.
                    Err(TryLockError::WouldBlock) => return,
                };
                while let Some(event) = self.pop_event() {
                    let sinks = self.sinks_snapshot();
                    for sink in &sinks {
                        sink.on_event(event.clone());
                    }
                }
            }
            // An event enqueued between the final pop and the guard release
            // was skipped by its own deliver call; re-check for it.
            if self
                .events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
            {
                return;
            }
        }
    }

    fn pop_event(&self) -> Option<RunEvent<A::Snapshot>> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Copies the sink list out of its lock, so a sink may register
    /// further sinks from inside its callback.
    fn sinks_snapshot(&self) -> Vec<Arc<dyn EventSink<A::Snapshot>>> {
        self.sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn add_sink(&self, sink: Arc<dyn EventSink<A::Snapshot>>) {
        self.sinks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sink);
    }

    /// Completes the current request. Caller holds the state lock, queues
    /// the collected events before releasing it and delivers afterwards.
    pub(crate) fn finish_locked(
        &self,
        st: &mut ManagerState<A>,
        generation: u64,
        events: &mut Vec<RunEvent<A::Snapshot>>,
    ) {
        if st.aggregator.flush() {
            events.push(RunEvent::ResultsChanged(st.aggregator.snapshot()));
        }
        st.finished = true;
        st.aggregator.on_finished();
        if self.cfg.notify_nothing_found && st.aggregator.is_empty() {
            events.push(RunEvent::NothingFound);
        }
        events.push(RunEvent::Finished(st.aggregator.snapshot()));
        self.finished_tx.send_replace(generation);
        debug!(kind = %self.cfg.kind, generation, "request finished");
    }
}

/// Orchestrates one work kind over a registry of runners.
///
/// The manager is parameterized by its [`Aggregator`], which decides how
/// task outcomes combine into the caller-visible result. Construction goes
/// through the typed wrappers ([`super::SearchManager`] and friends),
/// which pair each kind with its aggregation strategy.
pub struct Manager<A: Aggregator> {
    shared: Arc<Shared<A>>,
    pool: Arc<WorkerPool>,
    registry: Arc<dyn RunnerRegistry>,
    invoke: Invoker<A>,
}

impl<A: Aggregator> Manager<A> {
    pub(crate) fn new(
        cfg: ManagerConfig,
        pool: Arc<WorkerPool>,
        registry: Arc<dyn RunnerRegistry>,
        aggregator: A,
        invoke: Invoker<A>,
    ) -> Self {
        let shared = Shared {
            cfg,
            generation: AtomicU64::new(0),
            state: Mutex::new(ManagerState {
                aggregator,
                context: RunContext::default(),
                outstanding: 0,
                finished: true,
                cancel: CancellationToken::new(),
                flush_scheduled: false,
            }),
            finished_tx: watch::channel(0).0,
            sinks: RwLock::new(Vec::new()),
            events: Mutex::new(VecDeque::new()),
            delivering: Mutex::new(()),
        };
        Self {
            shared: Arc::new(shared),
            pool,
            registry,
            invoke,
        }
    }

    /// The work kind this manager dispatches.
    pub fn kind(&self) -> WorkKind {
        self.shared.cfg.kind
    }

    /// Registers an event sink. Sinks receive events for requests
    /// submitted after registration.
    pub fn add_sink(&self, sink: Arc<dyn EventSink<A::Snapshot>>) {
        self.shared.add_sink(sink);
    }

    /// Replaces the run context consulted by the capability filter.
    ///
    /// Applies to subsequently submitted requests; tasks already in
    /// flight are unaffected.
    pub fn set_context(&self, context: RunContext) {
        self.shared.lock().context = context;
    }

    /// Returns a copy of the current run context.
    pub fn context(&self) -> RunContext {
        self.shared.lock().context.clone()
    }

    /// Returns the current caller-visible result.
    pub fn snapshot(&self) -> A::Snapshot {
        self.shared.lock().aggregator.snapshot()
    }

    /// Returns true when no request is in flight.
    pub fn is_finished(&self) -> bool {
        self.shared.lock().finished
    }

    /// Submits a request, superseding any request still in flight.
    ///
    /// Returns the request's generation, which can be passed to
    /// [`Manager::wait_finished`]. Dispatches one task per eligible
    /// runner; with zero eligible runners the request completes
    /// immediately with an empty result.
    pub fn submit(&self, request: A::Request) -> u64 {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        let mut events: Vec<RunEvent<A::Snapshot>> = Vec::new();
        let mut dispatch: Vec<Arc<dyn Runner>> = Vec::new();
        {
            let mut st = self.shared.lock();
            st.cancel.cancel();
            st.cancel = cancel.clone();
            st.flush_scheduled = false;

            match st.aggregator.reset(&request) {
                ResetDisposition::AlreadySatisfied => {
                    st.outstanding = 0;
                    debug!(
                        kind = %self.shared.cfg.kind,
                        generation,
                        "request satisfied by previous result, no tasks dispatched"
                    );
                    self.shared.finish_locked(&mut st, generation, &mut events);
                }
                ResetDisposition::Fresh => {
                    let eligible =
                        eligible_runners(self.shared.cfg.kind, &st.context, self.registry.as_ref());
                    if eligible.is_empty() {
                        st.outstanding = 0;
                        debug!(
                            kind = %self.shared.cfg.kind,
                            generation,
                            "no eligible runners, finishing with empty result"
                        );
                        self.shared.finish_locked(&mut st, generation, &mut events);
                    } else {
                        st.outstanding = eligible.len();
                        st.finished = false;
                        debug!(
                            kind = %self.shared.cfg.kind,
                            generation,
                            tasks = eligible.len(),
                            "dispatching tasks"
                        );
                        dispatch = eligible;
                    }
                }
            }
            self.shared.enqueue(events);
        }
        self.shared.deliver();

        for runner in dispatch {
            task::spawn_runner_task(
                Arc::clone(&self.shared),
                Arc::clone(&self.pool),
                runner,
                request.clone(),
                generation,
                cancel.clone(),
                Arc::clone(&self.invoke),
            );
        }
        generation
    }

    /// Waits until the request with the given generation (or a later one)
    /// has finished, then returns the snapshot.
    ///
    /// On timeout the partial result accumulated so far is returned; a
    /// timeout is never an error.
    ///
    /// Must not be awaited from inside a runner serving this manager, as
    /// that runner's task is part of what is being waited for.
    pub async fn wait_finished(&self, generation: u64, timeout: Duration) -> A::Snapshot {
        let mut rx = self.shared.finished_tx.subscribe();
        let wait = async {
            loop {
                if *rx.borrow_and_update() >= generation {
                    break;
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        };
        if tokio::time::timeout(timeout, wait).await.is_err() {
            debug!(
                kind = %self.shared.cfg.kind,
                generation,
                "wait timed out, returning partial result"
            );
        }
        self.snapshot()
    }
}

//! Manager event notifications.
//!
//! Managers report progress through [`EventSink`] implementations that are
//! registered with [`super::Manager::add_sink`]. Sinks are invoked outside
//! the manager's state lock, one event at a time, in the order the manager
//! applied the corresponding state changes; a stalled sink delays later
//! deliveries but never reorders them.

use std::sync::Arc;
use tokio::sync::mpsc;

/// Progress notification for one request.
///
/// For every request the manager emits zero or more `ResultsChanged`
/// events followed by exactly one `Finished`. `NothingFound` is emitted
/// at most once, directly before `Finished`, and only by managers
/// configured to report it.
#[derive(Debug, Clone)]
pub enum RunEvent<S> {
    /// The visible result collection changed; carries the new snapshot.
    ResultsChanged(S),
    /// The request completed with an empty result.
    NothingFound,
    /// All tasks of the request have been accounted for; carries the
    /// final snapshot.
    Finished(S),
}

/// Receiver of manager events.
pub trait EventSink<S>: Send + Sync {
    /// Delivers one event. Must return promptly.
    fn on_event(&self, event: RunEvent<S>);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl<S> EventSink<S> for NullEventSink {
    fn on_event(&self, _event: RunEvent<S>) {}
}

/// A sink that forwards events into an unbounded channel.
///
/// The receiving half is handed out on construction; dropped receivers
/// silently discard further events.
pub struct ChannelEventSink<S> {
    tx: mpsc::UnboundedSender<RunEvent<S>>,
}

impl<S: Send + 'static> ChannelEventSink<S> {
    /// Creates a sink and the receiver its events arrive on.
    pub fn pair() -> (Arc<Self>, mpsc::UnboundedReceiver<RunEvent<S>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl<S: Send + 'static> EventSink<S> for ChannelEventSink<S> {
    fn on_event(&self, event: RunEvent<S>) {
        let _ = self.tx.send(event);
    }
}

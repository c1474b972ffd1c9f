//! Manager configuration.

use crate::runner::WorkKind;
use std::time::Duration;

/// Default timeout for the blocking-style wait API.
pub const DEFAULT_WAIT_TIMEOUT: Duration =
    Duration::from_secs(crate::config::DEFAULT_WAIT_TIMEOUT_SECS);

/// Static behavior of one manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// The work kind this manager dispatches.
    pub kind: WorkKind,
    /// Whether an empty final result is announced with
    /// [`super::RunEvent::NothingFound`].
    pub notify_nothing_found: bool,
}

impl ManagerConfig {
    /// Creates a config for the given kind without empty-result
    /// notification.
    pub fn new(kind: WorkKind) -> Self {
        Self {
            kind,
            notify_nothing_found: false,
        }
    }

    /// Enables the empty-result notification.
    pub fn notify_nothing_found(mut self) -> Self {
        self.notify_nothing_found = true;
        self
    }
}

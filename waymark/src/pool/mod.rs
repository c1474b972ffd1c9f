//! Worker pool for task concurrency control.
//!
//! A single semaphore-backed pool bounds how many runner tasks execute
//! simultaneously. The pool is shared by all managers and injected as an
//! `Arc<WorkerPool>` so managers stay independently testable — there is no
//! process-wide singleton.
//!
//! The pool guarantees a minimum of [`MIN_POOL_SLOTS`] concurrent tasks:
//! a smaller configured capacity is raised to the minimum.
//!
//! # Example
//!
//! ```ignore
//! use waymark::pool::WorkerPool;
//! use std::sync::Arc;
//!
//! let pool = Arc::new(WorkerPool::with_defaults());
//! let permit = pool.acquire().await;
//! // Run one task...
//! drop(permit); // Release the slot
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Minimum number of concurrent execution slots.
pub const MIN_POOL_SLOTS: usize = 4;

/// Configuration for the worker pool.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of concurrent execution slots.
    pub slots: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(MIN_POOL_SLOTS);
        Self {
            slots: cpus.max(MIN_POOL_SLOTS),
        }
    }
}

impl From<&crate::config::PoolSettings> for PoolConfig {
    fn from(settings: &crate::config::PoolSettings) -> Self {
        Self {
            slots: settings.slots,
        }
    }
}

/// A semaphore-backed bounded pool of execution slots.
///
/// Tasks acquire a permit before invoking their runner and release it on
/// completion via RAII. The pool provides no ordering guarantee between
/// waiting tasks.
#[derive(Debug)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    slots: usize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: AtomicUsize,
}

impl WorkerPool {
    /// Creates a pool with the given configuration.
    ///
    /// A configured capacity below [`MIN_POOL_SLOTS`] is raised to the
    /// minimum.
    pub fn new(config: PoolConfig) -> Self {
        let slots = config.slots.max(MIN_POOL_SLOTS);
        Self {
            semaphore: Arc::new(Semaphore::new(slots)),
            slots,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Creates a pool with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default())
    }

    /// Acquires a slot, waiting if none is available.
    pub async fn acquire(&self) -> PoolPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("worker pool semaphore closed unexpectedly");

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        PoolPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Tries to acquire a slot without waiting.
    ///
    /// Returns `None` if the pool is saturated.
    pub fn try_acquire(&self) -> Option<PoolPermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.update_peak(current);

        Some(PoolPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Updates the peak counter if current exceeds it.
    fn update_peak(&self, current: usize) {
        let mut peak = self.peak_in_flight.load(Ordering::Relaxed);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    /// Total number of execution slots.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of currently available slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Number of tasks currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Peak number of concurrent tasks observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Resets the peak counter.
    pub fn reset_peak(&self) {
        self.peak_in_flight.store(0, Ordering::Relaxed);
    }
}

/// A permit for one execution slot.
///
/// While this permit is held it counts against the pool's capacity.
/// The slot is released when the permit is dropped.
pub struct PoolPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for PoolPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for PoolPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolPermit").finish()
    }
}

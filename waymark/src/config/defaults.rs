//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, CPU-aware helper functions, and the
//! `Default` implementations for the settings structs.

use super::settings::*;
use crate::coord::EARTH_RADIUS_M;
use crate::pool::MIN_POOL_SLOTS;

// =============================================================================
// Constants
// =============================================================================

/// Default search dedup threshold: a central angle whose arc length on
/// Earth is roughly one metre.
pub const DEFAULT_SEARCH_DEDUP_ANGLE: f64 = 1.0 / EARTH_RADIUS_M;

/// Default similarity cutoff for duplicate route detection.
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.8;

/// Default lower bound of the route buffering window in milliseconds.
pub const DEFAULT_WINDOW_MIN_MS: u64 = 50;

/// Default upper bound of the route buffering window in milliseconds.
pub const DEFAULT_WINDOW_MAX_MS: u64 = 500;

/// Default buffering window multiplier over the first response latency.
pub const DEFAULT_LATENCY_MULTIPLIER: f64 = 2.0;

/// Default raster grid edge length for route similarity.
pub const DEFAULT_RASTER_SIZE: usize = 64;

/// Default timeout for the blocking-style API in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// CPU helpers
// =============================================================================

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_POOL_SLOTS)
}

/// Default pool slot count: the ambient parallelism, raised to the pool
/// minimum.
pub fn default_pool_slots() -> usize {
    num_cpus().max(MIN_POOL_SLOTS)
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            slots: default_pool_slots(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            dedup_angle: DEFAULT_SEARCH_DEDUP_ANGLE,
        }
    }
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
            window_min_ms: DEFAULT_WINDOW_MIN_MS,
            window_max_ms: DEFAULT_WINDOW_MAX_MS,
            latency_multiplier: DEFAULT_LATENCY_MULTIPLIER,
            raster_size: DEFAULT_RASTER_SIZE,
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
        }
    }
}

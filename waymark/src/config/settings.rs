//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic; constants live in
//! [`super::defaults`], file handling in [`super::file`].

use std::time::Duration;

/// Complete orchestration configuration.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorSettings {
    /// Worker pool settings
    pub pool: PoolSettings,
    /// Search aggregation settings
    pub search: SearchSettings,
    /// Alternative-routes ranking settings
    pub routing: RoutingSettings,
    /// Synchronous wait settings
    pub wait: WaitSettings,
}

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Number of concurrent execution slots (raised to the pool minimum).
    pub slots: usize,
}

/// Search aggregation configuration.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Dedup threshold as a central angle in radians.
    ///
    /// Placemarks closer than this are treated as duplicates. Expressed
    /// as an angle so the effective arc distance scales with the planet
    /// radius.
    pub dedup_angle: f64,
}

/// Alternative-routes ranking configuration.
#[derive(Debug, Clone)]
pub struct RoutingSettings {
    /// Similarity above which two routes count as duplicates.
    pub similarity_cutoff: f64,
    /// Lower bound of the buffering window in milliseconds.
    pub window_min_ms: u64,
    /// Upper bound of the buffering window in milliseconds.
    pub window_max_ms: u64,
    /// Buffering window length as a multiple of the first response latency.
    pub latency_multiplier: f64,
    /// Raster grid edge length for similarity detection.
    pub raster_size: usize,
}

/// Synchronous wait configuration.
#[derive(Debug, Clone)]
pub struct WaitSettings {
    /// Default timeout in seconds for the blocking-style API.
    pub default_timeout_secs: u64,
}

impl WaitSettings {
    /// Default timeout as a [`Duration`].
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

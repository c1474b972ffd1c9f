//! Configuration for the runner orchestration subsystem.
//!
//! Settings are grouped per concern (pool, search, routing, wait) and can
//! be loaded from an INI file or used with defaults.
//!
//! # Example
//!
//! ```ignore
//! use waymark::config::OrchestratorSettings;
//!
//! let settings = OrchestratorSettings::load()?;
//! println!("pool slots: {}", settings.pool.slots);
//! ```

pub mod defaults;
mod file;
mod settings;

pub use defaults::{
    default_pool_slots, num_cpus, DEFAULT_LATENCY_MULTIPLIER, DEFAULT_RASTER_SIZE,
    DEFAULT_SEARCH_DEDUP_ANGLE, DEFAULT_SIMILARITY_CUTOFF, DEFAULT_WAIT_TIMEOUT_SECS,
    DEFAULT_WINDOW_MAX_MS, DEFAULT_WINDOW_MIN_MS,
};
pub use file::{config_directory, config_file_path, ConfigError};
pub use settings::{
    OrchestratorSettings, PoolSettings, RoutingSettings, SearchSettings, WaitSettings,
};

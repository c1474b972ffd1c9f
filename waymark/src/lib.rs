//! Waymark - runner orchestration for desktop map applications
//!
//! This library coordinates pluggable backends ("runners") that perform place
//! search, reverse geocoding, route calculation and file parsing. For each
//! request it filters the registered runners by capability, fans one task per
//! eligible runner out onto a bounded worker pool, aggregates the asynchronous
//! outcomes (deduplicating and ranking where applicable) and publishes both
//! event-driven and wait-with-timeout result surfaces.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use waymark::model::SearchQuery;
//! use waymark::runner::StaticRunnerRegistry;
//! use waymark::service::RunnerService;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StaticRunnerRegistry::new());
//! let service = RunnerService::with_defaults(registry);
//!
//! // Blocking-style call: returns whatever arrived within the timeout.
//! let placemarks = service.search(SearchQuery::new("cafe"), None).await;
//! ```

pub mod aggregate;
pub mod config;
pub mod coord;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod pool;
pub mod routing;
pub mod runner;
pub mod service;

/// Version of the Waymark library.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

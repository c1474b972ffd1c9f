//! Request orchestration.
//!
//! One manager per work kind turns a request into one task per eligible
//! runner, folds the outcomes through an aggregation strategy, and
//! announces progress through event sinks. A new request supersedes the
//! previous one; outcomes from superseded tasks never surface.
//!
//! # Architecture
//!
//! ```text
//! submit(request)
//!     │  bump generation, cancel previous tasks
//!     ▼
//! eligible_runners() ──► one task per runner ──► WorkerPool slot
//!     │                        │
//!     │                        ▼
//!     │                  Aggregator::on_outcome (stale outcomes dropped)
//!     │                        │
//!     ▼                        ▼
//! EventSink ◄── ResultsChanged / NothingFound / Finished
//! ```
//!
//! # Example
//!
//! ```ignore
//! use waymark::orchestrator::SearchManager;
//! use waymark::model::SearchQuery;
//!
//! let manager = SearchManager::new(pool, registry, &settings.search);
//! let placemarks = manager
//!     .search(SearchQuery::new("alexanderplatz"), None)
//!     .await;
//! ```

mod config;
mod events;
mod manager;
mod parsing;
mod reverse;
mod routing;
mod search;
mod task;

pub use config::{ManagerConfig, DEFAULT_WAIT_TIMEOUT};
pub use events::{ChannelEventSink, EventSink, NullEventSink, RunEvent};
pub use manager::Manager;
pub use parsing::ParsingManager;
pub use reverse::ReverseGeocodingManager;
pub use routing::RoutingManager;
pub use search::SearchManager;

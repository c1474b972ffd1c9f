//! Alternative-routes ranking
//!
//! Routing is the one work kind where naive aggregation fails visibly:
//! multiple runners return near-identical alternatives at different
//! latencies, and first-come-first-served selection crowns the fastest
//! runner rather than the best route. This module provides the rasterized
//! similarity measure, the scoring function and the buffer-then-rank
//! aggregator used by the routing manager.

mod ranker;
mod score;
mod similarity;

pub use ranker::{RankerConfig, RouteRanker};
pub use score::{better_than, compare};
pub use similarity::{similarity, DEFAULT_RASTER_SIZE};

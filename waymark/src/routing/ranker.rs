//! Alternative-routes ranking.
//!
//! Routing runners report at different latencies; inserting routes in
//! arrival order would crown whichever runner is merely fastest. The
//! ranker therefore buffers routes for a short window after the first
//! arrival, then inserts them best-score first while skipping
//! near-duplicates. Routes arriving after the window are compared live
//! against the current list and may replace a lower-scoring duplicate.

use super::score::better_than;
use super::similarity::similarity;
use crate::aggregate::{Aggregator, OutcomeMeta, ResetDisposition};
use crate::model::{RouteDocument, RouteQuery};
use crate::runner::RunnerError;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Tunable ranking parameters.
///
/// The cutoff and window bounds are empirically chosen defaults, exposed
/// as configuration rather than hard invariants.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Similarity above which two routes count as duplicates.
    pub similarity_cutoff: f64,
    /// Lower bound of the buffering window.
    pub window_min: Duration,
    /// Upper bound of the buffering window.
    pub window_max: Duration,
    /// Window length as a multiple of the first response's latency.
    pub latency_multiplier: f64,
    /// Raster grid edge length used for similarity detection.
    pub raster_size: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            similarity_cutoff: 0.8,
            window_min: Duration::from_millis(50),
            window_max: Duration::from_millis(500),
            latency_multiplier: 2.0,
            raster_size: super::similarity::DEFAULT_RASTER_SIZE,
        }
    }
}

impl From<&crate::config::RoutingSettings> for RankerConfig {
    fn from(settings: &crate::config::RoutingSettings) -> Self {
        Self {
            similarity_cutoff: settings.similarity_cutoff,
            window_min: Duration::from_millis(settings.window_min_ms),
            window_max: Duration::from_millis(settings.window_max_ms),
            latency_multiplier: settings.latency_multiplier,
            raster_size: settings.raster_size,
        }
    }
}

/// Phase of the buffering window within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    /// No route has arrived yet.
    Idle,
    /// First route arrived; further arrivals are buffered.
    Open,
    /// Window flushed; arrivals are inserted live.
    Elapsed,
}

/// Aggregator for routing requests: buffered, similarity-ranked insertion.
///
/// The first inserted route (index 0 of the snapshot) is the preferred
/// default alternative.
pub struct RouteRanker {
    cfg: RankerConfig,
    routes: Vec<RouteDocument>,
    buffer: Vec<RouteDocument>,
    window: Window,
    pending_deadline: Option<Instant>,
}

impl RouteRanker {
    /// Creates a ranker with the given configuration.
    pub fn new(cfg: RankerConfig) -> Self {
        Self {
            cfg,
            routes: Vec::new(),
            buffer: Vec::new(),
            window: Window::Idle,
            pending_deadline: None,
        }
    }

    /// Creates a ranker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RankerConfig::default())
    }

    fn window_length(&self, first_latency: Duration) -> Duration {
        let scaled = first_latency.mul_f64(self.cfg.latency_multiplier);
        scaled.clamp(self.cfg.window_min, self.cfg.window_max)
    }

    fn find_duplicate(&self, candidate: &RouteDocument) -> Option<usize> {
        self.routes.iter().position(|existing| {
            similarity(
                &existing.waypoints,
                &candidate.waypoints,
                self.cfg.raster_size,
            ) > self.cfg.similarity_cutoff
        })
    }

    /// Inserts a route into the visible list, honoring duplicate rules.
    ///
    /// Returns true when the list changed.
    fn insert_live(&mut self, route: RouteDocument) -> bool {
        match self.find_duplicate(&route) {
            Some(index) => {
                if better_than(&route, &self.routes[index]) {
                    debug!(
                        replaced = %self.routes[index].name,
                        by = %route.name,
                        "near-duplicate route replaced by higher-scoring alternative"
                    );
                    self.routes[index] = route;
                    true
                } else {
                    debug!(dropped = %route.name, "near-duplicate route dropped");
                    false
                }
            }
            None => {
                self.routes.push(route);
                true
            }
        }
    }
}

impl Aggregator for RouteRanker {
    type Request = RouteQuery;
    type Outcome = Result<Vec<RouteDocument>, RunnerError>;
    type Snapshot = Vec<RouteDocument>;

    fn reset(&mut self, _request: &RouteQuery) -> ResetDisposition {
        self.routes.clear();
        self.buffer.clear();
        self.window = Window::Idle;
        self.pending_deadline = None;
        ResetDisposition::Fresh
    }

    fn on_outcome(&mut self, outcome: Self::Outcome, meta: &OutcomeMeta) -> bool {
        let batch = match outcome {
            Ok(batch) => batch,
            Err(error) => {
                debug!(runner = %meta.runner, %error, "routing runner failed");
                return false;
            }
        };

        let mut changed = false;
        for route in batch {
            if route.is_empty() {
                continue;
            }
            match self.window {
                Window::Idle => {
                    let deadline = Instant::now() + self.window_length(meta.latency);
                    self.window = Window::Open;
                    self.pending_deadline = Some(deadline);
                    self.buffer.push(route);
                }
                Window::Open => self.buffer.push(route),
                Window::Elapsed => changed |= self.insert_live(route),
            }
        }
        changed
    }

    fn take_flush_deadline(&mut self) -> Option<Instant> {
        self.pending_deadline.take()
    }

    fn flush(&mut self) -> bool {
        self.window = Window::Elapsed;
        if self.buffer.is_empty() {
            return false;
        }

        let mut buffered = std::mem::take(&mut self.buffer);
        buffered.sort_by(super::score::compare);

        let mut changed = false;
        for route in buffered {
            if self.find_duplicate(&route).is_none() {
                self.routes.push(route);
                changed = true;
            } else {
                debug!(dropped = %route.name, "buffered near-duplicate skipped");
            }
        }
        changed
    }

    fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.buffer.is_empty()
    }

    fn snapshot(&self) -> Vec<RouteDocument> {
        self.routes.clone()
    }
}

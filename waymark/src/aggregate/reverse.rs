//! Reverse geocoding aggregation.

use super::{Aggregator, OutcomeMeta, ResetDisposition};
use crate::coord::GeoPoint;
use crate::runner::RunnerError;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Default upper bound on memoized resolved coordinates.
pub const DEFAULT_MEMO_CAPACITY: usize = 1024;

/// Keeps the first non-empty address reported for the current coordinate.
///
/// Once an address is recorded, later outcomes for the same request are
/// ignored. Resolved coordinates are memoized across requests, so asking
/// again for an already-resolved coordinate completes without dispatching
/// tasks. The memo is bounded: past its capacity the oldest entries are
/// evicted, keeping a long-lived session's footprint flat.
pub struct ReverseGeocodingAggregator {
    current: Option<GeoPoint>,
    address: Option<String>,
    resolved: HashMap<(u64, u64), String>,
    insertion_order: VecDeque<(u64, u64)>,
    capacity: usize,
}

impl ReverseGeocodingAggregator {
    /// Creates an aggregator with the default memo capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMO_CAPACITY)
    }

    /// Creates an aggregator memoizing at most `capacity` coordinates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: None,
            address: None,
            resolved: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
        }
    }

    fn remember(&mut self, key: (u64, u64), address: &str) {
        if self.resolved.contains_key(&key) {
            return;
        }
        while self.resolved.len() >= self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.resolved.remove(&oldest);
                }
                None => break,
            }
        }
        self.insertion_order.push_back(key);
        self.resolved.insert(key, address.to_string());
    }
}

impl Default for ReverseGeocodingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for ReverseGeocodingAggregator {
    type Request = GeoPoint;
    type Outcome = Result<Option<String>, RunnerError>;
    type Snapshot = Option<String>;

    fn reset(&mut self, request: &GeoPoint) -> ResetDisposition {
        self.current = Some(*request);
        if let Some(address) = self.resolved.get(&request.bit_key()) {
            debug!(position = %request, "coordinate already resolved, reusing address");
            self.address = Some(address.clone());
            return ResetDisposition::AlreadySatisfied;
        }
        self.address = None;
        ResetDisposition::Fresh
    }

    fn on_outcome(&mut self, outcome: Self::Outcome, meta: &OutcomeMeta) -> bool {
        // First non-empty address wins.
        if self.address.is_some() {
            return false;
        }
        match outcome {
            Ok(Some(address)) if !address.is_empty() => {
                if let Some(position) = self.current {
                    self.remember(position.bit_key(), &address);
                }
                self.address = Some(address);
                true
            }
            Ok(_) => false,
            Err(error) => {
                debug!(runner = %meta.runner, %error, "reverse geocoding runner failed");
                false
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.address.is_none()
    }

    fn snapshot(&self) -> Option<String> {
        self.address.clone()
    }
}

//! Search result aggregation.

use super::{Aggregator, OutcomeMeta, ResetDisposition};
use crate::coord::central_angle;
use crate::model::{Placemark, SearchQuery};
use crate::runner::RunnerError;
use tracing::debug;

/// Merges placemark batches from multiple runners, dropping near-duplicates.
///
/// Two placemarks closer than the dedup threshold (a central angle, so the
/// arc distance scales with the planet radius) are considered the same
/// place reported by different runners; the first one kept wins, the later
/// one is dropped rather than merged.
///
/// The aggregator remembers the last completed query and its snapshot:
/// resubmitting an identical query is answered from that snapshot without
/// dispatching new tasks.
pub struct SearchAggregator {
    dedup_angle: f64,
    placemarks: Vec<Placemark>,
    current: Option<SearchQuery>,
    last_completed: Option<(SearchQuery, Vec<Placemark>)>,
}

impl SearchAggregator {
    /// Creates an aggregator with the given dedup threshold in radians.
    pub fn new(dedup_angle: f64) -> Self {
        Self {
            dedup_angle,
            placemarks: Vec::new(),
            current: None,
            last_completed: None,
        }
    }

    fn is_duplicate(&self, candidate: &Placemark) -> bool {
        self.placemarks
            .iter()
            .any(|existing| central_angle(&existing.position, &candidate.position) < self.dedup_angle)
    }
}

impl Aggregator for SearchAggregator {
    type Request = SearchQuery;
    type Outcome = Result<Vec<Placemark>, RunnerError>;
    type Snapshot = Vec<Placemark>;

    fn reset(&mut self, request: &SearchQuery) -> ResetDisposition {
        if let Some((query, placemarks)) = &self.last_completed {
            if query == request {
                debug!(term = %request.term, "identical search resubmitted, reusing previous result");
                self.placemarks = placemarks.clone();
                self.current = Some(request.clone());
                return ResetDisposition::AlreadySatisfied;
            }
        }
        self.placemarks.clear();
        self.current = Some(request.clone());
        ResetDisposition::Fresh
    }

    fn on_outcome(&mut self, outcome: Self::Outcome, meta: &OutcomeMeta) -> bool {
        let batch = match outcome {
            Ok(batch) => batch,
            Err(error) => {
                debug!(runner = %meta.runner, %error, "search runner failed");
                return false;
            }
        };

        let mut changed = false;
        for placemark in batch {
            if self.is_duplicate(&placemark) {
                continue;
            }
            self.placemarks.push(placemark);
            changed = true;
        }
        changed
    }

    fn on_finished(&mut self) {
        if let Some(query) = &self.current {
            self.last_completed = Some((query.clone(), self.placemarks.clone()));
        }
    }

    fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }

    fn snapshot(&self) -> Vec<Placemark> {
        self.placemarks.clone()
    }
}

//! File parsing aggregation.

use super::{Aggregator, OutcomeMeta, ResetDisposition};
use crate::model::{ParseQuery, ParsedDocument};
use crate::runner::RunnerError;
use tracing::debug;

/// The outcome of a parsing request: at most one document, at most one error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// The first successfully parsed document, if any.
    pub document: Option<ParsedDocument>,
    /// The first reported error, kept for diagnostics when no runner
    /// produced a document.
    pub error: Option<String>,
}

/// Keeps the first successful document, or the first error when all fail.
///
/// Later outcomes are recorded in the log but never replace an accepted
/// document.
pub struct ParsingAggregator {
    report: ParseReport,
}

impl ParsingAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            report: ParseReport::default(),
        }
    }
}

impl Default for ParsingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for ParsingAggregator {
    type Request = ParseQuery;
    type Outcome = Result<ParsedDocument, RunnerError>;
    type Snapshot = ParseReport;

    fn reset(&mut self, _request: &ParseQuery) -> ResetDisposition {
        self.report = ParseReport::default();
        ResetDisposition::Fresh
    }

    fn on_outcome(&mut self, outcome: Self::Outcome, meta: &OutcomeMeta) -> bool {
        match outcome {
            Ok(document) => {
                if self.report.document.is_some() {
                    debug!(runner = %meta.runner, "document already accepted, ignoring");
                    return false;
                }
                self.report.document = Some(document);
                true
            }
            Err(error) => {
                debug!(runner = %meta.runner, %error, "parsing runner failed");
                if self.report.error.is_none() {
                    self.report.error = Some(error.to_string());
                    return true;
                }
                false
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.report.document.is_none()
    }

    fn snapshot(&self) -> ParseReport {
        self.report.clone()
    }
}

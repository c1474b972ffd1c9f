//! Route scoring.

use crate::model::RouteDocument;
use std::cmp::Ordering;

/// Compares two routes, `Ordering::Less` meaning `a` ranks before `b`.
///
/// A route with turn-by-turn instructions beats one without regardless of
/// length; among routes with equal instruction presence the shorter path
/// wins.
pub fn compare(a: &RouteDocument, b: &RouteDocument) -> Ordering {
    match (a.has_instructions, b.has_instructions) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .length_m()
            .partial_cmp(&b.length_m())
            .unwrap_or(Ordering::Equal),
    }
}

/// Returns true when `a` scores strictly higher than `b`.
pub fn better_than(a: &RouteDocument, b: &RouteDocument) -> bool {
    compare(a, b) == Ordering::Less
}

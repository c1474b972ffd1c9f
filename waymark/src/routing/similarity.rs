//! Rasterized route similarity.
//!
//! Two routes are compared by projecting their waypoint paths into a
//! fixed-size grid scaled to the union bounding box of both routes, then
//! measuring how much of one path's cell set is covered by the other.

use crate::coord::{GeoPoint, GeoRegion};
use std::collections::HashSet;

/// Default raster grid edge length in cells.
pub const DEFAULT_RASTER_SIZE: usize = 64;

/// Computes the similarity of two waypoint paths in `[0, 1]`.
///
/// `similarity(a, b)` is the larger of the two coverage fractions
/// `|cells(a) ∩ cells(b)| / |cells(x)|` for `x` in `{a, b}`. Taking the
/// maximum makes the measure deliberately asymmetric-friendly: a route
/// whose rasterized point set is a subset of the other's scores `1.0`
/// even though the reverse coverage is lower.
///
/// `similarity(a, a) == 1.0` holds exactly. Empty paths have similarity
/// `0.0` to everything.
pub fn similarity(a: &[GeoPoint], b: &[GeoPoint], grid_size: usize) -> f64 {
    if a.is_empty() || b.is_empty() || grid_size < 2 {
        return 0.0;
    }

    let bbox = match GeoRegion::from_points(a.iter().chain(b.iter())) {
        Some(bbox) => bbox,
        None => return 0.0,
    };

    let cells_a = rasterize(a, &bbox, grid_size);
    let cells_b = rasterize(b, &bbox, grid_size);
    coverage(&cells_a, &cells_b).max(coverage(&cells_b, &cells_a))
}

/// Fraction of `reference` cells that are also present in `other`.
fn coverage(reference: &HashSet<(u16, u16)>, other: &HashSet<(u16, u16)>) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let shared = reference.intersection(other).count();
    shared as f64 / reference.len() as f64
}

/// Plots a waypoint path into grid cells over the given bounding box.
///
/// Each segment is sampled densely enough that no cell along it is
/// skipped, so a path covers a contiguous trace rather than isolated
/// waypoint cells.
fn rasterize(path: &[GeoPoint], bbox: &GeoRegion, grid_size: usize) -> HashSet<(u16, u16)> {
    let mut cells = HashSet::new();
    let max_index = (grid_size - 1) as f64;

    // Degenerate extents (single point, straight meridian) collapse to one
    // row or column; the epsilon keeps the projection finite.
    let width = bbox.width().max(f64::EPSILON);
    let height = bbox.height().max(f64::EPSILON);

    let project = |p: &GeoPoint| -> (f64, f64) {
        (
            (p.lon - bbox.west) / width * max_index,
            (p.lat - bbox.south) / height * max_index,
        )
    };

    let clamp_cell = |x: f64, y: f64| -> (u16, u16) {
        (
            x.round().clamp(0.0, max_index) as u16,
            y.round().clamp(0.0, max_index) as u16,
        )
    };

    if path.len() == 1 {
        let (x, y) = project(&path[0]);
        cells.insert(clamp_cell(x, y));
        return cells;
    }

    for pair in path.windows(2) {
        let (x0, y0) = project(&pair[0]);
        let (x1, y1) = project(&pair[1]);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            cells.insert(clamp_cell(x, y));
        }
    }
    cells
}

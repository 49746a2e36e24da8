//! Uniform grid over field samples for bounded-radius nearest-neighbor lookup.
//!
//! # How It Works
//!
//! Samples are bucketed by `floor(p / cell_size)` into integer cells. The
//! cell size tracks data density (average bounding dimension divided by
//! `ceil(sqrt(n))`), so each cell holds roughly one sample whatever the
//! field size. A query scans the 3x3 block of cells around the query point
//! and keeps the closest sample.
//!
//! Cell size is one global average. Where local density changes sharply the
//! true nearest sample can sit outside the 3x3 block and a farther one (or
//! none) is returned instead. That approximation is accepted for a visual
//! effect and is not widened to an exhaustive search.

use crate::datum::FieldDatum;
use crate::transform::Bounds;
use glam::DVec2;
use std::collections::HashMap;

/// Lower bound on cell size so a collapsed field never yields zero-width cells.
pub const MIN_CELL_SIZE: f64 = 0.01;

type CellKey = (i64, i64);

/// Grid index over an immutable sample set.
///
/// Built in one step by [`SpatialIndex::build`]; a rebuild produces a new
/// value that replaces the old one whole, so a reader never sees a
/// half-populated grid.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    samples: Vec<FieldDatum>,
    cells: HashMap<CellKey, Vec<u32>>,
    cell_size: f64,
}

impl SpatialIndex {
    /// Indexes `samples`. An empty input yields an index that answers `None`
    /// to every query.
    pub fn build(samples: Vec<FieldDatum>) -> Self {
        let cell_size = match Bounds::of(&samples) {
            Some(b) => {
                let avg_dim = (b.width() + b.height()) * 0.5;
                let cells_per_dim = (samples.len() as f64).sqrt().ceil();
                (avg_dim / cells_per_dim).max(MIN_CELL_SIZE)
            }
            None => MIN_CELL_SIZE,
        };

        let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::new();
        for (i, d) in samples.iter().enumerate() {
            cells
                .entry(cell_of(d.position(), cell_size))
                .or_default()
                .push(i as u32);
        }

        log::debug!(
            "spatial index: {} samples, cell size {:.5}, {} occupied cells",
            samples.len(),
            cell_size,
            cells.len()
        );

        Self {
            samples,
            cells,
            cell_size,
        }
    }

    /// Nearest sample to `point` within the 3x3 cell block, provided its
    /// squared distance is at most `max_dist_sq`.
    ///
    /// `None` means the field is undefined at `point`.
    pub fn query(&self, point: DVec2, max_dist_sq: f64) -> Option<&FieldDatum> {
        let (cx, cy) = cell_of(point, self.cell_size);
        let mut best: Option<(&FieldDatum, f64)> = None;

        for oy in -1..=1 {
            for ox in -1..=1 {
                // Cell keys saturate for far-out coordinates; stay on the edge.
                let key = (cx.saturating_add(ox), cy.saturating_add(oy));
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };
                for &i in bucket {
                    let d = &self.samples[i as usize];
                    let dist_sq = d.distance_squared(point);
                    if best.map_or(true, |(_, b)| dist_sq < b) {
                        best = Some((d, dist_sq));
                    }
                }
            }
        }

        best.filter(|&(_, dist_sq)| dist_sq <= max_dist_sq)
            .map(|(d, _)| d)
    }

    /// Grid cell side length in data units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The indexed samples, in ingestion order.
    pub fn samples(&self) -> &[FieldDatum] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

fn cell_of(p: DVec2, cell_size: f64) -> CellKey {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}

//! A loaded vector field: samples, their display transform, and the grid
//! index over them.
//!
//! A `VectorField` is built completely before it is handed to a population,
//! which swaps it in between frames. Nothing mutates it afterwards, so a
//! frame can read it from any number of threads.

use crate::datum::FieldDatum;
use crate::error::FlowError;
use crate::prng::Xorshift64;
use crate::spatial::SpatialIndex;
use crate::transform::{Bounds, FieldTransform};
use glam::DVec2;

/// Immutable field snapshot used by the sampler and respawn logic.
#[derive(Debug, Clone)]
pub struct VectorField {
    transform: FieldTransform,
    bounds: Bounds,
    index: SpatialIndex,
}

impl VectorField {
    /// Fits and indexes `samples`.
    ///
    /// Returns `FlowError::EmptyField` for an empty set; the caller keeps its
    /// previous field (or the constant-flow fallback) in that case.
    pub fn new(samples: Vec<FieldDatum>) -> Result<Self, FlowError> {
        let (transform, bounds) = FieldTransform::fit(&samples)?;
        let index = SpatialIndex::build(samples);
        log::info!(
            "field loaded: {} vectors, bounds ({:.3}, {:.3})..({:.3}, {:.3}), scale {:.5}",
            index.len(),
            bounds.min_x,
            bounds.min_y,
            bounds.max_x,
            bounds.max_y,
            transform.scale
        );
        Ok(Self {
            transform,
            bounds,
            index,
        })
    }

    pub fn transform(&self) -> &FieldTransform {
        &self.transform
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn samples(&self) -> &[FieldDatum] {
        self.index.samples()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false for a constructed field.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Nearest sample to a data-space point, if it lies within
    /// `valid_distance` display units.
    ///
    /// The display-space radius is converted to data units through the
    /// transform scale before comparing.
    pub fn nearest(&self, data_point: DVec2, valid_distance: f64) -> Option<&FieldDatum> {
        let radius = valid_distance / self.transform.scale;
        self.index.query(data_point, radius * radius)
    }

    /// A display-space spawn point near a uniformly chosen sample.
    ///
    /// Jitter spans `±0.3 * valid_distance` display units, i.e. the radius is
    /// divided by the transform scale in data space before mapping back, so
    /// spawned particles land inside the sample's acceptance radius.
    pub fn spawn_point(&self, rng: &mut Xorshift64, valid_distance: f32) -> DVec2 {
        let anchor = self.samples()[rng.next_index(self.len())];
        let jitter = valid_distance * 0.3;
        let scale = self.transform.scale;
        let data = DVec2::new(
            anchor.x + f64::from(rng.next_jitter(jitter)) / scale,
            anchor.y + f64::from(rng.next_jitter(jitter)) / scale,
        );
        self.transform.data_to_world(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(n: usize) -> Vec<FieldDatum> {
        (0..n * n)
            .map(|i| FieldDatum::new((i % n) as f64 * 10.0, (i / n) as f64 * 10.0, 1.0, 0.5))
            .collect()
    }

    #[test]
    fn empty_samples_are_rejected() {
        assert!(matches!(VectorField::new(Vec::new()), Err(FlowError::EmptyField)));
    }

    #[test]
    fn nearest_converts_radius_to_data_units() {
        let field = VectorField::new(lattice(10)).unwrap();
        let scale = field.transform().scale;
        let sample = field.samples()[55].position();
        // 0.04 display units away along x, accepted at 0.05, rejected at 0.03.
        let p = sample + DVec2::new(0.04 / scale, 0.0);
        assert!(field.nearest(p, 0.05).is_some());
        assert!(field.nearest(p, 0.03).is_none());
    }

    #[test]
    fn spawn_points_land_near_samples() {
        let field = VectorField::new(lattice(8)).unwrap();
        let mut rng = Xorshift64::new(5);
        let t = *field.transform();
        for _ in 0..500 {
            let world = field.spawn_point(&mut rng, 0.05);
            let data = t.world_to_data(world);
            assert!(
                field.nearest(data, 0.05).is_some(),
                "spawn at {world:?} has no sample within valid distance"
            );
        }
    }
}

//! Velocity sources consulted by the advector, plus the turbulence overlay.
//!
//! A [`FlowSource`] answers "what is the display-space velocity at this
//! point?" with either a vector or `None`, where `None` means the point is
//! outside field coverage and the particle must respawn.
//!
//! All implementations are deterministic: same inputs produce the same output.

use crate::field::VectorField;
use glam::{DVec2, Vec2};
use noise::{NoiseFn, OpenSimplex};

/// A source of display-space velocity samples.
pub trait FlowSource {
    /// Velocity at display position `pos` at scene time `time` (seconds), or
    /// `None` when the source is undefined there.
    fn sample(&self, pos: Vec2, time: f64) -> Option<Vec2>;
}

/// Constant unit flow to the right, used while no field is loaded.
///
/// Never returns `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFlow;

impl FlowSource for ConstantFlow {
    fn sample(&self, _pos: Vec2, _time: f64) -> Option<Vec2> {
        Some(Vec2::X)
    }
}

/// Nearest-sample lookup into a loaded [`VectorField`].
///
/// Positions are shifted by the population's horizontal view offset, mapped
/// into data space, and matched against the spatial index with the
/// acceptance radius `valid_distance` (display units). A hit returns the
/// sample vector scaled back into display units.
#[derive(Debug, Clone, Copy)]
pub struct FieldSampler<'a> {
    field: &'a VectorField,
    view_offset_x: f32,
    valid_distance: f32,
}

impl<'a> FieldSampler<'a> {
    pub fn new(field: &'a VectorField, view_offset_x: f32, valid_distance: f32) -> Self {
        Self {
            field,
            view_offset_x,
            valid_distance,
        }
    }

    /// Display position (including view offset) to data space.
    pub fn world_to_data(&self, pos: Vec2) -> DVec2 {
        let local = DVec2::new(f64::from(pos.x - self.view_offset_x), f64::from(pos.y));
        self.field.transform().world_to_data(local)
    }

    /// Data space to display position (including view offset).
    pub fn data_to_world(&self, data: DVec2) -> Vec2 {
        let local = self.field.transform().data_to_world(data);
        Vec2::new(local.x as f32 + self.view_offset_x, local.y as f32)
    }
}

impl FlowSource for FieldSampler<'_> {
    fn sample(&self, pos: Vec2, _time: f64) -> Option<Vec2> {
        let datum = self
            .field
            .nearest(self.world_to_data(pos), f64::from(self.valid_distance))?;
        let v = datum.vector() * self.field.transform().scale;
        Some(Vec2::new(v.x as f32, v.y as f32))
    }
}

/// Spatial frequency of the turbulence noise.
pub const NOISE_SCALE: f64 = 0.9;
/// Temporal frequency of the turbulence noise.
pub const NOISE_TIME_SCALE: f64 = 0.15;
/// Offset between the x and y noise channels, in display units.
pub const NOISE_CHANNEL_OFFSET: f64 = 10.0;

/// Two-channel smooth noise added to sampled velocities.
///
/// The x channel samples simplex noise at `(p * scale, t * time_scale)`, the
/// y channel at `((p + 10) * scale, t * time_scale)`.
pub struct Turbulence {
    noise: OpenSimplex,
}

impl Turbulence {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
        }
    }

    /// Raw noise vector in roughly [-1, 1]^2 at `pos`, `time`.
    pub fn offset(&self, pos: Vec2, time: f64) -> Vec2 {
        let x = f64::from(pos.x);
        let y = f64::from(pos.y);
        let t = time * NOISE_TIME_SCALE;
        let nx = self.noise.get([x * NOISE_SCALE, y * NOISE_SCALE, t]);
        let ny = self.noise.get([
            (x + NOISE_CHANNEL_OFFSET) * NOISE_SCALE,
            (y + NOISE_CHANNEL_OFFSET) * NOISE_SCALE,
            t,
        ]);
        Vec2::new(nx as f32, ny as f32)
    }

    /// `velocity + offset(pos, time) * strength`.
    pub fn perturb(&self, velocity: Vec2, pos: Vec2, time: f64, strength: f32) -> Vec2 {
        velocity + self.offset(pos, time) * strength
    }
}

impl std::fmt::Debug for Turbulence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Turbulence").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::FieldDatum;

    // -- Constant flow --

    #[test]
    fn constant_flow_is_unit_rightward_everywhere() {
        for &(x, y) in &[(0.0, 0.0), (-1.2, 1.1), (40.0, -3.0)] {
            assert_eq!(ConstantFlow.sample(Vec2::new(x, y), 12.5), Some(Vec2::new(1.0, 0.0)));
        }
    }

    // -- Field sampler --

    #[test]
    fn single_sample_field_returns_scaled_vector_inside_block() {
        let field = VectorField::new(vec![FieldDatum::new(0.0, 0.0, 1.0, 0.0)]).unwrap();
        let scale = field.transform().scale as f32;
        let sampler = FieldSampler::new(&field, 0.0, 0.05);
        for &(x, y) in &[(0.0, 0.0), (0.005, -0.005), (-0.009, 0.0), (0.015, 0.012)] {
            let v = sampler.sample(Vec2::new(x, y), 0.0);
            assert_eq!(v, Some(Vec2::new(scale, 0.0)), "at ({x}, {y})");
        }
    }

    #[test]
    fn sampler_returns_none_outside_valid_distance() {
        let field = VectorField::new(vec![
            FieldDatum::new(0.0, 0.0, 1.0, 0.0),
            FieldDatum::new(10.0, 10.0, 0.0, 1.0),
        ])
        .unwrap();
        let sampler = FieldSampler::new(&field, 0.0, 0.05);
        // Display origin is the field center, far from both samples.
        assert!(sampler.sample(Vec2::ZERO, 0.0).is_none());
    }

    #[test]
    fn sampler_honors_view_offset() {
        let field = VectorField::new(vec![
            FieldDatum::new(0.0, 0.0, 2.0, 0.0),
            FieldDatum::new(1.0, 1.0, 0.0, 3.0),
        ])
        .unwrap();
        let shifted = FieldSampler::new(&field, 1.0, 0.05);
        let unshifted = FieldSampler::new(&field, 0.0, 0.05);
        let corner = unshifted.data_to_world(DVec2::new(1.0, 1.0));
        let hit = shifted.sample(corner + Vec2::new(1.0, 0.0), 0.0).unwrap();
        assert!(hit.y > 0.0 && hit.x == 0.0);
        assert!(shifted.sample(corner, 0.0).is_none());
    }

    #[test]
    fn sampler_round_trips_world_and_data() {
        let field = VectorField::new(vec![
            FieldDatum::new(-30.0, 12.0, 0.0, 0.0),
            FieldDatum::new(90.0, 40.0, 0.0, 0.0),
        ])
        .unwrap();
        let sampler = FieldSampler::new(&field, -1.2, 0.05);
        let p = Vec2::new(0.37, -0.81);
        let back = sampler.data_to_world(sampler.world_to_data(p));
        assert!((back - p).length() < 1e-5, "{p:?} -> {back:?}");
    }

    // -- Turbulence --

    #[test]
    fn turbulence_is_deterministic_for_same_seed() {
        let a = Turbulence::new(42);
        let b = Turbulence::new(42);
        let p = Vec2::new(0.3, -0.6);
        assert_eq!(a.offset(p, 1.5), b.offset(p, 1.5));
    }

    #[test]
    fn turbulence_channels_are_independent() {
        let t = Turbulence::new(7);
        let samples: Vec<Vec2> = (0..20)
            .map(|i| t.offset(Vec2::new(i as f32 * 0.37, i as f32 * -0.21), 0.5))
            .collect();
        assert!(samples.iter().any(|v| (v.x - v.y).abs() > 1e-4));
    }

    #[test]
    fn perturb_with_zero_strength_is_identity() {
        let t = Turbulence::new(1);
        let v = Vec2::new(0.4, -0.2);
        assert_eq!(t.perturb(v, Vec2::new(0.1, 0.2), 3.0, 0.0), v);
    }

    #[test]
    fn turbulence_values_are_finite_and_bounded() {
        let t = Turbulence::new(3);
        for i in 0..200 {
            let p = Vec2::new(i as f32 * 0.113 - 10.0, i as f32 * 0.071 - 7.0);
            let o = t.offset(p, i as f64 * 0.016);
            assert!(o.is_finite());
            assert!(o.x.abs() <= 1.5 && o.y.abs() <= 1.5, "{o:?}");
        }
    }
}

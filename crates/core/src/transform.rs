//! Data-space to display-space mapping for a loaded field.
//!
//! Field samples arrive in arbitrary units. The transform centers their
//! bounding box on the display origin and scales its larger side to
//! `FIT_FACTOR * WORLD_EXTENT`, so every field fills roughly the same part of
//! the view regardless of its native units.

use crate::datum::FieldDatum;
use crate::error::FlowError;
use glam::DVec2;

/// Half-extent of the square display region particles live in.
pub const WORLD_EXTENT: f32 = 1.25;

/// Multiple of [`WORLD_EXTENT`] the larger side of a field is scaled to.
pub const FIT_FACTOR: f64 = 1.8;

/// Axis-aligned bounding box of field samples, in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box of `samples`, or `None` for an empty slice.
    pub fn of(samples: &[FieldDatum]) -> Option<Self> {
        let first = samples.first()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(samples.iter().fold(init, |b, d| Bounds {
            min_x: b.min_x.min(d.x),
            max_x: b.max_x.max(d.x),
            min_y: b.min_y.min(d.y),
            max_y: b.max_y.max(d.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn contains(&self, p: DVec2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

/// Uniform scale plus offset: `display = data * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for FieldTransform {
    /// Identity, used while no field is loaded.
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl FieldTransform {
    /// Fits `samples` into the display region.
    ///
    /// Returns the transform together with the data bounding box. A field
    /// collapsed to a single point gets `scale = 1`.
    ///
    /// Returns `FlowError::EmptyField` for an empty slice; callers fall back
    /// to the no-field state instead.
    pub fn fit(samples: &[FieldDatum]) -> Result<(Self, Bounds), FlowError> {
        let bounds = Bounds::of(samples).ok_or(FlowError::EmptyField)?;
        let data_size = bounds.width().max(bounds.height());
        let target_size = f64::from(WORLD_EXTENT) * FIT_FACTOR;
        let scale = if data_size > 0.0 {
            target_size / data_size
        } else {
            1.0
        };
        let center = bounds.center();
        let transform = Self {
            scale,
            offset_x: -center.x * scale,
            offset_y: -center.y * scale,
        };
        Ok((transform, bounds))
    }

    /// Maps a data-space point into display space.
    pub fn data_to_world(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Inverse of [`data_to_world`](Self::data_to_world).
    pub fn world_to_data(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(x: f64, y: f64) -> FieldDatum {
        FieldDatum::new(x, y, 0.0, 0.0)
    }

    #[test]
    fn fit_empty_returns_error() {
        assert!(matches!(FieldTransform::fit(&[]), Err(FlowError::EmptyField)));
    }

    #[test]
    fn fit_single_point_uses_unit_scale() {
        let (t, b) = FieldTransform::fit(&[d(3.0, -4.0)]).unwrap();
        assert_eq!(t.scale, 1.0);
        assert_eq!(b.width(), 0.0);
        let origin = t.data_to_world(DVec2::new(3.0, -4.0));
        assert!(origin.length() < 1e-12);
    }

    #[test]
    fn fit_scales_larger_side_to_target() {
        let (t, b) = FieldTransform::fit(&[d(0.0, 0.0), d(100.0, 50.0)]).unwrap();
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
        assert!((t.scale - 2.25 / 100.0).abs() < 1e-12);
        let corner = t.data_to_world(DVec2::new(100.0, 50.0));
        assert!((corner.x - 1.125).abs() < 1e-12);
        assert!((corner.y - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn default_is_identity() {
        let t = FieldTransform::default();
        let p = DVec2::new(0.3, -0.7);
        assert_eq!(t.data_to_world(p), p);
    }

    #[test]
    fn bounds_contains_edges() {
        let b = Bounds::of(&[d(0.0, 0.0), d(1.0, 2.0)]).unwrap();
        assert!(b.contains(DVec2::new(1.0, 2.0)));
        assert!(!b.contains(DVec2::new(1.01, 0.0)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn samples() -> impl Strategy<Value = Vec<FieldDatum>> {
            prop::collection::vec(
                (-1e4_f64..1e4, -1e4_f64..1e4).prop_map(|(x, y)| FieldDatum::new(x, y, 0.0, 0.0)),
                1..64,
            )
        }

        proptest! {
            #[test]
            fn bounding_box_center_maps_to_origin(data in samples()) {
                let (t, b) = FieldTransform::fit(&data).unwrap();
                let c = t.data_to_world(b.center());
                prop_assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9, "center mapped to {c:?}");
            }

            #[test]
            fn scale_is_positive(data in samples()) {
                let (t, _) = FieldTransform::fit(&data).unwrap();
                prop_assert!(t.scale > 0.0);
            }

            #[test]
            fn fitted_samples_stay_inside_target(data in samples()) {
                let (t, _) = FieldTransform::fit(&data).unwrap();
                let half = f64::from(WORLD_EXTENT) * FIT_FACTOR * 0.5 + 1e-9;
                for s in &data {
                    let w = t.data_to_world(s.position());
                    prop_assert!(w.x.abs() <= half && w.y.abs() <= half, "{w:?} outside fit");
                }
            }

            #[test]
            fn world_to_data_inverts_data_to_world(
                data in samples(),
                px in -1e4_f64..1e4,
                py in -1e4_f64..1e4,
            ) {
                let (t, _) = FieldTransform::fit(&data).unwrap();
                let p = DVec2::new(px, py);
                let back = t.world_to_data(t.data_to_world(p));
                let tol = 1e-9 * (1.0 + p.abs().max_element());
                prop_assert!((back - p).abs().max_element() <= tol, "{p:?} -> {back:?}");
            }
        }
    }
}

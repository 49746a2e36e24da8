//! A single sampled vector of an ingested field.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Field vector `(dx, dy)` sampled at `(x, y)` in data space.
///
/// Collections of these are replaced wholesale on reload and never mutated in
/// place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldDatum {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl FieldDatum {
    pub const fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, dx, dy }
    }

    /// Sample position in data space.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Sampled vector in data units.
    pub fn vector(&self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }

    /// True when all four components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.dx.is_finite() && self.dy.is_finite()
    }

    /// Squared distance from the sample position to `point`.
    pub fn distance_squared(&self, point: DVec2) -> f64 {
        let dx = self.x - point.x;
        let dy = self.y - point.y;
        dx * dx + dy * dy
    }
}

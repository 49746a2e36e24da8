//! Pure-computation RGBA8 splat of a [`Scene`]'s visible particles.
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and the WASM `ImageData` path share the same projection.
//! It is a diagnostic view: one pixel per particle, additive, no bloom.

use crate::layout::camera_half_extents;
use crate::{FieldSide, Scene};

/// Scene background, `#02040a`.
pub const BACKGROUND: [u8; 3] = [0x02, 0x04, 0x0a];
/// Point material opacity applied before additive blending.
pub const POINT_OPACITY: f32 = 0.9;

/// Projects every visible particle through the orthographic camera and
/// blends its color additively over [`BACKGROUND`].
///
/// Returns `width * height * 4` bytes, row-major from the top-left, with
/// alpha always 255. Channels are clamped before quantizing.
pub fn splat_rgba(scene: &Scene, width: usize, height: usize) -> Vec<u8> {
    let mut accum = vec![[0.0_f32; 3]; width * height];
    let (half_w, half_h) = camera_half_extents(width as f32, height as f32);

    for side in FieldSide::BOTH {
        if !scene.is_visible(side) {
            continue;
        }
        let population = scene.population(side);
        let points = population.positions().chunks_exact(3);
        let colors = population.colors().chunks_exact(3);
        for (p, c) in points.zip(colors) {
            let u = (p[0] + half_w) / (2.0 * half_w);
            let v = (half_h - p[1]) / (2.0 * half_h);
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }
            let px = (u * width as f32) as usize;
            let py = (v * height as f32) as usize;
            if px >= width || py >= height {
                continue;
            }
            let cell = &mut accum[py * width + px];
            for (acc, &ch) in cell.iter_mut().zip(c) {
                *acc += ch * POINT_OPACITY;
            }
        }
    }

    accum
        .iter()
        .flat_map(|rgb| {
            let q = |bg: u8, add: f32| {
                ((f32::from(bg) / 255.0 + add).clamp(0.0, 1.0) * 255.0).round() as u8
            };
            [
                q(BACKGROUND[0], rgb[0]),
                q(BACKGROUND[1], rgb[1]),
                q(BACKGROUND[2], rgb[2]),
                255u8,
            ]
        })
        .collect()
}

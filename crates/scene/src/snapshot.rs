//! CPU-side PNG rendering of a [`Scene`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the scene crate without pulling in the `image` crate.
//! The splat itself lives in [`crate::pixel`] (always available).

use luminar_core::FlowError;
use std::path::Path;

use crate::pixel::splat_rgba;
use crate::Scene;

/// Writes the visible particles of `scene` as a `width` x `height` PNG.
///
/// Returns `FlowError::InvalidDimensions` if either dimension is zero or
/// overflows `u32`, or `FlowError::Io` on write failure.
pub fn write_png(scene: &Scene, width: usize, height: usize, path: &Path) -> Result<(), FlowError> {
    if width == 0 || height == 0 {
        return Err(FlowError::InvalidDimensions);
    }
    let w = u32::try_from(width).map_err(|_| FlowError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| FlowError::InvalidDimensions)?;
    let rgba = splat_rgba(scene, width, height);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| FlowError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FlowError::Io(e.to_string()))?;
    log::info!("wrote {}x{} snapshot to {}", w, h, path.display());
    Ok(())
}

//! Camera framing and the side-by-side field offset.
//!
//! The camera is orthographic with a fixed half-height of [`VIEW_SIZE`] and a
//! half-width of `VIEW_SIZE * aspect`. When both fields are loaded they sit
//! at `-offset` and `+offset` on the x axis.

/// Camera half-height in display units.
pub const VIEW_SIZE: f32 = 1.8;

const MAX_VISUAL_OFFSET: f32 = 1.4;
const MIN_OFFSET: f32 = 1.0;
/// Share of the camera width each field should span.
const FIELD_SHARE: f32 = 0.45;
/// Control panel width plus margin on the right edge, in pixels.
const PANEL_PIXELS: f32 = 258.0;
const PANEL_GAP_UNITS: f32 = 0.5;

/// Orthographic camera half-extents `(half_width, half_height)` for a
/// viewport in pixels. Degenerate viewports fall back to a square camera.
pub fn camera_half_extents(width_px: f32, height_px: f32) -> (f32, f32) {
    (VIEW_SIZE * aspect(width_px, height_px), VIEW_SIZE)
}

/// Horizontal offset of each field when two are shown side by side.
///
/// Each field aims for 45% of the camera width, capped at 1.4 and by the
/// space left beside the control panel, and never below 1.0.
pub fn compute_view_offset(width_px: f32, height_px: f32) -> f32 {
    if !(width_px > 0.0 && height_px > 0.0) {
        return MIN_OFFSET;
    }
    let camera_width = VIEW_SIZE * aspect(width_px, height_px) * 2.0;
    let desired = camera_width * FIELD_SHARE / 2.0;

    let panel_units = PANEL_PIXELS / width_px * camera_width;
    let constrained = (camera_width - panel_units - PANEL_GAP_UNITS) / 2.0;

    let max_offset = MAX_VISUAL_OFFSET.min(constrained);
    MIN_OFFSET.max(desired.min(max_offset))
}

fn aspect(width_px: f32, height_px: f32) -> f32 {
    if width_px > 0.0 && height_px > 0.0 {
        width_px / height_px
    } else {
        1.0
    }
}

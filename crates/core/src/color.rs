//! RGB color values and the glow-to-color mapping.
//!
//! Colors are normalized floats written straight into the renderer's color
//! buffer. They are not clamped beyond what the mapping formulas produce;
//! the steady-state default curve exceeds 1.0 on purpose and the bloom pass
//! downstream relies on that headroom.

use crate::palette::ColorPreset;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Linear-ish RGB triple in normalized units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiplies every channel by `k`.
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Hex string like `"#9940e6"`, channels clamped to [0, 1] first.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// 8-bit channels, clamped and rounded.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [r, g, b] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Rgb::new(r, g, b))
    }
}

/// Whether a color is for a freshly spawned particle or a moving one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowPhase {
    Spawn,
    Steady,
}

/// Color for a particle with the given `glow` under `preset`.
///
/// `glow` is clamped to [0, 1]. The default preset keeps its hand-tuned
/// legacy curve:
///
/// ```text
/// spawn:  (0.6, 0.25, 0.9) * glow
/// steady: (0.35 + 0.9 glow, 0.18 + 0.45 glow, 0.6 + 0.35 glow)
/// ```
///
/// Every other preset uses `rgb * brightness` with
/// `brightness = glow` on spawn and `0.35 + 0.65 glow` otherwise. New
/// presets must not copy the legacy curve.
pub fn color_for(glow: f32, preset: &ColorPreset, phase: GlowPhase) -> Rgb {
    let glow = glow.clamp(0.0, 1.0);

    if preset.is_legacy() {
        return match phase {
            GlowPhase::Spawn => Rgb::new(0.6 * glow, 0.25 * glow, 0.9 * glow),
            GlowPhase::Steady => Rgb::new(
                0.35 + glow * 0.9,
                0.18 + glow * 0.45,
                0.6 + glow * 0.35,
            ),
        };
    }

    let brightness = match phase {
        GlowPhase::Spawn => glow,
        GlowPhase::Steady => 0.35 + glow * 0.65,
    };
    preset.rgb.scaled(brightness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteKey;

    const EPSILON: f32 = 1e-6;

    fn approx(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < EPSILON && (a.g - b.g).abs() < EPSILON && (a.b - b.b).abs() < EPSILON
    }

    // -- Default (legacy) preset --

    #[test]
    fn default_spawn_at_half_glow_matches_legacy_formula() {
        let preset = PaletteKey::default().preset();
        let c = color_for(0.5, preset, GlowPhase::Spawn);
        assert!(approx(c, Rgb::new(0.3, 0.125, 0.45)), "{c:?}");
    }

    #[test]
    fn default_steady_uses_offsets_plus_spread() {
        let preset = PaletteKey::default().preset();
        let c = color_for(1.0, preset, GlowPhase::Steady);
        assert!(approx(c, Rgb::new(1.25, 0.63, 0.95)), "{c:?}");
        let dim = color_for(0.0, preset, GlowPhase::Steady);
        assert!(approx(dim, Rgb::new(0.35, 0.18, 0.6)), "{dim:?}");
    }

    // -- Other presets --

    #[test]
    fn other_preset_spawn_scales_by_glow() {
        let preset = PaletteKey::NeonCyan.preset();
        let c = color_for(0.5, preset, GlowPhase::Spawn);
        assert!(approx(c, Rgb::new(0.125, 0.475, 0.5)), "{c:?}");
    }

    #[test]
    fn other_preset_steady_has_floor_brightness() {
        let preset = PaletteKey::PureWhite.preset();
        let c = color_for(0.0, preset, GlowPhase::Steady);
        assert!(approx(c, Rgb::new(0.35, 0.35, 0.35)), "{c:?}");
        let full = color_for(1.0, preset, GlowPhase::Steady);
        assert!(approx(full, Rgb::new(1.0, 1.0, 1.0)), "{full:?}");
    }

    #[test]
    fn glow_is_clamped_before_mapping() {
        let preset = PaletteKey::SolarFlare.preset();
        assert_eq!(
            color_for(3.0, preset, GlowPhase::Steady),
            color_for(1.0, preset, GlowPhase::Steady)
        );
        assert_eq!(
            color_for(-1.0, preset, GlowPhase::Spawn),
            Rgb::new(0.0, 0.0, 0.0)
        );
    }

    // -- Rgb helpers --

    #[test]
    fn to_hex_clamps_and_quantizes() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_hex(), "#ff0080");
        assert_eq!(Rgb::new(1.7, -0.2, 0.0).to_hex(), "#ff0000");
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Rgb::new(0.5, 0.25, 1.0)).unwrap();
        assert_eq!(json, "[0.5,0.25,1.0]");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(0.5, 0.25, 1.0));
    }
}

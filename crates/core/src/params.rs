//! The live configuration snapshot and helpers for reading it from JSON.
//!
//! [`FlowParams`] is copied once per frame and handed to every population's
//! update as an immutable value. The `param_*` helpers read individual
//! options from a JSON object; a missing or mistyped key yields the default,
//! never an error.

use crate::palette::PaletteKey;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::ops::RangeInclusive;

/// Particle count range enforced by the control surface.
pub const PARTICLE_COUNT_RANGE: RangeInclusive<usize> = 100..=8000;
/// Acceptance radius range for nearest-sample lookup, in display units.
pub const FIELD_BORDER_RANGE: RangeInclusive<f32> = 0.01..=0.1;
/// Smallest accepted `life_min`, in seconds.
pub const LIFE_MIN_FLOOR: f32 = 0.1;
/// Smallest accepted `life_max`, in seconds.
pub const LIFE_MAX_FLOOR: f32 = 0.2;

/// Tunable parameters read each frame.
///
/// Rendering-only values (`size`, bloom, trails) are carried untouched for the
/// renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowParams {
    pub size: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub life_min: f32,
    pub life_max: f32,
    pub field_valid_distance: f32,
    pub speed: f32,
    pub particle_count: usize,
    pub color_preset_a: PaletteKey,
    pub color_preset_b: PaletteKey,
    pub noise_strength: f32,
    pub trails_enabled: bool,
    pub trail_decay: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            size: 2.0,
            bloom_strength: 1.2,
            bloom_radius: 0.35,
            life_min: 0.5,
            life_max: 1.4,
            field_valid_distance: 0.05,
            speed: 6.0,
            particle_count: 5000,
            color_preset_a: PaletteKey::DEFAULT,
            color_preset_b: PaletteKey::DEFAULT,
            noise_strength: 0.0,
            trails_enabled: false,
            trail_decay: 0.9,
        }
    }
}

/// Which palette selection a population reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSlot {
    A,
    B,
}

impl FlowParams {
    /// Builds a snapshot from a JSON object, falling back to defaults for
    /// missing, mistyped, or unknown values.
    ///
    /// Life bounds are floored and cross-clamped as if `lifeMin` were edited
    /// last, and the particle count is clamped into [`PARTICLE_COUNT_RANGE`].
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        let palette = |name: &str, default: PaletteKey| {
            PaletteKey::from_name_or_default(&param_string(params, name, default.name()))
        };
        let mut p = Self {
            size: param_f32(params, "size", d.size),
            bloom_strength: param_f32(params, "bloomStrength", d.bloom_strength),
            bloom_radius: param_f32(params, "bloomRadius", d.bloom_radius),
            life_min: d.life_min,
            life_max: param_f32(params, "lifeMax", d.life_max).max(LIFE_MAX_FLOOR),
            field_valid_distance: param_f32(params, "fieldValidDistance", d.field_valid_distance),
            speed: param_f32(params, "speed", d.speed),
            particle_count: d.particle_count,
            color_preset_a: palette("colorPresetA", d.color_preset_a),
            color_preset_b: palette("colorPresetB", d.color_preset_b),
            noise_strength: param_f32(params, "noiseStrength", d.noise_strength).max(0.0),
            trails_enabled: param_bool(params, "trailsEnabled", d.trails_enabled),
            trail_decay: param_f32(params, "trailDecay", d.trail_decay),
        };
        p.set_life_min(param_f32(params, "lifeMin", d.life_min));
        p.set_particle_count(param_usize(params, "particleCount", d.particle_count));
        p
    }

    /// Current values as a camelCase JSON object.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Sets `life_min`, floored at [`LIFE_MIN_FLOOR`]; if that inverts the
    /// pair, `life_max` follows.
    pub fn set_life_min(&mut self, value: f32) {
        self.life_min = value.max(LIFE_MIN_FLOOR);
        if self.life_min > self.life_max {
            self.life_max = self.life_min;
        }
    }

    /// Sets `life_max`, floored at [`LIFE_MAX_FLOOR`]; if that inverts the
    /// pair, `life_min` follows.
    pub fn set_life_max(&mut self, value: f32) {
        self.life_max = value.max(LIFE_MAX_FLOOR);
        if self.life_max < self.life_min {
            self.life_min = self.life_max;
        }
    }

    /// Sets the particle count, clamped into [`PARTICLE_COUNT_RANGE`].
    pub fn set_particle_count(&mut self, count: usize) {
        self.particle_count = count.clamp(*PARTICLE_COUNT_RANGE.start(), *PARTICLE_COUNT_RANGE.end());
    }

    /// Builder form of [`set_particle_count`](Self::set_particle_count).
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.set_particle_count(count);
        self
    }

    /// Palette selected for `slot`.
    pub fn palette_key(&self, slot: PaletteSlot) -> PaletteKey {
        match slot {
            PaletteSlot::A => self.color_preset_a,
            PaletteSlot::B => self.color_preset_b,
        }
    }

    /// Turbulence is skipped entirely at zero strength.
    pub fn noise_enabled(&self) -> bool {
        self.noise_strength > 0.0
    }

    /// Schema describing each option: type, default, range, and step.
    pub fn schema() -> Value {
        let d = Self::default();
        let number = |default: f32, min: f32, max: f32, step: f32, description: &str| {
            json!({
                "type": "number",
                "default": default,
                "min": min,
                "max": max,
                "step": step,
                "description": description,
            })
        };
        json!({
            "speed": number(d.speed, 0.1, 8.0, 0.1, "Advection speed multiplier"),
            "noiseStrength": number(d.noise_strength, 0.0, 1.0, 0.01, "Turbulence strength; 0 disables noise"),
            "size": number(d.size, 0.5, 4.0, 0.1, "Point size (renderer only)"),
            "particleCount": {
                "type": "integer",
                "default": d.particle_count,
                "min": PARTICLE_COUNT_RANGE.start(),
                "max": PARTICLE_COUNT_RANGE.end(),
                "step": 100,
                "description": "Particles per population; changing it reinitializes buffers",
            },
            "bloomStrength": number(d.bloom_strength, 0.2, 2.5, 0.05, "Bloom strength (renderer only)"),
            "bloomRadius": number(d.bloom_radius, 0.0, 1.2, 0.02, "Bloom radius (renderer only)"),
            "lifeMin": number(d.life_min, LIFE_MIN_FLOOR, 2.0, 0.05, "Minimum particle lifetime in seconds"),
            "lifeMax": number(d.life_max, LIFE_MAX_FLOOR, 5.0, 0.05, "Maximum particle lifetime in seconds"),
            "fieldValidDistance": number(
                d.field_valid_distance,
                *FIELD_BORDER_RANGE.start(),
                *FIELD_BORDER_RANGE.end(),
                0.01,
                "Nearest-sample acceptance radius in display units",
            ),
            "colorPresetA": {
                "type": "string",
                "default": d.color_preset_a.name(),
                "enum": PaletteKey::list_names(),
                "description": "Palette for Field A",
            },
            "colorPresetB": {
                "type": "string",
                "default": d.color_preset_b.name(),
                "enum": PaletteKey::list_names(),
                "description": "Palette for Field B",
            },
            "trailsEnabled": {
                "type": "boolean",
                "default": d.trails_enabled,
                "description": "Afterimage trails (renderer only)",
            },
            "trailDecay": number(d.trail_decay, 0.7, 0.99, 0.005, "Trail decay per frame (renderer only)"),
        })
    }
}

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Like [`param_f64`], narrowed to `f32`.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    param_f64(params, name, f64::from(default)) as f32
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u64`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

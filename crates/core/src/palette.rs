//! Fixed catalog of particle color presets.
//!
//! Each population selects one entry by [`PaletteKey`]. The key is resolved
//! to an immutable [`ColorPreset`] once per frame and passed into the
//! advector, never looked up per particle.

use crate::color::Rgb;
use crate::error::FlowError;
use serde::{Deserialize, Serialize};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPreset {
    pub key: PaletteKey,
    pub label: &'static str,
    pub rgb: Rgb,
}

impl ColorPreset {
    /// True for the preset that keeps the hand-tuned legacy color curve.
    pub fn is_legacy(&self) -> bool {
        self.key == PaletteKey::DEFAULT
    }
}

/// Catalog key. Serialized in kebab-case (`"luminous-violet"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteKey {
    LuminousViolet,
    PureWhite,
    NeonCyan,
    ElectricLime,
    SolarFlare,
    AuroraMint,
    SunriseCoral,
    EmberGold,
}

const PRESETS: [ColorPreset; 8] = [
    ColorPreset {
        key: PaletteKey::LuminousViolet,
        label: "Luminous violet",
        rgb: Rgb::new(0.6, 0.25, 0.9),
    },
    ColorPreset {
        key: PaletteKey::PureWhite,
        label: "Pure white",
        rgb: Rgb::new(1.0, 1.0, 1.0),
    },
    ColorPreset {
        key: PaletteKey::NeonCyan,
        label: "Neon cyan",
        rgb: Rgb::new(0.25, 0.95, 1.0),
    },
    ColorPreset {
        key: PaletteKey::ElectricLime,
        label: "Electric lime",
        rgb: Rgb::new(0.75, 1.0, 0.25),
    },
    ColorPreset {
        key: PaletteKey::SolarFlare,
        label: "Solar flare",
        rgb: Rgb::new(1.0, 0.55, 0.15),
    },
    ColorPreset {
        key: PaletteKey::AuroraMint,
        label: "Aurora mint",
        rgb: Rgb::new(0.4, 1.0, 0.85),
    },
    ColorPreset {
        key: PaletteKey::SunriseCoral,
        label: "Sunrise coral",
        rgb: Rgb::new(1.0, 0.6, 0.5),
    },
    ColorPreset {
        key: PaletteKey::EmberGold,
        label: "Ember gold",
        rgb: Rgb::new(1.0, 0.8, 0.2),
    },
];

impl PaletteKey {
    /// The default selection for both populations.
    pub const DEFAULT: PaletteKey = PaletteKey::LuminousViolet;

    /// All keys in catalog order.
    pub const ALL: [PaletteKey; 8] = [
        PaletteKey::LuminousViolet,
        PaletteKey::PureWhite,
        PaletteKey::NeonCyan,
        PaletteKey::ElectricLime,
        PaletteKey::SolarFlare,
        PaletteKey::AuroraMint,
        PaletteKey::SunriseCoral,
        PaletteKey::EmberGold,
    ];

    /// The catalog entry for this key.
    pub fn preset(self) -> &'static ColorPreset {
        &PRESETS[self as usize]
    }

    /// Kebab-case name, e.g. `"neon-cyan"`.
    pub fn name(self) -> &'static str {
        match self {
            PaletteKey::LuminousViolet => "luminous-violet",
            PaletteKey::PureWhite => "pure-white",
            PaletteKey::NeonCyan => "neon-cyan",
            PaletteKey::ElectricLime => "electric-lime",
            PaletteKey::SolarFlare => "solar-flare",
            PaletteKey::AuroraMint => "aurora-mint",
            PaletteKey::SunriseCoral => "sunrise-coral",
            PaletteKey::EmberGold => "ember-gold",
        }
    }

    /// Looks up a key by its kebab-case name.
    ///
    /// Returns `FlowError::UnknownPalette` if no entry matches.
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| FlowError::UnknownPalette(name.to_string()))
    }

    /// Looks up a key, falling back to [`PaletteKey::DEFAULT`] for unknown
    /// names.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::DEFAULT)
    }

    /// Names of all presets in catalog order.
    pub fn list_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.name()).collect()
    }
}

impl Default for PaletteKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PaletteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The full catalog in display order.
pub fn catalog() -> &'static [ColorPreset] {
    &PRESETS
}

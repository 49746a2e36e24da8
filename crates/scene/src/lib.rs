#![deny(unsafe_code)]
//! Two-field scene: owns both particle populations, their field status,
//! the side-by-side layout, and the frame clock.
//!
//! This crate sits between `luminar-core` (fields, samplers, populations)
//! and the front ends. Both the CLI and the WASM bindings drive a [`Scene`]
//! so loading, layout, and parameter edits behave the same everywhere.

pub mod layout;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use luminar_core::ingest;
use luminar_core::{
    FieldDatum, FlowError, FlowParams, Frame, PaletteKey, PaletteSlot, Population, VectorField,
    Xorshift64,
};
use serde::Serialize;
use std::sync::Arc;

/// Largest simulation step per frame, in seconds.
pub const MAX_FRAME_DT: f32 = 0.033;

/// Status label for a side that has never loaded a field.
pub const STATUS_BUILT_IN: &str = "default (built-in)";
/// Status label after [`Scene::clear_field`].
pub const STATUS_CLEARED: &str = "default (cleared)";
/// Status label when a dropped file yields no usable rows.
pub const STATUS_EMPTY_CSV: &str = "CSV empty or invalid";
const STATUS_EMPTY_FILE: &str = "default (empty file)";
const STATUS_LOAD_ERROR: &str = "default (load error)";

const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// Field A (left) or Field B (right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSide {
    Left,
    Right,
}

impl FieldSide {
    pub const BOTH: [FieldSide; 2] = [FieldSide::Left, FieldSide::Right];

    /// Palette slot read by this side's population.
    pub fn slot(self) -> PaletteSlot {
        match self {
            FieldSide::Left => PaletteSlot::A,
            FieldSide::Right => PaletteSlot::B,
        }
    }

    /// Accepts `left`/`right` and `a`/`b`, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" | "a" => Some(FieldSide::Left),
            "right" | "b" => Some(FieldSide::Right),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            FieldSide::Left => 0,
            FieldSide::Right => 1,
        }
    }
}

/// What the front end shows for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatus {
    pub loaded: bool,
    pub label: String,
}

impl FieldStatus {
    fn idle(label: &str) -> Self {
        Self {
            loaded: false,
            label: label.to_string(),
        }
    }
}

/// Both populations plus everything that positions and drives them.
#[derive(Debug)]
pub struct Scene {
    params: FlowParams,
    populations: [Population; 2],
    status: [FieldStatus; 2],
    visible: [bool; 2],
    viewport: (f32, f32),
    time: f64,
}

impl Scene {
    /// Creates a scene with no fields loaded. Each population gets its own
    /// stream derived from `seed`.
    pub fn new(seed: u64, params: FlowParams) -> Self {
        let mut rng = Xorshift64::new(seed);
        let a = Population::new(PaletteSlot::A, rng.fork_seed(), &params);
        let b = Population::new(PaletteSlot::B, rng.fork_seed(), &params);
        let mut scene = Self {
            params,
            populations: [a, b],
            status: [
                FieldStatus::idle(STATUS_BUILT_IN),
                FieldStatus::idle(STATUS_BUILT_IN),
            ],
            visible: [true, false],
            viewport: DEFAULT_VIEWPORT,
            time: 0.0,
        };
        scene.update_layout();
        scene
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    pub fn population(&self, side: FieldSide) -> &Population {
        &self.populations[side.index()]
    }

    pub fn status(&self, side: FieldSide) -> &FieldStatus {
        &self.status[side.index()]
    }

    /// Hidden populations still advance; they are just not drawn.
    pub fn is_visible(&self, side: FieldSide) -> bool {
        self.visible[side.index()]
    }

    pub fn has_field(&self, side: FieldSide) -> bool {
        self.population(side).has_field()
    }

    /// Scene clock in seconds, the sum of clamped frame steps.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    // -- Fields --

    /// Builds a field from `rows` and swaps it into `side`.
    ///
    /// An empty row set leaves the previous field active and reports
    /// [`STATUS_EMPTY_CSV`].
    pub fn load_field(&mut self, side: FieldSide, rows: Vec<FieldDatum>, name: &str) -> &FieldStatus {
        let i = side.index();
        match VectorField::new(rows) {
            Ok(field) => {
                let bounds = *field.bounds();
                let label = format!(
                    "{name} · {} vectors ({:.1}×{:.1})",
                    field.len(),
                    bounds.width(),
                    bounds.height()
                );
                self.install(side, field, label);
            }
            Err(err) => {
                log::warn!("{side:?} field {name:?} not loaded: {err}");
                self.status[i] = FieldStatus::idle(STATUS_EMPTY_CSV);
            }
        }
        &self.status[i]
    }

    /// Parses CSV-like text and loads it with [`load_field`](Self::load_field).
    pub fn load_field_text(&mut self, side: FieldSide, name: &str, text: &str) -> &FieldStatus {
        let parsed = ingest::parse_text(text);
        self.load_field(side, parsed.rows, name)
    }

    /// Loads the startup field (the `vector-field.json` form).
    ///
    /// A failed read or parse, or an empty array, keeps the constant flow and
    /// only updates the label.
    pub fn load_startup_field(
        &mut self,
        side: FieldSide,
        records: Result<Vec<FieldDatum>, FlowError>,
    ) -> &FieldStatus {
        let i = side.index();
        match records {
            Ok(rows) if !rows.is_empty() => match VectorField::new(rows) {
                Ok(field) => {
                    let bounds = *field.bounds();
                    let label = format!(
                        "loaded {} vectors ({:.1}×{:.1})",
                        field.len(),
                        bounds.width(),
                        bounds.height()
                    );
                    self.install(side, field, label);
                }
                Err(err) => {
                    log::error!("failed to build startup field: {err}");
                    self.status[i].label = STATUS_LOAD_ERROR.to_string();
                }
            },
            Ok(_) => self.status[i].label = STATUS_EMPTY_FILE.to_string(),
            Err(err) => {
                log::error!("failed to load startup field: {err}");
                self.status[i].label = STATUS_LOAD_ERROR.to_string();
            }
        }
        &self.status[i]
    }

    fn install(&mut self, side: FieldSide, field: VectorField, label: String) {
        let i = side.index();
        self.populations[i].set_field(Some(Arc::new(field)));
        log::info!("{side:?}: {label}");
        self.status[i] = FieldStatus {
            loaded: true,
            label,
        };
        self.update_layout();
    }

    /// Drops the field on `side`, falling back to constant flow.
    pub fn clear_field(&mut self, side: FieldSide) {
        let i = side.index();
        self.populations[i].reseed_lifetimes(&self.params);
        self.populations[i].set_field(None);
        self.status[i] = FieldStatus::idle(STATUS_CLEARED);
        log::info!("{side:?}: field cleared");
        self.update_layout();
    }

    // -- Layout --

    /// Records a new viewport size and repositions both populations.
    pub fn set_viewport(&mut self, width_px: f32, height_px: f32) {
        self.viewport = (width_px, height_px);
        self.update_layout();
    }

    /// Side-by-side offset for the current viewport.
    pub fn view_offset(&self) -> f32 {
        layout::compute_view_offset(self.viewport.0, self.viewport.1)
    }

    /// Both loaded: A at `-offset`, B at `+offset`. One loaded: it sits at
    /// the origin and the other is hidden. None: A shows constant flow at
    /// the origin and B is hidden.
    fn update_layout(&mut self) {
        let offset = self.view_offset();
        let params = &self.params;
        let [a, b] = &mut self.populations;
        match (a.has_field(), b.has_field()) {
            (true, true) => {
                self.visible = [true, true];
                a.set_view_offset(-offset, params);
                b.set_view_offset(offset, params);
            }
            (true, false) => {
                self.visible = [true, false];
                a.set_view_offset(0.0, params);
            }
            (false, true) => {
                self.visible = [false, true];
                b.set_view_offset(0.0, params);
            }
            (false, false) => {
                self.visible = [true, false];
                a.set_view_offset(0.0, params);
                b.set_view_offset(0.0, params);
            }
        }
    }

    // -- Frame clock --

    /// Steps both populations by `elapsed_secs`, clamped to
    /// [`MAX_FRAME_DT`]. Returns whether anything needs redrawing.
    pub fn advance(&mut self, elapsed_secs: f32) -> bool {
        let dt = if elapsed_secs.is_finite() {
            elapsed_secs.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.time += f64::from(dt);
        let frame = Frame {
            dt,
            time: self.time,
            params: &self.params,
        };
        for population in &mut self.populations {
            population.step(&frame);
        }
        self.take_needs_redraw()
    }

    /// Returns and clears the redraw signal of both populations.
    pub fn take_needs_redraw(&mut self) -> bool {
        let [a, b] = &mut self.populations;
        let a = a.take_needs_redraw();
        let b = b.take_needs_redraw();
        a || b
    }

    // -- Parameters --

    /// Replaces the whole parameter snapshot.
    ///
    /// A particle count change resizes both populations; a lifetime bound
    /// change reseeds lifetimes. Everything else is read on the next frame.
    pub fn set_params(&mut self, params: FlowParams) {
        let resize = params.particle_count != self.params.particle_count;
        let reseed = params.life_min != self.params.life_min || params.life_max != self.params.life_max;
        self.params = params;
        if resize {
            self.resize_populations();
        } else if reseed {
            self.reseed_lifetimes();
        }
    }

    /// Clamped into the allowed range; both populations reinitialize.
    pub fn set_particle_count(&mut self, count: usize) {
        let before = self.params.particle_count;
        self.params.set_particle_count(count);
        if self.params.particle_count != before {
            self.resize_populations();
        }
    }

    pub fn set_life_min(&mut self, value: f32) {
        self.params.set_life_min(value);
        self.reseed_lifetimes();
    }

    pub fn set_life_max(&mut self, value: f32) {
        self.params.set_life_max(value);
        self.reseed_lifetimes();
    }

    pub fn set_palette(&mut self, side: FieldSide, key: PaletteKey) {
        match side.slot() {
            PaletteSlot::A => self.params.color_preset_a = key,
            PaletteSlot::B => self.params.color_preset_b = key,
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.params.speed = speed;
    }

    /// Negative strengths are treated as zero (noise off).
    pub fn set_noise_strength(&mut self, strength: f32) {
        self.params.noise_strength = strength.max(0.0);
    }

    pub fn set_field_valid_distance(&mut self, distance: f32) {
        let range = luminar_core::params::FIELD_BORDER_RANGE;
        self.params.field_valid_distance = distance.clamp(*range.start(), *range.end());
    }

    fn resize_populations(&mut self) {
        log::info!("particle count set to {}", self.params.particle_count);
        let params = &self.params;
        for population in &mut self.populations {
            population.resize(params.particle_count, params);
        }
    }

    fn reseed_lifetimes(&mut self) {
        let params = &self.params;
        for population in &mut self.populations {
            population.reseed_lifetimes(params);
        }
    }
}

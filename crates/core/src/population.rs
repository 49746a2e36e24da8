//! A population of advected particles: the per-frame simulation step.
//!
//! Each particle is row `i` across three parallel buffers: position
//! (`x, y, z = 0`), color (`r, g, b`), and remaining lifetime in seconds.
//! One step per rendered frame:
//!
//! 1. sample velocity at the particle; no sample means respawn now
//! 2. add turbulence when `noise_strength > 0`
//! 3. integrate `pos += v * FLOW_SCALE * speed * dt + jitter`
//! 4. color from glow `min(1, |v| * SPEED_TO_GLOW)`
//! 5. age by `dt`
//! 6. respawn if expired, out of bounds, or non-finite
//!
//! Particles never interact, so update order only affects which random
//! draws each particle receives. No particle is ever left dead in the
//! buffers after a step.

use crate::color::{color_for, GlowPhase, Rgb};
use crate::field::VectorField;
use crate::field_source::{ConstantFlow, FieldSampler, FlowSource, Turbulence};
use crate::palette::ColorPreset;
use crate::params::{FlowParams, PaletteSlot};
use crate::prng::Xorshift64;
use crate::transform::WORLD_EXTENT;
use glam::Vec2;
use std::sync::Arc;

/// Fixed flow scale folded into the speed coefficient.
pub const FLOW_SCALE: f32 = 0.85;
/// Speed-to-glow gain.
pub const SPEED_TO_GLOW: f32 = 2.6;
/// Per-second positional jitter amplitude.
pub const JITTER: f32 = 0.015;
/// Spawn glow is drawn from `[SPAWN_GLOW_MIN, SPAWN_GLOW_MIN + SPAWN_GLOW_SPREAD)`.
const SPAWN_GLOW_MIN: f32 = 0.4;
const SPAWN_GLOW_SPREAD: f32 = 0.2;

/// Immutable inputs for one simulation step.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Scene clock in seconds, drives turbulence.
    pub time: f64,
    pub params: &'a FlowParams,
}

/// One independently evolving particle population.
///
/// Parameterized by the palette slot it reads and its horizontal view offset
/// (non-zero when two fields are shown side by side).
#[derive(Debug)]
pub struct Population {
    slot: PaletteSlot,
    positions: Vec<f32>,
    colors: Vec<f32>,
    lifetimes: Vec<f32>,
    field: Option<Arc<VectorField>>,
    view_offset_x: f32,
    rng: Xorshift64,
    turbulence: Turbulence,
    needs_redraw: bool,
}

impl Population {
    /// Creates `params.particle_count` particles with no field loaded.
    pub fn new(slot: PaletteSlot, seed: u64, params: &FlowParams) -> Self {
        let mut rng = Xorshift64::new(seed);
        let turbulence = Turbulence::new(rng.fork_seed() as u32);
        let mut population = Self {
            slot,
            positions: Vec::new(),
            colors: Vec::new(),
            lifetimes: Vec::new(),
            field: None,
            view_offset_x: 0.0,
            rng,
            turbulence,
            needs_redraw: false,
        };
        population.resize(params.particle_count, params);
        population
    }

    /// Respawns every particle.
    pub fn init(&mut self, params: &FlowParams) {
        let preset = params.palette_key(self.slot).preset();
        for i in 0..self.len() {
            self.respawn(i, params, preset);
        }
        self.needs_redraw = true;
    }

    /// Discards all buffers, allocates `count` particles, and respawns them.
    ///
    /// No particle state survives a resize.
    pub fn resize(&mut self, count: usize, params: &FlowParams) {
        log::debug!("population {:?}: resize to {count} particles", self.slot);
        self.positions = vec![0.0; count * 3];
        self.colors = vec![0.0; count * 3];
        self.lifetimes = vec![0.0; count];
        self.init(params);
    }

    /// Draws a fresh lifetime in `[life_min, life_max]` for every particle.
    pub fn reseed_lifetimes(&mut self, params: &FlowParams) {
        let (lo, hi) = life_bounds(params);
        for life in &mut self.lifetimes {
            *life = self.rng.next_range(lo, hi);
        }
    }

    /// Swaps in a new field, or `None` for the constant-flow fallback.
    ///
    /// Particles are not moved; any that fall outside the new field's
    /// coverage respawn on the next step.
    pub fn set_field(&mut self, field: Option<Arc<VectorField>>) {
        self.field = field;
    }

    pub fn field(&self) -> Option<&Arc<VectorField>> {
        self.field.as_ref()
    }

    pub fn has_field(&self) -> bool {
        self.field.as_ref().is_some_and(|f| !f.is_empty())
    }

    /// Moves the population horizontally. A change respawns every particle
    /// so no gap is left at the old offset.
    pub fn set_view_offset(&mut self, offset_x: f32, params: &FlowParams) {
        if self.view_offset_x != offset_x {
            self.view_offset_x = offset_x;
            self.init(params);
        }
    }

    pub fn view_offset(&self) -> f32 {
        self.view_offset_x
    }

    pub fn slot(&self) -> PaletteSlot {
        self.slot
    }

    /// Advances every particle by one frame.
    pub fn step(&mut self, frame: &Frame<'_>) {
        let preset = frame.params.palette_key(self.slot).preset();
        match self.field.clone() {
            Some(field) => {
                let sampler =
                    FieldSampler::new(&field, self.view_offset_x, frame.params.field_valid_distance);
                self.advance(&sampler, frame, preset);
            }
            None => self.advance(&ConstantFlow, frame, preset),
        }
        self.needs_redraw = true;
    }

    /// Velocity a particle at `pos` would receive this frame, including
    /// turbulence. `None` when `pos` is outside field coverage.
    pub fn velocity_at(&self, pos: Vec2, frame: &Frame<'_>) -> Option<Vec2> {
        match &self.field {
            Some(field) => {
                let sampler =
                    FieldSampler::new(field, self.view_offset_x, frame.params.field_valid_distance);
                self.velocity(&sampler, pos, frame)
            }
            None => self.velocity(&ConstantFlow, pos, frame),
        }
    }

    fn velocity<S: FlowSource>(&self, source: &S, pos: Vec2, frame: &Frame<'_>) -> Option<Vec2> {
        let v = source.sample(pos, frame.time)?;
        let params = frame.params;
        if params.noise_enabled() {
            Some(
                self.turbulence
                    .perturb(v, pos, frame.time, params.noise_strength),
            )
        } else {
            Some(v)
        }
    }

    fn advance<S: FlowSource>(&mut self, source: &S, frame: &Frame<'_>, preset: &ColorPreset) {
        let params = frame.params;
        let speed = FLOW_SCALE * params.speed * frame.dt;
        let jitter = JITTER * frame.dt;

        for i in 0..self.len() {
            let pos = self.position(i);
            let Some(v) = self.velocity(source, pos, frame) else {
                self.respawn(i, params, preset);
                continue;
            };

            let next = pos
                + v * speed
                + Vec2::new(self.rng.next_jitter(jitter), self.rng.next_jitter(jitter));

            let glow = (v.length() * SPEED_TO_GLOW).min(1.0);
            self.write_color(i, color_for(glow, preset, GlowPhase::Steady));

            self.lifetimes[i] -= frame.dt;

            if self.should_respawn(i, next) {
                self.respawn(i, params, preset);
            } else {
                self.write_position(i, next);
            }
        }
    }

    fn should_respawn(&self, i: usize, next: Vec2) -> bool {
        self.lifetimes[i] <= 0.0
            || !next.is_finite()
            || (next.x - self.view_offset_x).abs() > WORLD_EXTENT
            || next.y.abs() > WORLD_EXTENT
    }

    fn respawn(&mut self, i: usize, params: &FlowParams, preset: &ColorPreset) {
        let pos = match &self.field {
            Some(field) if !field.is_empty() => {
                let p = field.spawn_point(&mut self.rng, params.field_valid_distance);
                Vec2::new(p.x as f32 + self.view_offset_x, p.y as f32)
            }
            _ => Vec2::new(
                self.rng.next_jitter(WORLD_EXTENT) + self.view_offset_x,
                self.rng.next_jitter(WORLD_EXTENT),
            ),
        };
        self.write_position(i, pos);

        let (lo, hi) = life_bounds(params);
        self.lifetimes[i] = self.rng.next_range(lo, hi);

        let glow = SPAWN_GLOW_MIN + self.rng.next_f64() as f32 * SPAWN_GLOW_SPREAD;
        self.write_color(i, color_for(glow, preset, GlowPhase::Spawn));
    }

    fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.positions[i * 3], self.positions[i * 3 + 1])
    }

    fn write_position(&mut self, i: usize, p: Vec2) {
        let i3 = i * 3;
        self.positions[i3] = p.x;
        self.positions[i3 + 1] = p.y;
        self.positions[i3 + 2] = 0.0;
    }

    fn write_color(&mut self, i: usize, c: Rgb) {
        self.colors[i * 3..i * 3 + 3].copy_from_slice(&c.to_array());
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.lifetimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lifetimes.is_empty()
    }

    /// Flat `x, y, z` triples, one per particle.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `r, g, b` triples, one per particle.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Remaining lifetime per particle, in seconds.
    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }

    /// Returns and clears the redraw signal. Raised once per step and on any
    /// reinitialization.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

/// Life bounds ordered low to high even if the snapshot is inverted.
fn life_bounds(params: &FlowParams) -> (f32, f32) {
    if params.life_min <= params.life_max {
        (params.life_min, params.life_max)
    } else {
        (params.life_max, params.life_min)
    }
}

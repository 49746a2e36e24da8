#![deny(unsafe_code)]
//! Core types for the luminar particle advection system.
//!
//! Provides `FieldDatum` ingestion, the `FieldTransform` fit, the grid
//! `SpatialIndex`, `FlowSource` samplers with `Turbulence`, the particle
//! `Population`, the palette catalog, `FlowParams` configuration, and the
//! `Xorshift64` PRNG.

pub mod color;
pub mod datum;
pub mod error;
pub mod field;
pub mod field_source;
pub mod ingest;
pub mod palette;
pub mod params;
pub mod population;
pub mod prng;
pub mod spatial;
pub mod transform;

pub use color::{color_for, GlowPhase, Rgb};
pub use datum::FieldDatum;
pub use error::FlowError;
pub use field::VectorField;
pub use field_source::{ConstantFlow, FieldSampler, FlowSource, Turbulence};
pub use ingest::ParsedField;
pub use palette::{ColorPreset, PaletteKey};
pub use params::{FlowParams, PaletteSlot};
pub use population::{Frame, Population};
pub use prng::Xorshift64;
pub use spatial::SpatialIndex;
pub use transform::{Bounds, FieldTransform, WORLD_EXTENT};

#![deny(unsafe_code)]
//! WASM bindings for luminar.
//!
//! Exposes a [`WasmScene`] that the page drives once per animation frame.
//! Particle buffers are copied out as `Float32Array`s for upload to the GPU;
//! bloom, trails, and recording stay on the JavaScript side.

#[cfg(target_arch = "wasm32")]
mod console;

use luminar_core::palette::catalog;
use luminar_core::{ingest, FlowParams};
use luminar_scene::{FieldSide, Scene};
use serde_json::Value;
use wasm_bindgen::prelude::*;

fn parse_side(name: &str) -> Result<FieldSide, String> {
    FieldSide::from_name(name).ok_or_else(|| format!("unknown field side: {name}"))
}

/// Overlays the keys of `patch` onto `current` and re-reads the result, so
/// a partial update keeps every value it does not mention.
///
/// A patch that edits only `lifeMax` applies it last, so an inverting value
/// pulls `lifeMin` down with it.
fn merge_params(current: &FlowParams, patch: &str) -> Result<FlowParams, String> {
    let patch: Value = serde_json::from_str(patch).map_err(|e| format!("invalid params JSON: {e}"))?;
    let Value::Object(patch) = patch else {
        return Err("params must be a JSON object".to_string());
    };
    let life_max_edit = if patch.contains_key("lifeMin") {
        None
    } else {
        patch.get("lifeMax").and_then(Value::as_f64)
    };
    let mut merged = current.to_json();
    if let Value::Object(base) = &mut merged {
        base.extend(patch);
    }
    let mut params = FlowParams::from_json(&merged);
    if let Some(life_max) = life_max_edit {
        params.life_min = current.life_min;
        params.life_max = current.life_max;
        params.set_life_max(life_max as f32);
    }
    Ok(params)
}

fn palettes_json() -> String {
    let palettes: Vec<Value> = catalog()
        .iter()
        .map(|p| {
            serde_json::json!({
                "key": p.key,
                "label": p.label,
                "hex": p.rgb.to_hex(),
            })
        })
        .collect();
    serde_json::to_string(&palettes).unwrap_or_default()
}

/// Both particle populations and their fields, driven from JavaScript.
#[wasm_bindgen]
pub struct WasmScene {
    inner: Scene,
}

#[wasm_bindgen]
impl WasmScene {
    /// Creates a scene with default parameters and no fields loaded.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        #[cfg(target_arch = "wasm32")]
        console::init();
        Self {
            inner: Scene::new(u64::from(seed), FlowParams::default()),
        }
    }

    /// Loads dropped CSV text into `side` (`"left"` or `"right"`). Returns
    /// the status label.
    #[wasm_bindgen(js_name = "loadCsv")]
    pub fn load_csv(&mut self, side: &str, name: &str, text: &str) -> Result<String, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        Ok(self.inner.load_field_text(side, name, text).label.clone())
    }

    /// Loads the startup `vector-field.json` text. Returns the status label.
    #[wasm_bindgen(js_name = "loadJson")]
    pub fn load_json(&mut self, side: &str, text: &str) -> Result<String, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        let records = ingest::parse_json(text);
        Ok(self.inner.load_startup_field(side, records).label.clone())
    }

    #[wasm_bindgen(js_name = "clearField")]
    pub fn clear_field(&mut self, side: &str) -> Result<(), JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        self.inner.clear_field(side);
        Ok(())
    }

    /// Viewport size in CSS pixels; repositions the fields.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.set_viewport(width, height);
    }

    /// Applies a partial camelCase parameter object.
    #[wasm_bindgen(js_name = "setParams")]
    pub fn set_params(&mut self, json: &str) -> Result<(), JsError> {
        let params = merge_params(self.inner.params(), json).map_err(|e| JsError::new(&e))?;
        self.inner.set_params(params);
        Ok(())
    }

    /// Current parameters as a JSON string.
    pub fn params(&self) -> String {
        serde_json::to_string(self.inner.params()).unwrap_or_default()
    }

    /// Parameter schema as a JSON string.
    pub fn schema(&self) -> String {
        FlowParams::schema().to_string()
    }

    /// Steps both populations. Returns whether the buffers changed.
    pub fn advance(&mut self, elapsed_secs: f32) -> bool {
        self.inner.advance(elapsed_secs)
    }

    /// Flat `x, y, z` positions for `side`.
    pub fn positions(&self, side: &str) -> Result<Vec<f32>, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        Ok(self.inner.population(side).positions().to_vec())
    }

    /// Flat `r, g, b` colors for `side`.
    pub fn colors(&self, side: &str) -> Result<Vec<f32>, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        Ok(self.inner.population(side).colors().to_vec())
    }

    pub fn visible(&self, side: &str) -> Result<bool, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        Ok(self.inner.is_visible(side))
    }

    /// `{loaded, label}` for `side` as a JSON string.
    pub fn status(&self, side: &str) -> Result<String, JsError> {
        let side = parse_side(side).map_err(|e| JsError::new(&e))?;
        Ok(serde_json::to_string(self.inner.status(side)).unwrap_or_default())
    }

    #[wasm_bindgen(js_name = "particleCount")]
    pub fn particle_count(&self) -> usize {
        self.inner.params().particle_count
    }

    #[wasm_bindgen(js_name = "viewOffset")]
    pub fn view_offset(&self) -> f32 {
        self.inner.view_offset()
    }

    /// Palette catalog as a JSON array of `{key, label, hex}`.
    pub fn palettes() -> String {
        palettes_json()
    }
}

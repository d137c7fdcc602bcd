pub mod config;
pub mod counter;
pub mod dsp;
pub mod error;
pub mod particle;
pub mod pattern;
pub mod sequencer;
pub mod speech;
pub mod stage;
pub mod view;

use crate::config::StageConfig;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the micdrop-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: render the beat loop at `bpm` to a WAV byte array.
#[wasm_bindgen]
pub fn render_beat_wav(bpm: f64, cycles: u32, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let config = StageConfig {
        bpm,
        ..Default::default()
    };
    dsp::renderer::render_beat_wav(&config, cycles, sample_rate)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: seeded particle styles for `count` elements.
#[wasm_bindgen]
pub fn particle_styles(count: u32, seed: u32) -> Result<JsValue, JsValue> {
    let styles = particle::seeded_styles(count as usize, u64::from(seed));
    serde_wasm_bindgen::to_value(&styles).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: the frame-by-frame display strings for one stat
/// counter, one entry per 16 ms frame.
#[wasm_bindgen]
pub fn counter_frames(target: u32, duration_ms: f64) -> Result<JsValue, JsValue> {
    let frames = counter::frames(u64::from(target), duration_ms)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&frames).map_err(|e| JsValue::from_str(&format!("{e}")))
}

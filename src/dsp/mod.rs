//! Beat DSP — pure Rust synthesis of the drum tones.
//!
//! All synthesis runs in Rust for deterministic, cross-platform output.
//! The same code powers live playback on the page (via AudioWorklet +
//! WASM) and offline WAV export.

pub mod drum;
pub mod engine;
pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod renderer;

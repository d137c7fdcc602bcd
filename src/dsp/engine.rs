//! Beat engine — renders pattern steps to audio samples.
//!
//! The same tones the page plays live are rendered offline here:
//! one drum voice per pattern step, scheduled on the tempo grid, mixed
//! block by block. Deterministic across platforms, so the WASM export
//! and native tests produce identical buffers.

use log::debug;

use crate::config::StageConfig;
use crate::error::ConfigError;
use crate::pattern::{BeatPattern, Tempo};

use super::drum::{DrumVoice, HIT_SECS};
use super::mixer::apply_master;

const BLOCK_SIZE: usize = 128;

/// Offline renderer for the beat loop.
pub struct BeatEngine {
    sample_rate: f64,
    tempo: Tempo,
    pattern: BeatPattern,
    pub master_gain: f64,
}

impl BeatEngine {
    pub fn new(config: &StageConfig, sample_rate: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(BeatEngine {
            sample_rate,
            tempo: config.tempo()?,
            pattern: config.pattern.clone(),
            master_gain: 0.8,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Samples between consecutive pattern steps.
    pub fn step_interval_samples(&self) -> f64 {
        self.tempo.step_interval_ms() / 1000.0 * self.sample_rate
    }

    /// Render `steps` consecutive pattern steps (starting from step 0)
    /// to mono samples, plus enough tail for the last hit to ring out.
    pub fn render_steps(&self, steps: u32) -> Vec<f64> {
        let interval = self.step_interval_samples();
        let tail = (HIT_SECS * self.sample_rate) as usize;
        let total = (steps as f64 * interval) as usize + tail;
        debug!("rendering {steps} steps, {total} samples at {} Hz", self.sample_rate);

        let scheduled: Vec<(usize, DrumVoice)> = (0..steps)
            .map(|i| {
                let start = (i as f64 * interval) as usize;
                (start, DrumVoice::new(self.pattern.sound_at(i as u64), self.sample_rate))
            })
            .collect();

        let mut output = vec![0.0_f64; total];
        let mut voices: Vec<DrumVoice> = Vec::new();
        let mut next_idx = 0;

        let mut block_start = 0;
        while block_start < total {
            let block_end = (block_start + BLOCK_SIZE).min(total);

            while next_idx < scheduled.len() && scheduled[next_idx].0 < block_end {
                voices.push(scheduled[next_idx].1.clone());
                next_idx += 1;
            }

            for voice in voices.iter_mut() {
                for sample in output[block_start..block_end].iter_mut() {
                    *sample += voice.next_sample();
                }
            }
            voices.retain(|v| !v.is_finished());

            block_start = block_end;
        }

        apply_master(&mut output, self.master_gain);
        output
    }

    /// Render whole pattern cycles.
    pub fn render_cycles(&self, cycles: u32) -> Vec<f64> {
        self.render_steps(cycles * self.pattern.len() as u32)
    }
}

//! WAV renderer — the beat loop as a WAV byte buffer.

use crate::config::StageConfig;
use crate::error::ConfigError;

use super::engine::BeatEngine;

/// Render `cycles` passes of the configured beat pattern to a WAV file
/// as bytes (16-bit stereo PCM).
pub fn render_beat_wav(
    config: &StageConfig,
    cycles: u32,
    sample_rate: u32,
) -> Result<Vec<u8>, ConfigError> {
    let engine = BeatEngine::new(config, sample_rate as f64)?;
    let mono = engine.render_cycles(cycles);
    Ok(encode_wav(&to_pcm_i16_stereo(&mono), sample_rate, 2))
}

/// Duplicate mono f64 samples into interleaved stereo i16 PCM.
fn to_pcm_i16_stereo(mono: &[f64]) -> Vec<i16> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &s in mono {
        let sample = (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
        stereo.push(sample); // L
        stereo.push(sample); // R
    }
    stereo
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample) / 8;
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}

//! Stage configuration — tempo, pattern, counter and speech settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pattern::{BeatPattern, Tempo};

/// Speech delivery settings for the performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Speaking rate multiplier.
    pub rate: f64,
    /// Voice pitch multiplier.
    pub pitch: f64,
    /// Voice names to prefer, in order. Matching is by substring, so a
    /// platform-qualified name like "Daniel (en-GB)" still matches.
    pub preferred_voices: Vec<String>,
}

impl Default for SpeechParams {
    fn default() -> Self {
        SpeechParams {
            rate: 1.15,
            pitch: 0.85,
            preferred_voices: vec![
                "Google UK English Male".to_string(),
                "Daniel".to_string(),
                "Microsoft David".to_string(),
            ],
        }
    }
}

/// Everything the page animation needs, in one serializable bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Beat tempo in beats per minute.
    pub bpm: f64,
    /// Kick/snare template driving the beat.
    pub pattern: BeatPattern,
    /// How long a stat counter takes to reach its target, in ms.
    pub counter_duration_ms: f64,
    /// Beats of beat-only playback before the first spoken line.
    pub lead_in_beats: f64,
    pub speech: SpeechParams,
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            bpm: 85.0,
            pattern: BeatPattern::default(),
            counter_duration_ms: 2000.0,
            lead_in_beats: 2.0,
            speech: SpeechParams::default(),
        }
    }
}

impl StageConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that deserialization cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Tempo::new(self.bpm)?;
        if self.pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if !self.counter_duration_ms.is_finite() || self.counter_duration_ms <= 0.0 {
            return Err(ConfigError::InvalidCounterDuration {
                ms: self.counter_duration_ms,
            });
        }
        if !self.lead_in_beats.is_finite() || self.lead_in_beats < 0.0 {
            return Err(ConfigError::InvalidLeadIn {
                beats: self.lead_in_beats,
            });
        }
        Ok(())
    }

    /// The validated tempo.
    pub fn tempo(&self) -> Result<Tempo, ConfigError> {
        Tempo::new(self.bpm)
    }
}

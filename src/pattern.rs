//! Beat pattern and tempo math.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a pattern slot triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepSound {
    Kick,
    Snare,
}

/// A fixed rhythmic template: one flag per step, kick or snare.
///
/// Steps are addressed by a monotonically increasing step counter and
/// wrap around, so the pattern loops for as long as the beat runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatPattern {
    steps: Vec<bool>,
}

impl BeatPattern {
    /// Build a pattern from kick flags (`true` = kick, `false` = snare).
    pub fn new(steps: Vec<bool>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        Ok(BeatPattern { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolve the sound for a step counter value (cyclic).
    pub fn sound_at(&self, step: u64) -> StepSound {
        let idx = (step % self.steps.len() as u64) as usize;
        if self.steps[idx] {
            StepSound::Kick
        } else {
            StepSound::Snare
        }
    }
}

impl Default for BeatPattern {
    /// The stock eight-step template: kick on every other step, with a
    /// doubled kick closing the bar.
    fn default() -> Self {
        BeatPattern {
            steps: vec![true, false, true, false, true, false, true, true],
        }
    }
}

/// Validated tempo. Steps run at half-beat (eighth note) resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Result<Self, ConfigError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(ConfigError::InvalidTempo { bpm });
        }
        Ok(Tempo { bpm })
    }

    pub fn bpm(self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds.
    pub fn beat_secs(self) -> f64 {
        60.0 / self.bpm
    }

    /// Interval between pattern steps in milliseconds (half a beat).
    pub fn step_interval_ms(self) -> f64 {
        self.beat_secs() * 1000.0 / 2.0
    }

    /// Lead-in delay in milliseconds for the given number of beats.
    pub fn lead_in_ms(self, beats: f64) -> f64 {
        self.beat_secs() * 1000.0 * beats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_has_eight_steps() {
        let p = BeatPattern::default();
        assert_eq!(p.len(), 8);
    }

    #[test]
    fn sound_cycles_through_pattern() {
        let p = BeatPattern::default();
        let expected = [
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Kick,
        ];
        for step in 0..24u64 {
            assert_eq!(
                p.sound_at(step),
                expected[(step % 8) as usize],
                "step {step} should wrap into the 8-entry pattern"
            );
        }
    }

    #[test]
    fn empty_pattern_rejected() {
        let result = BeatPattern::new(vec![]);
        assert!(matches!(result, Err(ConfigError::EmptyPattern)));
    }

    #[test]
    fn custom_pattern_preserved() {
        let p = BeatPattern::new(vec![false, true]).unwrap();
        assert_eq!(p.sound_at(0), StepSound::Snare);
        assert_eq!(p.sound_at(1), StepSound::Kick);
        assert_eq!(p.sound_at(2), StepSound::Snare);
    }

    #[test]
    fn tempo_85_step_interval() {
        let t = Tempo::new(85.0).unwrap();
        // 60 / 85 ≈ 0.70588 s per beat, half of that per step
        assert!((t.beat_secs() - 0.70588).abs() < 1e-4);
        assert!((t.step_interval_ms() - 352.94).abs() < 0.01);
    }

    #[test]
    fn tempo_lead_in_two_beats() {
        let t = Tempo::new(85.0).unwrap();
        assert!((t.lead_in_ms(2.0) - 1411.76).abs() < 0.01);
    }

    #[test]
    fn tempo_rejects_nonpositive() {
        assert!(matches!(
            Tempo::new(0.0),
            Err(ConfigError::InvalidTempo { .. })
        ));
        assert!(matches!(
            Tempo::new(-10.0),
            Err(ConfigError::InvalidTempo { .. })
        ));
        assert!(matches!(
            Tempo::new(f64::NAN),
            Err(ConfigError::InvalidTempo { .. })
        ));
    }

    #[test]
    fn pattern_serde_round_trip() {
        let p = BeatPattern::default();
        let json = serde_json::to_string(&p).unwrap();
        let back: BeatPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}

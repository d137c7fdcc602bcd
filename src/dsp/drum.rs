//! Drum tones — the kick and snare behind the beat pattern.

use crate::pattern::StepSound;

use super::envelope::ExpRamp;
use super::oscillator::SineOscillator;

const KICK_FREQ: f64 = 150.0;
const SNARE_FREQ: f64 = 200.0;
/// Every hit is cut dead after half a second.
pub const HIT_SECS: f64 = 0.5;

/// One sounding drum hit: a sine oscillator swept by a frequency ramp
/// and shaped by a gain ramp.
///
/// Kick: 150 Hz falling exponentially to near-zero over 0.3 s at full
/// gain. Snare: 200 Hz dropping to 160 Hz over 0.1 s at 0.7 gain
/// decaying over 0.2 s.
#[derive(Debug, Clone)]
pub struct DrumVoice {
    osc: SineOscillator,
    freq: ExpRamp,
    gain: ExpRamp,
    remaining: usize,
}

impl DrumVoice {
    pub fn new(sound: StepSound, sample_rate: f64) -> Self {
        let (freq, gain) = match sound {
            StepSound::Kick => (
                ExpRamp::new(sample_rate, KICK_FREQ, 0.001, 0.3),
                ExpRamp::new(sample_rate, 1.0, 0.001, 0.3),
            ),
            StepSound::Snare => (
                ExpRamp::new(sample_rate, SNARE_FREQ, SNARE_FREQ * 0.8, 0.1),
                ExpRamp::new(sample_rate, 0.7, 0.001, 0.2),
            ),
        };
        DrumVoice {
            osc: SineOscillator::new(sample_rate),
            freq,
            gain,
            remaining: (HIT_SECS * sample_rate) as usize,
        }
    }

    /// Generate the next sample; zero once the hit has been cut.
    pub fn next_sample(&mut self) -> f64 {
        if self.remaining == 0 {
            return 0.0;
        }
        self.remaining -= 1;
        let frequency = self.freq.next_value();
        self.osc.next_sample(frequency) * self.gain.next_value()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

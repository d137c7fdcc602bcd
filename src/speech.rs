//! Speech synthesis seam — voice selection, utterances, and the
//! backend trait.
//!
//! The performance only needs three things from a speech backend: its
//! voice list, a way to start and cancel an utterance, and a completion
//! signal. [`TimedSpeech`] models completion from text length so the
//! sequencer can run offline and under test; a platform backend reports
//! real completion instead.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// One available synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// One line handed to the speech backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
    /// Speaking rate multiplier.
    pub rate: f64,
    /// Voice pitch multiplier.
    pub pitch: f64,
}

/// Estimated spoken duration of a line in seconds.
///
/// 60 ms per character with a 1.5 s floor; also the basis for the
/// between-line gap the sequencer schedules.
pub fn line_duration_secs(text: &str) -> f64 {
    (text.len() as f64 * 0.06).max(1.5)
}

/// Pick the best voice from `voices`: the first preferred name that any
/// voice name contains, otherwise the first voice on the list.
pub fn pick_voice<'a>(voices: &'a [Voice], preferred: &[String]) -> Option<&'a Voice> {
    preferred
        .iter()
        .find_map(|wanted| voices.iter().find(|v| v.name.contains(wanted.as_str())))
        .or_else(|| voices.first())
}

/// Like [`pick_voice`], but an empty voice list is an error the caller
/// must surface.
pub fn resolve_voice(voices: &[Voice], preferred: &[String]) -> Result<Voice, SpeechError> {
    pick_voice(voices, preferred)
        .cloned()
        .ok_or(SpeechError::NoVoiceAvailable)
}

/// A speech synthesis backend.
pub trait SpeechEngine {
    fn voices(&self) -> Vec<Voice>;
    /// Begin speaking; any active utterance is replaced.
    fn speak(&mut self, utterance: &Utterance, now_ms: f64);
    /// Drop the active utterance, if any.
    fn cancel(&mut self);
    /// True exactly once when the active utterance has finished.
    fn poll_ended(&mut self, now_ms: f64) -> bool;
}

/// Length-model backend: an utterance "finishes" after its estimated
/// duration. Produces no audio.
#[derive(Debug, Clone)]
pub struct TimedSpeech {
    voices: Vec<Voice>,
    ends_at_ms: Option<f64>,
}

impl TimedSpeech {
    pub fn new(voices: Vec<Voice>) -> Self {
        TimedSpeech {
            voices,
            ends_at_ms: None,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.ends_at_ms.is_some()
    }
}

impl SpeechEngine for TimedSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: &Utterance, now_ms: f64) {
        let duration_ms = line_duration_secs(&utterance.text) * 1000.0;
        debug!(
            "speaking {:?} with {} for {duration_ms:.0} ms",
            utterance.text, utterance.voice.name
        );
        self.ends_at_ms = Some(now_ms + duration_ms);
    }

    fn cancel(&mut self) {
        self.ends_at_ms = None;
    }

    fn poll_ended(&mut self, now_ms: f64) -> bool {
        match self.ends_at_ms {
            Some(ends_at) if now_ms >= ends_at => {
                self.ends_at_ms = None;
                true
            }
            _ => false,
        }
    }
}

//! Stage driver — wires the sequencer to a speech backend and the view.
//!
//! This is the one place platform glue talks to: report time through
//! [`Stage::poll`], clicks through [`Stage::start`]/[`Stage::stop`], and
//! render the returned hits plus the current [`StageView`].

use log::debug;

use crate::config::StageConfig;
use crate::error::StageError;
use crate::pattern::StepSound;
use crate::sequencer::{Command, PlaybackState, RapSequencer};
use crate::speech::{SpeechEngine, resolve_voice};
use crate::view::StageView;

pub struct Stage {
    sequencer: RapSequencer,
    speech: Box<dyn SpeechEngine>,
    view: StageView,
    preferred_voices: Vec<String>,
}

impl Stage {
    pub fn new(
        config: &StageConfig,
        speech: Box<dyn SpeechEngine>,
        lines: Vec<String>,
    ) -> Result<Self, StageError> {
        Ok(Stage {
            sequencer: RapSequencer::new(config)?,
            speech,
            view: StageView::new(lines),
            preferred_voices: config.speech.preferred_voices.clone(),
        })
    }

    pub fn view(&self) -> &StageView {
        &self.view
    }

    pub fn state(&self) -> PlaybackState {
        self.sequencer.state()
    }

    /// The platform's voices are loaded; unlock the start control.
    pub fn voices_ready(&mut self) {
        self.view.voices_ready();
    }

    /// Start the performance. The lyric lines are read from the view
    /// once, here; edits to the panel during playback have no effect.
    pub fn start(&mut self, now_ms: f64) -> Vec<StepSound> {
        let voice = match resolve_voice(&self.speech.voices(), &self.preferred_voices) {
            Ok(voice) => {
                debug!("resolved voice {:?}", voice.name);
                Some(voice)
            }
            Err(e) => {
                debug!("{e}");
                None
            }
        };
        let lines = self.view.lyrics.lines.clone();
        let commands = self.sequencer.start(now_ms, lines, voice);
        self.dispatch(commands, now_ms)
    }

    /// Stop the performance; a no-op when nothing is playing.
    pub fn stop(&mut self, now_ms: f64) -> Vec<StepSound> {
        let commands = self.sequencer.stop();
        self.dispatch(commands, now_ms)
    }

    /// Pump the clock and the speech backend. Returns the drum hits
    /// that came due, for the caller to sound.
    pub fn poll(&mut self, now_ms: f64) -> Vec<StepSound> {
        let mut hits = Vec::new();
        if self.speech.poll_ended(now_ms) {
            let commands = self.sequencer.speech_ended(now_ms);
            hits.extend(self.dispatch(commands, now_ms));
        }
        let commands = self.sequencer.poll(now_ms);
        hits.extend(self.dispatch(commands, now_ms));
        hits
    }

    fn dispatch(&mut self, commands: Vec<Command>, now_ms: f64) -> Vec<StepSound> {
        let mut hits = Vec::new();
        for command in commands {
            match &command {
                Command::PlayHit(sound) => hits.push(*sound),
                Command::Speak(utterance) => self.speech.speak(utterance, now_ms),
                Command::CancelSpeech => self.speech.cancel(),
                _ => self.view.apply(&command),
            }
        }
        hits
    }
}

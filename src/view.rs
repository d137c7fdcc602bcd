//! View-model for the page surface the library animates.

use serde::{Deserialize, Serialize};

use crate::sequencer::{Command, StartLabel, Status};

// Element identifiers the page binds to.
pub const PROJECT_COUNT_ID: &str = "project-count";
pub const CLIENT_COUNT_ID: &str = "client-count";
pub const CODE_COUNT_ID: &str = "code-count";
pub const COFFEE_COUNT_ID: &str = "coffee-count";
pub const RAP_BUTTON_ID: &str = "rap-button";
pub const STOP_BUTTON_ID: &str = "stop-button";
pub const RAP_STATUS_ID: &str = "rap-status";
pub const RAP_LYRICS_ID: &str = "rap-lyrics";

pub const LABEL_PLAY: &str = "Play Rap";
pub const LABEL_RAPPING: &str = "Rapping...";
pub const LABEL_PLAY_AGAIN: &str = "Play Again";

pub const STATUS_NO_VOICE: &str = "No rap voice found - try Chrome";
pub const STATUS_COMPLETE: &str = "Rap complete! Mic drop";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub hidden: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsPanel {
    pub hidden: bool,
    pub lines: Vec<String>,
    pub highlighted: Option<usize>,
}

/// Mirror of the rap controls and lyric display. Mutated only through
/// [`StageView::apply`], so it cannot drift from the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageView {
    pub start_button: ButtonState,
    pub stop_button: ButtonState,
    pub status: StatusLine,
    pub lyrics: LyricsPanel,
}

impl StageView {
    /// Initial page state: everything hidden, start locked until the
    /// platform reports its voices.
    pub fn new(lines: Vec<String>) -> Self {
        StageView {
            start_button: ButtonState {
                enabled: false,
                label: LABEL_PLAY.to_string(),
            },
            stop_button: ButtonState {
                enabled: false,
                label: "Stop".to_string(),
            },
            status: StatusLine {
                hidden: true,
                text: String::new(),
            },
            lyrics: LyricsPanel {
                hidden: true,
                lines,
                highlighted: None,
            },
        }
    }

    /// The platform's voice list arrived; unlock the start control.
    pub fn voices_ready(&mut self) {
        self.start_button.enabled = true;
    }

    /// Apply one sequencer command. Audio commands are not the view's
    /// concern and are ignored.
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Highlight(line) => self.lyrics.highlighted = *line,
            Command::RevealLyrics => self.lyrics.hidden = false,
            Command::RevealStatus => self.status.hidden = false,
            Command::HideStatus => self.status.hidden = true,
            Command::SetStatus(status) => {
                self.status.hidden = false;
                self.status.text = match status {
                    Status::NoVoice => STATUS_NO_VOICE.to_string(),
                    Status::Complete => STATUS_COMPLETE.to_string(),
                };
            }
            Command::SetControls(controls) => {
                self.start_button.enabled = controls.start_enabled;
                self.start_button.label = match controls.start_label {
                    StartLabel::Play => LABEL_PLAY.to_string(),
                    StartLabel::Rapping => LABEL_RAPPING.to_string(),
                    StartLabel::PlayAgain => LABEL_PLAY_AGAIN.to_string(),
                };
                self.stop_button.enabled = controls.stop_enabled;
            }
            Command::PlayHit(_) | Command::Speak(_) | Command::CancelSpeech => {}
        }
    }
}

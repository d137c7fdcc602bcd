//! Rap sequencer — the state machine behind the performance.
//!
//! The sequencer owns the beat clock, the step counter, and the lyric
//! cursor. It consumes time (`poll`) and speech-completion events
//! (`speech_ended`) and emits [`Command`]s; it never touches audio or
//! UI directly, so the same machine runs under a browser event loop and
//! under deterministic tests.

use log::{debug, info, warn};

use crate::config::{SpeechParams, StageConfig};
use crate::error::ConfigError;
use crate::pattern::{BeatPattern, StepSound, Tempo};
use crate::speech::{Utterance, Voice, line_duration_secs};

/// Lifecycle of one performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Finished,
}

/// Status messages the page can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NoVoice,
    Complete,
}

/// Which affordance the start control shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartLabel {
    Play,
    Rapping,
    PlayAgain,
}

/// Desired state of the start/stop controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub start_label: StartLabel,
}

impl Controls {
    /// Idle affordance: start available, stop disabled.
    pub fn idle() -> Self {
        Controls {
            start_enabled: true,
            stop_enabled: false,
            start_label: StartLabel::Play,
        }
    }

    /// Mid-performance: start locked out, stop armed.
    pub fn rapping() -> Self {
        Controls {
            start_enabled: false,
            stop_enabled: true,
            start_label: StartLabel::Rapping,
        }
    }

    /// After a completed run: offer a replay.
    pub fn replay() -> Self {
        Controls {
            start_enabled: true,
            stop_enabled: false,
            start_label: StartLabel::PlayAgain,
        }
    }
}

/// Side effects requested by the sequencer, applied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlayHit(StepSound),
    Speak(Utterance),
    CancelSpeech,
    Highlight(Option<usize>),
    RevealLyrics,
    RevealStatus,
    HideStatus,
    SetStatus(Status),
    SetControls(Controls),
}

/// Recurring beat timer. Holds the next deadline and catches up if a
/// poll arrives late, so no tick is ever dropped.
#[derive(Debug, Clone)]
pub struct BeatClock {
    interval_ms: f64,
    next_due_ms: f64,
}

impl BeatClock {
    pub fn new(interval_ms: f64, now_ms: f64) -> Self {
        BeatClock {
            interval_ms,
            next_due_ms: now_ms + interval_ms,
        }
    }

    /// Number of ticks that have come due since the last call.
    pub fn ticks_due(&mut self, now_ms: f64) -> u32 {
        let mut ticks = 0;
        while now_ms >= self.next_due_ms {
            ticks += 1;
            self.next_due_ms += self.interval_ms;
        }
        ticks
    }
}

/// Where the lyric cursor is within a running performance.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LinePhase {
    /// Beat-only playback before the first line.
    LeadIn { due_ms: f64 },
    /// A line has been handed to the speech engine.
    Speaking { line: usize },
    /// Waiting out the length-proportional gap before the next line.
    Gap { next_line: usize, due_ms: f64 },
}

/// The performance state machine.
///
/// `idle -> playing -> finished`, with `stop` cutting back to `idle`
/// from `playing` at any time. The cleared beat clock (`None`) is the
/// sentinel that keeps continuations from an earlier run from firing.
pub struct RapSequencer {
    tempo: Tempo,
    pattern: BeatPattern,
    lead_in_beats: f64,
    speech: SpeechParams,
    state: PlaybackState,
    clock: Option<BeatClock>,
    step: u64,
    lines: Vec<String>,
    voice: Option<Voice>,
    phase: LinePhase,
}

impl RapSequencer {
    pub fn new(config: &StageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(RapSequencer {
            tempo: config.tempo()?,
            pattern: config.pattern.clone(),
            lead_in_beats: config.lead_in_beats,
            speech: config.speech.clone(),
            state: PlaybackState::Idle,
            clock: None,
            step: 0,
            lines: Vec::new(),
            voice: None,
            phase: LinePhase::LeadIn { due_ms: 0.0 },
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Monotonic step counter. Never reset, so a replay picks up the
    /// pattern where the previous run left off.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Begin a performance over `lines`, spoken with `voice`.
    ///
    /// With no voice available the performance aborts before the beat
    /// clock starts: the warning status is shown and the controls fall
    /// back to the idle affordance. With no lines it completes
    /// immediately without scheduling any speech.
    pub fn start(&mut self, now_ms: f64, lines: Vec<String>, voice: Option<Voice>) -> Vec<Command> {
        if self.state == PlaybackState::Playing {
            return Vec::new();
        }

        let mut commands = vec![Command::RevealLyrics, Command::RevealStatus];

        let Some(voice) = voice else {
            warn!("no speech voice available; aborting performance");
            commands.push(Command::SetStatus(Status::NoVoice));
            commands.push(Command::SetControls(Controls::idle()));
            self.state = PlaybackState::Idle;
            return commands;
        };

        if lines.is_empty() {
            info!("no lyric lines; completing immediately");
            commands.push(Command::Highlight(None));
            commands.push(Command::SetStatus(Status::Complete));
            commands.push(Command::SetControls(Controls::replay()));
            self.state = PlaybackState::Finished;
            return commands;
        }

        info!(
            "performance started: {} lines at {} BPM",
            lines.len(),
            self.tempo.bpm()
        );
        self.lines = lines;
        self.voice = Some(voice);
        self.clock = Some(BeatClock::new(self.tempo.step_interval_ms(), now_ms));
        self.phase = LinePhase::LeadIn {
            due_ms: now_ms + self.tempo.lead_in_ms(self.lead_in_beats),
        };
        self.state = PlaybackState::Playing;
        commands.push(Command::SetControls(Controls::rapping()));
        commands
    }

    /// Cut the performance short. No-op unless currently playing, which
    /// also covers a stop request arriving before any start.
    pub fn stop(&mut self) -> Vec<Command> {
        if self.state != PlaybackState::Playing {
            return Vec::new();
        }
        info!("performance stopped at step {}", self.step);
        self.clock = None;
        self.state = PlaybackState::Idle;
        vec![
            Command::CancelSpeech,
            Command::Highlight(None),
            Command::HideStatus,
            Command::SetControls(Controls::idle()),
        ]
    }

    /// Advance the machine to `now_ms`: emit due beat hits and move the
    /// lyric cursor past any expired deadline.
    pub fn poll(&mut self, now_ms: f64) -> Vec<Command> {
        let Some(clock) = self.clock.as_mut() else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        for _ in 0..clock.ticks_due(now_ms) {
            commands.push(Command::PlayHit(self.pattern.sound_at(self.step)));
            self.step += 1;
        }

        match self.phase {
            LinePhase::LeadIn { due_ms } if now_ms >= due_ms => {
                commands.extend(self.begin_line(0));
            }
            LinePhase::Gap { next_line, due_ms } if now_ms >= due_ms => {
                if next_line >= self.lines.len() {
                    commands.extend(self.finish());
                } else {
                    commands.extend(self.begin_line(next_line));
                }
            }
            _ => {}
        }

        commands
    }

    /// The speech engine finished the current line. Schedules the next
    /// line after a gap proportional to the finished line's length.
    pub fn speech_ended(&mut self, now_ms: f64) -> Vec<Command> {
        if self.clock.is_none() {
            return Vec::new();
        }
        let LinePhase::Speaking { line } = self.phase else {
            return Vec::new();
        };
        let gap_ms = line_duration_secs(&self.lines[line]) * 300.0;
        debug!("line {line} done; next in {gap_ms:.0} ms");
        self.phase = LinePhase::Gap {
            next_line: line + 1,
            due_ms: now_ms + gap_ms,
        };
        Vec::new()
    }

    fn begin_line(&mut self, line: usize) -> Vec<Command> {
        debug!("speaking line {line}");
        self.phase = LinePhase::Speaking { line };
        let Some(voice) = self.voice.clone() else {
            return self.finish();
        };
        vec![
            Command::Highlight(Some(line)),
            Command::Speak(Utterance {
                text: self.lines[line].clone(),
                voice,
                rate: self.speech.rate,
                pitch: self.speech.pitch,
            }),
        ]
    }

    fn finish(&mut self) -> Vec<Command> {
        info!("performance complete after step {}", self.step);
        self.clock = None;
        self.state = PlaybackState::Finished;
        vec![
            Command::Highlight(None),
            Command::SetStatus(Status::Complete),
            Command::SetControls(Controls::replay()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP_MS: f64 = 60.0 / 85.0 * 1000.0 / 2.0; // ≈ 352.94
    const LEAD_IN_MS: f64 = 60.0 / 85.0 * 1000.0 * 2.0; // ≈ 1411.76

    fn test_voice() -> Voice {
        Voice {
            name: "Daniel".to_string(),
            lang: "en-GB".to_string(),
        }
    }

    fn sequencer() -> RapSequencer {
        RapSequencer::new(&StageConfig::default()).unwrap()
    }

    fn lines() -> Vec<String> {
        vec!["Yo".to_string(), "Check the mic".to_string()]
    }

    fn hits(commands: &[Command]) -> Vec<StepSound> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::PlayHit(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn spoken(commands: &[Command]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Speak(u) => Some(u.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_arms_controls_and_reveals_ui() {
        let mut seq = sequencer();
        let commands = seq.start(0.0, lines(), Some(test_voice()));

        assert_eq!(seq.state(), PlaybackState::Playing);
        assert!(commands.contains(&Command::RevealLyrics));
        assert!(commands.contains(&Command::RevealStatus));
        assert!(commands.contains(&Command::SetControls(Controls::rapping())));
        assert!(spoken(&commands).is_empty(), "no line before the lead-in");
    }

    #[test]
    fn step_increments_once_per_tick() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));

        assert_eq!(seq.step(), 0);
        let commands = seq.poll(STEP_MS + 1.0);
        assert_eq!(hits(&commands).len(), 1);
        assert_eq!(seq.step(), 1);

        // Late poll catches up without dropping or doubling ticks
        let commands = seq.poll(STEP_MS * 4.0 + 1.0);
        assert_eq!(hits(&commands).len(), 3);
        assert_eq!(seq.step(), 4);
    }

    #[test]
    fn hits_follow_the_pattern_cyclically() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));

        let commands = seq.poll(STEP_MS * 16.0 + 1.0);
        let sounds = hits(&commands);
        assert_eq!(sounds.len(), 16);

        let one_bar = [
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Snare,
            StepSound::Kick,
            StepSound::Kick,
        ];
        for (i, sound) in sounds.iter().enumerate() {
            assert_eq!(*sound, one_bar[i % 8], "hit {i} should follow the pattern");
        }
    }

    #[test]
    fn lead_in_delays_first_line() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));

        let before = seq.poll(LEAD_IN_MS - 10.0);
        assert!(spoken(&before).is_empty());

        let after = seq.poll(LEAD_IN_MS + 1.0);
        assert_eq!(spoken(&after), vec!["Yo".to_string()]);
        assert!(after.contains(&Command::Highlight(Some(0))));
    }

    #[test]
    fn utterance_carries_delivery_params() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        let commands = seq.poll(LEAD_IN_MS + 1.0);

        let Some(Command::Speak(utterance)) =
            commands.iter().find(|c| matches!(c, Command::Speak(_)))
        else {
            panic!("expected a Speak command after the lead-in");
        };
        assert_eq!(utterance.rate, 1.15);
        assert_eq!(utterance.pitch, 0.85);
        assert_eq!(utterance.voice.name, "Daniel");
    }

    #[test]
    fn speech_end_schedules_gap_by_line_length() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        seq.poll(LEAD_IN_MS + 1.0);

        // "Yo" is short, so the floor applies: 1.5 s × 300 = 450 ms
        let t_end = LEAD_IN_MS + 500.0;
        seq.speech_ended(t_end);

        let early = seq.poll(t_end + 449.0);
        assert!(spoken(&early).is_empty(), "gap has not elapsed yet");

        let due = seq.poll(t_end + 451.0);
        assert_eq!(spoken(&due), vec!["Check the mic".to_string()]);
        assert!(due.contains(&Command::Highlight(Some(1))));
    }

    #[test]
    fn completes_after_last_line() {
        let mut seq = sequencer();
        seq.start(0.0, vec!["One line only".to_string()], Some(test_voice()));
        seq.poll(LEAD_IN_MS + 1.0);

        let t_end = LEAD_IN_MS + 900.0;
        seq.speech_ended(t_end);
        let commands = seq.poll(t_end + 500.0);

        assert_eq!(seq.state(), PlaybackState::Finished);
        assert!(commands.contains(&Command::Highlight(None)));
        assert!(commands.contains(&Command::SetStatus(Status::Complete)));
        assert!(commands.contains(&Command::SetControls(Controls::replay())));

        // Clock is cleared: nothing more comes due
        assert!(seq.poll(t_end + 10_000.0).is_empty());
    }

    #[test]
    fn stop_clears_clock_and_resets_ui() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        seq.poll(LEAD_IN_MS + 1.0); // line 0 is speaking

        let commands = seq.stop();
        assert_eq!(seq.state(), PlaybackState::Idle);
        assert!(commands.contains(&Command::CancelSpeech));
        assert!(commands.contains(&Command::Highlight(None)));
        assert!(commands.contains(&Command::HideStatus));
        assert!(commands.contains(&Command::SetControls(Controls::idle())));

        // Orphaned continuations are suppressed by the cleared clock
        assert!(seq.poll(LEAD_IN_MS + 5000.0).is_empty());
        assert!(seq.speech_ended(LEAD_IN_MS + 5000.0).is_empty());
    }

    #[test]
    fn stop_mid_gap_also_resets() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        seq.poll(LEAD_IN_MS + 1.0);
        seq.speech_ended(LEAD_IN_MS + 500.0);

        let commands = seq.stop();
        assert!(commands.contains(&Command::SetControls(Controls::idle())));
        assert!(seq.poll(LEAD_IN_MS + 2000.0).is_empty());
    }

    #[test]
    fn stop_before_start_is_a_noop() {
        let mut seq = sequencer();
        assert!(seq.stop().is_empty());
        assert_eq!(seq.state(), PlaybackState::Idle);
    }

    #[test]
    fn zero_lines_completes_immediately() {
        let mut seq = sequencer();
        let commands = seq.start(0.0, vec![], Some(test_voice()));

        assert_eq!(seq.state(), PlaybackState::Finished);
        assert!(spoken(&commands).is_empty());
        assert!(commands.contains(&Command::SetStatus(Status::Complete)));
        assert!(commands.contains(&Command::SetControls(Controls::replay())));
        assert!(seq.poll(10_000.0).is_empty(), "no clock was started");
    }

    #[test]
    fn no_voice_aborts_with_warning() {
        let mut seq = sequencer();
        let commands = seq.start(0.0, lines(), None);

        assert_eq!(seq.state(), PlaybackState::Idle);
        assert!(commands.contains(&Command::SetStatus(Status::NoVoice)));
        assert!(commands.contains(&Command::SetControls(Controls::idle())));
        assert!(spoken(&commands).is_empty());
        assert!(seq.poll(10_000.0).is_empty(), "beat clock never started");
    }

    #[test]
    fn step_counter_survives_restart() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        seq.poll(STEP_MS * 3.0 + 1.0);
        assert_eq!(seq.step(), 3);
        seq.stop();

        let t = 10_000.0;
        seq.start(t, lines(), Some(test_voice()));
        let commands = seq.poll(t + STEP_MS + 1.0);
        // Pattern index 3 is a snare in the default template
        assert_eq!(hits(&commands), vec![StepSound::Snare]);
        assert_eq!(seq.step(), 4);
    }

    #[test]
    fn start_while_playing_is_ignored() {
        let mut seq = sequencer();
        seq.start(0.0, lines(), Some(test_voice()));
        let commands = seq.start(100.0, lines(), Some(test_voice()));
        assert!(commands.is_empty());
        assert_eq!(seq.state(), PlaybackState::Playing);
    }

    #[test]
    fn beat_clock_catches_up() {
        let mut clock = BeatClock::new(100.0, 0.0);
        assert_eq!(clock.ticks_due(50.0), 0);
        assert_eq!(clock.ticks_due(100.0), 1);
        assert_eq!(clock.ticks_due(350.0), 2);
        assert_eq!(clock.ticks_due(360.0), 0);
    }
}

//! Stat counters — count-up animation triggered by scroll visibility.

use crate::error::ConfigError;
use crate::view::{CLIENT_COUNT_ID, CODE_COUNT_ID, COFFEE_COUNT_ID, PROJECT_COUNT_ID};

/// Animation frame period in milliseconds.
pub const FRAME_MS: f64 = 16.0;

/// Animation phases.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Armed,
    Counting,
    Done,
}

/// Counts a displayed integer up from 0 to a target over a fixed
/// duration, advancing one fixed increment per 16 ms frame and clamping
/// at the target.
#[derive(Debug, Clone)]
pub struct CounterAnimator {
    target: u64,
    increment: f64,
    current: f64,
    phase: Phase,
}

impl CounterAnimator {
    pub fn new(target: u64, duration_ms: f64) -> Result<Self, ConfigError> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(ConfigError::InvalidCounterDuration { ms: duration_ms });
        }
        Ok(CounterAnimator {
            target,
            increment: target as f64 / (duration_ms / FRAME_MS),
            current: 0.0,
            phase: Phase::Armed,
        })
    }

    /// Begin counting. Called when the counter scrolls into view.
    pub fn reveal(&mut self) {
        if self.phase == Phase::Armed {
            self.phase = Phase::Counting;
        }
    }

    /// Advance one 16 ms frame.
    pub fn tick(&mut self) {
        if self.phase != Phase::Counting {
            return;
        }
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.current = self.target as f64;
            self.phase = Phase::Done;
        }
    }

    /// The integer currently shown. Never exceeds the target.
    pub fn value(&self) -> u64 {
        (self.current.floor() as u64).min(self.target)
    }

    /// The displayed text, with thousands separators.
    pub fn display(&self) -> String {
        format_thousands(self.value())
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }
}

/// Fire-once visibility trigger: reports `true` exactly once, the first
/// time the observed intersection ratio reaches the threshold.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityGate {
    threshold: f64,
    fired: bool,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        VisibilityGate {
            threshold,
            fired: false,
        }
    }

    pub fn observe(&mut self, ratio: f64) -> bool {
        if !self.fired && ratio >= self.threshold {
            self.fired = true;
            return true;
        }
        false
    }
}

/// The stats band: every counter on the page behind one visibility
/// gate, so they all start together when the section scrolls in.
pub struct StatsBand {
    gate: VisibilityGate,
    counters: Vec<(&'static str, CounterAnimator)>,
}

impl StatsBand {
    /// The landing-page counters.
    pub fn landing_defaults(duration_ms: f64) -> Result<Self, ConfigError> {
        let targets: [(&'static str, u64); 4] = [
            (PROJECT_COUNT_ID, 40),
            (CLIENT_COUNT_ID, 21),
            (CODE_COUNT_ID, 35_000),
            (COFFEE_COUNT_ID, 147),
        ];
        let mut counters = Vec::with_capacity(targets.len());
        for (id, target) in targets {
            counters.push((id, CounterAnimator::new(target, duration_ms)?));
        }
        Ok(StatsBand {
            gate: VisibilityGate::new(0.5),
            counters,
        })
    }

    /// Report section visibility; the first crossing starts every
    /// counter.
    pub fn observe(&mut self, ratio: f64) {
        if self.gate.observe(ratio) {
            for (_, counter) in &mut self.counters {
                counter.reveal();
            }
        }
    }

    pub fn tick(&mut self) {
        for (_, counter) in &mut self.counters {
            counter.tick();
        }
    }

    /// (element id, displayed text) for every counter.
    pub fn displays(&self) -> Vec<(&'static str, String)> {
        self.counters
            .iter()
            .map(|(id, counter)| (*id, counter.display()))
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.counters.iter().all(|(_, c)| c.is_finished())
    }
}

/// Full frame-by-frame display sequence for one counter.
pub fn frames(target: u64, duration_ms: f64) -> Result<Vec<String>, ConfigError> {
    let mut counter = CounterAnimator::new(target, duration_ms)?;
    counter.reveal();
    let mut out = Vec::new();
    while !counter.is_finished() {
        counter.tick();
        out.push(counter.display());
    }
    Ok(out)
}

/// Group digits with `,` separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

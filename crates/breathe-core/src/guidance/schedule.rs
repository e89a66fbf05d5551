//! Once-per-second counting cue train for the active phase.
//!
//! The train is polled from the session tick with the phase's elapsed
//! time, so it never runs concurrently with the tick that cancels it.
//! Cancelling is synchronous and idempotent.

use crate::audio::{Cue, MAX_SPOKEN_COUNT};
use crate::catalog::VoiceOption;

/// Delay between phase entry and the first slot of the train.
pub const COUNT_LEAD_IN_SECS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStyle {
    /// "two", "three", ... in the given voice. Counts above eight are dropped.
    Spoken(VoiceOption),
    /// A `ping_between` tick every second.
    Percussive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountSchedule {
    style: CountStyle,
    phase_duration: f64,
    /// Next count to emit. Count 1 is the phase instruction itself.
    next_count: u32,
    /// Last count that fits inside the phase.
    last_count: u32,
    active: bool,
}

impl CountSchedule {
    /// Begin a train for a phase of `phase_duration` seconds.
    ///
    /// Phases of one second or less only get the instruction cue, so no
    /// schedule is created for them.
    pub fn start(style: CountStyle, phase_duration: f64) -> Option<Self> {
        if phase_duration <= 1.0 {
            return None;
        }
        Some(Self {
            style,
            phase_duration,
            next_count: 2,
            last_count: phase_duration.floor() as u32,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Elapsed-in-phase time at which `count` becomes due.
    pub fn due_at(count: u32) -> f64 {
        COUNT_LEAD_IN_SECS + f64::from(count.saturating_sub(1))
    }

    /// Advance the train to `elapsed` seconds into the phase and return the
    /// cue to play now, if any.
    ///
    /// When a long frame skips over several slots only the most recent
    /// count is played; stale counts are dropped rather than stacked.
    pub fn poll(&mut self, elapsed: f64) -> Option<Cue> {
        if !self.active {
            return None;
        }

        let mut due = None;
        while self.next_count <= self.last_count && Self::due_at(self.next_count) <= elapsed {
            due = Some(self.next_count);
            self.next_count += 1;
        }

        if elapsed >= self.phase_duration || self.next_count > self.last_count {
            self.active = false;
        }

        due.and_then(|count| self.cue_for(count))
    }

    fn cue_for(&self, count: u32) -> Option<Cue> {
        match self.style {
            CountStyle::Spoken(_) if count > MAX_SPOKEN_COUNT => None,
            CountStyle::Spoken(voice) => Some(Cue::Count {
                number: count,
                voice,
            }),
            CountStyle::Percussive => Some(Cue::PingBetween),
        }
    }
}

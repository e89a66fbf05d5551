//! Audio and haptic collaborators of the session engine.
//!
//! The engine only ever calls these fire-and-forget: no return value is
//! observed and implementations must swallow their own failures.

mod bank;
mod cue;

pub use bank::SoundBank;
pub use cue::{Cue, MAX_SPOKEN_COUNT};

use serde::{Deserialize, Serialize};

use crate::catalog::BackgroundSound;

/// Playback of guidance cues and the background ambience track.
pub trait AudioService {
    /// Start playing a guidance cue. Replaces any cue still sounding.
    fn play_cue(&mut self, cue: &Cue);

    /// Silence any guidance cue still sounding.
    fn stop_cues(&mut self) {}

    /// Start (or keep) looping the ambience track.
    fn play_background(&mut self, sound: BackgroundSound);

    fn stop_background(&mut self);
}

/// Vibration feedback, one soft pulse per call.
pub trait HapticService {
    fn pulse(&mut self);
}

/// Every call an [`AudioService`] received, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum AudioCall {
    Cue(Cue),
    StopCues,
    Background { sound: BackgroundSound },
    StopBackground,
}

/// Audio collaborator that records calls instead of producing sound.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// Drain recorded calls.
    pub fn take(&mut self) -> Vec<AudioCall> {
        std::mem::take(&mut self.calls)
    }
}

impl AudioService for RecordingAudio {
    fn play_cue(&mut self, cue: &Cue) {
        self.calls.push(AudioCall::Cue(*cue));
    }

    fn stop_cues(&mut self) {
        self.calls.push(AudioCall::StopCues);
    }

    fn play_background(&mut self, sound: BackgroundSound) {
        self.calls.push(AudioCall::Background { sound });
    }

    fn stop_background(&mut self) {
        self.calls.push(AudioCall::StopBackground);
    }
}

/// Haptic collaborator that only counts pulses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseCounter {
    pub pulses: u32,
}

impl HapticService for PulseCounter {
    fn pulse(&mut self) {
        self.pulses += 1;
    }
}

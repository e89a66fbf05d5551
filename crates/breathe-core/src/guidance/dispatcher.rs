use serde::{Deserialize, Serialize};

use super::schedule::{CountSchedule, CountStyle};
use crate::audio::{AudioService, Cue, HapticService};
use crate::catalog::{GuidanceMode, VoiceOption};
use crate::session::Phase;

/// How the dispatcher cues each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceConfig {
    pub mode: GuidanceMode,
    pub voice: VoiceOption,
    /// Follow the phase cue with a once-per-second count.
    pub count_seconds: bool,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            mode: GuidanceMode::Voice,
            voice: VoiceOption::Default,
            count_seconds: true,
        }
    }
}

/// Fires the haptic pulse and audio cues for each phase entry and owns the
/// counting train of the active phase.
#[derive(Debug, Clone, Default)]
pub struct GuidanceDispatcher {
    config: GuidanceConfig,
    schedule: Option<CountSchedule>,
}

impl GuidanceDispatcher {
    pub fn new(config: GuidanceConfig) -> Self {
        Self {
            config,
            schedule: None,
        }
    }

    pub fn config(&self) -> GuidanceConfig {
        self.config
    }

    pub fn has_pending_counts(&self) -> bool {
        self.schedule.as_ref().is_some_and(CountSchedule::is_active)
    }

    /// Cue a phase that has just begun.
    ///
    /// The previous phase's counting train is cancelled first. Zero-length
    /// phases produce no pulse and no sound.
    pub fn enter_phase<A, H>(&mut self, phase: Phase, duration: f64, audio: &mut A, haptics: &mut H)
    where
        A: AudioService + ?Sized,
        H: HapticService + ?Sized,
    {
        self.cancel();
        if duration <= 0.0 {
            return;
        }

        haptics.pulse();

        let style = match self.config.mode {
            GuidanceMode::Voice => {
                audio.play_cue(&Cue::Instruction {
                    phase,
                    voice: self.config.voice,
                });
                CountStyle::Spoken(self.config.voice)
            }
            GuidanceMode::Ping => {
                audio.play_cue(&Cue::Ping);
                CountStyle::Percussive
            }
            GuidanceMode::None => return,
        };

        if self.config.count_seconds {
            self.schedule = CountSchedule::start(style, duration);
        }
    }

    /// Play whatever count is due `elapsed` seconds into the phase.
    pub fn poll<A>(&mut self, elapsed: f64, audio: &mut A)
    where
        A: AudioService + ?Sized,
    {
        let Some(schedule) = self.schedule.as_mut() else {
            return;
        };
        if let Some(cue) = schedule.poll(elapsed) {
            audio.play_cue(&cue);
        }
        if !schedule.is_active() {
            self.schedule = None;
        }
    }

    /// Drop the pending counting train. Safe to call at any time.
    pub fn cancel(&mut self) {
        if let Some(mut schedule) = self.schedule.take() {
            schedule.cancel();
        }
    }
}

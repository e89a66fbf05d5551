//! Breathing session engine.
//!
//! A tick-driven state machine. It does not use internal threads or
//! timers - the caller is responsible for calling `tick()` with the time
//! since the previous call, typically once per display frame.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(Inhale -> HoldAfterInhale -> Exhale -> HoldAfterExhale -> ...) -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(settings, audio, haptics);
//! engine.start()?;
//! // Once per frame:
//! let events = engine.tick(delta);
//! let visual = engine.visual();
//! ```

use chrono::Utc;
use std::time::Duration;

use super::settings::Settings;
use super::state::SessionState;
use super::visual::{self, VisualState};
use super::Phase;
use crate::audio::{AudioService, HapticService};
use crate::error::ValidationError;
use crate::events::{Event, StopReason};
use crate::guidance::GuidanceDispatcher;

/// Owns one session at a time plus its collaborators.
#[derive(Debug)]
pub struct SessionEngine<A, H> {
    settings: Settings,
    state: SessionState,
    guidance: GuidanceDispatcher,
    audio: A,
    haptics: H,
}

impl<A: AudioService, H: HapticService> SessionEngine<A, H> {
    pub fn new(settings: Settings, audio: A, haptics: H) -> Self {
        let guidance = GuidanceDispatcher::new(settings.guidance);
        Self {
            settings,
            state: SessionState::default(),
            guidance,
            audio,
            haptics,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn guidance(&self) -> &GuidanceDispatcher {
        &self.guidance
    }

    pub fn current_phase_duration(&self) -> f64 {
        self.settings.pattern.phase_duration(self.state.current_phase)
    }

    /// Guide-shape parameters for the current instant.
    pub fn visual(&self) -> VisualState {
        if !self.state.running {
            return VisualState::default();
        }
        visual::project(
            self.state.current_phase,
            self.state.elapsed_in_phase,
            self.current_phase_duration(),
        )
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            running: self.state.running,
            phase: self.state.current_phase,
            instruction: self.state.current_phase.instruction().to_string(),
            elapsed_in_phase_secs: self.state.elapsed_in_phase,
            phase_duration_secs: self.current_phase_duration(),
            total_elapsed_secs: self.state.total_elapsed,
            remaining_secs: self.state.remaining_budget,
            completed_cycles: self.state.completed_cycles,
            visual: self.visual(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session under the current settings.
    ///
    /// A running session is stopped first. Degenerate patterns are
    /// rejected before any state changes.
    pub fn start(&mut self) -> Result<Vec<Event>, ValidationError> {
        self.settings.pattern.validate()?;

        let mut events = Vec::new();
        if self.state.running {
            events.extend(self.halt(StopReason::Restarted));
        }

        let budget = self.settings.session_length.duration_secs();
        self.state.begin(budget);
        if let Some(sound) = self.settings.ambience() {
            self.audio.play_background(sound);
        }

        tracing::info!(
            pattern = %self.settings.pattern.id,
            budget_secs = ?budget,
            "breathing session started"
        );
        events.push(Event::SessionStarted {
            session_id: self.state.session_id.unwrap_or_default(),
            pattern_id: self.settings.pattern.id.clone(),
            budget_secs: budget,
            at: Utc::now(),
        });

        self.enter_from(Phase::Inhale, false, &mut events);
        Ok(events)
    }

    /// End the session and reset every counter. No-op when idle.
    pub fn stop(&mut self) -> Vec<Event> {
        self.halt(StopReason::UserRequested)
    }

    pub fn toggle(&mut self) -> Result<Vec<Event>, ValidationError> {
        if self.state.running {
            Ok(self.stop())
        } else {
            self.start()
        }
    }

    /// Advance the session by `delta`.
    ///
    /// Budget exhaustion wins over a phase change in the same tick. On a
    /// phase change the elapsed time restarts at zero; the overshoot is
    /// dropped.
    pub fn tick(&mut self, delta: Duration) -> Vec<Event> {
        if !self.state.running {
            return Vec::new();
        }

        if self.state.advance(delta.as_secs_f64()) {
            return self.halt(StopReason::BudgetExhausted);
        }

        let mut events = Vec::new();
        if self.state.elapsed_in_phase >= self.current_phase_duration() {
            self.state.elapsed_in_phase = 0.0;
            let next = self.state.current_phase.next();
            self.enter_from(next, true, &mut events);
        } else {
            self.guidance
                .poll(self.state.elapsed_in_phase, &mut self.audio);
        }
        events
    }

    /// Swap in new settings from the settings store.
    ///
    /// Timing or guidance changes fully stop a running session and leave
    /// restarting to the caller. An ambience-only change just switches the
    /// background track.
    pub fn apply_settings(&mut self, settings: Settings) -> Vec<Event> {
        let mut events = Vec::new();
        let restart = self.settings.requires_restart(&settings);
        if self.state.running {
            if restart {
                events.extend(self.halt(StopReason::SettingsChanged));
            } else if self.settings.ambience_differs(&settings) {
                match settings.ambience() {
                    Some(sound) => self.audio.play_background(sound),
                    None => self.audio.stop_background(),
                }
            }
        }
        // The pending count train survives an ambience-only change.
        if restart || !self.state.running {
            self.guidance = GuidanceDispatcher::new(settings.guidance);
        }
        self.settings = settings;
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Enter `phase`, passing over zero-length phases. `counts_cycle` is
    /// false only for the session's opening Inhale.
    fn enter_from(&mut self, mut phase: Phase, mut counts_cycle: bool, events: &mut Vec<Event>) {
        for _ in 0..Phase::ALL.len() {
            if counts_cycle && phase == Phase::Inhale {
                self.state.completed_cycles += 1;
                events.push(Event::CycleCompleted {
                    completed_cycles: self.state.completed_cycles,
                    at: Utc::now(),
                });
            }
            counts_cycle = true;

            let duration = self.settings.pattern.phase_duration(phase);
            if duration > 0.0 {
                self.state.current_phase = phase;
                self.state.elapsed_in_phase = 0.0;
                tracing::debug!(%phase, duration, "phase entered");
                self.guidance
                    .enter_phase(phase, duration, &mut self.audio, &mut self.haptics);
                events.push(Event::PhaseEntered {
                    phase,
                    duration_secs: duration,
                    completed_cycles: self.state.completed_cycles,
                    at: Utc::now(),
                });
                return;
            }

            tracing::debug!(%phase, "skipping zero-length phase");
            events.push(Event::PhaseSkipped {
                phase,
                at: Utc::now(),
            });
            phase = phase.next();
        }

        tracing::error!(pattern = %self.settings.pattern.id, "no phase with positive duration");
        events.extend(self.halt(StopReason::DegeneratePattern));
    }

    fn halt(&mut self, reason: StopReason) -> Vec<Event> {
        if !self.state.running {
            return Vec::new();
        }
        self.guidance.cancel();
        self.audio.stop_cues();
        self.audio.stop_background();

        let event = Event::SessionStopped {
            reason,
            total_elapsed_secs: self.state.total_elapsed,
            completed_cycles: self.state.completed_cycles,
            at: Utc::now(),
        };
        tracing::info!(
            ?reason,
            total_elapsed_secs = self.state.total_elapsed,
            completed_cycles = self.state.completed_cycles,
            "breathing session stopped"
        );
        self.state.reset();
        vec![event]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, Cue, PulseCounter, RecordingAudio};
    use crate::catalog::{pattern, BackgroundSound, BreathingPattern, GuidanceMode, SessionLength};

    type TestEngine = SessionEngine<RecordingAudio, PulseCounter>;

    fn engine_with(settings: Settings) -> TestEngine {
        SessionEngine::new(settings, RecordingAudio::new(), PulseCounter::default())
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn start_enters_inhale_and_plays_background() {
        let mut engine = engine_with(Settings::default());
        let events = engine.start().unwrap();

        assert!(engine.is_running());
        assert_eq!(engine.state().current_phase, Phase::Inhale);
        assert!(matches!(events[0], Event::SessionStarted { .. }));
        assert!(matches!(
            events[1],
            Event::PhaseEntered {
                phase: Phase::Inhale,
                completed_cycles: 0,
                ..
            }
        ));
        assert_eq!(
            engine.audio().calls[0],
            AudioCall::Background {
                sound: BackgroundSound::CalmMusic
            }
        );
        assert_eq!(engine.haptics().pulses, 1);
    }

    #[test]
    fn degenerate_pattern_is_rejected() {
        let mut engine = engine_with(Settings {
            pattern: BreathingPattern::new("flat", "Flat", "", [0.0; 4], false),
            ..Settings::default()
        });
        assert!(engine.start().is_err());
        assert!(!engine.is_running());
        assert!(engine.audio().calls.is_empty());
    }

    #[test]
    fn stop_resets_everything_and_is_idempotent() {
        let mut engine = engine_with(Settings::default());
        engine.start().unwrap();
        for _ in 0..40 {
            engine.tick(secs(0.5));
        }
        assert!(engine.state().completed_cycles >= 1);

        let events = engine.stop();
        assert!(matches!(
            events[0],
            Event::SessionStopped {
                reason: StopReason::UserRequested,
                ..
            }
        ));
        assert_eq!(*engine.state(), SessionState::default());
        assert_eq!(engine.visual(), VisualState::default());
        assert!(engine.stop().is_empty());
        assert!(engine.tick(secs(1.0)).is_empty());
    }

    #[test]
    fn toggle_flips_running_state() {
        let mut engine = engine_with(Settings::default());
        engine.toggle().unwrap();
        assert!(engine.is_running());
        engine.toggle().unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn restart_stops_previous_session_first() {
        let mut engine = engine_with(Settings::default());
        engine.start().unwrap();
        engine.tick(secs(1.5));
        let events = engine.start().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionStopped {
                reason: StopReason::Restarted,
                ..
            }
        ));
        assert_eq!(engine.state().total_elapsed, 0.0);
    }

    #[test]
    fn overshoot_is_discarded_on_transition() {
        let mut engine = engine_with(Settings::default());
        engine.start().unwrap();
        engine.tick(secs(3.9));
        engine.tick(secs(0.3));
        assert_eq!(engine.state().current_phase, Phase::HoldAfterInhale);
        assert_eq!(engine.state().elapsed_in_phase, 0.0);
    }

    #[test]
    fn budget_exhaustion_beats_phase_change() {
        let mut engine = engine_with(Settings {
            session_length: SessionLength::OneMinute,
            ..Settings::default()
        });
        engine.start().unwrap();
        engine.tick(secs(56.0));
        let events = engine.tick(secs(4.0));
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::SessionStopped {
                reason: StopReason::BudgetExhausted,
                ..
            }
        ));
        assert!(!engine.is_running());
    }

    #[test]
    fn ambience_change_keeps_session_running() {
        let mut engine = engine_with(Settings::default());
        engine.start().unwrap();
        engine.tick(secs(0.5));
        let mut next = engine.settings().clone();
        next.music_enabled = false;
        assert!(engine.apply_settings(next).is_empty());
        assert!(engine.is_running());
        assert_eq!(engine.audio().calls.last(), Some(&AudioCall::StopBackground));
        assert_eq!(engine.guidance().config(), engine.settings().guidance);

        for _ in 0..7 {
            engine.tick(secs(0.5));
        }
        let counts: Vec<u32> = engine
            .audio()
            .cues()
            .into_iter()
            .filter_map(|c| match c {
                Cue::Count { number, .. } => Some(number),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![2, 3, 4]);
    }

    #[test]
    fn pattern_change_stops_session() {
        let mut engine = engine_with(Settings::default());
        engine.start().unwrap();
        let next = Settings {
            pattern: pattern::find("gentle_box").unwrap(),
            ..engine.settings().clone()
        };
        let events = engine.apply_settings(next);
        assert!(matches!(
            events[0],
            Event::SessionStopped {
                reason: StopReason::SettingsChanged,
                ..
            }
        ));
        assert!(!engine.is_running());
        assert_eq!(engine.settings().pattern.id, "gentle_box");
    }

    #[test]
    fn silent_mode_session_plays_no_cues() {
        let mut settings = Settings::default();
        settings.guidance.mode = GuidanceMode::None;
        settings.music_enabled = false;
        let mut engine = engine_with(settings);
        engine.start().unwrap();
        for _ in 0..100 {
            engine.tick(secs(0.1));
        }
        assert!(engine.audio().cues().is_empty());
        assert_eq!(engine.haptics().pulses, 3);
    }
}

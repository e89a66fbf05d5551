//! Integration tests for the breathing session engine.

use std::time::Duration;

use breathe_core::audio::{AudioCall, PulseCounter, RecordingAudio};
use breathe_core::catalog::pattern;
use breathe_core::visual::{self, shape_at};
use breathe_core::{
    BreathingPattern, Cue, Event, GuidanceMode, Phase, SessionEngine, SessionLength, Settings,
    StopReason, VoiceOption,
};
use proptest::prelude::*;

type TestEngine = SessionEngine<RecordingAudio, PulseCounter>;

fn engine(pattern: BreathingPattern, length: SessionLength) -> TestEngine {
    let settings = Settings {
        pattern,
        session_length: length,
        music_enabled: false,
        ..Settings::default()
    };
    SessionEngine::new(settings, RecordingAudio::new(), PulseCounter::default())
}

fn run(engine: &mut TestEngine, delta: f64, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(engine.tick(Duration::from_secs_f64(delta)));
    }
    events
}

#[test]
fn box_pattern_half_second_ticks() {
    let mut engine = engine(pattern::default_pattern(), SessionLength::Infinite);
    engine.start().unwrap();
    run(&mut engine, 0.5, 10);

    let state = engine.state();
    assert_eq!(state.current_phase, Phase::HoldAfterInhale);
    assert_eq!(state.elapsed_in_phase, 1.0);
    assert_eq!(state.total_elapsed, 5.0);
    assert_eq!(state.completed_cycles, 0);

    let voice = VoiceOption::Default;
    let cues = engine.audio().cues();
    let instructions: Vec<&Cue> = cues
        .iter()
        .filter(|c| matches!(c, Cue::Instruction { .. }))
        .collect();
    assert_eq!(
        instructions,
        vec![
            &Cue::Instruction {
                phase: Phase::Inhale,
                voice
            },
            &Cue::Instruction {
                phase: Phase::HoldAfterInhale,
                voice
            },
        ]
    );

    // Counting cues all belong to the inhale; the hold has not reached its
    // first count yet.
    let hold_start = cues
        .iter()
        .position(|c| {
            *c == Cue::Instruction {
                phase: Phase::HoldAfterInhale,
                voice,
            }
        })
        .unwrap();
    assert!(cues[hold_start + 1..].is_empty());
    assert_eq!(
        &cues[1..hold_start],
        &[
            Cue::Count { number: 2, voice },
            Cue::Count { number: 3, voice },
            Cue::Count { number: 4, voice },
        ]
    );
}

#[test]
fn cycles_count_only_returns_to_inhale() {
    let mut engine = engine(pattern::default_pattern(), SessionLength::Infinite);
    let start_events = engine.start().unwrap();
    assert!(!start_events
        .iter()
        .any(|e| matches!(e, Event::CycleCompleted { .. })));

    // 16 s per cycle at 0.25 s frames.
    for n in 1..=3u32 {
        run(&mut engine, 0.25, 64);
        assert_eq!(engine.state().completed_cycles, n);
        assert_eq!(engine.state().current_phase, Phase::Inhale);
    }
}

#[test]
fn finite_session_stops_within_one_tick_of_budget() {
    let delta = 1.0 / 30.0;
    let mut engine = engine(pattern::default_pattern(), SessionLength::OneMinute);
    engine.start().unwrap();

    let mut last_total = 0.0;
    let mut stopped = None;
    for _ in 0..10_000 {
        last_total = engine.state().total_elapsed;
        let events = engine.tick(Duration::from_secs_f64(delta));
        if let Some(event) = events.into_iter().find(|e| matches!(e, Event::SessionStopped { .. })) {
            stopped = Some(event);
            break;
        }
    }

    match stopped {
        Some(Event::SessionStopped {
            reason,
            total_elapsed_secs,
            ..
        }) => {
            assert_eq!(reason, StopReason::BudgetExhausted);
            assert!((total_elapsed_secs - 60.0).abs() <= delta + 1e-6);
            assert!(last_total < 60.0 + 1e-6);
        }
        other => panic!("expected budget stop, got {other:?}"),
    }
    assert!(!engine.is_running());
    assert_eq!(engine.audio().calls.last(), Some(&AudioCall::StopBackground));
}

#[test]
fn zero_length_phases_are_never_current_and_never_cued() {
    let mut engine = engine(
        pattern::find("coherent_breathing").unwrap(),
        SessionLength::Infinite,
    );
    engine.start().unwrap();

    let mut phases = Vec::new();
    for _ in 0..160 {
        engine.tick(Duration::from_millis(250));
        phases.push(engine.state().current_phase);
    }
    assert!(phases
        .iter()
        .all(|p| matches!(p, Phase::Inhale | Phase::Exhale)));

    let cued_holds = engine.audio().cues().into_iter().any(|c| {
        matches!(
            c,
            Cue::Instruction {
                phase: Phase::HoldAfterInhale | Phase::HoldAfterExhale,
                ..
            }
        )
    });
    assert!(!cued_holds);
    // 40 s of 5-0-5-0 enters a phase every 5 s, plus the opening inhale.
    assert_eq!(engine.haptics().pulses, 9);
    assert_eq!(engine.state().completed_cycles, 4);
}

#[test]
fn skipped_phase_is_reported() {
    let mut engine = engine(
        pattern::find("four_seven_eight").unwrap(),
        SessionLength::Infinite,
    );
    engine.start().unwrap();
    let events = run(&mut engine, 0.5, 38);

    let skipped: Vec<Phase> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseSkipped { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![Phase::HoldAfterExhale]);
    assert_eq!(engine.state().current_phase, Phase::Inhale);
    assert_eq!(engine.state().completed_cycles, 1);
}

#[test]
fn inhale_of_zero_seconds_is_skipped_at_start() {
    let pattern = BreathingPattern::new("no_in", "No Inhale", "", [0.0, 2.0, 3.0, 0.0], false);
    let mut engine = engine(pattern, SessionLength::Infinite);
    let events = engine.start().unwrap();

    assert!(matches!(
        events[1],
        Event::PhaseSkipped {
            phase: Phase::Inhale,
            ..
        }
    ));
    assert_eq!(engine.state().current_phase, Phase::HoldAfterInhale);
    assert_eq!(engine.state().completed_cycles, 0);

    // Wrapping passes through the zero-length inhale and still counts it.
    run(&mut engine, 0.5, 10);
    assert_eq!(engine.state().current_phase, Phase::HoldAfterInhale);
    assert_eq!(engine.state().completed_cycles, 1);
}

#[test]
fn stop_cancels_pending_counts() {
    let mut engine = engine(pattern::find("advanced_box").unwrap(), SessionLength::Infinite);
    engine.start().unwrap();
    run(&mut engine, 0.5, 3);
    engine.stop();
    engine.audio_mut().take();

    run(&mut engine, 0.5, 10);
    assert!(engine.audio().calls.is_empty());
}

#[test]
fn ping_mode_uses_percussive_cues() {
    let mut settings = Settings {
        music_enabled: false,
        ..Settings::default()
    };
    settings.guidance.mode = GuidanceMode::Ping;
    let mut engine = SessionEngine::new(settings, RecordingAudio::new(), PulseCounter::default());
    engine.start().unwrap();
    run(&mut engine, 0.25, 16);

    assert_eq!(
        engine.audio().cues(),
        vec![Cue::Ping, Cue::PingBetween, Cue::PingBetween, Cue::PingBetween, Cue::Ping]
    );
}

#[test]
fn visual_is_continuous_across_phase_boundaries() {
    for phase in Phase::ALL {
        let (end_scale, end_radius, _) = shape_at(phase, 1.0);
        let (start_scale, start_radius, _) = shape_at(phase.next(), 0.0);
        assert_eq!(end_scale, start_scale, "{phase} -> {}", phase.next());
        assert_eq!(end_radius, start_radius, "{phase} -> {}", phase.next());
    }
}

#[test]
fn countdown_walks_one_to_four() {
    let mut engine = engine(pattern::default_pattern(), SessionLength::Infinite);
    engine.start().unwrap();
    let mut seen = vec![engine.visual().countdown];
    for _ in 0..15 {
        engine.tick(Duration::from_millis(250));
        seen.push(engine.visual().countdown);
    }
    seen.dedup();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

proptest! {
    #[test]
    fn next_is_a_four_cycle(index in 0usize..4) {
        let phase = Phase::ALL[index];
        prop_assert_eq!(phase.next().next().next().next(), phase);
    }

    #[test]
    fn mapper_stays_within_extremes(index in 0usize..4, progress in 0.0f64..=1.0) {
        let (scale, radius, _) = shape_at(Phase::ALL[index], progress);
        prop_assert!((visual::CONTRACTED_SCALE..=visual::EXPANDED_SCALE).contains(&scale));
        prop_assert!((visual::SQUARE_CORNER_RADIUS..=visual::ROUNDED_CORNER_RADIUS).contains(&radius));
    }

    #[test]
    fn countdown_never_exceeds_phase_length(elapsed in 0.0f64..20.0, duration in 0.5f64..12.0) {
        let count = visual::countdown(elapsed, duration);
        prop_assert!(count >= 1);
        prop_assert!(count as f64 <= duration.ceil());
    }

    #[test]
    fn completed_cycles_never_decrease(deltas in proptest::collection::vec(1u64..400, 1..200)) {
        let mut engine = engine(pattern::find("four_seven_eight").unwrap(), SessionLength::Infinite);
        engine.start().unwrap();
        let mut last = 0;
        for ms in deltas {
            engine.tick(Duration::from_millis(ms));
            let cycles = engine.state().completed_cycles;
            prop_assert!(cycles >= last);
            prop_assert!(engine.current_phase_duration() > 0.0);
            last = cycles;
        }
    }
}

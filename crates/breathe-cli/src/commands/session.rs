use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use breathe_core::audio::{AudioCall, PulseCounter, RecordingAudio};
use breathe_core::{
    AudioService, BackgroundSound, Config, Cue, Event, FrameClock, HapticService, SessionEngine,
    SoundBank, ValidationError,
};
use breathe_core::visual::{CONTRACTED_SCALE, EXPANDED_SCALE};
use clap::{Args, Subcommand};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Per-invocation overrides of the saved configuration. Not persisted.
#[derive(Args, Debug)]
pub struct SessionOverrides {
    /// Pattern id (see `pattern list`)
    #[arg(long)]
    pattern: Option<String>,
    /// Session length id, e.g. "5min" or "infinite"
    #[arg(long)]
    length: Option<String>,
    /// Guidance mode: voice, ping or none
    #[arg(long)]
    guide: Option<String>,
    /// Voice id
    #[arg(long)]
    voice: Option<String>,
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a live session until it ends or Ctrl-C
    Run {
        #[command(flatten)]
        overrides: SessionOverrides,
        /// Frames per second of the tick loop
        #[arg(long)]
        fps: Option<u32>,
        /// Print events as JSON lines instead of the guide line
        #[arg(long)]
        json: bool,
    },
    /// Run a session on a fixed-step clock and print what happened
    Simulate {
        #[command(flatten)]
        overrides: SessionOverrides,
        /// Simulated seconds to run
        #[arg(long, default_value = "60")]
        seconds: f64,
        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        delta: f64,
        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> CliResult {
    let mut config = Config::load()?;
    match action {
        SessionAction::Run {
            overrides,
            fps,
            json,
        } => {
            apply_overrides(&mut config, &overrides)?;
            if let Some(fps) = fps {
                config.apply("display.fps", &fps.to_string())?;
            }
            run_live(&config, json)
        }
        SessionAction::Simulate {
            overrides,
            seconds,
            delta,
            json,
        } => {
            apply_overrides(&mut config, &overrides)?;
            simulate(&config, seconds, delta, json)
        }
    }
}

fn apply_overrides(config: &mut Config, overrides: &SessionOverrides) -> CliResult {
    let pairs = [
        ("breathing.pattern", &overrides.pattern),
        ("breathing.session_length", &overrides.length),
        ("audio.guide", &overrides.guide),
        ("audio.voice", &overrides.voice),
    ];
    for (key, value) in pairs {
        if let Some(value) = value {
            config.apply(key, value)?;
        }
    }
    Ok(())
}

// ── Live session ─────────────────────────────────────────────────────

/// Terminal audio: resolves each cue against the sound bank and logs the
/// asset that would play. The terminal has no mixer, so nothing sounds.
struct TerminalAudio {
    bank: Option<SoundBank>,
}

impl TerminalAudio {
    fn new(sounds_dir: Option<&str>) -> Self {
        let bank = sounds_dir.and_then(|dir| match SoundBank::scan(Path::new(dir)) {
            Ok(bank) => Some(bank),
            Err(e) => {
                tracing::warn!(dir, error = %e, "cannot read sounds directory");
                None
            }
        });
        Self { bank }
    }
}

impl AudioService for TerminalAudio {
    fn play_cue(&mut self, cue: &Cue) {
        let stem = match &self.bank {
            Some(bank) => bank.resolve(cue),
            None => cue.file_stem(),
        };
        if let Some(stem) = stem {
            tracing::debug!(%stem, "cue");
        }
    }

    fn play_background(&mut self, sound: BackgroundSound) {
        let stem = match &self.bank {
            Some(bank) => bank.resolve_background(sound),
            None => sound.file_stem().map(str::to_string),
        };
        if let Some(stem) = stem {
            tracing::info!(%stem, "background track started");
        }
    }

    fn stop_background(&mut self) {
        tracing::debug!("background track stopped");
    }
}

/// Rings the terminal bell on each phase entry.
struct TerminalBell {
    enabled: bool,
}

impl HapticService for TerminalBell {
    fn pulse(&mut self) {
        if self.enabled {
            print!("\x07");
        }
    }
}

fn run_live(config: &Config, json: bool) -> CliResult {
    let settings = config.settings()?;
    settings.check_entitlements(&config.entitlements())?;

    let audio = TerminalAudio::new(config.audio.sounds_dir.as_deref());
    let haptics = TerminalBell {
        enabled: config.display.haptics && !json,
    };
    let mut engine = SessionEngine::new(settings, audio, haptics);
    let fps = config.display.fps.max(1);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(frame_loop(&mut engine, fps, json))
}

async fn frame_loop<A, H>(engine: &mut SessionEngine<A, H>, fps: u32, json: bool) -> CliResult
where
    A: AudioService,
    H: HapticService,
{
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut clock = FrameClock::new();
    print_events(&engine.start()?, json)?;
    clock.start(Instant::now());

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                print_events(&engine.stop(), json)?;
                break;
            }
            tick = interval.tick() => {
                let delta = clock.delta(tick.into_std());
                let events = engine.tick(delta);
                print_events(&events, json)?;
                if !engine.is_running() {
                    break;
                }
                if !json {
                    render(engine)?;
                }
            }
        }
    }
    Ok(())
}

const GUIDE_WIDTH: usize = 24;

fn render<A, H>(engine: &SessionEngine<A, H>) -> CliResult
where
    A: AudioService,
    H: HapticService,
{
    let state = engine.state();
    let visual = engine.visual();
    let openness = (visual.scale - CONTRACTED_SCALE) / (EXPANDED_SCALE - CONTRACTED_SCALE);
    let fill = (openness * GUIDE_WIDTH as f64).round() as usize;
    let fill = fill.min(GUIDE_WIDTH);
    let glyph = if state.current_phase.is_expanded() { "#" } else { "=" };
    let remaining = state
        .remaining_budget
        .map(|r| format!("  {}s left", r.ceil() as u64))
        .unwrap_or_default();

    let mut out = std::io::stdout().lock();
    write!(
        out,
        "\r{:<8} {}  [{}{}]  cycles {}{}   ",
        state.current_phase.instruction(),
        visual.countdown,
        glyph.repeat(fill),
        " ".repeat(GUIDE_WIDTH - fill),
        state.completed_cycles,
        remaining,
    )?;
    out.flush()?;
    Ok(())
}

fn print_events(events: &[Event], json: bool) -> CliResult {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else if let Some(line) = describe(event) {
            println!("\r{line:<60}");
        }
    }
    Ok(())
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted {
            pattern_id,
            budget_secs,
            ..
        } => Some(match budget_secs {
            Some(budget) => format!("session started: {pattern_id}, {budget}s"),
            None => format!("session started: {pattern_id}"),
        }),
        Event::PhaseEntered {
            phase,
            duration_secs,
            ..
        } => Some(format!("{phase} ({duration_secs}s)")),
        Event::PhaseSkipped { phase, .. } => Some(format!("{phase} skipped")),
        Event::CycleCompleted {
            completed_cycles, ..
        } => Some(format!("cycle {completed_cycles} complete")),
        Event::SessionStopped {
            reason,
            total_elapsed_secs,
            completed_cycles,
            ..
        } => Some(format!(
            "session stopped ({reason:?}) after {total_elapsed_secs:.1}s, {completed_cycles} cycles"
        )),
        Event::StateSnapshot { .. } => None,
    }
}

// ── Simulation ───────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TranscriptEntry {
    Event { t: f64, event: Event },
    Audio { t: f64, call: AudioCall },
}

#[derive(Serialize)]
struct Simulation {
    pattern_id: String,
    seconds: f64,
    delta: f64,
    haptic_pulses: u32,
    transcript: Vec<TranscriptEntry>,
    final_state: Event,
}

fn record(
    transcript: &mut Vec<TranscriptEntry>,
    t: f64,
    events: Vec<Event>,
    calls: Vec<AudioCall>,
) {
    transcript.extend(events.into_iter().map(|event| TranscriptEntry::Event { t, event }));
    transcript.extend(calls.into_iter().map(|call| TranscriptEntry::Audio { t, call }));
}

fn simulate(config: &Config, seconds: f64, delta: f64, json: bool) -> CliResult {
    if !delta.is_finite() || delta <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "delta".into(),
            message: "must be a positive number of seconds".into(),
        }
        .into());
    }
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "seconds".into(),
            message: "must be zero or more".into(),
        }
        .into());
    }

    let settings = config.settings()?;
    settings.check_entitlements(&config.entitlements())?;
    let pattern_id = settings.pattern.id.clone();
    let mut engine = SessionEngine::new(settings, RecordingAudio::new(), PulseCounter::default());

    let mut transcript = Vec::new();
    let started = engine.start()?;
    let calls = engine.audio_mut().take();
    record(&mut transcript, 0.0, started, calls);

    let frames = (seconds / delta).ceil() as u64;
    let step = Duration::from_secs_f64(delta);
    for frame in 1..=frames {
        let events = engine.tick(step);
        let calls = engine.audio_mut().take();
        record(&mut transcript, frame as f64 * delta, events, calls);
        if !engine.is_running() {
            break;
        }
    }

    let simulation = Simulation {
        pattern_id,
        seconds,
        delta,
        haptic_pulses: engine.haptics().pulses,
        transcript,
        final_state: engine.snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&simulation)?);
    } else {
        print_transcript(&simulation);
    }
    Ok(())
}

fn print_transcript(simulation: &Simulation) {
    for entry in &simulation.transcript {
        let (t, line) = match entry {
            TranscriptEntry::Event { t, event } => match describe(event) {
                Some(line) => (*t, line),
                None => continue,
            },
            TranscriptEntry::Audio { t, call } => (*t, describe_call(call)),
        };
        println!("{t:>8.2}s  {line}");
    }
    println!("haptic pulses: {}", simulation.haptic_pulses);
}

fn describe_call(call: &AudioCall) -> String {
    match call {
        AudioCall::Cue(cue) => match cue.file_stem() {
            Some(stem) => format!("  cue {stem}"),
            None => format!("  cue {cue:?}"),
        },
        AudioCall::StopCues => "  cues stopped".to_string(),
        AudioCall::Background { sound } => format!("  background {sound}"),
        AudioCall::StopBackground => "  background stopped".to_string(),
    }
}

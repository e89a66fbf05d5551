use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Phase, VisualState};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Explicit stop or toggle.
    UserRequested,
    /// The finite session length ran out.
    BudgetExhausted,
    /// Pattern, length or guidance changed mid-session.
    SettingsChanged,
    /// A new session was started over a running one.
    Restarted,
    /// No phase of the pattern has a positive length.
    DegeneratePattern,
}

/// Every state change of the session engine produces an Event.
/// Front-ends render them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        pattern_id: String,
        budget_secs: Option<f64>,
        at: DateTime<Utc>,
    },
    PhaseEntered {
        phase: Phase,
        duration_secs: f64,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    /// A zero-length phase was passed over without dwell or guidance.
    PhaseSkipped {
        phase: Phase,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    SessionStopped {
        reason: StopReason,
        total_elapsed_secs: f64,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        running: bool,
        phase: Phase,
        instruction: String,
        elapsed_in_phase_secs: f64,
        phase_duration_secs: f64,
        total_elapsed_secs: f64,
        remaining_secs: Option<f64>,
        completed_cycles: u32,
        visual: VisualState,
        at: DateTime<Utc>,
    },
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Phase;

/// Mutable state of one session, written only by the engine's tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub running: bool,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub current_phase: Phase,
    /// Seconds spent in the current phase. Reset to zero on every
    /// transition; overshoot past the phase end is discarded.
    pub elapsed_in_phase: f64,
    pub total_elapsed: f64,
    /// Seconds left for a finite session, never increasing.
    pub remaining_budget: Option<f64>,
    /// Transitions into Inhale after the session's first one.
    pub completed_cycles: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            running: false,
            session_id: None,
            started_at: None,
            current_phase: Phase::Inhale,
            elapsed_in_phase: 0.0,
            total_elapsed: 0.0,
            remaining_budget: None,
            completed_cycles: 0,
        }
    }
}

impl SessionState {
    pub fn begin(&mut self, budget_secs: Option<f64>) {
        *self = Self {
            running: true,
            session_id: Some(Uuid::new_v4()),
            started_at: Some(Utc::now()),
            remaining_budget: budget_secs,
            ..Self::default()
        };
    }

    /// Advance the elapsed counters. Returns `true` once a finite budget
    /// has run out.
    pub fn advance(&mut self, delta_secs: f64) -> bool {
        self.elapsed_in_phase += delta_secs;
        self.total_elapsed += delta_secs;
        match self.remaining_budget.as_mut() {
            Some(remaining) => {
                *remaining = (*remaining - delta_secs).max(0.0);
                *remaining <= 0.0
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

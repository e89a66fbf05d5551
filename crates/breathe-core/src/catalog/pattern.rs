use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::session::Phase;

/// A named breathing technique: four phase durations in seconds.
///
/// Patterns are plain values. The catalog defines them once and user
/// settings select one by id; nothing mutates a pattern after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub inhale_secs: f64,
    pub hold_after_inhale_secs: f64,
    pub exhale_secs: f64,
    pub hold_after_exhale_secs: f64,
    #[serde(default)]
    pub premium: bool,
}

impl BreathingPattern {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        [inhale, hold_in, exhale, hold_out]: [f64; 4],
        premium: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            inhale_secs: inhale,
            hold_after_inhale_secs: hold_in,
            exhale_secs: exhale,
            hold_after_exhale_secs: hold_out,
            premium,
        }
    }

    pub fn phase_duration(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Inhale => self.inhale_secs,
            Phase::HoldAfterInhale => self.hold_after_inhale_secs,
            Phase::Exhale => self.exhale_secs,
            Phase::HoldAfterExhale => self.hold_after_exhale_secs,
        }
    }

    /// Length of one full inhale-hold-exhale-hold cycle.
    pub fn cycle_duration(&self) -> f64 {
        Phase::ALL.iter().map(|p| self.phase_duration(*p)).sum()
    }

    /// Whole-second timing string, e.g. `4-7-8-0`.
    pub fn timing_display(&self) -> String {
        Phase::ALL
            .iter()
            .map(|p| format!("{}", self.phase_duration(*p) as i64))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// A pattern whose every phase lasts zero seconds can never advance.
    pub fn is_degenerate(&self) -> bool {
        Phase::ALL.iter().all(|p| self.phase_duration(*p) <= 0.0)
    }

    /// Reject negative or non-finite durations and the all-zero pattern.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for phase in Phase::ALL {
            let value = self.phase_duration(phase);
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidDuration {
                    id: self.id.clone(),
                    phase: phase.to_string(),
                    value,
                });
            }
        }
        if self.is_degenerate() {
            return Err(ValidationError::DegeneratePattern {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// The built-in patterns. The first entry is the free default.
pub fn all() -> Vec<BreathingPattern> {
    vec![
        default_pattern(),
        BreathingPattern::new(
            "gentle_box",
            "Gentle Box",
            "Slower 3-3-3-3 pattern for beginners",
            [3.0, 3.0, 3.0, 3.0],
            true,
        ),
        BreathingPattern::new(
            "deep_box",
            "Deep Box",
            "Extended 5-5-5-5 pattern for deeper relaxation",
            [5.0, 5.0, 5.0, 5.0],
            true,
        ),
        BreathingPattern::new(
            "advanced_box",
            "Advanced Box",
            "Challenging 6-6-6-6 pattern for experienced users",
            [6.0, 6.0, 6.0, 6.0],
            true,
        ),
        BreathingPattern::new(
            "four_seven_eight",
            "4-7-8 Relaxing",
            "Popular 4-7-8 technique for sleep and anxiety",
            [4.0, 7.0, 8.0, 0.0],
            true,
        ),
        BreathingPattern::new(
            "coherent_breathing",
            "Coherent Breathing",
            "5-0-5-0 pattern for heart rate variability",
            [5.0, 0.0, 5.0, 0.0],
            true,
        ),
    ]
}

pub fn find(id: &str) -> Option<BreathingPattern> {
    all().into_iter().find(|p| p.id == id)
}

/// Classic 4-4-4-4 box breathing, the free pattern every session starts with.
pub fn default_pattern() -> BreathingPattern {
    BreathingPattern::new(
        "classic_box",
        "Classic Box",
        "Traditional 4-4-4-4 box breathing",
        [4.0, 4.0, 4.0, 4.0],
        false,
    )
}

use serde::{Deserialize, Serialize};

/// One segment of a breathing cycle.
///
/// The ordering is fixed and cyclic: Inhale -> HoldAfterInhale -> Exhale ->
/// HoldAfterExhale -> Inhale. There is no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Inhale,
    HoldAfterInhale,
    Exhale,
    HoldAfterExhale,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Inhale,
        Phase::HoldAfterInhale,
        Phase::Exhale,
        Phase::HoldAfterExhale,
    ];

    pub fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::HoldAfterInhale,
            Phase::HoldAfterInhale => Phase::Exhale,
            Phase::Exhale => Phase::HoldAfterExhale,
            Phase::HoldAfterExhale => Phase::Inhale,
        }
    }

    /// Text shown to the user while the phase is active.
    pub fn instruction(self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::HoldAfterInhale | Phase::HoldAfterExhale => "Hold",
            Phase::Exhale => "Exhale",
        }
    }

    /// Asset stem of the spoken instruction, without voice prefix.
    pub fn cue_stem(self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::HoldAfterInhale | Phase::HoldAfterExhale => "hold",
            Phase::Exhale => "exhale",
        }
    }

    /// Whether the guide shape is in its grown state during this phase.
    pub fn is_expanded(self) -> bool {
        matches!(self, Phase::Inhale | Phase::HoldAfterInhale)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Inhale => "inhale",
            Phase::HoldAfterInhale => "hold_after_inhale",
            Phase::Exhale => "exhale",
            Phase::HoldAfterExhale => "hold_after_exhale",
        };
        f.write_str(name)
    }
}

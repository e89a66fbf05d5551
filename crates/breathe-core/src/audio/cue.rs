use serde::{Deserialize, Serialize};

use crate::catalog::VoiceOption;
use crate::session::Phase;

/// Highest count that has a spoken asset.
pub const MAX_SPOKEN_COUNT: u32 = 8;

/// A single guidance sound requested from the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// Spoken phase name ("inhale", "hold", "exhale").
    Instruction { phase: Phase, voice: VoiceOption },
    /// Spoken second count, 2 through 8.
    Count { number: u32, voice: VoiceOption },
    /// Percussive phase marker.
    Ping,
    /// Softer once-per-second tick between pings.
    PingBetween,
}

impl Cue {
    /// Asset stem for this cue, or `None` when no asset exists for it.
    pub fn file_stem(&self) -> Option<String> {
        match *self {
            Cue::Instruction { phase, voice } => {
                Some(format!("{}{}", voice.file_prefix(), phase.cue_stem()))
            }
            Cue::Count { number, voice } => {
                count_word(number).map(|word| format!("{}{}", voice.file_prefix(), word))
            }
            Cue::Ping => Some("ping".to_string()),
            Cue::PingBetween => Some("ping_between".to_string()),
        }
    }

    /// Stem of the same semantic role in the default voice, if this cue
    /// uses a premium voice.
    pub fn fallback_stem(&self) -> Option<String> {
        match *self {
            Cue::Instruction { phase, voice } if voice != VoiceOption::Default => Cue::Instruction {
                phase,
                voice: VoiceOption::Default,
            }
            .file_stem(),
            Cue::Count { number, voice } if voice != VoiceOption::Default => Cue::Count {
                number,
                voice: VoiceOption::Default,
            }
            .file_stem(),
            _ => None,
        }
    }
}

fn count_word(number: u32) -> Option<&'static str> {
    match number {
        2 => Some("two"),
        3 => Some("three"),
        4 => Some("four"),
        5 => Some("five"),
        6 => Some("six"),
        7 => Some("seven"),
        8 => Some("eight"),
        _ => None,
    }
}

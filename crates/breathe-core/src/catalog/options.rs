//! User-selectable guidance, voice, ambience and session-length options.
//!
//! Each option has a stable string id (used in the config file and on the
//! command line), a display name, and a premium flag consulted at
//! selection time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Style of audio cueing during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceMode {
    /// Spoken instruction plus spoken count.
    #[default]
    Voice,
    /// Percussive ping plus a softer tick each second.
    Ping,
    /// Silent session.
    None,
}

impl GuidanceMode {
    pub const ALL: [GuidanceMode; 3] = [GuidanceMode::Voice, GuidanceMode::Ping, GuidanceMode::None];

    pub fn id(self) -> &'static str {
        match self {
            GuidanceMode::Voice => "voice",
            GuidanceMode::Ping => "ping",
            GuidanceMode::None => "none",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GuidanceMode::Voice => "Voice",
            GuidanceMode::Ping => "Drum",
            GuidanceMode::None => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceOption {
    #[default]
    Default,
    FemaleCalm,
    MaleDeep,
    FemaleWhisper,
}

impl VoiceOption {
    pub const ALL: [VoiceOption; 4] = [
        VoiceOption::Default,
        VoiceOption::FemaleCalm,
        VoiceOption::MaleDeep,
        VoiceOption::FemaleWhisper,
    ];

    pub fn id(self) -> &'static str {
        match self {
            VoiceOption::Default => "default",
            VoiceOption::FemaleCalm => "female_calm",
            VoiceOption::MaleDeep => "male_deep",
            VoiceOption::FemaleWhisper => "female_whisper",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VoiceOption::Default => "Default",
            VoiceOption::FemaleCalm => "Female (Calm)",
            VoiceOption::MaleDeep => "Male (Deep)",
            VoiceOption::FemaleWhisper => "Female (Whisper)",
        }
    }

    pub fn is_premium(self) -> bool {
        self != VoiceOption::Default
    }

    /// Prefix prepended to every asset stem spoken by this voice.
    pub fn file_prefix(self) -> &'static str {
        match self {
            VoiceOption::Default => "",
            VoiceOption::FemaleCalm => "female_calm_",
            VoiceOption::MaleDeep => "male_deep_",
            VoiceOption::FemaleWhisper => "female_whisper_",
        }
    }
}

/// Looping ambience track played under the guidance cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSound {
    #[default]
    CalmMusic,
    OceanWaves,
    ForestSounds,
    RainSounds,
    WhiteNoise,
    Silence,
}

impl BackgroundSound {
    pub const ALL: [BackgroundSound; 6] = [
        BackgroundSound::CalmMusic,
        BackgroundSound::OceanWaves,
        BackgroundSound::ForestSounds,
        BackgroundSound::RainSounds,
        BackgroundSound::WhiteNoise,
        BackgroundSound::Silence,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BackgroundSound::CalmMusic => "calm_music",
            BackgroundSound::OceanWaves => "ocean_waves",
            BackgroundSound::ForestSounds => "forest_sounds",
            BackgroundSound::RainSounds => "rain_sounds",
            BackgroundSound::WhiteNoise => "white_noise",
            BackgroundSound::Silence => "silence",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BackgroundSound::CalmMusic => "Calm Music",
            BackgroundSound::OceanWaves => "Ocean Waves",
            BackgroundSound::ForestSounds => "Forest Sounds",
            BackgroundSound::RainSounds => "Rain Sounds",
            BackgroundSound::WhiteNoise => "White Noise",
            BackgroundSound::Silence => "Silence",
        }
    }

    pub fn is_premium(self) -> bool {
        !matches!(self, BackgroundSound::CalmMusic | BackgroundSound::Silence)
    }

    /// Asset stem of the track; silence has none.
    pub fn file_stem(self) -> Option<&'static str> {
        match self {
            BackgroundSound::Silence => None,
            other => Some(other.id()),
        }
    }
}

/// Total session budget. `Infinite` runs until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionLength {
    #[default]
    #[serde(rename = "infinite")]
    Infinite,
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "2min")]
    TwoMinutes,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "20min")]
    TwentyMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
}

impl SessionLength {
    pub const ALL: [SessionLength; 8] = [
        SessionLength::Infinite,
        SessionLength::OneMinute,
        SessionLength::TwoMinutes,
        SessionLength::FiveMinutes,
        SessionLength::TenMinutes,
        SessionLength::FifteenMinutes,
        SessionLength::TwentyMinutes,
        SessionLength::ThirtyMinutes,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SessionLength::Infinite => "infinite",
            SessionLength::OneMinute => "1min",
            SessionLength::TwoMinutes => "2min",
            SessionLength::FiveMinutes => "5min",
            SessionLength::TenMinutes => "10min",
            SessionLength::FifteenMinutes => "15min",
            SessionLength::TwentyMinutes => "20min",
            SessionLength::ThirtyMinutes => "30min",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SessionLength::Infinite => "Infinite",
            SessionLength::OneMinute => "1 minute",
            SessionLength::TwoMinutes => "2 minutes",
            SessionLength::FiveMinutes => "5 minutes",
            SessionLength::TenMinutes => "10 minutes",
            SessionLength::FifteenMinutes => "15 minutes",
            SessionLength::TwentyMinutes => "20 minutes",
            SessionLength::ThirtyMinutes => "30 minutes",
        }
    }

    /// Budget in seconds, `None` for an unbounded session.
    pub fn duration_secs(self) -> Option<f64> {
        let minutes = match self {
            SessionLength::Infinite => return None,
            SessionLength::OneMinute => 1,
            SessionLength::TwoMinutes => 2,
            SessionLength::FiveMinutes => 5,
            SessionLength::TenMinutes => 10,
            SessionLength::FifteenMinutes => 15,
            SessionLength::TwentyMinutes => 20,
            SessionLength::ThirtyMinutes => 30,
        };
        Some(f64::from(minutes * 60))
    }

    pub fn is_premium(self) -> bool {
        !matches!(self, SessionLength::Infinite | SessionLength::FiveMinutes)
    }
}

macro_rules! impl_from_str_by_id {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|opt| opt.id() == s)
                    .ok_or_else(|| ValidationError::UnknownId {
                        kind: $kind,
                        id: s.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

impl_from_str_by_id!(GuidanceMode, "guidance mode");
impl_from_str_by_id!(VoiceOption, "voice");
impl_from_str_by_id!(BackgroundSound, "background sound");
impl_from_str_by_id!(SessionLength, "session length");

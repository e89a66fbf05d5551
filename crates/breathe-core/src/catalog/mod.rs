//! Static catalog of breathing patterns and selectable options.

mod options;
pub mod pattern;

pub use options::{BackgroundSound, GuidanceMode, SessionLength, VoiceOption};
pub use pattern::BreathingPattern;

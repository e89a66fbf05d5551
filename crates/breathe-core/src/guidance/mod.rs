//! Phase-entry guidance: haptic pulse, instruction cue, counting train.

mod dispatcher;
mod schedule;

pub use dispatcher::{GuidanceConfig, GuidanceDispatcher};
pub use schedule::{CountSchedule, CountStyle, COUNT_LEAD_IN_SECS};

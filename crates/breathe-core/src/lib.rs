//! # Breathe Core Library
//!
//! Core logic for a guided breathing timer: a tick-driven session engine
//! that walks the inhale / hold / exhale / hold cycle, derives the guide
//! shape from phase progress, and fires haptic and audio guidance on each
//! phase entry. Front-ends (the CLI, a GUI) own the frame clock and the
//! actual audio/haptic devices and talk to the engine through traits.
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: session state machine, one `tick()` per frame
//! - [`BreathingPattern`]: named four-phase timings; see [`catalog`]
//! - [`GuidanceDispatcher`]: instruction cues and the per-second count
//! - [`visual`]: progress-to-shape mapping
//! - [`Config`]: TOML configuration and entitlement-checked selection

pub mod audio;
pub mod catalog;
pub mod entitlement;
pub mod error;
pub mod events;
pub mod guidance;
pub mod session;
pub mod storage;

pub use audio::{AudioService, Cue, HapticService, SoundBank};
pub use catalog::{BackgroundSound, BreathingPattern, GuidanceMode, SessionLength, VoiceOption};
pub use entitlement::{Entitlements, PremiumAsset, StaticEntitlements};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, StopReason};
pub use guidance::{GuidanceConfig, GuidanceDispatcher};
pub use session::{visual, FrameClock, Phase, SessionEngine, SessionState, Settings, VisualState};
pub use storage::Config;

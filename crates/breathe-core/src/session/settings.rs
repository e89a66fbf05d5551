use serde::{Deserialize, Serialize};

use crate::catalog::{pattern, BackgroundSound, BreathingPattern, SessionLength};
use crate::entitlement::Entitlements;
use crate::error::ValidationError;
use crate::guidance::GuidanceConfig;

/// Everything the engine reads from the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub pattern: BreathingPattern,
    pub session_length: SessionLength,
    pub guidance: GuidanceConfig,
    pub background: BackgroundSound,
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pattern: pattern::default_pattern(),
            session_length: SessionLength::Infinite,
            guidance: GuidanceConfig::default(),
            background: BackgroundSound::CalmMusic,
            music_enabled: true,
        }
    }
}

impl Settings {
    /// Changes that invalidate a running session's timing or cueing.
    pub fn requires_restart(&self, other: &Settings) -> bool {
        self.pattern != other.pattern
            || self.session_length != other.session_length
            || self.guidance != other.guidance
    }

    pub fn ambience_differs(&self, other: &Settings) -> bool {
        self.background != other.background || self.music_enabled != other.music_enabled
    }

    /// Track to loop under the session, if any.
    pub fn ambience(&self) -> Option<BackgroundSound> {
        (self.music_enabled && self.background != BackgroundSound::Silence).then_some(self.background)
    }

    /// Refuse premium selections the user is not entitled to.
    pub fn check_entitlements(&self, entitlements: &dyn Entitlements) -> Result<(), ValidationError> {
        entitlements.ensure(&self.pattern)?;
        entitlements.ensure(&self.session_length)?;
        entitlements.ensure(&self.guidance.voice)?;
        entitlements.ensure(&self.background)?;
        Ok(())
    }
}

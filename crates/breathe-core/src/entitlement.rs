//! Premium gating of catalog assets.
//!
//! Consulted when the user selects something, never from the session tick.

use crate::catalog::{BackgroundSound, BreathingPattern, SessionLength, VoiceOption};
use crate::error::ValidationError;

/// Anything that may sit behind the subscription.
pub trait PremiumAsset {
    fn is_premium(&self) -> bool;

    /// Human-readable name used in error messages.
    fn asset_name(&self) -> String;
}

/// Source of truth for what the current user may select.
pub trait Entitlements {
    fn has_premium_access(&self) -> bool;

    fn can_use(&self, asset: &dyn PremiumAsset) -> bool {
        !asset.is_premium() || self.has_premium_access()
    }

    /// Like [`Entitlements::can_use`], as a `Result` for `?` chains.
    fn ensure(&self, asset: &dyn PremiumAsset) -> Result<(), ValidationError> {
        if self.can_use(asset) {
            Ok(())
        } else {
            Err(ValidationError::PremiumRequired {
                asset: asset.asset_name(),
            })
        }
    }
}

/// Fixed entitlement, e.g. read once from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticEntitlements {
    pub premium: bool,
}

impl StaticEntitlements {
    pub fn new(premium: bool) -> Self {
        Self { premium }
    }
}

impl Entitlements for StaticEntitlements {
    fn has_premium_access(&self) -> bool {
        self.premium
    }
}

impl PremiumAsset for BreathingPattern {
    fn is_premium(&self) -> bool {
        self.premium
    }

    fn asset_name(&self) -> String {
        format!("pattern {}", self.name)
    }
}

impl PremiumAsset for VoiceOption {
    fn is_premium(&self) -> bool {
        VoiceOption::is_premium(*self)
    }

    fn asset_name(&self) -> String {
        format!("voice {}", self.display_name())
    }
}

impl PremiumAsset for BackgroundSound {
    fn is_premium(&self) -> bool {
        BackgroundSound::is_premium(*self)
    }

    fn asset_name(&self) -> String {
        format!("background sound {}", self.display_name())
    }
}

impl PremiumAsset for SessionLength {
    fn is_premium(&self) -> bool {
        SessionLength::is_premium(*self)
    }

    fn asset_name(&self) -> String {
        format!("session length {}", self.display_name())
    }
}

//! Phase progress to guide-shape parameters.
//!
//! Everything here is a pure projection of (phase, elapsed, duration); the
//! engine recomputes it on demand and never stores it.

use serde::{Deserialize, Serialize};

use super::Phase;

pub const CONTRACTED_SCALE: f64 = 0.5;
pub const EXPANDED_SCALE: f64 = 1.0;
pub const ROUNDED_CORNER_RADIUS: f64 = 80.0;
pub const SQUARE_CORNER_RADIUS: f64 = 30.0;

const REST_INTENSITY: f64 = 1.0;
const FULL_INTENSITY: f64 = 1.1;
const EMPTY_INTENSITY: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub scale: f64,
    pub corner_radius: f64,
    /// Background brightness multiplier.
    pub background_intensity: f64,
    /// 1-based second count shown in the guide.
    pub countdown: u32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            scale: CONTRACTED_SCALE,
            corner_radius: ROUNDED_CORNER_RADIUS,
            background_intensity: REST_INTENSITY,
            countdown: 1,
        }
    }
}

/// Raised-cosine ease: zero slope at both ends.
pub fn ease_in_out(t: f64) -> f64 {
    (1.0 - (std::f64::consts::PI * t).cos()) / 2.0
}

/// Fraction of the phase completed, clamped to `0..=1`. A zero-length phase
/// counts as complete.
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Per-second count-up, capped at the phase's whole-second length.
pub fn countdown(elapsed: f64, duration: f64) -> u32 {
    let cap = duration.ceil().max(1.0) as u32;
    let count = elapsed.max(0.0).floor() as u32 + 1;
    count.clamp(1, cap)
}

/// Shape parameters at `progress` (already clamped) through `phase`.
/// Returns `(scale, corner_radius, background_intensity)`.
pub fn shape_at(phase: Phase, progress: f64) -> (f64, f64, f64) {
    let eased = ease_in_out(progress.clamp(0.0, 1.0));
    match phase {
        Phase::Inhale => (
            lerp(CONTRACTED_SCALE, EXPANDED_SCALE, eased),
            lerp(ROUNDED_CORNER_RADIUS, SQUARE_CORNER_RADIUS, eased),
            lerp(REST_INTENSITY, FULL_INTENSITY, eased),
        ),
        Phase::HoldAfterInhale => (EXPANDED_SCALE, SQUARE_CORNER_RADIUS, FULL_INTENSITY),
        Phase::Exhale => (
            lerp(EXPANDED_SCALE, CONTRACTED_SCALE, eased),
            lerp(SQUARE_CORNER_RADIUS, ROUNDED_CORNER_RADIUS, eased),
            lerp(FULL_INTENSITY, EMPTY_INTENSITY, eased),
        ),
        Phase::HoldAfterExhale => (CONTRACTED_SCALE, ROUNDED_CORNER_RADIUS, EMPTY_INTENSITY),
    }
}

pub fn project(phase: Phase, elapsed: f64, duration: f64) -> VisualState {
    let (scale, corner_radius, background_intensity) = shape_at(phase, progress(elapsed, duration));
    VisualState {
        scale,
        corner_radius,
        background_intensity,
        countdown: countdown(elapsed, duration),
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

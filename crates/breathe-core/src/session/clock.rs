//! Frame clock: turns a stream of monotonic instants into tick deltas.
//!
//! Frame rate is not a correctness requirement; any source that calls
//! [`FrameClock::delta`] with non-decreasing instants works.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn is_started(&self) -> bool {
        self.last.is_some()
    }

    /// Time since the previous call (or since `start`). The first call on
    /// an unstarted clock starts it and returns zero.
    pub fn delta(&mut self, now: Instant) -> Duration {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        delta
    }
}

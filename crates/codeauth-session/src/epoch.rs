//! Generation tracking for wholesale cache expiry.

use std::time::{Duration, Instant};

/// Tracks the start of the current cache generation.
///
/// A generation is fresh while `now - start < window`. Once that no longer
/// holds the owner must clear every entry and call [`Epoch::advance`].
#[derive(Debug, Clone)]
pub struct Epoch {
    /// When the current generation began.
    start: Instant,

    /// Lifetime of a generation.
    window: Duration,

    /// Number of generations started since creation (the first is 0).
    generation: u64,
}

impl Epoch {
    /// Start the first generation now.
    pub fn new(window: Duration) -> Self {
        Self::starting_at(Instant::now(), window)
    }

    /// Start the first generation at a given instant.
    pub fn starting_at(start: Instant, window: Duration) -> Self {
        Self {
            start,
            window,
            generation: 0,
        }
    }

    /// Check whether the generation is stale at `now`.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        // saturating: an instant before `start` counts as zero elapsed
        now.saturating_duration_since(self.start) >= self.window
    }

    /// Check whether the generation is stale right now.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Begin a new generation at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.start = now;
        self.generation += 1;
    }

    /// When the current generation began.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Get the configured window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left in the current generation at `now`.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.window
            .saturating_sub(now.saturating_duration_since(self.start))
    }
}

//! Configuration for the session cache.

use std::time::Duration;

/// Default length of a cache generation.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

/// Windows shorter than this do little to absorb rate limits.
pub const RECOMMENDED_MIN_WINDOW: Duration = Duration::from_secs(15);

/// Configuration for the session cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether the cache stores anything at all.
    pub enabled: bool,

    /// How long a generation lives before the whole cache is cleared.
    pub window: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: DEFAULT_WINDOW,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that caches nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Enable or disable caching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the generation window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Whether the window is shorter than [`RECOMMENDED_MIN_WINDOW`].
    pub fn is_short_window(&self) -> bool {
        self.enabled && self.window < RECOMMENDED_MIN_WINDOW
    }
}

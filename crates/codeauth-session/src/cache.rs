//! Session cache with whole-generation expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::epoch::Epoch;

/// Inner state protected by the mutex.
struct CacheInner<V> {
    /// Cached records keyed by session token.
    entries: HashMap<String, V>,

    /// Current generation.
    epoch: Epoch,
}

impl<V> CacheInner<V> {
    /// Clear everything if the generation is stale at `now`.
    ///
    /// Returns `true` when a new generation was started.
    fn check_epoch(&mut self, now: Instant) -> bool {
        if !self.epoch.is_stale_at(now) {
            return false;
        }

        let dropped = self.entries.len();
        self.entries.clear();
        self.epoch.advance(now);

        debug!(
            generation = self.epoch.generation(),
            dropped, "Session cache generation expired, cleared all entries"
        );

        true
    }
}

/// Session cache keyed by session token.
///
/// All entries share a single expiry clock. When the clock runs past the
/// configured window the next access clears the whole map and starts a new
/// generation, so a stale generation is never observed.
///
/// Every method takes the lock exactly once and never calls out while
/// holding it. A disabled cache stores nothing. Tokens are never logged.
pub struct SessionCache<V> {
    inner: Arc<Mutex<CacheInner<V>>>,
    config: CacheConfig,
}

impl<V: Clone> SessionCache<V> {
    /// Create a new cache whose first generation starts now.
    pub fn new(config: CacheConfig) -> Self {
        let inner = CacheInner {
            entries: HashMap::new(),
            epoch: Epoch::new(config.window),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether the cache stores anything.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Clear the cache if the current generation has expired.
    ///
    /// Returns `true` when the cache was reset. Always `false` when disabled.
    pub fn check_epoch(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.inner.lock().check_epoch(Instant::now())
    }

    /// Get the record cached for `token`.
    pub fn get(&self, token: &str) -> Option<V> {
        if !self.config.enabled {
            return None;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());

        let value = inner.entries.get(token).cloned();
        if value.is_some() {
            trace!("Session cache hit");
        } else {
            trace!("Session cache miss");
        }
        value
    }

    /// Insert or overwrite the record for `token`.
    pub fn put(&self, token: &str, value: V) {
        if !self.config.enabled {
            return;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());
        inner.entries.insert(token.to_string(), value);

        trace!(
            cache_size = inner.entries.len(),
            "Session inserted into cache"
        );
    }

    /// Remove the record for `token`, if present.
    pub fn remove(&self, token: &str) -> Option<V> {
        if !self.config.enabled {
            return None;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());

        let removed = inner.entries.remove(token);
        if removed.is_some() {
            trace!(cache_size = inner.entries.len(), "Session removed from cache");
        }
        removed
    }

    /// Swap `old_token` for `new_token` in one critical section.
    ///
    /// Readers observe either the old state or the new one, never a state
    /// where both tokens or neither token is the latest write.
    pub fn replace(&self, old_token: &str, new_token: &str, value: V) {
        if !self.config.enabled {
            return;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());
        inner.entries.remove(old_token);
        inner.entries.insert(new_token.to_string(), value);

        trace!(
            cache_size = inner.entries.len(),
            "Session replaced in cache"
        );
    }

    /// Check if a token is cached in the current generation.
    pub fn contains(&self, token: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());
        inner.entries.contains_key(token)
    }

    /// Number of records in the current generation.
    pub fn len(&self) -> usize {
        if !self.config.enabled {
            return 0;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());
        inner.entries.len()
    }

    /// Check if the current generation is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    ///
    /// An expired generation is rolled over first; a live one keeps its clock.
    pub fn clear(&self) {
        if !self.config.enabled {
            return;
        }

        let mut inner = self.inner.lock();
        inner.check_epoch(Instant::now());
        inner.entries.clear();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        if self.config.enabled {
            inner.check_epoch(now);
        }

        CacheStats {
            enabled: self.config.enabled,
            size: inner.entries.len(),
            generation: inner.epoch.generation(),
            window: self.config.window,
            remaining: inner.epoch.remaining_at(now),
        }
    }
}

impl<V> Clone for SessionCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

impl<V> std::fmt::Debug for SessionCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Whether caching is enabled.
    pub enabled: bool,

    /// Number of records in the current generation.
    pub size: usize,

    /// Generations started since creation.
    pub generation: u64,

    /// Configured generation window.
    pub window: Duration,

    /// Time left before the current generation expires.
    pub remaining: Duration,
}

//! A single cached value with its lifetime marks.

use std::time::Instant;

use serde_json::Value;

/// Cached payload plus the instants at which it turns stale and evictable.
/// `stale_at <= evict_at` always (enforced by `CachePolicy`).
#[derive(Debug, Clone)]
pub(super) struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
    pub stale_at: Instant,
    pub evict_at: Instant,
}

impl CacheEntry {
    /// Younger than the staleness window: serve from cache, no request.
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.stale_at
    }

    /// Past the eviction window: purge once no subscriber holds the key.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.evict_at
    }
}

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::types::TimeframeSet;

struct CachedSet {
    snapshots: TimeframeSet,
    computed_at: Instant,
}

/// Per-pair cache of computed indicator snapshots.
///
/// Pairs are matched case-insensitively. A zero TTL turns every lookup into
/// a miss and every insert into a no-op.
pub struct SnapshotCache {
    entries: DashMap<String, CachedSet>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn key(pair: &str) -> String {
        pair.trim().to_lowercase()
    }

    fn is_fresh(&self, cached: &CachedSet, now: Instant) -> bool {
        now.duration_since(cached.computed_at) < self.ttl
    }

    /// Fresh snapshots for a pair; stale ones are dropped on the way.
    pub fn get(&self, pair: &str) -> Option<TimeframeSet> {
        let key = Self::key(pair);
        let cached = self.entries.get(&key)?;
        if self.is_fresh(&cached, Instant::now()) {
            return Some(cached.snapshots.clone());
        }
        drop(cached);
        self.evict_stale(&key);
        None
    }

    /// Remove the entry under `key` only if it is still stale. A set
    /// inserted concurrently since the lookup survives.
    fn evict_stale(&self, key: &str) -> bool {
        self.entries
            .remove_if(key, |_, cached| !self.is_fresh(cached, Instant::now()))
            .is_some()
    }

    pub fn insert(&self, pair: &str, snapshots: TimeframeSet) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            Self::key(pair),
            CachedSet {
                snapshots,
                computed_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, pair: &str) -> bool {
        self.entries.remove(&Self::key(pair)).is_some()
    }

    /// Drop stale entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, cached| self.is_fresh(cached, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Purged {} stale snapshot sets", removed);
        }
        removed
    }

    /// Cached pairs, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IndicatorSnapshot, Timeframe};

    fn snapshots(momentum: f64) -> TimeframeSet {
        TimeframeSet::from([(
            Timeframe::OneMinute,
            IndicatorSnapshot {
                momentum: Some(momentum),
                ..Default::default()
            },
        )])
    }

    #[test]
    fn test_lookup_ignores_case() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.insert("EUR/USD", snapshots(1.0));

        assert_eq!(cache.get("eur/usd"), Some(snapshots(1.0)));
        assert_eq!(cache.get(" Eur/Usd "), Some(snapshots(1.0)));
        assert_eq!(cache.get("GBP/USD"), None);
    }

    #[test]
    fn test_stale_sets_are_misses() {
        let cache = SnapshotCache::new(Duration::from_millis(10));
        cache.insert("EUR/USD", snapshots(1.0));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("EUR/USD"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stale_eviction_spares_fresh_sets() {
        let cache = SnapshotCache::new(Duration::from_millis(20));
        cache.insert("EUR/USD", snapshots(1.0));
        std::thread::sleep(Duration::from_millis(30));

        // Replaced between a stale lookup and its eviction
        cache.insert("EUR/USD", snapshots(2.0));
        assert!(!cache.evict_stale("eur/usd"));
        assert_eq!(cache.get("EUR/USD"), Some(snapshots(2.0)));

        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.evict_stale("eur/usd"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = SnapshotCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());

        cache.insert("EUR/USD", snapshots(1.0));
        assert_eq!(cache.get("EUR/USD"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate_and_purge() {
        let cache = SnapshotCache::new(Duration::from_millis(10));
        cache.insert("EUR/USD", snapshots(1.0));
        cache.insert("GBP/USD", snapshots(-1.0));

        assert!(cache.invalidate("eur/usd"));
        assert!(!cache.invalidate("eur/usd"));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }
}

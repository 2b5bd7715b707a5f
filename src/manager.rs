//! # Tiered Cache Manager
//!
//! [`TieredCache`] owns an ordered list of [`BoundedCache`] tiers. Tier 0 is
//! checked first and receives every write.
//!
//! ## Lookup and Promotion
//!
//! ```text
//!   get(key)
//!     │
//!     ├─ tier 0 ── hit ──────────────────────────────► record hit, return
//!     │    │ miss
//!     ├─ tier 1 ── hit ─┐
//!     │    │ miss       ▼
//!     │   ...     promote(key, value):
//!     │                 1. remove key from every tier >= 1
//!     │                 2. tier0.put(key, value)  (may evict in tier 0)
//!     │                 3. record hit, return
//!     ▼
//!   no tier hit ────────────────────────────────────► record miss, None
//! ```
//!
//! ## Locking
//!
//! The tier list and the counters sit behind one `parking_lot::RwLock`.
//! `get`, `put`, `add_tier`, `remove_tier`, `clear` and `reset_stats` hold
//! the write lock for their whole duration, so coordinator operations are
//! totally ordered. Each tier additionally locks itself; the coordinator lock
//! is always taken first, and tiers never call back into the coordinator.
//!
//! ## Eviction Does Not Spill
//!
//! An entry evicted from tier 0 is dropped; it is **not** moved into tier 1.
//! Since `put` only writes tier 0, lower tiers only hold data that was placed
//! there before the tier was handed to the coordinator (see
//! [`TieredCache::from_tiers`]) or that was in tier 0 when a tier above it
//! was removed. Promotion only ever fires for such entries.

use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;
use tracing::debug;

use crate::bounded::{BoundedCache, EvictionPolicy};
use crate::error::{ConfigError, InvariantError};
use crate::metrics::snapshot::{HitRate, TierMetricsSnapshot, TieredMetricsSnapshot};
use crate::metrics::traits::{MetricsSnapshotProvider, TieredMetricsRecorder};
use crate::metrics::TieredMetrics;
use crate::traits::ConcurrentCache;

/// Ordered contents of one tier at a point in time.
///
/// `Display` renders it as `Level <n>: [(k, v), ...]` with levels numbered
/// from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSnapshot<K, V> {
    pub index: usize,
    pub policy: EvictionPolicy,
    pub capacity: usize,
    pub entries: Vec<(K, V)>,
}

impl<K, V> TierSnapshot<K, V> {
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for TierSnapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}: {:?}", self.index + 1, self.entries)
    }
}

struct TieredState<K, V> {
    tiers: Vec<BoundedCache<K, V>>,
    metrics: TieredMetrics,
}

/// Multi-level cache: an ordered list of bounded tiers plus hit/miss
/// accounting.
///
/// # Example
///
/// ```
/// use tierkit::bounded::EvictionPolicy;
/// use tierkit::manager::TieredCache;
///
/// let cache = TieredCache::new();
/// cache.add_tier(3, EvictionPolicy::Lru).unwrap();
/// cache.add_tier(2, EvictionPolicy::Lfu).unwrap();
///
/// cache.put("A", "1");
/// assert_eq!(cache.get(&"A"), Some("1"));
/// assert_eq!(cache.get(&"Z"), None);
/// assert_eq!(cache.hit_rate().to_string(), "50.00%");
/// ```
pub struct TieredCache<K, V> {
    inner: RwLock<TieredState<K, V>>,
}

impl<K, V> TieredCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Creates a coordinator with no tiers.
    pub fn new() -> Self {
        Self::from_tiers(Vec::new())
    }

    /// Creates a coordinator over existing tiers, tier 0 first.
    ///
    /// Entries already held by the tiers are kept as they are, which is the
    /// only way for a lower tier to hold data that promotion can move up.
    pub fn from_tiers(tiers: Vec<BoundedCache<K, V>>) -> Self {
        TieredCache {
            inner: RwLock::new(TieredState {
                tiers,
                metrics: TieredMetrics::default(),
            }),
        }
    }

    /// Appends a new, empty tier at the lowest priority.
    pub fn add_tier(&self, capacity: usize, policy: EvictionPolicy) -> Result<(), ConfigError> {
        let tier = BoundedCache::try_new(capacity, policy)?;
        let mut state = self.inner.write();
        state.tiers.push(tier);
        debug!(
            index = state.tiers.len() - 1,
            capacity,
            %policy,
            "added cache tier"
        );
        Ok(())
    }

    /// Removes the tier at `index`, dropping its entries.
    ///
    /// An out-of-range index is ignored; the caller is not told whether a
    /// tier was removed.
    pub fn remove_tier(&self, index: usize) {
        let mut state = self.inner.write();
        if index < state.tiers.len() {
            let tier = state.tiers.remove(index);
            debug!(index, dropped_entries = tier.len(), "removed cache tier");
        } else {
            debug!(
                index,
                tiers = state.tiers.len(),
                "remove_tier index out of range, ignoring"
            );
        }
    }

    /// Looks `key` up tier by tier, promoting a lower-tier hit into tier 0.
    ///
    /// Exactly one of the hit/miss counters is incremented per call.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.inner.write();
        let TieredState { tiers, metrics } = &mut *state;

        for (index, tier) in tiers.iter().enumerate() {
            if let Some(value) = tier.get(key) {
                metrics.record_hit(index);
                if index > 0 {
                    Self::promote(tiers, key, value.clone());
                    metrics.record_promotion();
                    debug!(from_tier = index, "promoted entry to tier 0");
                }
                return Some(value);
            }
        }

        metrics.record_miss();
        None
    }

    /// Writes `key` into tier 0. Does nothing when there are no tiers.
    pub fn put(&self, key: K, value: V) {
        let mut state = self.inner.write();
        let TieredState { tiers, metrics } = &mut *state;
        if let Some(top) = tiers.first() {
            top.put(key, value);
            metrics.record_put();
        }
    }

    /// Removes `key` from every tier below 0, then writes it into tier 0.
    ///
    /// Runs inside the caller's write lock. The lower-tier removal bypasses
    /// eviction, and a tier-0 victim displaced by the write is dropped.
    fn promote(tiers: &[BoundedCache<K, V>], key: &K, value: V) {
        for tier in tiers.iter().skip(1) {
            tier.remove(key);
        }
        if let Some(top) = tiers.first() {
            top.put(key.clone(), value);
        }
    }

    /// Index of the tier holding `key`, without touching usage.
    pub fn locate(&self, key: &K) -> Option<usize> {
        self.inner
            .read()
            .tiers
            .iter()
            .position(|tier| tier.contains(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    pub fn tier_count(&self) -> usize {
        self.inner.read().tiers.len()
    }

    /// Total entries across all tiers.
    pub fn len(&self) -> usize {
        self.inner.read().tiers.iter().map(BoundedCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry in every tier. Tiers and counters are kept.
    pub fn clear(&self) {
        let state = self.inner.write();
        for tier in &state.tiers {
            tier.clear();
        }
    }

    /// Ordered `(key, value)` listing of every tier, tier 0 first.
    pub fn snapshot(&self) -> Vec<TierSnapshot<K, V>> {
        let state = self.inner.read();
        state
            .tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| TierSnapshot {
                index,
                policy: tier.policy(),
                capacity: tier.capacity(),
                entries: tier.entries(),
            })
            .collect()
    }

    /// Coordinator counters.
    pub fn stats(&self) -> TieredMetricsSnapshot {
        self.inner.read().metrics.snapshot()
    }

    /// Per-tier counters, tier 0 first.
    pub fn tier_stats(&self) -> Vec<TierMetricsSnapshot> {
        self.inner
            .read()
            .tiers
            .iter()
            .map(|tier| tier.metrics_snapshot())
            .collect()
    }

    /// `hits / (hits + misses)`, or [`HitRate::NoData`] before any lookup.
    pub fn hit_rate(&self) -> HitRate {
        self.inner.read().metrics.snapshot().hit_rate()
    }

    /// Zeroes the coordinator counters. Nothing else resets them.
    pub fn reset_stats(&self) {
        self.inner.write().metrics.reset();
    }

    /// Checks every tier's bookkeeping.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let state = self.inner.read();
        for (index, tier) in state.tiers.iter().enumerate() {
            tier.check_invariants()
                .map_err(|err| InvariantError::new(format!("tier {}: {}", index, err)))?;
        }
        Ok(())
    }
}

impl<K, V> MetricsSnapshotProvider<TieredMetricsSnapshot> for TieredCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn metrics_snapshot(&self) -> TieredMetricsSnapshot {
        self.stats()
    }
}

impl<K, V> Default for TieredCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentCache for TieredCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for TieredCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.read();
        f.debug_struct("TieredCache")
            .field("tiers", &state.tiers)
            .field("metrics", &state.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tier() -> TieredCache<&'static str, &'static str> {
        let cache = TieredCache::new();
        cache.add_tier(3, EvictionPolicy::Lru).unwrap();
        cache.add_tier(2, EvictionPolicy::Lfu).unwrap();
        cache
    }

    fn prefilled_lower_tier() -> TieredCache<&'static str, &'static str> {
        let l1 = BoundedCache::new(2, EvictionPolicy::Lru);
        let l2 = BoundedCache::new(2, EvictionPolicy::Lfu);
        let l3 = BoundedCache::new(2, EvictionPolicy::Lru);
        l2.put("x", "from-l2");
        l3.put("x", "stale-l3");
        l3.put("y", "from-l3");
        TieredCache::from_tiers(vec![l1, l2, l3])
    }

    mod tier_management {
        use super::*;

        #[test]
        fn add_and_remove_tiers() {
            let cache = two_tier();
            assert_eq!(cache.tier_count(), 2);

            cache.remove_tier(0);
            assert_eq!(cache.tier_count(), 1);
            assert_eq!(cache.snapshot()[0].policy, EvictionPolicy::Lfu);
        }

        #[test]
        fn remove_out_of_range_is_silent() {
            let cache = two_tier();
            cache.remove_tier(2);
            cache.remove_tier(usize::MAX);
            assert_eq!(cache.tier_count(), 2);
        }

        #[test]
        fn add_tier_rejects_zero_capacity() {
            let cache: TieredCache<u32, u32> = TieredCache::new();
            assert_eq!(
                cache.add_tier(0, EvictionPolicy::Lru),
                Err(ConfigError::ZeroCapacity)
            );
            assert_eq!(cache.tier_count(), 0);
        }

        #[test]
        fn removing_tier_zero_promotes_next_tier_for_writes() {
            let cache = two_tier();
            cache.remove_tier(0);
            cache.put("k", "v");
            assert_eq!(cache.locate(&"k"), Some(0));
            assert_eq!(cache.snapshot()[0].policy, EvictionPolicy::Lfu);
        }
    }

    mod routing {
        use super::*;

        #[test]
        fn put_lands_in_tier_zero_only() {
            let cache = two_tier();
            cache.put("A", "1");
            let snap = cache.snapshot();
            assert_eq!(snap[0].entries, vec![("A", "1")]);
            assert!(snap[1].entries.is_empty());
        }

        #[test]
        fn put_without_tiers_is_noop() {
            let cache: TieredCache<&str, &str> = TieredCache::new();
            cache.put("A", "1");
            assert!(cache.is_empty());
            assert_eq!(cache.get(&"A"), None);
            assert_eq!(cache.stats().puts, 0);
            assert_eq!(cache.stats().misses, 1);
        }

        #[test]
        fn eviction_from_tier_zero_does_not_spill() {
            let cache = two_tier();
            for (k, v) in [("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")] {
                cache.put(k, v);
            }
            assert_eq!(cache.locate(&"A"), None);
            assert!(cache.snapshot()[1].entries.is_empty());
        }

        #[test]
        fn get_touches_tier_zero_recency() {
            let cache = two_tier();
            cache.put("A", "1");
            cache.put("B", "2");
            cache.put("C", "3");
            assert_eq!(cache.get(&"A"), Some("1"));
            cache.put("D", "4");

            assert_eq!(cache.get(&"B"), None);
            assert_eq!(cache.get(&"A"), Some("1"));
            let keys: Vec<_> = cache.snapshot()[0].keys().copied().collect();
            assert_eq!(keys, vec!["C", "D", "A"]);
        }
    }

    mod promotion {
        use super::*;

        #[test]
        fn lower_tier_hit_moves_key_to_tier_zero() {
            let cache = prefilled_lower_tier();
            assert_eq!(cache.locate(&"x"), Some(1));

            assert_eq!(cache.get(&"x"), Some("from-l2"));

            let snap = cache.snapshot();
            assert_eq!(snap[0].entries, vec![("x", "from-l2")]);
            assert!(!snap[1].keys().any(|k| *k == "x"));
            assert!(!snap[2].keys().any(|k| *k == "x"));
            assert!(snap[2].keys().any(|k| *k == "y"));
        }

        #[test]
        fn promotion_counts_once_and_uses_direct_removal() {
            let cache = prefilled_lower_tier();
            cache.get(&"y");

            let stats = cache.stats();
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.promotions, 1);
            assert_eq!(stats.hits_by_tier, vec![0, 0, 1]);

            let tiers = cache.tier_stats();
            assert_eq!(tiers[2].removals, 1);
            assert_eq!(tiers[2].evicted_entries, 0);
            assert_eq!(tiers[0].insert_new, 1);
        }

        #[test]
        fn promoted_key_is_then_served_from_tier_zero() {
            let cache = prefilled_lower_tier();
            cache.get(&"y");
            cache.get(&"y");

            let stats = cache.stats();
            assert_eq!(stats.promotions, 1);
            assert_eq!(stats.hits_by_tier, vec![1, 0, 1]);
        }

        #[test]
        fn promotion_into_full_tier_zero_evicts_its_victim() {
            let cache = prefilled_lower_tier();
            cache.put("a", "1");
            cache.put("b", "2");
            cache.get(&"x");

            assert_eq!(cache.locate(&"a"), None);
            assert_eq!(cache.locate(&"b"), Some(0));
            assert_eq!(cache.locate(&"x"), Some(0));
            cache.check_invariants().unwrap();
        }
    }

    mod statistics {
        use super::*;

        #[test]
        fn hit_rate_without_lookups_is_no_data() {
            let cache = two_tier();
            assert_eq!(cache.hit_rate(), HitRate::NoData);
            assert_eq!(cache.hit_rate().to_string(), "no data");
        }

        #[test]
        fn hits_plus_misses_equals_lookups() {
            let cache = two_tier();
            cache.put("A", "1");
            for key in ["A", "B", "A", "C", "A"] {
                cache.get(&key);
            }
            let stats = cache.stats();
            assert_eq!(stats.hits, 3);
            assert_eq!(stats.misses, 2);
            assert_eq!(stats.lookups(), 5);
            assert_eq!(cache.hit_rate().to_string(), "60.00%");
        }

        #[test]
        fn reset_stats_is_explicit() {
            let cache = two_tier();
            cache.put("A", "1");
            cache.get(&"A");
            cache.clear();
            cache.remove_tier(1);
            assert_eq!(cache.stats().hits, 1);

            cache.reset_stats();
            assert_eq!(cache.stats(), TieredMetricsSnapshot::default());
        }
    }

    #[test]
    fn snapshot_display_numbers_levels_from_one() {
        let cache = two_tier();
        cache.put("A", "1");
        let lines: Vec<String> = cache.snapshot().iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec![r#"Level 1: [("A", "1")]"#, "Level 2: []"]);
    }
}

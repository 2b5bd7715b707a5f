//! A single capacity-bounded tier.
//!
//! [`BoundedCache`] couples one policy store ([`LruCore`] or [`LfuCache`])
//! with a `parking_lot::RwLock`, so one tier can be shared and every
//! `get`/`put`/`evict` sequence on it runs as a unit.
//!
//! ```text
//!   put(key, value)
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ key new AND len == capacity?                 │
//!   │   YES → evict() one victim chosen by policy  │
//!   │   NO  → nothing                              │
//!   └──────────────────────────────────────────────┘
//!        │
//!        ▼
//!   insert / overwrite, touch key
//! ```
//!
//! An evicted entry is dropped. It is not handed to any other tier.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::{ConfigError, InvariantError};
use crate::metrics::snapshot::TierMetricsSnapshot;
use crate::metrics::traits::{MetricsSnapshotProvider, TierMetricsRecorder};
use crate::metrics::TierMetrics;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCore;
use crate::traits::{ConcurrentCache, CoreCache, LfuCacheTrait, LruCacheTrait, MutableCache};

/// Eviction policy of a tier.
///
/// Parses from `"LRU"` / `"LFU"` (any case) and displays in upper case.
///
/// ```
/// use tierkit::bounded::EvictionPolicy;
///
/// let policy: EvictionPolicy = "lfu".parse().unwrap();
/// assert_eq!(policy, EvictionPolicy::Lfu);
/// assert_eq!(policy.to_string(), "LFU");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum EvictionPolicy {
    /// Least Recently Used: evict the key untouched for longest.
    Lru,
    /// Least Frequently Used: evict the key with the fewest touches.
    Lfu,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "LRU",
            EvictionPolicy::Lfu => "LFU",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lru") {
            Ok(EvictionPolicy::Lru)
        } else if s.eq_ignore_ascii_case("lfu") {
            Ok(EvictionPolicy::Lfu)
        } else {
            Err(ConfigError::UnknownPolicy(s.to_string()))
        }
    }
}

enum Store<K, V> {
    Lru(LruCore<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Store<K, V>
where
    K: Clone + Eq + Hash,
{
    fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        match policy {
            EvictionPolicy::Lru => Store::Lru(LruCore::new(capacity)),
            EvictionPolicy::Lfu => Store::Lfu(LfuCache::new(capacity)),
        }
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self {
            Store::Lru(lru) => lru.insert(key, value),
            Store::Lfu(lfu) => lfu.insert(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self {
            Store::Lru(lru) => lru.get(key),
            Store::Lfu(lfu) => lfu.get(key),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match self {
            Store::Lru(lru) => lru.peek(key),
            Store::Lfu(lfu) => lfu.peek(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            Store::Lru(lru) => lru.contains(key),
            Store::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Store::Lru(lru) => lru.len(),
            Store::Lfu(lfu) => lfu.len(),
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match self {
            Store::Lru(lru) => lru.remove(key),
            Store::Lfu(lfu) => lfu.remove(key),
        }
    }

    /// Removes the policy's victim.
    fn evict(&mut self) -> Option<(K, V)> {
        match self {
            Store::Lru(lru) => lru.pop_lru(),
            Store::Lfu(lfu) => lfu.pop_lfu(),
        }
    }

    fn clear(&mut self) {
        match self {
            Store::Lru(lru) => lru.clear(),
            Store::Lfu(lfu) => lfu.clear(),
        }
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        match self {
            Store::Lru(lru) => lru.check_invariants(),
            Store::Lfu(lfu) => lfu.check_invariants(),
        }
    }
}

struct TierState<K, V> {
    store: Store<K, V>,
    metrics: TierMetrics,
}

/// One capacity-bounded tier with a fixed eviction policy.
///
/// All methods take `&self`; the tier serialises callers on its own lock.
/// Lookups (`get`) and writes (`put`, `remove`, `clear`) take the write lock
/// since a lookup updates usage. `peek`, `contains`, `len` and `entries` take
/// the read lock and never touch usage.
///
/// # Example
///
/// ```
/// use tierkit::bounded::{BoundedCache, EvictionPolicy};
///
/// let tier = BoundedCache::new(2, EvictionPolicy::Lru);
/// tier.put("a", 1);
/// tier.put("b", 2);
/// assert_eq!(tier.get(&"a"), Some(1));
///
/// tier.put("c", 3); // "b" is the least recently touched
/// assert_eq!(tier.entries(), vec![("a", 1), ("c", 3)]);
/// ```
pub struct BoundedCache<K, V> {
    policy: EvictionPolicy,
    capacity: usize,
    inner: RwLock<TierState<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Creates a tier. A capacity of 0 yields a tier that accepts no entries;
    /// use [`try_new`](Self::try_new) to reject it instead.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        BoundedCache {
            policy,
            capacity,
            inner: RwLock::new(TierState {
                store: Store::new(capacity, policy),
                metrics: TierMetrics::default(),
            }),
        }
    }

    /// Creates a tier, rejecting a zero capacity.
    pub fn try_new(capacity: usize, policy: EvictionPolicy) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(capacity, policy))
    }

    /// Looks up `key`, touching it on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.inner.write();
        let TierState { store, metrics } = &mut *state;
        match store.get(key) {
            Some(value) => {
                metrics.record_get_hit();
                Some(value.clone())
            },
            None => {
                metrics.record_get_miss();
                None
            },
        }
    }

    /// Inserts or overwrites `key`, evicting one victim first when the key is
    /// new and the tier is full.
    pub fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut state = self.inner.write();
        let TierState { store, metrics } = &mut *state;

        if !store.contains(&key) && store.len() >= self.capacity {
            // The victim is dropped here; lower tiers never receive it.
            if store.evict().is_some() {
                metrics.record_evicted_entry();
                trace!(
                    policy = %self.policy,
                    capacity = self.capacity,
                    "evicted entry from full tier"
                );
            }
        }

        match store.insert(key, value) {
            Some(_) => metrics.record_insert_update(),
            None => metrics.record_insert_new(),
        }
    }

    /// Removes `key` without going through eviction.
    ///
    /// This is the cross-tier removal used by promotion; it is counted as a
    /// removal, never as an eviction.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.inner.write();
        let removed = state.store.remove(key);
        if removed.is_some() {
            state.metrics.record_removal();
        }
        removed
    }

    /// Returns the value for `key` without touching it.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.read().store.peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().store.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.write().store.clear();
    }

    /// Access count of `key`; `None` for LRU tiers or absent keys.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        match &self.inner.read().store {
            Store::Lru(_) => None,
            Store::Lfu(lfu) => lfu.frequency(key),
        }
    }

    /// Ordered copy of the tier's entries.
    ///
    /// LRU tiers list least recently used first; LFU tiers list keys in the
    /// order they entered the tier.
    pub fn entries(&self) -> Vec<(K, V)> {
        let state = self.inner.read();
        match &state.store {
            Store::Lru(lru) => lru.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Store::Lfu(lfu) => lfu.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Checks the store's internal bookkeeping.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let state = self.inner.read();
        if state.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "tier holds {} entries over capacity {}",
                state.store.len(),
                self.capacity
            )));
        }
        state.store.check_invariants()
    }
}

impl<K, V> MetricsSnapshotProvider<TierMetricsSnapshot> for BoundedCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn metrics_snapshot(&self) -> TierMetricsSnapshot {
        let state = self.inner.read();
        let m = state.metrics;
        TierMetricsSnapshot {
            policy: self.policy,
            get_hits: m.get_hits,
            get_misses: m.get_misses,
            insert_new: m.insert_new,
            insert_updates: m.insert_updates,
            evicted_entries: m.evicted_entries,
            removals: m.removals,
            len: state.store.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> ConcurrentCache for BoundedCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for BoundedCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("policy", &self.policy)
            .field("capacity", &self.capacity)
            .field("len", &self.inner.read().store.len())
            .finish_non_exhaustive()
    }
}

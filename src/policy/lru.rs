//! # LRU (Least Recently Used) Store
//!
//! Single-threaded recency-ordered store used by LRU tiers.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LruCore<K, V>                             │
//!   │                                                                  │
//!   │   map: FxHashMap<K, Entry { value, tick }>                       │
//!   │                                                                  │
//!   │   recency: BTreeMap<tick, K>                                     │
//!   │                                                                  │
//!   │     tick:   3      7      9      12                              │
//!   │            [B] ─  [C] ─  [A] ─  [D]                              │
//!   │             ▲                    ▲                               │
//!   │            LRU                  MRU                              │
//!   │                                                                  │
//!   │   clock: u64  (next tick, strictly increasing)                   │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every touch (`insert` or `get`) stamps the entry with a fresh tick and
//! re-keys it in `recency`, so the first entry of `recency` is always the
//! least recently touched key. Ticks are unique, so the order is total and
//! eviction needs no tie-break.
//!
//! ## Operations
//!
//! | Method            | Complexity | Touches | Notes                        |
//! |-------------------|------------|---------|------------------------------|
//! | `insert(k, v)`    | O(log n)   | yes     | may evict the LRU entry      |
//! | `get(&k)`         | O(log n)   | yes     |                              |
//! | `peek(&k)`        | O(1)       | no      |                              |
//! | `contains(&k)`    | O(1)       | no      |                              |
//! | `remove(&k)`      | O(log n)   | -       | not counted as eviction      |
//! | `pop_lru()`       | O(log n)   | -       |                              |
//! | `recency_rank(&k)`| O(n)       | no      | scan from the MRU end        |
//!
//! Not thread-safe on its own; [`BoundedCache`](crate::bounded::BoundedCache)
//! provides the lock.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::InvariantError;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    tick: u64,
}

/// Recency-ordered store with a fixed entry capacity.
///
/// A capacity of 0 creates a store that accepts no items (all inserts are
/// no-ops).
///
/// # Example
///
/// ```
/// use tierkit::policy::lru::LruCore;
/// use tierkit::traits::{CoreCache, LruCacheTrait};
///
/// let mut cache = LruCore::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");
/// cache.insert("c", 3); // evicts "b", the least recently touched
///
/// assert!(!cache.contains(&"b"));
/// assert_eq!(cache.peek_lru(), Some((&"a", &1)));
/// ```
pub struct LruCore<K, V> {
    map: FxHashMap<K, Entry<V>>,
    recency: BTreeMap<u64, K>,
    clock: u64,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a new LRU store with the given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        LruCore {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            recency: BTreeMap::new(),
            clock: 0,
            capacity,
        }
    }

    #[inline]
    fn next_tick(&mut self) -> u64 {
        let tick = self.clock;
        self.clock += 1;
        tick
    }

    /// Returns the value for `key` without changing its recency.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.recency
            .values()
            .filter_map(move |key| self.map.get(key).map(|entry| (key, &entry.value)))
    }

    /// Verifies that the index and the recency order agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.recency.len() {
            return Err(InvariantError::new(format!(
                "lru: map holds {} entries but recency order holds {}",
                self.map.len(),
                self.recency.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lru: {} entries exceed capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (tick, key) in &self.recency {
            match self.map.get(key) {
                Some(entry) if entry.tick == *tick => {},
                Some(entry) => {
                    return Err(InvariantError::new(format!(
                        "lru: recency tick {} does not match entry tick {}",
                        tick, entry.tick
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "lru: recency tick {} points at a missing key",
                        tick
                    )));
                },
            }
        }
        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        let tick = self.next_tick();
        if let Some(entry) = self.map.get_mut(&key) {
            let old_tick = std::mem::replace(&mut entry.tick, tick);
            let previous = std::mem::replace(&mut entry.value, value);
            if let Some(k) = self.recency.remove(&old_tick) {
                self.recency.insert(tick, k);
            }
            return Some(previous);
        }

        if self.map.len() >= self.capacity {
            self.pop_lru();
        }

        self.recency.insert(tick, key.clone());
        self.map.insert(key, Entry { value, tick });
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if !self.map.contains_key(key) {
            return None;
        }
        let tick = self.next_tick();
        let entry = self.map.get_mut(key)?;
        let old_tick = std::mem::replace(&mut entry.tick, tick);
        if let Some(k) = self.recency.remove(&old_tick) {
            self.recency.insert(tick, k);
        }
        Some(&entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.recency.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        self.recency.remove(&entry.tick);
        Some(entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.value))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        let (_, key) = self.recency.first_key_value()?;
        self.map.get(key).map(|entry| (key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        self.recency.values().rev().position(|k| k == key)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

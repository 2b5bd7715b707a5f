//! # LFU (Least Frequently Used) Store
//!
//! Single-threaded frequency-ordered store used by LFU tiers.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                              │
//!   │                                                                      │
//!   │   map: FxHashMap<K, Entry { value, freq, seq }>                      │
//!   │                                                                      │
//!   │   order: BTreeMap<(freq, seq), K>                                    │
//!   │                                                                      │
//!   │     (1, 4) → page_3   ← victim: lowest freq, earliest insert         │
//!   │     (1, 6) → page_5                                                  │
//!   │     (3, 1) → page_2                                                  │
//!   │     (15, 0) → page_1  ← hot                                          │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency Lifecycle
//!
//! ```text
//!   insert(new key)        → freq = 1, seq = next insertion number
//!   get(&key) / insert(k)  → freq += 1 (seq unchanged)
//!   remove / pop_lfu       → entry and its frequency are dropped
//! ```
//!
//! `seq` is assigned once when a key enters the store and kept while it
//! stays, so ties between equal frequencies always go to the key that has
//! been resident longest. Eviction is deterministic.
//!
//! There is no aging: a key that was hot once keeps its count until it
//! leaves the store.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::InvariantError;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    freq: u64,
    seq: u64,
}

/// Frequency-ordered store with a fixed entry capacity.
///
/// # Example
///
/// ```
/// use tierkit::policy::lfu::LfuCache;
/// use tierkit::traits::{CoreCache, LfuCacheTrait};
///
/// let mut cache = LfuCache::new(2);
/// cache.insert("hot", 1);
/// cache.insert("cold", 2);
/// cache.get(&"hot");
///
/// cache.insert("new", 3); // evicts "cold" (freq 1)
/// assert!(!cache.contains(&"cold"));
/// assert_eq!(cache.frequency(&"hot"), Some(2));
/// ```
pub struct LfuCache<K, V> {
    map: FxHashMap<K, Entry<V>>,
    order: BTreeMap<(u64, u64), K>,
    next_seq: u64,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a new LFU store. A capacity of 0 accepts no items.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        LfuCache {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: BTreeMap::new(),
            next_seq: 0,
            capacity,
        }
    }

    /// Returns the value for `key` without counting an access.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|entry| &entry.value)
    }

    /// Entries in the order they entered the store.
    ///
    /// Overwriting a key does not move it.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_unstable_by_key(|(_, entry)| entry.seq);
        entries.into_iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Verifies that the index and the frequency order agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "lfu: map holds {} entries but frequency order holds {}",
                self.map.len(),
                self.order.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lfu: {} entries exceed capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (&(freq, seq), key) in &self.order {
            let Some(entry) = self.map.get(key) else {
                return Err(InvariantError::new(format!(
                    "lfu: order slot ({}, {}) points at a missing key",
                    freq, seq
                )));
            };
            if entry.freq != freq || entry.seq != seq {
                return Err(InvariantError::new(format!(
                    "lfu: order slot ({}, {}) disagrees with entry ({}, {})",
                    freq, seq, entry.freq, entry.seq
                )));
            }
            if freq == 0 {
                return Err(InvariantError::new("lfu: frequency dropped to 0"));
            }
        }
        Ok(())
    }

    /// Bumps the frequency of a present key and re-keys it in `order`.
    fn bump(&mut self, key: &K) -> Option<&mut Entry<V>> {
        let entry = self.map.get_mut(key)?;
        let slot = (entry.freq, entry.seq);
        entry.freq += 1;
        if let Some(k) = self.order.remove(&slot) {
            self.order.insert((entry.freq, entry.seq), k);
        }
        Some(entry)
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(entry) = self.bump(&key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.map.len() >= self.capacity {
            self.pop_lfu();
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert((1, seq), key.clone());
        self.map.insert(
            key,
            Entry {
                value,
                freq: 1,
                seq,
            },
        );
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.bump(key).map(|entry| &entry.value)
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
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.map.remove(key)?;
        self.order.remove(&(entry.freq, entry.seq));
        Some(entry.value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.map.remove(&key)?;
        Some((key, entry.value))
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (_, key) = self.order.first_key_value()?;
        self.map.get(key).map(|entry| (key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|entry| entry.freq)
    }

    fn increment_frequency(&mut self, key: &K) -> Option<u64> {
        self.bump(key).map(|entry| entry.freq)
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

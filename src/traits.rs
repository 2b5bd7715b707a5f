//! # Cache Trait Hierarchy
//!
//! Single-tier stores implement a small trait hierarchy so the tier wrapper
//! ([`BoundedCache`](crate::bounded::BoundedCache)) can dispatch over them
//! uniformly while each policy keeps its own specialised operations.
//!
//! ```text
//!                 ┌─────────────────────────────────────┐
//!                 │          CoreCache<K, V>            │
//!                 │  insert / get / contains / len      │
//!                 │  capacity / clear                   │
//!                 └─────────────────┬───────────────────┘
//!                                   │
//!                 ┌─────────────────▼───────────────────┐
//!                 │         MutableCache<K, V>          │
//!                 │  remove(&K) → Option<V>             │
//!                 └────────┬───────────────────┬────────┘
//!                          │                   │
//!           ┌──────────────▼──────┐   ┌────────▼──────────────┐
//!           │ LruCacheTrait<K, V> │   │ LfuCacheTrait<K, V>   │
//!           │ pop_lru / peek_lru  │   │ pop_lfu / peek_lfu    │
//!           │ touch / recency_rank│   │ frequency             │
//!           └─────────────────────┘   │ increment_frequency   │
//!                                     └───────────────────────┘
//! ```
//!
//! | Trait             | Extends        | Purpose                              |
//! |-------------------|----------------|--------------------------------------|
//! | `CoreCache`       | -              | Universal cache operations           |
//! | `MutableCache`    | `CoreCache`    | Arbitrary key removal                |
//! | `LruCacheTrait`   | `MutableCache` | Recency-ordered eviction             |
//! | `LfuCacheTrait`   | `MutableCache` | Frequency-ordered eviction           |
//! | `ConcurrentCache` | `Send + Sync`  | Marker for internally locked caches  |
//!
//! The stores themselves are single-threaded; locking lives one level up in
//! [`BoundedCache`](crate::bounded::BoundedCache).

/// Operations every single-tier store supports.
///
/// `insert` and `get` both count as a *touch* for the store's eviction
/// policy. `contains` never touches.
pub trait CoreCache<K, V> {
    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// When the key is new and the store is full, exactly one victim is
    /// evicted first. Overwriting an existing key never evicts.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key`, touching it.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is present. Does not touch.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Adds arbitrary key removal.
///
/// Removal is not eviction: it bypasses victim selection entirely and is what
/// cross-tier promotion uses to pull a key out of a lower tier.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Recency-ordered stores.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without touching it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used. Returns `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of `key` counted from the MRU end (0 = most recent).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Frequency-ordered stores.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least frequently used entry.
    ///
    /// Ties go to the entry inserted first.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Returns the entry `pop_lfu` would remove, without removing it.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Current access count of `key` (1 right after insertion).
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Adds one to the access count of `key` and returns the new count.
    fn increment_frequency(&mut self, key: &K) -> Option<u64>;
}

/// Marker for caches that synchronise internally and can be shared across
/// threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tierkit::bounded::{BoundedCache, EvictionPolicy};
/// use tierkit::traits::ConcurrentCache;
///
/// fn assert_concurrent<C: ConcurrentCache>(_: &C) {}
///
/// let tier: BoundedCache<u64, String> = BoundedCache::new(8, EvictionPolicy::Lru);
/// assert_concurrent(&tier);
///
/// let shared = Arc::new(tier);
/// let handle = {
///     let shared = Arc::clone(&shared);
///     std::thread::spawn(move || shared.put(1, "one".to_string()))
/// };
/// handle.join().unwrap();
/// assert_eq!(shared.get(&1).as_deref(), Some("one"));
/// ```
pub trait ConcurrentCache: Send + Sync {}

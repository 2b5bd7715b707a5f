//! Single-tier eviction policies.
//!
//! | Policy | Store                  | Victim                                   |
//! |--------|------------------------|------------------------------------------|
//! | LRU    | [`lru::LruCore`]       | least recently touched key               |
//! | LFU    | [`lfu::LfuCache`]      | lowest access count, earliest insert wins |
//!
//! Both stores are single-threaded; tiers wrap them in a lock via
//! [`BoundedCache`](crate::bounded::BoundedCache).

pub mod lfu;
pub mod lru;

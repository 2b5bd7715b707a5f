//! tierkit: multi-level in-memory cache with per-tier LRU/LFU eviction.
//!
//! A [`TieredCache`](manager::TieredCache) owns an ordered list of
//! [`BoundedCache`](bounded::BoundedCache) tiers. Lookups scan tiers from 0
//! down; a hit below tier 0 is promoted into tier 0. Writes always go to
//! tier 0.
//!
//! ```
//! use tierkit::prelude::*;
//!
//! let cache = TieredCacheBuilder::new()
//!     .tier(3, EvictionPolicy::Lru)
//!     .tier(2, EvictionPolicy::Lfu)
//!     .build();
//!
//! cache.put("A", "1");
//! assert_eq!(cache.get(&"A"), Some("1"));
//! assert_eq!(cache.hit_rate().to_string(), "100.00%");
//! ```

pub mod bounded;
pub mod builder;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;

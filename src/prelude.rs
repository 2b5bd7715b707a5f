pub use crate::bounded::{BoundedCache, EvictionPolicy};
pub use crate::builder::{TierConfig, TieredCacheBuilder};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::manager::{TierSnapshot, TieredCache};
pub use crate::metrics::{HitRate, TierMetricsSnapshot, TieredMetricsSnapshot};
pub use crate::traits::{CoreCache, LfuCacheTrait, LruCacheTrait, MutableCache};

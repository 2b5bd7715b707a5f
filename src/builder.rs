//! Declarative construction of a [`TieredCache`].
//!
//! Tier layouts can be written inline with [`TieredCacheBuilder`] or loaded
//! as a list of [`TierConfig`] (deserializable with the `serde` feature).
//!
//! ## Example
//!
//! ```rust
//! use tierkit::bounded::EvictionPolicy;
//! use tierkit::builder::TieredCacheBuilder;
//!
//! let cache = TieredCacheBuilder::new()
//!     .tier(3, EvictionPolicy::Lru)
//!     .tier(2, EvictionPolicy::Lfu)
//!     .try_build::<String, String>()
//!     .unwrap();
//! assert_eq!(cache.tier_count(), 2);
//! ```

use std::hash::Hash;

use crate::bounded::{BoundedCache, EvictionPolicy};
use crate::error::ConfigError;
use crate::manager::TieredCache;

/// Capacity and policy of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierConfig {
    /// Maximum number of entries. Must be > 0.
    pub capacity: usize,
    pub policy: EvictionPolicy,
}

impl TierConfig {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self { capacity, policy }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Builder for [`TieredCache`]. Tiers are listed highest priority first.
#[derive(Debug, Clone, Default)]
pub struct TieredCacheBuilder {
    tiers: Vec<TierConfig>,
}

impl TieredCacheBuilder {
    /// Create a builder with no tiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a list of tier configurations.
    pub fn from_configs(configs: impl IntoIterator<Item = TierConfig>) -> Self {
        Self {
            tiers: configs.into_iter().collect(),
        }
    }

    /// Append a tier below the ones already listed.
    pub fn tier(mut self, capacity: usize, policy: EvictionPolicy) -> Self {
        self.tiers.push(TierConfig::new(capacity, policy));
        self
    }

    pub fn configs(&self) -> &[TierConfig] {
        &self.tiers
    }

    /// Build the cache, rejecting any zero-capacity tier.
    pub fn try_build<K, V>(self) -> Result<TieredCache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
        V: Clone,
    {
        let tiers = self
            .tiers
            .iter()
            .map(|cfg| BoundedCache::try_new(cfg.capacity, cfg.policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TieredCache::from_tiers(tiers))
    }

    /// Build the cache. A zero-capacity tier is kept and accepts no entries.
    pub fn build<K, V>(self) -> TieredCache<K, V>
    where
        K: Clone + Eq + Hash,
        V: Clone,
    {
        let tiers = self
            .tiers
            .iter()
            .map(|cfg| BoundedCache::new(cfg.capacity, cfg.policy))
            .collect();
        TieredCache::from_tiers(tiers)
    }
}

//! Error types for tierkit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when tier configuration is invalid (zero
//!   capacity, unknown policy name).
//! - [`InvariantError`]: Returned by debug-only `check_invariants` methods
//!   when internal bookkeeping has drifted.
//!
//! Cache misses are never errors; they are reported as `None`.
//!
//! ## Example Usage
//!
//! ```
//! use tierkit::bounded::EvictionPolicy;
//! use tierkit::error::ConfigError;
//! use tierkit::manager::TieredCache;
//!
//! let cache: TieredCache<&str, i32> = TieredCache::new();
//! let err: ConfigError = cache.add_tier(0, EvictionPolicy::Lru).unwrap_err();
//! assert!(err.to_string().contains("capacity"));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the policy stores, on
/// [`BoundedCache`](crate::bounded::BoundedCache) and on
/// [`TieredCache`](crate::manager::TieredCache).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when tier configuration parameters are invalid.
///
/// Produced by [`BoundedCache::try_new`](crate::bounded::BoundedCache::try_new),
/// [`TieredCache::add_tier`](crate::manager::TieredCache::add_tier), the
/// builder's `try_build()` and `EvictionPolicy::from_str`.
///
/// # Example
///
/// ```
/// use tierkit::bounded::EvictionPolicy;
///
/// let err = "MRU".parse::<EvictionPolicy>().unwrap_err();
/// assert!(err.to_string().contains("MRU"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A tier was configured with capacity 0.
    #[error("tier capacity must be > 0")]
    ZeroCapacity,

    /// A policy name did not match any supported eviction policy.
    #[error("unknown eviction policy `{0}` (expected LRU or LFU)")]
    UnknownPolicy(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

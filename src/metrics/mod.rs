//! Hit/miss accounting for tiers and the coordinator.
//!
//! Recording, snapshotting and export are kept apart, as in the cache trait
//! hierarchy:
//!
//! ```text
//!   TierMetricsRecorder ──► TierMetrics ──► TierMetricsSnapshot ─┐
//!                                                                 ├─► MetricsExporter<S>
//!   TieredMetricsRecorder ► TieredMetrics ► TieredMetricsSnapshot ┘   (feature "metrics")
//! ```
//!
//! Counters are plain `u64` fields; every write happens under the owning
//! cache's write lock.

#[cfg(feature = "metrics")]
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::{TierMetrics, TieredMetrics};
pub use snapshot::{HitRate, TierMetricsSnapshot, TieredMetricsSnapshot};

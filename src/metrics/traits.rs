//! # Metrics Traits
//!
//! Recorders only write counters, providers only read them, exporters only
//! publish them.

/// Counters kept by each tier.
pub trait TierMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_removal(&mut self);
}

/// Counters kept by the tier coordinator.
///
/// Exactly one of `record_hit` / `record_miss` is called per lookup.
pub trait TieredMetricsRecorder {
    fn record_hit(&mut self, tier: usize);
    fn record_miss(&mut self);
    fn record_promotion(&mut self);
    fn record_put(&mut self);
    fn reset(&mut self);
}

/// Snapshot provider for tests, diagnostics and export.
pub trait MetricsSnapshotProvider<S> {
    fn metrics_snapshot(&self) -> S;
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

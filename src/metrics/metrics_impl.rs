use crate::metrics::snapshot::TieredMetricsSnapshot;
use crate::metrics::traits::{TierMetricsRecorder, TieredMetricsRecorder};

/// Per-tier counters, owned by a [`BoundedCache`](crate::bounded::BoundedCache).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TierMetrics {
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
    pub removals: u64,
}

impl TierMetricsRecorder for TierMetrics {
    #[inline]
    fn record_get_hit(&mut self) {
        self.get_hits += 1;
    }

    #[inline]
    fn record_get_miss(&mut self) {
        self.get_misses += 1;
    }

    #[inline]
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    #[inline]
    fn record_removal(&mut self) {
        self.removals += 1;
    }
}

/// Coordinator counters.
///
/// `hits_by_tier[i]` counts lookups answered by tier `i` at the time of the
/// lookup. Removing a tier does not renumber past counts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TieredMetrics {
    pub hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub puts: u64,
    pub hits_by_tier: Vec<u64>,
}

impl TieredMetrics {
    pub fn snapshot(&self) -> TieredMetricsSnapshot {
        TieredMetricsSnapshot {
            hits: self.hits,
            misses: self.misses,
            promotions: self.promotions,
            puts: self.puts,
            hits_by_tier: self.hits_by_tier.clone(),
        }
    }
}

impl TieredMetricsRecorder for TieredMetrics {
    fn record_hit(&mut self, tier: usize) {
        self.hits += 1;
        if self.hits_by_tier.len() <= tier {
            self.hits_by_tier.resize(tier + 1, 0);
        }
        self.hits_by_tier[tier] += 1;
    }

    #[inline]
    fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    #[inline]
    fn record_put(&mut self) {
        self.puts += 1;
    }

    fn reset(&mut self) {
        *self = TieredMetrics::default();
    }
}

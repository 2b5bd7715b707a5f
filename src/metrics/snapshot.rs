use std::fmt;

use crate::bounded::EvictionPolicy;

/// Hit rate of a series of lookups.
///
/// Renders as a percentage with two decimals (`50.00%`), or `no data` when
/// no lookup has been recorded yet.
///
/// ```
/// use tierkit::metrics::HitRate;
///
/// assert_eq!(HitRate::from_counts(1, 1).to_string(), "50.00%");
/// assert_eq!(HitRate::from_counts(0, 0).to_string(), "no data");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitRate {
    NoData,
    /// Hits divided by lookups, in `0.0..=1.0`.
    Ratio(f64),
}

impl HitRate {
    pub fn from_counts(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        if total == 0 {
            HitRate::NoData
        } else {
            HitRate::Ratio(hits as f64 / total as f64)
        }
    }

    /// Hit rate in percent, `None` without data.
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            HitRate::NoData => None,
            HitRate::Ratio(r) => Some(r * 100.0),
        }
    }
}

impl fmt::Display for HitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percent() {
            Some(pct) => write!(f, "{:.2}%", pct),
            None => f.write_str("no data"),
        }
    }
}

/// Point-in-time view of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierMetricsSnapshot {
    pub policy: EvictionPolicy,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
    pub removals: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub capacity: usize,
}

impl TierMetricsSnapshot {
    pub fn hit_rate(&self) -> HitRate {
        HitRate::from_counts(self.get_hits, self.get_misses)
    }
}

/// Point-in-time view of the coordinator counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TieredMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub puts: u64,
    pub hits_by_tier: Vec<u64>,
}

impl TieredMetricsSnapshot {
    /// Number of lookups (`hits + misses`).
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> HitRate {
        HitRate::from_counts(self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_no_data_on_zero_lookups() {
        let rate = HitRate::from_counts(0, 0);
        assert_eq!(rate, HitRate::NoData);
        assert_eq!(rate.as_percent(), None);
        assert_eq!(rate.to_string(), "no data");
    }

    #[test]
    fn hit_rate_formats_two_decimals() {
        assert_eq!(HitRate::from_counts(1, 1).to_string(), "50.00%");
        assert_eq!(HitRate::from_counts(1, 2).to_string(), "33.33%");
        assert_eq!(HitRate::from_counts(2, 1).to_string(), "66.67%");
        assert_eq!(HitRate::from_counts(5, 0).to_string(), "100.00%");
        assert_eq!(HitRate::from_counts(0, 4).to_string(), "0.00%");
    }

    #[test]
    fn tiered_snapshot_counts_lookups() {
        let snap = TieredMetricsSnapshot {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(snap.lookups(), 4);
        assert_eq!(snap.hit_rate().as_percent(), Some(75.0));
    }
}

use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::{TierMetricsSnapshot, TieredMetricsSnapshot};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to an OpenTelemetry collector.
///
/// ```
/// use tierkit::metrics::TieredMetricsSnapshot;
/// use tierkit::metrics::exporter::PrometheusTextExporter;
/// use tierkit::metrics::traits::MetricsExporter;
///
/// let exporter = PrometheusTextExporter::new("tierkit", Vec::new());
/// exporter.export(&TieredMetricsSnapshot { hits: 2, ..Default::default() });
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("tierkit_hits_total 2"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, name: &str, labels: &str, value: impl std::fmt::Display) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{}{} {}", name, labels, value);
    }

    fn write_counter(&self, name: &str, value: u64) {
        self.write_metric("counter", name, "", value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<TieredMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TieredMetricsSnapshot) {
        self.write_counter(&self.metric_name("hits_total"), snapshot.hits);
        self.write_counter(&self.metric_name("misses_total"), snapshot.misses);
        self.write_counter(&self.metric_name("promotions_total"), snapshot.promotions);
        self.write_counter(&self.metric_name("puts_total"), snapshot.puts);
        for (tier, hits) in snapshot.hits_by_tier.iter().enumerate() {
            self.write_metric(
                "counter",
                &self.metric_name("tier_hits_total"),
                &format!("{{tier=\"{}\"}}", tier),
                hits,
            );
        }
        if let Some(pct) = snapshot.hit_rate().as_percent() {
            self.write_metric("gauge", &self.metric_name("hit_ratio"), "", pct / 100.0);
        }
    }
}

impl<W: Write + Send> MetricsExporter<TierMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &TierMetricsSnapshot) {
        let labels = format!("{{policy=\"{}\"}}", snapshot.policy);
        let counters = [
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("insert_new_total", snapshot.insert_new),
            ("insert_updates_total", snapshot.insert_updates),
            ("evicted_entries_total", snapshot.evicted_entries),
            ("removals_total", snapshot.removals),
        ];
        for (suffix, value) in counters {
            self.write_metric("counter", &self.metric_name(suffix), &labels, value);
        }
        self.write_metric("gauge", &self.metric_name("len"), &labels, snapshot.len);
        self.write_metric(
            "gauge",
            &self.metric_name("capacity"),
            &labels,
            snapshot.capacity,
        );
    }
}

use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::SoftLruMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for soft LRU metrics snapshots.
///
/// Writes the Prometheus text exposition format, so the output can be
/// scraped directly or forwarded to an OpenTelemetry collector.
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
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_metric(&self, writer: &mut W, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<SoftLruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, s: &SoftLruMetricsSnapshot) {
        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let w = &mut *guard;

        let counters = [
            ("get_calls_total", s.get_calls),
            ("get_hits_total", s.get_hits),
            ("get_misses_total", s.get_misses),
            ("insert_calls_total", s.insert_calls),
            ("insert_updates_total", s.insert_updates),
            ("insert_new_total", s.insert_new),
            ("insert_skipped_total", s.insert_skipped),
            ("evict_calls_total", s.evict_calls),
            ("forced_evict_calls_total", s.forced_evict_calls),
            ("evicted_entries_total", s.evicted_entries),
            ("promotions_total", s.promotions),
            ("promotions_deferred_total", s.promotions_deferred),
            ("pinned_inserts_total", s.pinned_inserts),
        ];
        for (suffix, value) in counters {
            self.write_metric(w, "counter", suffix, value);
        }

        let gauges = [
            ("cache_len", s.cache_len as u64),
            ("pinned_len", s.pinned_len as u64),
            ("free_slots", s.free_slots as u64),
            ("capacity", s.capacity as u64),
            ("arena_size", s.arena_size as u64),
            ("logical_clock", s.clock),
        ];
        for (suffix, value) in gauges {
            self.write_metric(w, "gauge", suffix, value);
        }
    }
}

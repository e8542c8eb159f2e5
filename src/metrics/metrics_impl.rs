use crate::metrics::traits::{CoreMetricsRecorder, SoftLruMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct SoftLruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub insert_skipped: u64,
    pub evict_calls: u64,
    pub forced_evict_calls: u64,
    pub evicted_entries: u64,
    pub promotions: u64,
    pub promotions_deferred: u64,
    pub pinned_inserts: u64,
}

impl SoftLruMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl CoreMetricsRecorder for SoftLruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
}

impl SoftLruMetricsRecorder for SoftLruMetrics {
    fn record_insert_skipped(&mut self) {
        self.insert_skipped += 1;
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_promotion_deferred(&mut self) {
        self.promotions_deferred += 1;
    }

    fn record_forced_evict_call(&mut self) {
        self.forced_evict_calls += 1;
    }

    fn record_pinned_insert(&mut self) {
        self.pinned_inserts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_and_misses_both_count_as_get_calls() {
        let mut m = SoftLruMetrics::new();
        m.record_get_hit();
        m.record_get_hit();
        m.record_get_miss();
        assert_eq!(m.get_calls, 3);
        assert_eq!(m.get_hits, 2);
        assert_eq!(m.get_misses, 1);
    }

    #[test]
    fn reset_zeroes_every_counter() {
        let mut m = SoftLruMetrics::new();
        m.record_promotion();
        m.record_evicted_entry();
        m.record_pinned_insert();
        m.reset();
        assert_eq!(m.promotions, 0);
        assert_eq!(m.evicted_entries, 0);
        assert_eq!(m.pinned_inserts, 0);
    }
}

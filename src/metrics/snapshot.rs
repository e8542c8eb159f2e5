use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SoftLruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub insert_skipped: u64, // insert_on_missing found the key

    pub evict_calls: u64,
    pub forced_evict_calls: u64,
    pub evicted_entries: u64,

    pub promotions: u64,
    pub promotions_deferred: u64,
    pub pinned_inserts: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub pinned_len: usize,
    pub free_slots: usize,
    pub capacity: usize,
    pub arena_size: usize,
    pub clock: u64,
}

impl SoftLruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    /// Fraction of evictable touches that actually moved the entry.
    pub fn promotion_rate(&self) -> f64 {
        let touches = self.promotions + self.promotions_deferred;
        if touches == 0 {
            0.0
        } else {
            self.promotions as f64 / touches as f64
        }
    }
}

impl fmt::Display for SoftLruMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SoftLruMetrics {{ hits: {}, misses: {}, hit_rate: {:.2}%, inserts: {}, updates: {}, \
             evicted: {} in {} passes ({} forced), promotions: {}, deferred: {}, \
             len: {}/{}, pinned: {} }}",
            self.get_hits,
            self.get_misses,
            self.hit_rate() * 100.0,
            self.insert_new,
            self.insert_updates,
            self.evicted_entries,
            self.evict_calls,
            self.forced_evict_calls,
            self.promotions,
            self.promotions_deferred,
            self.cache_len,
            self.capacity,
            self.pinned_len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_zero_without_traffic() {
        let snap = SoftLruMetricsSnapshot::default();
        assert_eq!(snap.hit_rate(), 0.0);
        assert_eq!(snap.promotion_rate(), 0.0);
    }

    #[test]
    fn rates_and_display() {
        let snap = SoftLruMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            promotions: 1,
            promotions_deferred: 3,
            ..Default::default()
        };
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert!((snap.promotion_rate() - 0.25).abs() < f64::EPSILON);
        assert!(snap.to_string().contains("hit_rate: 75.00%"));
    }
}

// ==============================================
// SOFT LRU METRICS TESTS (integration)
// ==============================================
#![cfg(feature = "metrics")]

use softlru::SoftLruCache;
use softlru::metrics::{MetricsExporter, MetricsSnapshotProvider, PrometheusTextExporter};

#[test]
fn snapshot_reflects_workload() {
    let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(4);
    cache.insert(100, 0, false);
    for k in 0..10 {
        cache.insert(k, k, true);
    }
    for k in 0..10 {
        cache.get(&k);
    }

    let snap = cache.snapshot();
    assert_eq!(snap.insert_calls, 11);
    assert_eq!(snap.insert_new, 11);
    assert_eq!(snap.pinned_inserts, 1);
    assert_eq!(snap.get_calls, 10);
    assert_eq!(snap.get_hits + snap.get_misses, 10);
    assert_eq!(snap.get_hits as usize, cache.evictable_len());
    assert!(snap.evicted_entries > 0);
    assert_eq!(snap.pinned_len, 1);
    assert_eq!(snap.capacity, 4);
    assert_eq!(snap.arena_size, 8);
    assert_eq!(snap.clock, cache.clock());
    assert!(snap.hit_rate() > 0.0 && snap.hit_rate() < 1.0);
}

#[test]
fn forced_eviction_is_counted() {
    let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(2); // arena 4
    for k in 0..3 {
        cache.insert(k, k, false);
    }
    cache.insert(10, 0, true);
    cache.insert(11, 0, true);

    let snap = cache.metrics_snapshot();
    assert_eq!(snap.forced_evict_calls, 1);
    assert_eq!(snap.evicted_entries, 1);
}

#[test]
fn prometheus_export_of_live_cache() {
    let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(16);
    cache.insert(1, 1, true);
    cache.get(&1);

    let exporter = PrometheusTextExporter::new("softlru", Vec::new());
    exporter.export(&cache.snapshot());
    let text = String::from_utf8(exporter.into_inner()).unwrap();

    assert!(text.contains("softlru_get_hits_total 1\n"));
    assert!(text.contains("softlru_cache_len 1\n"));
    assert!(text.contains("softlru_logical_clock 2\n"));
}

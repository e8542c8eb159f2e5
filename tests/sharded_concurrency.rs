// ==============================================
// SOFT LRU CONCURRENCY TESTS (integration)
// ==============================================
#![cfg(feature = "concurrency")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use softlru::builder::SoftLruBuilder;
use softlru::policy::sharded::{ConcurrentSoftLruCache, ShardedSoftLruCache};
use softlru::traits::ConcurrentCache;

fn assert_concurrent<C: ConcurrentCache>() {}

#[test]
fn wrappers_are_concurrent_caches() {
    assert_concurrent::<ConcurrentSoftLruCache<u64, String>>();
    assert_concurrent::<ShardedSoftLruCache<u64, String>>();
}

// ==============================================
// Single-lock wrapper
// ==============================================

mod single_lock {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn readers_and_writers_keep_engine_consistent() {
        let cache: ConcurrentSoftLruCache<u64, u64> = ConcurrentSoftLruCache::new(64);
        cache.insert(u64::MAX, 7, false);
        let hits = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = cache.clone();
                let hits = Arc::clone(&hits);
                thread::spawn(move || {
                    for i in 0..1_000u64 {
                        let key = t * 10_000 + i % 8;
                        if i % 3 == 0 {
                            cache.insert(key, i, true);
                        } else if cache.get(&key).is_some() {
                            hits.fetch_add(1, Ordering::Relaxed);
                        } else {
                            cache.insert_on_missing(key, i);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(hits.load(Ordering::Relaxed) > 0);
        assert_eq!(cache.get(&u64::MAX), Some(7));
        assert_eq!(cache.pinned_len(), 1);
        cache.with_cache(|inner| inner.debug_validate_invariants());
    }

    #[test]
    fn builder_output_can_be_wrapped() {
        let cache = ConcurrentSoftLruCache::from_cache(
            SoftLruBuilder::new(32)
                .soft_promotion_ratio(0.25)
                .build::<String, u32>(),
        );
        cache.insert("a".to_string(), 1, true);
        assert_eq!(cache.get_with(&"a".to_string(), |v| v + 1), Some(2));
        assert_eq!(cache.capacity(), 32);
    }
}

// ==============================================
// Sharded cache
// ==============================================

mod sharded {
    use super::*;

    #[cfg_attr(miri, ignore)]
    #[test]
    fn disjoint_writers_see_their_own_keys() {
        let cache = Arc::new(ShardedSoftLruCache::<u64, u64>::new(4_096, 16));

        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200u64 {
                        let key = (t << 40) | i;
                        cache.insert(key, i, true);
                        assert_eq!(cache.get(&key), Some(i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // 1,600 keys in a 4,096-entry cache: shards may be uneven, but each
        // shard has 256 slots and a shard only reclaims above that.
        assert!(cache.len() <= cache.capacity() + cache.shard_count());
    }

    #[test]
    fn shard_lengths_sum_to_total() {
        let cache = ShardedSoftLruCache::<u64, u64>::new(64, 4);
        for k in 0..20 {
            cache.insert(k, k, k % 5 == 0);
        }
        for k in 0..20u64 {
            assert!(cache.contains(&k));
        }
        assert_eq!(cache.len(), 20);
        assert_eq!(cache.pinned_len(), 16);
    }
}

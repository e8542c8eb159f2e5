#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use softlru::SoftLruCache;

// Fuzz arbitrary operation sequences on SoftLruCache
//
// The first byte picks the capacity. Each following pair of bytes is one
// operation: insert, pinned insert, insert_on_missing, get, peek. A shadow
// map of pinned keys checks that they are never evicted, and the full
// invariant check runs after every operation.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 64) + 1;
    let mut cache: SoftLruCache<u8, u32> = SoftLruCache::new(capacity);
    let mut pinned: HashMap<u8, u32> = HashMap::new();

    for (step, pair) in ops.chunks_exact(2).enumerate() {
        let op = pair[0] % 5;
        let key = pair[1];
        let value = step as u32;

        match op {
            0 => {
                let old = cache.insert(key, value, true);
                if let Some(pinned_value) = pinned.get_mut(&key) {
                    assert_eq!(old, Some(*pinned_value));
                    *pinned_value = value;
                }
                assert_eq!(cache.peek(&key), Some(&value));
            }
            1 => {
                // Never let pinned entries alone fill the arena.
                if !pinned.contains_key(&key) && pinned.len() >= capacity {
                    continue;
                }
                // A live evictable key can be reclaimed by the eviction pass
                // and recreated pinned, so read evictability afterwards.
                cache.insert(key, value, false);
                if cache.is_evictable(&key) == Some(false) {
                    pinned.insert(key, value);
                }
            }
            2 => {
                let clock = cache.clock();
                let before = cache.peek(&key).copied();
                let created = cache.insert_on_missing(key, value);
                if created {
                    assert_eq!(cache.clock(), clock + 1);
                } else {
                    assert_eq!(cache.peek(&key).copied(), before);
                }
            }
            3 => {
                let clock = cache.clock();
                match cache.get(&key) {
                    Some(_) => {
                        let stamp = cache.entry_stamp(&key).unwrap();
                        assert_eq!(stamp.access_time, clock + 1);
                        assert!(stamp.promotion_time <= stamp.access_time);
                    }
                    None => assert_eq!(cache.clock(), clock),
                }
            }
            _ => {
                let clock = cache.clock();
                let _ = cache.peek(&key);
                assert_eq!(cache.clock(), clock);
            }
        }

        for (k, v) in &pinned {
            assert_eq!(cache.peek(k), Some(v), "pinned key {k} lost");
        }
        assert_eq!(cache.pinned_len(), pinned.len());
        assert!(cache.evictable_len() <= capacity + 1);
        if let Err(e) = cache.check_invariants() {
            panic!("{e}");
        }
    }
});

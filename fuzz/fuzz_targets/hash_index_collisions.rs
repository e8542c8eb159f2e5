#![no_main]

use std::hash::{BuildHasherDefault, Hasher};

use libfuzzer_sys::fuzz_target;
use softlru::SoftLruCache;
use softlru::builder::SoftLruBuilder;

// Hasher that keeps only the low 3 bits of integer keys, so every chain in
// the index is long and removals hit the middle of chains.
#[derive(Default)]
struct CollidingHasher(u64);

impl Hasher for CollidingHasher {
    fn finish(&self) -> u64 {
        self.0 & 0b111
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_add(u64::from(b));
        }
    }

    fn write_u16(&mut self, n: u16) {
        self.0 = u64::from(n);
    }
}

// Fuzz the hash index under heavy collisions
//
// Drives inserts and gets through an engine whose hasher maps every key
// into eight buckets, then checks that every live key is still found.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let capacity = usize::from(data[0] % 32) + 1;
    let mut cache: SoftLruCache<u16, u16, BuildHasherDefault<CollidingHasher>> =
        SoftLruBuilder::new(capacity)
            .hasher(BuildHasherDefault::<CollidingHasher>::default())
            .build();

    for pair in data[1..].chunks_exact(2) {
        let key = u16::from_le_bytes([pair[0], pair[1]]);
        if key % 3 == 0 {
            let _ = cache.get(&key);
        } else {
            cache.insert(key, key, true);
            assert_eq!(cache.peek(&key), Some(&key));
        }
        if let Err(e) = cache.check_invariants() {
            panic!("{e}");
        }
    }
    assert!(cache.len() <= capacity + 1);
});

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use softlru::SoftLruCache;
use softlru::builder::SoftLruBuilder;
use softlru::ds::AlignedKeyBuildHasher;
use std::hint::black_box;

/// Insert then get over 64-byte aligned keys at capacity 128, the classic
/// driver loop for this cache.
fn bench_aligned_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("soft_lru_aligned_insert_get");
    group.throughput(Throughput::Elements(4096));

    group.bench_function("fx_hasher", |b| {
        let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(128);
        let mut i = 0u64;
        b.iter(|| {
            for _ in 0..4096 {
                let key = i << 6;
                cache.insert(black_box(key), i, true);
                black_box(cache.get(&key));
                i += 1;
            }
        })
    });

    group.bench_function("aligned_hasher", |b| {
        let mut cache: SoftLruCache<u64, u64, _> =
            SoftLruCache::with_hasher(128, AlignedKeyBuildHasher::default());
        let mut i = 0u64;
        b.iter(|| {
            for _ in 0..4096 {
                let key = i << 6;
                cache.insert(black_box(key), i, true);
                black_box(cache.get(&key));
                i += 1;
            }
        })
    });

    group.finish();
}

/// Repeated hits on a resident hot set; soft promotion keeps most of these
/// from touching the list.
fn bench_touch_hotset(c: &mut Criterion) {
    let mut group = c.benchmark_group("soft_lru_touch_hotset");
    for ratio in [0.0, 0.5] {
        group.bench_function(format!("ratio_{ratio}"), |b| {
            b.iter_batched(
                || {
                    let mut cache = SoftLruBuilder::new(1024)
                        .soft_promotion_ratio(ratio)
                        .build::<u64, u64>();
                    for i in 0..1024u64 {
                        cache.insert(i, i, true);
                    }
                    cache
                },
                |mut cache| {
                    for i in 0..4096u64 {
                        black_box(cache.get(&black_box(i % 64)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_eviction_churn(c: &mut Criterion) {
    c.bench_function("soft_lru_eviction_churn", |b| {
        b.iter_batched(
            || {
                let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(1024);
                for i in 0..64u64 {
                    cache.insert(1 << 40 | i, i, false);
                }
                for i in 0..1024u64 {
                    cache.insert(i, i, true);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(black_box(10_000 + i), i, true);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

/// 90% of requests go to 10% of a key space four times the capacity.
fn bench_skewed_read_through(c: &mut Criterion) {
    c.bench_function("soft_lru_skewed_read_through", |b| {
        let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(1024);
        let mut rng = StdRng::seed_from_u64(42);
        let universe = 4096u64;
        let hot = universe / 10;
        b.iter(|| {
            for _ in 0..1024 {
                let key = if rng.gen_bool(0.9) {
                    rng.gen_range(0..hot)
                } else {
                    rng.gen_range(hot..universe)
                };
                if cache.get(&key).is_none() {
                    cache.insert_on_missing(key, key);
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_aligned_insert_get,
    bench_touch_hotset,
    bench_eviction_churn,
    bench_skewed_read_through
);
criterion_main!(benches);

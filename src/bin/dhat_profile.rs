//! DHAT heap profiler for softlru.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>
//!
//! Every workload runs after construction and must not allocate: the
//! process exits non-zero if the block count grows during a workload.

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use softlru::SoftLruCache;
use softlru::ds::AlignedKeyBuildHasher;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

type Cache = SoftLruCache<u64, u64, AlignedKeyBuildHasher>;

/// Insert-then-get over a monotone stream of 64-byte aligned keys.
fn aligned_stream(cache: &mut Cache, operations: u64) -> u64 {
    let mut hits = 0;
    for i in 0..operations {
        let key = i << 6;
        cache.insert(key, i, true);
        if cache.get(&key).is_some() {
            hits += 1;
        }
    }
    hits
}

/// 90% of accesses hit 10% of the key space.
fn hotset(cache: &mut Cache, operations: u64, universe: u64, seed: u64) -> u64 {
    let mut rng = XorShift64::new(seed);
    let hot = (universe / 10).max(1);
    let mut hits = 0;
    for _ in 0..operations {
        let r = rng.next_u64();
        let slot = if r % 10 < 9 {
            r % hot
        } else {
            hot + r % (universe - hot)
        };
        let key = slot << 6;
        if cache.get(&key).is_some() {
            hits += 1;
        } else {
            cache.insert_on_missing(key, r);
        }
    }
    hits
}

fn allocated_blocks() -> u64 {
    dhat::HeapStats::get().total_blocks
}

fn profile(name: &str, run: impl FnOnce(&mut Cache) -> u64) -> bool {
    let mut cache = Cache::with_hasher(4096, AlignedKeyBuildHasher::default());
    for k in 0..64u64 {
        cache.insert(k << 20, k, false);
    }

    let before = allocated_blocks();
    let hits = run(&mut cache);
    let after = allocated_blocks();

    println!(
        "  {name}: hits={hits} len={} pinned={} blocks allocated={}",
        cache.len(),
        cache.pinned_len(),
        after - before
    );
    after == before
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("softlru DHAT Heap Profiling");
    println!("===========================\n");

    let ok = [
        profile("aligned stream", |c| aligned_stream(c, 1 << 20)),
        profile("hotset", |c| hotset(c, 1 << 20, 16_384, 42)),
    ];

    println!("\n===========================");
    if ok.iter().all(|&clean| clean) {
        println!("No allocations on the hot path.");
    } else {
        eprintln!("Hot path allocated after construction.");
        std::process::exit(1);
    }
}

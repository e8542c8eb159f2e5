//! Example walking through soft promotion, batch eviction and pinned entries.
//!
//! Run with: cargo run --example basic_soft_lru

use softlru::SoftLruCache;
use softlru::builder::SoftLruBuilder;

fn main() {
    println!("=== SoftLruCache Examples ===\n");

    // Example 1: batch eviction
    println!("1. Batch eviction (capacity 4, arena 8)");
    let mut cache: SoftLruCache<&str, u32> = SoftLruCache::new(4);
    for (i, key) in ["A", "B", "C", "D", "E"].into_iter().enumerate() {
        cache.insert(key, i as u32, true);
    }
    println!("   after A..E: len = {} (nothing reclaimed yet)", cache.len());

    // More than `capacity` evictable entries: the next insert reclaims a
    // batch from the back.
    cache.insert("F", 5, true);
    println!("   after F:    len = {}", cache.len());
    println!("   contains A? {} (reclaimed)", cache.contains(&"A"));
    println!("   contains B? {} (reclaimed)", cache.contains(&"B"));
    println!("   contains F? {} (just inserted)", cache.contains(&"F"));
    println!();

    // Example 2: pinned entries
    println!("2. Pinned entries");
    let mut cache: SoftLruCache<u64, String> = SoftLruCache::new(8);
    cache.insert(0, "root page".to_string(), false);
    for k in 1..100 {
        cache.insert(k, format!("page {k}"), true);
    }
    println!("   pinned entries: {}", cache.pinned_len());
    println!("   key 0 still cached: {:?}", cache.get(&0));
    println!("   key 1 still cached: {:?}", cache.get(&1));
    println!();

    // Example 3: soft promotion
    println!("3. Soft promotion (capacity 16, window 8 ticks)");
    let mut cache: SoftLruCache<&str, u32> = SoftLruCache::new(16);
    cache.insert("hot", 1, true);
    for _ in 0..3 {
        cache.get(&"hot");
        let stamp = cache.entry_stamp(&"hot");
        println!("   {:?}", stamp);
    }
    for _ in 0..8 {
        cache.get(&"hot");
    }
    println!("   after 8 more hits: {:?}", cache.entry_stamp(&"hot"));
    println!();

    // Example 4: tuning through the builder
    println!("4. Builder");
    let cache = SoftLruBuilder::new(1000)
        .soft_promotion_ratio(0.1)
        .max_batch_evict(8)
        .build::<u64, u64>();
    println!(
        "   soft_promotion = {}, batch_evict_size = {}, arena = {}",
        cache.soft_promotion(),
        cache.batch_evict_size(),
        cache.arena_size()
    );
    println!("   {:?}", cache);
}

//! # Cache traits
//!
//! ```text
//!   ┌────────────────────────────────────┐
//!   │          CoreCache<K, V>           │
//!   │  insert(K, V) → Option<V>          │
//!   │  get(&K) → Option<&V>              │
//!   │  contains / len / capacity         │
//!   └─────────────────┬──────────────────┘
//!                     │
//!                     ▼
//!   ┌────────────────────────────────────┐
//!   │        PinningCache<K, V>          │
//!   │  insert_with(K, V, evictable)      │
//!   │  insert_on_missing(K, V) → bool    │
//!   │  pinned_len / is_evictable         │
//!   └────────────────────────────────────┘
//!
//!   ConcurrentCache: Send + Sync marker for the lock-wrapped variants.
//! ```
//!
//! `CoreCache::insert` always creates evictable entries. Pinned entries are
//! only reachable through [`PinningCache`], so code written against
//! `CoreCache` cannot accidentally grow the non-evictable set.
//!
//! ## Thread Safety
//!
//! [`SoftLruCache`](crate::SoftLruCache) is single-threaded; `get` needs
//! `&mut self` because every hit advances the logical clock. Share it
//! across threads through the `concurrency` feature's wrappers or an
//! external lock.

/// Operations every cache in this crate supports.
pub trait CoreCache<K, V> {
    /// Inserts an evictable entry, returning the previous value if the key
    /// was already present.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, recording the access for eviction ordering.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks for `key` without recording an access.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured entry capacity.
    fn capacity(&self) -> usize;
}

/// Caches that can hold entries exempt from eviction.
pub trait PinningCache<K, V>: CoreCache<K, V> {
    /// Inserts or updates `key`. `evictable` only applies when the key is
    /// new; an existing entry keeps the evictability it was created with.
    fn insert_with(&mut self, key: K, value: V, evictable: bool) -> Option<V>;

    /// Inserts an evictable entry only if `key` is absent. Returns `true`
    /// if a new entry was created.
    fn insert_on_missing(&mut self, key: K, value: V) -> bool;

    /// Number of live non-evictable entries.
    fn pinned_len(&self) -> usize;

    /// `Some(true)` for evictable entries, `Some(false)` for pinned ones.
    fn is_evictable(&self, key: &K) -> Option<bool>;
}

/// Marker for cache types safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}

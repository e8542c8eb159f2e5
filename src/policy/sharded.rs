//! Thread-safe wrappers around [`SoftLruCache`].
//!
//! ```text
//!   ConcurrentSoftLruCache            ShardedSoftLruCache
//!   ┌──────────────────────┐          ┌─────────────────────────────────┐
//!   │ Arc<Mutex<engine>>   │          │ ShardSelector                   │
//!   └──────────────────────┘          │ [Mutex<engine>; N]              │
//!                                     │   capacity / N per shard (≥ 1)  │
//!                                     └─────────────────────────────────┘
//! ```
//!
//! Every hit advances the engine's clock, so even `get` takes the lock
//! exclusively; the engine uses a `parking_lot::Mutex` rather than a
//! read-write lock. Sharding trades exact global recency for less
//! contention: each shard runs its own clock, soft promotion and eviction.
//!
//! ```
//! use softlru::policy::sharded::ShardedSoftLruCache;
//!
//! let cache: ShardedSoftLruCache<u64, String> = ShardedSoftLruCache::new(1024, 8);
//! cache.insert(1, "a".to_string(), true);
//! assert_eq!(cache.get(&1), Some("a".to_string()));
//! assert_eq!(cache.capacity(), 1024);
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builder::SoftLruConfig;
use crate::ds::hash_index::DefaultIndexHasher;
use crate::ds::shard::ShardSelector;
use crate::error::ConfigError;
use crate::policy::soft_lru::SoftLruCache;
use crate::traits::ConcurrentCache;

/// A [`SoftLruCache`] behind a shared `parking_lot::Mutex`.
///
/// Cloning yields another handle to the same cache.
pub struct ConcurrentSoftLruCache<K, V, S = DefaultIndexHasher> {
    inner: Arc<Mutex<SoftLruCache<K, V, S>>>,
}

impl<K, V, S> Clone for ConcurrentSoftLruCache<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentSoftLruCache<K, V>
where
    K: Hash + Eq,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(SoftLruCache::new(capacity))
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        SoftLruCache::try_new(capacity).map(Self::from_cache)
    }
}

impl<K, V, S> ConcurrentSoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Wraps an existing cache, e.g. one made by
    /// [`SoftLruBuilder`](crate::builder::SoftLruBuilder).
    pub fn from_cache(cache: SoftLruCache<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    /// Looks up `key` and applies `f` to the value while the lock is held.
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.lock().get_ref(key).map(f)
    }

    /// Like [`get`](Self::get), but returns `None` instead of blocking when
    /// the lock is held by another thread.
    pub fn try_get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.try_lock()?.get(key)
    }

    pub fn insert(&self, key: K, value: V, evictable: bool) -> Option<V> {
        self.inner.lock().insert(key, value, evictable)
    }

    pub fn insert_on_missing(&self, key: K, value: V) -> bool {
        self.inner.lock().insert_on_missing(key, value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn pinned_len(&self) -> usize {
        self.inner.lock().pinned_len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Runs `f` with exclusive access to the underlying engine.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut SoftLruCache<K, V, S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V, S> fmt::Debug for ConcurrentSoftLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f
                .debug_struct("ConcurrentSoftLruCache")
                .field("inner", &*cache)
                .finish(),
            None => f
                .debug_struct("ConcurrentSoftLruCache")
                .finish_non_exhaustive(),
        }
    }
}

impl<K, V, S> ConcurrentCache for ConcurrentSoftLruCache<K, V, S>
where
    K: Send,
    V: Send,
    S: Send,
{
}

/// Independent [`SoftLruCache`] shards, each behind its own mutex.
///
/// Total capacity is split evenly (remainder to the first shards), with at
/// least one entry per shard.
pub struct ShardedSoftLruCache<K, V> {
    shards: Box<[Mutex<SoftLruCache<K, V>>]>,
    selector: ShardSelector,
    capacity: usize,
}

impl<K, V> ShardedSoftLruCache<K, V>
where
    K: Hash + Eq,
{
    /// # Panics
    ///
    /// Panics if `capacity` or `shards` is zero.
    pub fn new(capacity: usize, shards: usize) -> Self {
        match Self::try_new(capacity, shards) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(capacity: usize, shards: usize) -> Result<Self, ConfigError> {
        Self::with_config(SoftLruConfig::with_capacity(capacity), shards, 0)
    }

    /// Builds `shards` engines from `config`, splitting its capacity. `seed`
    /// feeds the [`ShardSelector`].
    pub fn with_config(config: SoftLruConfig, shards: usize, seed: u64) -> Result<Self, ConfigError> {
        if shards == 0 {
            return Err(ConfigError::new("shard count must be greater than zero"));
        }
        config.validate()?;

        let base = config.capacity / shards;
        let extra = config.capacity % shards;
        let engines = (0..shards)
            .map(|i| {
                let per_shard = (base + usize::from(i < extra)).max(1);
                let shard_config = SoftLruConfig {
                    capacity: per_shard,
                    ..config
                };
                SoftLruCache::from_config(shard_config, DefaultIndexHasher::default()).map(Mutex::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let capacity = engines.iter().map(|shard| shard.lock().capacity()).sum();
        log::debug!(
            "sharded soft lru: {} shards, total capacity {}",
            shards,
            capacity
        );

        Ok(Self {
            shards: engines.into_boxed_slice(),
            selector: ShardSelector::new(shards, seed),
            capacity,
        })
    }

    #[inline]
    fn shard(&self, key: &K) -> &Mutex<SoftLruCache<K, V>> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).lock().get(key)
    }

    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.shard(key).lock().get_ref(key).map(f)
    }

    pub fn try_get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).try_lock()?.get(key)
    }

    pub fn insert(&self, key: K, value: V, evictable: bool) -> Option<V> {
        self.shard(&key).lock().insert(key, value, evictable)
    }

    pub fn insert_on_missing(&self, key: K, value: V) -> bool {
        self.shard(&key).lock().insert_on_missing(key, value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).lock().contains(key)
    }

    /// Sum of shard lengths. Shards are locked one at a time, so the result
    /// is not a snapshot under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    pub fn pinned_len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().pinned_len()).sum()
    }

    /// Sum of per-shard capacities.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Runs `f` on the shard that owns `key`.
    pub fn with_shard<R>(&self, key: &K, f: impl FnOnce(&mut SoftLruCache<K, V>) -> R) -> R {
        f(&mut self.shard(key).lock())
    }
}

impl<K, V> fmt::Debug for ShardedSoftLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedSoftLruCache")
            .field("shards", &self.shards.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K: Send, V: Send> ConcurrentCache for ShardedSoftLruCache<K, V> {}

//! Fixed-capacity LRU cache with soft promotion, batch eviction and pinned
//! entries.
//!
//! All storage is allocated at construction: a [`NodePool`] of
//! `2 × capacity` nodes, a [`HashIndex`] bucket array, and the free-slot
//! stack. `get`, `insert` and `insert_on_missing` then run in O(1) amortized
//! time without touching the allocator.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                      SoftLruCache<K, V, S> Layout                        │
//! │                                                                          │
//! │   index: HashIndex<S>               pool: NodePool<Node<K, V>>           │
//! │   ┌────────┬──────────┐             ┌─────┬──────────────────────────┐   │
//! │   │ bucket │  head    │             │ Idx │ key, value, times,       │   │
//! │   ├────────┼──────────┤             │     │ evictable, chain, links  │   │
//! │   │   5    │  id(0) ──┼────────────►│  0  │ k0, v0, t=9/4, true      │   │
//! │   │   9    │  id(2) ──┼────────────►│  2  │ k2, v2, t=7/7, false     │   │
//! │   │  12    │  id(1) ──┼────────────►│  1  │ k1, v1, t=8/8, true      │   │
//! │   └────────┴──────────┘             └─────┴──────────────────────────┘   │
//! │                                                                          │
//! │   lru:    front ──► [id 1] ◄──► [id 0] ◄── back   (evictable)            │
//! │   pinned: front ──► [id 2]                        (never evicted)        │
//! │   free:   [7, 6, 5, 4, 3]   ◄── top                                      │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft promotion
//!
//! Every hit advances the logical clock and stamps the node's
//! `access_time`. The node is moved to the front of the eviction list only
//! if it is evictable and more than `soft_promotion` ticks have passed since
//! it was last moved. Hot keys therefore pay for list surgery at most once
//! per `soft_promotion` ticks, and eviction order is only approximately LRU.
//!
//! ## Batch eviction
//!
//! Each insert first checks `free_slots + pinned_len < capacity`, which is
//! the same as "more than `capacity` evictable entries are live". When it
//! holds, up to `batch_evict_size` entries are reclaimed from the back of the
//! eviction list. The check runs before the key is looked up, so an insert
//! that only updates an existing key can still trigger a pass.
//!
//! Pinned entries are never reclaimed; they consume the arena's headroom. An
//! insert that finds the arena completely full reclaims a batch regardless
//! of the trigger, and panics if only pinned entries remain.
//!
//! ## Example
//!
//! ```
//! use softlru::SoftLruCache;
//!
//! let mut cache: SoftLruCache<u64, &str> = SoftLruCache::new(4);
//! cache.insert(1, "config", false); // pinned
//! for k in 2..10 {
//!     cache.insert(k, "data", true);
//! }
//!
//! assert_eq!(cache.get(&1), Some("config"));
//! assert_eq!(cache.get(&2), None); // reclaimed from the back
//! assert_eq!(cache.pinned_len(), 1);
//! ```

use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::builder::SoftLruConfig;
use crate::ds::hash_index::{ChainLink, Chained, DefaultIndexHasher, HashIndex, Probe, Reservation};
use crate::ds::node_pool::{NodePool, SlotId};
use crate::ds::slot_list::{ListLinks, Listed, SlotList};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::SoftLruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::SoftLruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, SoftLruMetricsRecorder,
};
use crate::traits::{CoreCache, PinningCache};

/// Logical timestamp; advanced once per hit and once per insert.
pub type Tick = u64;

struct Node<K, V> {
    // Link fields first: every list and chain operation reads them.
    links: ListLinks,
    chain: ChainLink,
    access_time: Tick,
    promotion_time: Tick,
    evictable: bool,
    key: K,
    value: V,
}

impl<K: Hash + Eq, V> Chained for Node<K, V> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    fn chain(&self) -> &ChainLink {
        &self.chain
    }

    #[inline]
    fn chain_mut(&mut self) -> &mut ChainLink {
        &mut self.chain
    }
}

impl<K, V> Listed for Node<K, V> {
    #[inline]
    fn links(&self) -> &ListLinks {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut ListLinks {
        &mut self.links
    }
}

/// Recency bookkeeping for one entry, as reported by
/// [`SoftLruCache::entry_stamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStamp {
    /// Tick of the most recent hit or insert.
    pub access_time: Tick,
    /// Tick at which the entry was last moved to the front.
    pub promotion_time: Tick,
    /// `false` for pinned entries; fixed when the entry is created.
    pub evictable: bool,
}

/// Fixed-capacity LRU cache with soft promotion and pinned entries.
///
/// See the [module documentation](self) for the eviction model.
pub struct SoftLruCache<K, V, S = DefaultIndexHasher> {
    pool: NodePool<Node<K, V>>,
    index: HashIndex<S>,
    lru: SlotList,
    pinned: SlotList,
    config: SoftLruConfig,
    max_size: usize,
    soft_promotion: Tick,
    batch_evict_size: usize,
    clock: Tick,
    nr_pinned: usize,
    #[cfg(feature = "metrics")]
    metrics: SoftLruMetrics,
}

impl<K, V> SoftLruCache<K, V>
where
    K: Hash + Eq,
{
    /// Creates a cache holding about `capacity` evictable entries, with the
    /// default tuning (soft promotion every `capacity / 2` ticks, batches of
    /// up to 3).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultIndexHasher::default())
    }

    /// Creates a cache, returning an error on invalid capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::from_config(
            SoftLruConfig::with_capacity(capacity),
            DefaultIndexHasher::default(),
        )
    }
}

impl<K, V, S> SoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a cache with default tuning and a custom key hasher.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        match Self::from_config(SoftLruConfig::with_capacity(capacity), hasher) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a cache from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid; see
    /// [`SoftLruConfig`].
    pub fn from_config(config: SoftLruConfig, hasher: S) -> Result<Self, ConfigError> {
        let derived = config.derive()?;
        log::debug!(
            "soft lru: capacity={} arena={} buckets={} soft_promotion={} batch_evict={}",
            config.capacity,
            derived.arena_size,
            derived.index_buckets,
            derived.soft_promotion,
            derived.batch_evict_size
        );

        Ok(Self {
            pool: NodePool::new(derived.arena_size),
            index: HashIndex::with_hasher(derived.index_buckets, hasher),
            lru: SlotList::new(),
            pinned: SlotList::new(),
            config,
            max_size: config.capacity,
            soft_promotion: derived.soft_promotion as Tick,
            batch_evict_size: derived.batch_evict_size,
            clock: 0,
            nr_pinned: 0,
            #[cfg(feature = "metrics")]
            metrics: SoftLruMetrics::default(),
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Returns a copy of the value for `key`, recording the access.
    ///
    /// A miss changes nothing and does not advance the clock.
    ///
    /// ```
    /// use softlru::SoftLruCache;
    ///
    /// let mut cache = SoftLruCache::new(8);
    /// cache.insert("a", 1, true);
    /// assert_eq!(cache.get(&"a"), Some(1));
    /// assert_eq!(cache.get(&"b"), None);
    /// ```
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.get_ref(key).cloned()
    }

    /// Like [`get`](Self::get), but borrows the value instead of cloning it.
    #[inline]
    pub fn get_ref(&mut self, key: &K) -> Option<&V> {
        let Some(id) = self.index.find(&self.pool, key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.touch(id);
        Some(&self.pool.node(id).value)
    }

    /// Returns the value for `key` without recording an access.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index
            .find(&self.pool, key)
            .map(|id| &self.pool.node(id).value)
    }

    /// Returns `true` if `key` is live. Does not record an access.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.find(&self.pool, key).is_some()
    }

    /// Returns the recency stamps for `key` without recording an access.
    pub fn entry_stamp(&self, key: &K) -> Option<EntryStamp> {
        self.index.find(&self.pool, key).map(|id| {
            let node = self.pool.node(id);
            EntryStamp {
                access_time: node.access_time,
                promotion_time: node.promotion_time,
                evictable: node.evictable,
            }
        })
    }

    /// `Some(false)` if `key` is pinned, `Some(true)` if it can be evicted.
    pub fn is_evictable(&self, key: &K) -> Option<bool> {
        self.index
            .find(&self.pool, key)
            .map(|id| self.pool.node(id).evictable)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts or updates `key`.
    ///
    /// A batch-eviction check runs first, whether or not the key exists.
    /// If the key is live its value is replaced and the access recorded;
    /// `evictable` is ignored because evictability is fixed when an entry is
    /// created. Otherwise a new entry is created, pinned when `evictable` is
    /// `false`.
    ///
    /// Returns the previous value when the key was already live.
    ///
    /// # Panics
    ///
    /// Panics if a new entry is needed and every arena slot holds a pinned
    /// entry.
    ///
    /// ```
    /// use softlru::SoftLruCache;
    ///
    /// let mut cache = SoftLruCache::new(8);
    /// assert_eq!(cache.insert(1, "a", true), None);
    /// assert_eq!(cache.insert(1, "b", false), Some("a"));
    /// assert_eq!(cache.is_evictable(&1), Some(true));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V, evictable: bool) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        self.make_room_for_insert();
        match self.index.probe(&self.pool, &key) {
            Probe::Occupied(id) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();

                let old = std::mem::replace(&mut self.pool.node_mut(id).value, value);
                self.touch(id);
                Some(old)
            },
            Probe::Vacant(reservation) => {
                self.insert_new(key, value, evictable, reservation);
                None
            },
        }
    }

    /// Inserts an evictable entry only if `key` is absent.
    ///
    /// When the key is live nothing about it changes: no value overwrite, no
    /// access recorded, no clock advance. The batch-eviction check still
    /// runs first, exactly as for [`insert`](Self::insert).
    ///
    /// Returns `true` if a new entry was created.
    #[inline]
    pub fn insert_on_missing(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        self.make_room_for_insert();
        match self.index.probe(&self.pool, &key) {
            Probe::Occupied(_) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_skipped();
                false
            },
            Probe::Vacant(reservation) => {
                self.insert_new(key, value, true, reservation);
                true
            },
        }
    }

    // =========================================================================
    // Gauges
    // =========================================================================

    /// Number of live entries, pinned included.
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Configured capacity (`max_size`).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Total node slots; twice the capacity.
    #[inline]
    pub fn arena_size(&self) -> usize {
        self.pool.capacity()
    }

    #[inline]
    pub fn free_slots(&self) -> usize {
        self.pool.free_len()
    }

    /// Number of live non-evictable entries.
    #[inline]
    pub fn pinned_len(&self) -> usize {
        self.nr_pinned
    }

    /// Number of live entries on the eviction list.
    #[inline]
    pub fn evictable_len(&self) -> usize {
        self.lru.len()
    }

    /// Minimum tick gap between two promotions of the same entry.
    pub fn soft_promotion(&self) -> Tick {
        self.soft_promotion
    }

    /// Maximum number of entries reclaimed per eviction pass.
    pub fn batch_evict_size(&self) -> usize {
        self.batch_evict_size
    }

    /// Current logical time.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn config(&self) -> &SoftLruConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    #[inline]
    fn next_timestamp(&mut self) -> Tick {
        self.clock += 1;
        self.clock
    }

    /// Records an access to `id`, promoting it if it is due.
    #[inline]
    fn touch(&mut self, id: SlotId) {
        let now = self.next_timestamp();
        let soft_promotion = self.soft_promotion;

        let node = self.pool.node_mut(id);
        node.access_time = now;
        if !node.evictable {
            return;
        }
        if now - node.promotion_time > soft_promotion {
            node.promotion_time = now;
            self.lru.move_to_front(&mut self.pool, id);

            #[cfg(feature = "metrics")]
            self.metrics.record_promotion();
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_promotion_deferred();
        }
    }

    #[inline]
    fn make_room_for_insert(&mut self) {
        if self.pool.free_len() + self.nr_pinned < self.max_size {
            self.evict_batch();
        }
    }

    /// Reclaims up to `batch_evict_size` entries from the back of the
    /// eviction list.
    fn evict_batch(&mut self) {
        let batch = self.batch_evict_size.min(self.lru.len());
        log::trace!(
            "soft lru: evicting {} of {} evictable entries",
            batch,
            self.lru.len()
        );

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        for _ in 0..batch {
            let Some(id) = self.lru.pop_back(&mut self.pool) else {
                break;
            };
            let indexed = self.index.remove(&mut self.pool, id);
            debug_assert!(indexed, "evicted node {:?} was not in the hash index", id);
            self.pool.release(id);

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }

    /// Runs when the arena is completely full at the point of allocation,
    /// which only happens once pinned entries have eaten the headroom.
    #[cold]
    #[inline(never)]
    fn reclaim_full_arena(&mut self) {
        if self.lru.is_empty() {
            log::warn!(
                "soft lru: arena exhausted by {} pinned entries",
                self.nr_pinned
            );
            panic!(
                "soft lru arena exhausted: all {} slots hold pinned entries",
                self.pool.capacity()
            );
        }

        log::warn!(
            "soft lru: arena full with {} pinned entries; forcing eviction",
            self.nr_pinned
        );
        #[cfg(feature = "metrics")]
        self.metrics.record_forced_evict_call();
        self.evict_batch();
    }

    fn insert_new(&mut self, key: K, value: V, evictable: bool, reservation: Reservation) {
        if self.pool.is_full() {
            self.reclaim_full_arena();
        }

        let now = self.next_timestamp();
        let id = self.pool.acquire(Node {
            links: ListLinks::default(),
            chain: ChainLink::default(),
            access_time: now,
            promotion_time: now,
            evictable,
            key,
            value,
        });
        self.index.commit(&mut self.pool, reservation, id);

        if evictable {
            self.lru.push_front(&mut self.pool, id);
        } else {
            self.pinned.push_front(&mut self.pool, id);
            self.nr_pinned += 1;

            #[cfg(feature = "metrics")]
            self.metrics.record_pinned_insert();
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Walks every structure and checks that they agree.
    ///
    /// Verifies list linkage and lengths, that each list holds only nodes of
    /// its kind, that every live node is reachable through the index under
    /// its own key (which also rules out duplicate keys), the pinned count,
    /// the ordering of timestamps, and the evictable-entry bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let live = self.pool.len();
        if live + self.pool.free_len() != self.pool.capacity() {
            return Err(InvariantError::new(format!(
                "live {} + free {} != arena size {}",
                live,
                self.pool.free_len(),
                self.pool.capacity()
            )));
        }
        if self.index.len() != live {
            return Err(InvariantError::new(format!(
                "index holds {} entries but {} nodes are live",
                self.index.len(),
                live
            )));
        }
        if self.lru.len() + self.pinned.len() != live {
            return Err(InvariantError::new(format!(
                "lru {} + pinned {} != live {}",
                self.lru.len(),
                self.pinned.len(),
                live
            )));
        }
        if self.pinned.len() != self.nr_pinned {
            return Err(InvariantError::new(format!(
                "pinned list has {} nodes but pinned count is {}",
                self.pinned.len(),
                self.nr_pinned
            )));
        }
        if self.lru.len() > self.max_size + 1 {
            return Err(InvariantError::new(format!(
                "{} evictable entries exceed capacity {} + 1",
                self.lru.len(),
                self.max_size
            )));
        }

        self.check_list("lru", &self.lru, true)?;
        self.check_list("pinned", &self.pinned, false)?;

        let indexed = self.index.iter_ids(&self.pool).count();
        if indexed != live {
            return Err(InvariantError::new(format!(
                "index chains reach {} nodes, expected {}",
                indexed, live
            )));
        }
        Ok(())
    }

    fn check_list(
        &self,
        name: &str,
        list: &SlotList,
        evictable: bool,
    ) -> Result<(), InvariantError> {
        let mut count = 0usize;
        let mut prev = None;
        let mut current = list.front();
        while let Some(id) = current {
            let node = self
                .pool
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("{name} list: stale SlotId {:?}", id)))?;
            if node.links.prev != prev {
                return Err(InvariantError::new(format!(
                    "{name} list: prev link of {:?} is inconsistent",
                    id
                )));
            }
            if node.evictable != evictable {
                return Err(InvariantError::new(format!(
                    "{name} list: node {:?} has evictable={}",
                    id, node.evictable
                )));
            }
            if node.promotion_time > node.access_time || node.access_time > self.clock {
                return Err(InvariantError::new(format!(
                    "{name} list: node {:?} has promotion {} / access {} / clock {}",
                    id, node.promotion_time, node.access_time, self.clock
                )));
            }
            if !self.index.is_indexed(&self.pool, id) {
                return Err(InvariantError::new(format!(
                    "{name} list: node {:?} is not reachable through the index",
                    id
                )));
            }
            count += 1;
            if count > list.len() {
                return Err(InvariantError::new(format!("{name} list: cycle detected")));
            }
            prev = Some(id);
            current = node.links.next;
        }
        if count != list.len() || list.back() != prev {
            return Err(InvariantError::new(format!(
                "{name} list: walked {} nodes ending at {:?}, expected {} ending at {:?}",
                count,
                prev,
                list.len(),
                list.back()
            )));
        }
        Ok(())
    }

    /// Panicking form of [`check_invariants`](Self::check_invariants).
    pub fn debug_validate_invariants(&self) {
        if let Err(e) = self.check_invariants() {
            panic!("{}", e);
        }
    }

    /// Keys on the eviction list from front (most recently promoted) to back.
    ///
    /// Walks the whole list and allocates; meant for tests and diagnostics.
    pub fn debug_eviction_order(&self) -> Vec<&K> {
        self.lru
            .iter_ids(&self.pool)
            .map(|id| &self.pool.node(id).key)
            .collect()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> SoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub fn metrics_snapshot(&self) -> SoftLruMetricsSnapshot {
        let m = &self.metrics;
        SoftLruMetricsSnapshot {
            get_calls: m.get_calls,
            get_hits: m.get_hits,
            get_misses: m.get_misses,
            insert_calls: m.insert_calls,
            insert_updates: m.insert_updates,
            insert_new: m.insert_new,
            insert_skipped: m.insert_skipped,
            evict_calls: m.evict_calls,
            forced_evict_calls: m.forced_evict_calls,
            evicted_entries: m.evicted_entries,
            promotions: m.promotions,
            promotions_deferred: m.promotions_deferred,
            pinned_inserts: m.pinned_inserts,
            cache_len: self.len(),
            pinned_len: self.nr_pinned,
            free_slots: self.free_slots(),
            capacity: self.max_size,
            arena_size: self.arena_size(),
            clock: self.clock,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

#[cfg(feature = "metrics")]
impl<K, V, S> MetricsSnapshotProvider<SoftLruMetricsSnapshot> for SoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn snapshot(&self) -> SoftLruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, S> CoreCache<K, V> for SoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        SoftLruCache::insert(self, key, value, true)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        self.get_ref(key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        SoftLruCache::contains(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        SoftLruCache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.max_size
    }
}

impl<K, V, S> PinningCache<K, V> for SoftLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn insert_with(&mut self, key: K, value: V, evictable: bool) -> Option<V> {
        SoftLruCache::insert(self, key, value, evictable)
    }

    #[inline]
    fn insert_on_missing(&mut self, key: K, value: V) -> bool {
        SoftLruCache::insert_on_missing(self, key, value)
    }

    fn pinned_len(&self) -> usize {
        self.nr_pinned
    }

    fn is_evictable(&self, key: &K) -> Option<bool> {
        SoftLruCache::is_evictable(self, key)
    }
}

impl<K, V, S> fmt::Debug for SoftLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftLruCache")
            .field("capacity", &self.max_size)
            .field("len", &self.pool.len())
            .field("evictable", &self.lru.len())
            .field("pinned", &self.nr_pinned)
            .field("free_slots", &self.pool.free_len())
            .field("clock", &self.clock)
            .field("soft_promotion", &self.soft_promotion)
            .field("batch_evict_size", &self.batch_evict_size)
            .finish()
    }
}

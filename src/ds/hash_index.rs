//! Fixed-size chained hash index over nodes stored in a [`NodePool`].
//!
//! The index owns only its bucket array. Chains are threaded through a
//! [`ChainLink`] embedded in each pooled node, so indexing a node costs no
//! allocation and removal needs no rehash: the node remembers its bucket.
//!
//! ## Architecture
//!
//! ```text
//!   buckets (power of two)             pool (NodePool<T: Chained>)
//!   ┌────┬──────────┐                  ┌────────┬───────────────────────────┐
//!   │ 0  │ None     │                  │ id_3   │ key 0x0c0, chain{b:3,→id_1}│
//!   │ 1  │ None     │                  │ id_1   │ key 0x1c0, chain{b:3,→∅}   │
//!   │ 2  │ Some(id_5)──────────────────►│ id_5   │ key 0x080, chain{b:2,→∅}   │
//!   │ 3  │ Some(id_3)──► id_3 ──► id_1 │        │                           │
//!   └────┴──────────┘                  └────────┴───────────────────────────┘
//! ```
//!
//! ## Two-phase insert
//!
//! [`probe`](HashIndex::probe) either finds the existing node or returns a
//! [`Reservation`] naming the bucket the key hashes to; a later
//! [`commit`](HashIndex::commit) links the new node there without hashing
//! the key again. The bucket array never grows, so a reservation stays
//! valid across unrelated removals.
//!
//! ## Hashing
//!
//! The default hasher is rustc's Fx hash. [`AlignedKeyBuildHasher`] is a
//! cheaper alternative for integer keys that are 64-byte aligned addresses:
//! it drops the six always-zero low bits and uses the rest directly.

use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use rustc_hash::FxHasher;

use crate::ds::node_pool::{NodePool, SlotId};

/// Default hasher for [`HashIndex`].
pub type DefaultIndexHasher = BuildHasherDefault<FxHasher>;

/// `BuildHasher` for 64-byte aligned, pointer-like integer keys.
pub type AlignedKeyBuildHasher = BuildHasherDefault<AlignedKeyHasher>;

const ALIGN_SHIFT: u32 = 6;
const MIX_SEED: u64 = 0xf135_7aea_2e62_a9c5;

/// Hasher that maps a 64-byte aligned integer `k` to `k >> 6`.
///
/// Integer writes are folded in unmixed, so consecutive aligned addresses
/// land in consecutive buckets. Byte-slice writes (strings, composite keys)
/// fall back to an Fx-style multiply-rotate mix.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlignedKeyHasher {
    hash: u64,
}

impl AlignedKeyHasher {
    #[inline]
    fn mix(&mut self, word: u64) {
        self.hash = (self.hash.rotate_left(5) ^ word).wrapping_mul(MIX_SEED);
    }
}

impl Hasher for AlignedKeyHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.mix(u64::from(byte));
        }
    }

    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.write_u64(u64::from(n));
    }

    #[inline]
    fn write_u64(&mut self, n: u64) {
        self.hash = self.hash.rotate_left(26) ^ (n >> ALIGN_SHIFT);
    }

    #[inline]
    fn write_usize(&mut self, n: usize) {
        self.write_u64(n as u64);
    }
}

/// Per-node hash chain linkage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub bucket: usize,
    pub next: Option<SlotId>,
}

/// A pooled node that can be stored in a [`HashIndex`].
pub trait Chained {
    type Key: Hash + Eq;

    fn key(&self) -> &Self::Key;
    fn chain(&self) -> &ChainLink;
    fn chain_mut(&mut self) -> &mut ChainLink;
}

/// Outcome of [`HashIndex::probe`].
#[derive(Debug)]
pub enum Probe {
    /// The key is already indexed at this slot.
    Occupied(SlotId),
    /// The key is absent; commit a node with this key via the reservation.
    Vacant(Reservation),
}

/// Bucket reserved by a missed [`HashIndex::probe`].
///
/// Consumed by [`HashIndex::commit`].
#[derive(Debug, PartialEq, Eq)]
pub struct Reservation {
    bucket: usize,
}

#[derive(Debug)]
pub struct HashIndex<S = DefaultIndexHasher> {
    buckets: Box<[Option<SlotId>]>,
    mask: usize,
    len: usize,
    hash_builder: S,
}

impl<S: BuildHasher> HashIndex<S> {
    /// Creates an index with `bucket_hint` rounded up to a power of two
    /// buckets (at least one).
    pub fn with_hasher(bucket_hint: usize, hash_builder: S) -> Self {
        let bucket_count = bucket_hint.max(1).next_power_of_two();
        Self {
            buckets: vec![None; bucket_count].into_boxed_slice(),
            mask: bucket_count - 1,
            len: 0,
            hash_builder,
        }
    }

    /// Number of indexed nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    #[inline]
    fn bucket_for<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hash_builder.hash_one(key) as usize) & self.mask
    }

    #[inline]
    fn scan<T: Chained>(&self, pool: &NodePool<T>, bucket: usize, key: &T::Key) -> Option<SlotId> {
        let mut current = self.buckets[bucket];
        while let Some(id) = current {
            let node = pool.node(id);
            if node.key() == key {
                return Some(id);
            }
            current = node.chain().next;
        }
        None
    }

    /// Looks up the node holding `key`.
    #[inline]
    pub fn find<T: Chained>(&self, pool: &NodePool<T>, key: &T::Key) -> Option<SlotId> {
        self.scan(pool, self.bucket_for(key), key)
    }

    /// Looks up `key`, reserving its bucket on a miss.
    #[inline]
    pub fn probe<T: Chained>(&self, pool: &NodePool<T>, key: &T::Key) -> Probe {
        let bucket = self.bucket_for(key);
        match self.scan(pool, bucket, key) {
            Some(id) => Probe::Occupied(id),
            None => Probe::Vacant(Reservation { bucket }),
        }
    }

    /// Links node `id` into the bucket reserved by a missed probe for its key.
    #[inline]
    pub fn commit<T: Chained>(
        &mut self,
        pool: &mut NodePool<T>,
        reservation: Reservation,
        id: SlotId,
    ) {
        let bucket = reservation.bucket;
        debug_assert_eq!(bucket, self.bucket_for(pool.node(id).key()));
        debug_assert!(
            self.scan(pool, bucket, pool.node(id).key()).is_none(),
            "duplicate key committed to hash index"
        );

        *pool.node_mut(id).chain_mut() = ChainLink {
            bucket,
            next: self.buckets[bucket],
        };
        self.buckets[bucket] = Some(id);
        self.len += 1;
    }

    /// Unlinks node `id` from its chain. Returns `false` if it was not indexed.
    pub fn remove<T: Chained>(&mut self, pool: &mut NodePool<T>, id: SlotId) -> bool {
        let ChainLink { bucket, next } = *pool.node(id).chain();

        if self.buckets[bucket] == Some(id) {
            self.buckets[bucket] = next;
        } else {
            let mut current = self.buckets[bucket];
            loop {
                let Some(cur_id) = current else {
                    return false;
                };
                let link = pool.node(cur_id).chain().next;
                if link == Some(id) {
                    pool.node_mut(cur_id).chain_mut().next = next;
                    break;
                }
                current = link;
            }
        }

        *pool.node_mut(id).chain_mut() = ChainLink::default();
        self.len -= 1;
        true
    }

    /// Iterates indexed ids bucket by bucket.
    pub fn iter_ids<'a, T: Chained>(
        &'a self,
        pool: &'a NodePool<T>,
    ) -> impl Iterator<Item = SlotId> + 'a {
        self.buckets.iter().flat_map(move |&head| {
            std::iter::successors(head, move |&id| pool.node(id).chain().next)
        })
    }

    /// Returns `true` if `id` is reachable from the bucket its key hashes to.
    pub fn is_indexed<T: Chained>(&self, pool: &NodePool<T>, id: SlotId) -> bool {
        let Some(node) = pool.get(id) else {
            return false;
        };
        let bucket = self.bucket_for(node.key());
        node.chain().bucket == bucket && self.scan(pool, bucket, node.key()) == Some(id)
    }
}

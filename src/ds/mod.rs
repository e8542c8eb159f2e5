//! Preallocated building blocks for the cache engine.
//!
//! | Type           | Role                                               |
//! |----------------|----------------------------------------------------|
//! | [`NodePool`]   | Fixed arena of nodes plus a LIFO free-slot stack   |
//! | [`HashIndex`]  | Power-of-two bucket array, chains linked in nodes  |
//! | [`SlotList`]   | Doubly-linked list threaded through node indices   |
//! | [`ShardSelector`] | Seeded key-to-shard mapping                     |
//!
//! None of them allocate after construction.

pub mod hash_index;
pub mod node_pool;
pub mod shard;
pub mod slot_list;

pub use hash_index::{
    AlignedKeyBuildHasher, AlignedKeyHasher, ChainLink, Chained, DefaultIndexHasher, HashIndex,
    Probe, Reservation,
};
pub use node_pool::{NodePool, SlotId};
pub use shard::ShardSelector;
pub use slot_list::{ListLinks, Listed, SlotList, SlotListIter};

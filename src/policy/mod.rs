//! Cache engines.
//!
//! - [`soft_lru`]: the single-threaded [`SoftLruCache`](soft_lru::SoftLruCache).
//! - [`sharded`] (feature `concurrency`): mutex-wrapped and sharded variants.

#[cfg(feature = "concurrency")]
pub mod sharded;
pub mod soft_lru;

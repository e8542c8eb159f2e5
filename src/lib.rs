//! softlru: a fixed-capacity, allocation-free-after-construction LRU cache
//! with soft promotion, batch eviction and pinned entries.
//!
//! ```
//! use softlru::SoftLruCache;
//!
//! let mut cache: SoftLruCache<u64, u64> = SoftLruCache::new(128);
//! for i in 0..1_000u64 {
//!     let key = i << 6;
//!     cache.insert(key, i, true);
//!     assert_eq!(cache.get(&key), Some(i));
//! }
//! assert!(cache.len() <= cache.capacity() + 1);
//! ```
//!
//! See [`policy::soft_lru`] for the eviction model and [`builder`] for
//! tuning.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::builder::{SoftLruBuilder, SoftLruConfig};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::soft_lru::{EntryStamp, SoftLruCache, Tick};

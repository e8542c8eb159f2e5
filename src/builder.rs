//! Configuration and construction for [`SoftLruCache`].
//!
//! ## Example
//!
//! ```rust
//! use softlru::builder::SoftLruBuilder;
//!
//! let mut cache = SoftLruBuilder::new(128)
//!     .soft_promotion_ratio(0.25)
//!     .max_batch_evict(4)
//!     .build::<u64, String>();
//!
//! cache.insert(1, "hello".to_string(), true);
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! assert_eq!(cache.soft_promotion(), 32);
//! assert_eq!(cache.batch_evict_size(), 4);
//! ```
//!
//! ## Derived sizes
//!
//! | Quantity           | Formula                                               |
//! |--------------------|-------------------------------------------------------|
//! | `arena_size`       | `capacity × 2`                                        |
//! | `soft_promotion`   | `⌊capacity × soft_promotion_ratio⌋`                   |
//! | `batch_evict_size` | `min(max_batch_evict, capacity − soft_promotion)`     |
//! | index buckets      | `next_power_of_two(capacity × index_factor)`          |

use std::hash::{BuildHasher, Hash};

use crate::ds::hash_index::DefaultIndexHasher;
use crate::error::ConfigError;
use crate::policy::soft_lru::SoftLruCache;

/// Default capacity used by [`SoftLruConfig::default`].
pub const DEFAULT_CAPACITY: usize = 1024;
/// Default fraction of capacity that must elapse between promotions.
pub const DEFAULT_SOFT_PROMOTION_RATIO: f64 = 0.5;
/// Default upper bound on nodes reclaimed per eviction pass.
pub const DEFAULT_MAX_BATCH_EVICT: usize = 3;
/// Default hash buckets per unit of capacity.
pub const DEFAULT_INDEX_FACTOR: usize = 4;
/// Arena slots per unit of capacity. The surplus is eviction headroom.
pub const ARENA_FACTOR: usize = 2;

/// Validated-on-build configuration for a [`SoftLruCache`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftLruConfig {
    pub capacity: usize,
    pub soft_promotion_ratio: f64,
    pub max_batch_evict: usize,
    pub index_factor: usize,
}

impl Default for SoftLruConfig {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

/// Sizes derived from a valid [`SoftLruConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Derived {
    pub arena_size: usize,
    pub soft_promotion: usize,
    pub batch_evict_size: usize,
    pub index_buckets: usize,
}

impl SoftLruConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            soft_promotion_ratio: DEFAULT_SOFT_PROMOTION_RATIO,
            max_batch_evict: DEFAULT_MAX_BATCH_EVICT,
            index_factor: DEFAULT_INDEX_FACTOR,
        }
    }

    /// Checks every parameter and computes the derived sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if capacity is zero, the ratio is outside
    /// `[0.0, 1.0]`, `max_batch_evict` or `index_factor` is zero, the batch
    /// size works out to zero, or a derived size overflows `usize`.
    pub(crate) fn derive(&self) -> Result<Derived, ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }
        let ratio = self.soft_promotion_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::new(format!(
                "soft_promotion_ratio must be in [0.0, 1.0], got {}",
                ratio
            )));
        }
        if self.max_batch_evict == 0 {
            return Err(ConfigError::new("max_batch_evict must be greater than zero"));
        }
        if self.index_factor == 0 {
            return Err(ConfigError::new("index_factor must be greater than zero"));
        }

        let soft_promotion = ((self.capacity as f64 * ratio) as usize).min(self.capacity);
        let batch_evict_size = self.max_batch_evict.min(self.capacity - soft_promotion);
        if batch_evict_size == 0 {
            return Err(ConfigError::new(format!(
                "soft_promotion_ratio {} leaves no room for batch eviction at capacity {}",
                ratio, self.capacity
            )));
        }

        let arena_size = self
            .capacity
            .checked_mul(ARENA_FACTOR)
            .ok_or_else(|| ConfigError::new("arena size overflows usize"))?;
        let index_buckets = self
            .capacity
            .checked_mul(self.index_factor)
            .and_then(usize::checked_next_power_of_two)
            .ok_or_else(|| ConfigError::new("hash index size overflows usize"))?;

        Ok(Derived {
            arena_size,
            soft_promotion,
            batch_evict_size,
            index_buckets,
        })
    }

    /// Returns `Ok(())` if this configuration can build a cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.derive().map(|_| ())
    }
}

/// Fluent builder for [`SoftLruCache`].
#[derive(Debug, Clone)]
pub struct SoftLruBuilder<S = DefaultIndexHasher> {
    config: SoftLruConfig,
    hasher: S,
}

impl SoftLruBuilder {
    /// Starts a builder with default tuning for `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: SoftLruConfig::with_capacity(capacity),
            hasher: DefaultIndexHasher::default(),
        }
    }
}

impl<S: BuildHasher> SoftLruBuilder<S> {
    pub fn from_config(config: SoftLruConfig, hasher: S) -> Self {
        Self { config, hasher }
    }

    /// Fraction of capacity, in logical ticks, that must pass before a
    /// touched entry is moved to the front again.
    pub fn soft_promotion_ratio(mut self, ratio: f64) -> Self {
        self.config.soft_promotion_ratio = ratio;
        self
    }

    /// Upper bound on entries reclaimed per eviction pass.
    pub fn max_batch_evict(mut self, n: usize) -> Self {
        self.config.max_batch_evict = n;
        self
    }

    /// Hash buckets allocated per unit of capacity.
    pub fn index_factor(mut self, factor: usize) -> Self {
        self.config.index_factor = factor;
        self
    }

    /// Replaces the key hasher.
    pub fn hasher<S2: BuildHasher>(self, hasher: S2) -> SoftLruBuilder<S2> {
        SoftLruBuilder {
            config: self.config,
            hasher,
        }
    }

    pub fn config(&self) -> &SoftLruConfig {
        &self.config
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. See [`try_build`](Self::try_build).
    pub fn build<K: Hash + Eq, V>(self) -> SoftLruCache<K, V, S> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the cache, returning an error on invalid parameters.
    pub fn try_build<K: Hash + Eq, V>(self) -> Result<SoftLruCache<K, V, S>, ConfigError> {
        SoftLruCache::from_config(self.config, self.hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::hash_index::AlignedKeyBuildHasher;

    #[test]
    fn default_config_derives_sizes() {
        let derived = SoftLruConfig::default().derive().unwrap();
        assert_eq!(derived.arena_size, 2048);
        assert_eq!(derived.soft_promotion, 512);
        assert_eq!(derived.batch_evict_size, 3);
        assert_eq!(derived.index_buckets, 4096);
    }

    #[test]
    fn small_capacity_clamps_batch_size() {
        let derived = SoftLruConfig::with_capacity(4).derive().unwrap();
        assert_eq!(derived.soft_promotion, 2);
        assert_eq!(derived.batch_evict_size, 2);

        let derived = SoftLruConfig::with_capacity(1).derive().unwrap();
        assert_eq!(derived.soft_promotion, 0);
        assert_eq!(derived.batch_evict_size, 1);
        assert_eq!(derived.arena_size, 2);
    }

    #[test]
    fn non_power_of_two_capacity_rounds_index() {
        let derived = SoftLruConfig::with_capacity(100).derive().unwrap();
        assert_eq!(derived.index_buckets, 512);
        assert_eq!(derived.soft_promotion, 50);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = SoftLruBuilder::new(0).try_build::<u64, u64>().unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn invalid_ratio_is_rejected() {
        for ratio in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = SoftLruBuilder::new(8)
                .soft_promotion_ratio(ratio)
                .try_build::<u64, u64>()
                .unwrap_err();
            assert!(err.message().contains("soft_promotion_ratio"));
        }
    }

    #[test]
    fn full_ratio_leaves_no_batch_room() {
        let err = SoftLruConfig {
            soft_promotion_ratio: 1.0,
            ..SoftLruConfig::with_capacity(8)
        }
        .validate()
        .unwrap_err();
        assert!(err.message().contains("batch eviction"));
    }

    #[test]
    fn zero_factors_are_rejected() {
        assert!(SoftLruBuilder::new(8).max_batch_evict(0).try_build::<u64, u64>().is_err());
        assert!(SoftLruBuilder::new(8).index_factor(0).try_build::<u64, u64>().is_err());
    }

    #[test]
    fn overflowing_capacity_is_rejected() {
        let err = SoftLruConfig::with_capacity(usize::MAX).validate().unwrap_err();
        assert!(err.message().contains("overflows"));
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn build_panics_on_invalid_config() {
        let _ = SoftLruBuilder::new(0).build::<u64, u64>();
    }

    #[test]
    fn custom_hasher_is_used() {
        let mut cache = SoftLruBuilder::new(16)
            .hasher(AlignedKeyBuildHasher::default())
            .build::<u64, u64>();
        cache.insert(0x40, 1, true);
        assert_eq!(cache.get(&0x40), Some(1));
        assert_eq!(cache.config().capacity, 16);
    }
}

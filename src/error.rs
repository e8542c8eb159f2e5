//! Error types for softlru.
//!
//! Cache operations themselves never fail: a `get` miss is `None`, and a
//! broken internal contract (exhausted arena, stale slot handle) panics.
//! The two error types here cover the only fallible surfaces:
//!
//! - [`ConfigError`]: invalid construction parameters.
//! - [`InvariantError`]: reported by
//!   [`SoftLruCache::check_invariants`](crate::policy::soft_lru::SoftLruCache::check_invariants).
//!
//! ```
//! use softlru::error::ConfigError;
//! use softlru::SoftLruCache;
//!
//! let cache: Result<SoftLruCache<u64, u64>, ConfigError> = SoftLruCache::try_new(64);
//! assert!(cache.is_ok());
//!
//! let err = SoftLruCache::<u64, u64>::try_new(0).unwrap_err();
//! assert!(err.to_string().contains("capacity"));
//! ```

use std::fmt;

/// Internal structure of a cache failed a consistency check.
///
/// Carries a description of the first violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}

/// A cache could not be built from the given parameters.
///
/// Produced by [`SoftLruCache::try_new`](crate::policy::soft_lru::SoftLruCache::try_new)
/// and [`SoftLruBuilder::try_build`](crate::builder::SoftLruBuilder::try_build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

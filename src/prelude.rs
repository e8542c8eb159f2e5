pub use crate::builder::{SoftLruBuilder, SoftLruConfig};
pub use crate::ds::{AlignedKeyBuildHasher, DefaultIndexHasher, ShardSelector, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{MetricsExporter, MetricsSnapshotProvider, SoftLruMetricsSnapshot};
#[cfg(feature = "concurrency")]
pub use crate::policy::sharded::{ConcurrentSoftLruCache, ShardedSoftLruCache};
pub use crate::policy::soft_lru::{EntryStamp, SoftLruCache};
pub use crate::traits::{ConcurrentCache, CoreCache, PinningCache};

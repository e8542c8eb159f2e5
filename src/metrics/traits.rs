//! # Metrics traits
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │  get hit/miss, insert, evict
//!   └──────────────┬──────────────┘
//!                  ▼
//!   ┌─────────────────────────────┐
//!   │   SoftLruMetricsRecorder    │  promotions, deferrals, forced
//!   └─────────────────────────────┘  passes, pinned inserts
//!
//!   Consumption (decoupled from recording):
//!   MetricsSnapshotProvider<S>  (bench/test)
//!   MetricsExporter<S>          (production monitoring)
//! ```
//!
//! Recorders only write counters; providers only copy them out; exporters
//! only publish.

/// Counters shared by any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
}

/// Counters specific to soft promotion, batch eviction and pinning.
pub trait SoftLruMetricsRecorder: CoreMetricsRecorder {
    /// `insert_on_missing` found the key and did nothing.
    fn record_insert_skipped(&mut self);
    /// A touch moved an evictable entry to the front.
    fn record_promotion(&mut self);
    /// A touch refreshed an evictable entry's access time but left it in place.
    fn record_promotion_deferred(&mut self);
    /// The arena ran dry and an eviction pass ran outside the normal trigger.
    fn record_forced_evict_call(&mut self);
    fn record_pinned_insert(&mut self);
}

/// Copies out a point-in-time view of a cache's metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes snapshots to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

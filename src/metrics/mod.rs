//! Operation counters for [`SoftLruCache`](crate::SoftLruCache).
//!
//! Recording is split from consumption the same way for every cache:
//! the cache owns a recorder ([`SoftLruMetrics`]) and writes counters on its
//! hot path; callers read a copied [`SoftLruMetricsSnapshot`] or hand it to a
//! [`MetricsExporter`](traits::MetricsExporter) such as
//! [`PrometheusTextExporter`].
//!
//! The whole module, and every recording call site, is compiled only with
//! the `metrics` feature.

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::SoftLruMetrics;
pub use snapshot::SoftLruMetricsSnapshot;
pub use traits::{
    CoreMetricsRecorder, MetricsExporter, MetricsSnapshotProvider, SoftLruMetricsRecorder,
};

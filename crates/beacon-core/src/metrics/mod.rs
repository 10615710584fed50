//! In-process metrics (Prometheus text exposition).
//!
//! Metrics are registered once on a `&mut MetricRegistry`, after which the
//! registry is shared read-only and updated through cheap cloneable handles.
//! Series are stored in `DashMap`s keyed by positional label values.

mod counter;
mod encode;
mod histogram;
mod labels;
mod registry;

pub use counter::Counter;
pub use histogram::{check_bounds, Histogram, HistogramSnapshot, DEFAULT_BUCKETS};
pub use registry::{MetricRegistry, CONTENT_TYPE};

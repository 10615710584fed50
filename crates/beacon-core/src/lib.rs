//! Beacon core: error types and the in-process metrics registry.
//!
//! This crate owns the only stateful part of Beacon: a registry of labeled
//! counters and histograms that request handlers update concurrently and the
//! `/metrics` endpoint renders in the Prometheus text exposition format. It
//! carries no HTTP or runtime dependencies so the same registry can back the
//! axum server and the gateway-event entry point.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every rejected registration or update surfaces as `BeaconError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, BeaconError};
pub use metrics::{Counter, Histogram, HistogramSnapshot, MetricRegistry};

//! Shared application state for Beacon.
//!
//! Owns the metric registry. Metrics are registered here, once, before the
//! state is shared with request handlers; a registration failure aborts
//! startup.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use beacon_core::error::Result;
use beacon_core::metrics::{Counter, Histogram, MetricRegistry};

use crate::config::BeaconConfig;

pub const REQUEST_COUNT: &str = "app_request_count";
pub const REQUEST_LATENCY: &str = "app_request_latency_seconds";

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: BeaconConfig,
    registry: MetricRegistry,
    request_count: Counter,
    request_latency: Histogram,
}

impl AppState {
    /// Build application state and register the request metrics.
    pub fn new(cfg: BeaconConfig) -> Result<Self> {
        let mut registry = MetricRegistry::new();

        let request_count = registry.register_counter(
            REQUEST_COUNT,
            "Application Request Count",
            &["method", "endpoint", "http_status"],
        )?;
        let request_latency = registry.register_histogram(
            REQUEST_LATENCY,
            "Application Request Latency",
            &["method", "endpoint"],
            &cfg.metrics.latency_buckets,
        )?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                request_count,
                request_latency,
            }),
        })
    }

    pub fn cfg(&self) -> &BeaconConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }

    pub fn request_count(&self) -> &Counter {
        &self.inner.request_count
    }

    pub fn request_latency(&self) -> &Histogram {
        &self.inner.request_latency
    }

    /// Record one served content request. Called once per request, after the
    /// response status is final.
    pub fn record_request(&self, method: &str, endpoint: &str, status: StatusCode, elapsed: Duration) {
        if let Err(e) = self
            .inner
            .request_count
            .inc(&[method, endpoint, status.as_str()])
        {
            tracing::warn!(error = %e, %endpoint, "request count not recorded");
        }
        if let Err(e) = self
            .inner
            .request_latency
            .observe_duration(&[method, endpoint], elapsed)
        {
            tracing::warn!(error = %e, %endpoint, "request latency not recorded");
        }
    }

    /// Prometheus text for `/metrics`.
    pub fn render_metrics(&self) -> String {
        self.inner.registry.render()
    }
}

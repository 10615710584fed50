use crate::error::{BeaconError, Result};

use super::counter::Counter;
use super::histogram::{check_bounds, Histogram};
use super::labels::{is_valid_metric_name, LabelNames};

/// Content type of the text exposition format served by `/metrics`.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const HISTOGRAM_SUFFIXES: [&str; 3] = ["_bucket", "_sum", "_count"];

enum Metric {
    Counter(Counter),
    Histogram(Histogram),
}

impl Metric {
    fn name(&self) -> &str {
        match self {
            Metric::Counter(c) => c.name(),
            Metric::Histogram(h) => h.name(),
        }
    }

    /// Every sample name this metric puts on the wire.
    fn sample_names(&self) -> Vec<String> {
        match self {
            Metric::Counter(c) => vec![c.name().to_string()],
            Metric::Histogram(h) => sample_names_for_histogram(h.name()),
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Metric::Counter(c) => c.render(out),
            Metric::Histogram(h) => h.render(out),
        }
    }
}

fn sample_names_for_histogram(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    names.extend(HISTOGRAM_SUFFIXES.iter().map(|s| format!("{name}{s}")));
    names
}

/// Process-wide metric registry.
///
/// Registration takes `&mut self`, so all metrics are defined during startup
/// before the registry is shared (usually behind an `Arc`). After that the
/// metric list never changes; per-request work goes through the returned
/// handles and only touches their series maps.
#[derive(Default)]
pub struct MetricRegistry {
    metrics: Vec<Metric>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a labeled counter.
    ///
    /// Registering a name twice is an error even with an identical signature.
    pub fn register_counter(
        &mut self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<Counter> {
        self.check_name(name, &[name.to_string()])?;
        let labels = LabelNames::new(name, label_names, &[])?;

        let counter = Counter::new(name, help, labels);
        self.metrics.push(Metric::Counter(counter.clone()));
        tracing::debug!(metric = %name, labels = ?label_names, "counter registered");
        Ok(counter)
    }

    /// Register a labeled histogram with fixed bucket upper bounds.
    pub fn register_histogram(
        &mut self,
        name: &str,
        help: &str,
        label_names: &[&str],
        bucket_bounds: &[f64],
    ) -> Result<Histogram> {
        self.check_name(name, &sample_names_for_histogram(name))?;
        check_bounds(name, bucket_bounds)?;
        let labels = LabelNames::new(name, label_names, &["le"])?;

        let histogram = Histogram::new(name, help, labels, bucket_bounds.to_vec());
        self.metrics.push(Metric::Histogram(histogram.clone()));
        tracing::debug!(
            metric = %name,
            labels = ?label_names,
            buckets = bucket_bounds.len(),
            "histogram registered"
        );
        Ok(histogram)
    }

    /// Render every metric in registration order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.metrics {
            m.render(&mut out);
        }
        out
    }

    /// Registered metric names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.metrics.iter().map(Metric::name).collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn check_name(&self, name: &str, wire_names: &[String]) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(BeaconError::InvalidName(name.to_string()));
        }
        for m in &self.metrics {
            if m.sample_names().iter().any(|n| wire_names.contains(n)) {
                return Err(BeaconError::DuplicateMetric(format!(
                    "{name} (clashes with {})",
                    m.name()
                )));
            }
        }
        Ok(())
    }
}

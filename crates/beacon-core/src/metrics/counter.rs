use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{BeaconError, Result};

use super::encode::{write_header, write_labels};
use super::labels::{LabelKey, LabelNames};

struct CounterCore {
    name: String,
    help: String,
    labels: LabelNames,
    series: DashMap<LabelKey, AtomicU64>,
}

/// Handle to a registered labeled counter. Cloning is cheap; all clones
/// update the same series.
#[derive(Clone)]
pub struct Counter {
    inner: Arc<CounterCore>,
}

impl Counter {
    pub(crate) fn new(name: &str, help: &str, labels: LabelNames) -> Self {
        let series = DashMap::new();
        if labels.is_empty() {
            series.insert(LabelKey::default(), AtomicU64::new(0));
        }
        Self {
            inner: Arc::new(CounterCore {
                name: name.to_string(),
                help: help.to_string(),
                labels,
                series,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Increment by 1. Values are given in label declaration order.
    pub fn inc(&self, values: &[&str]) -> Result<()> {
        self.inc_by(values, 1)
    }

    /// Increment by `delta`, which must not be negative.
    pub fn inc_by(&self, values: &[&str], delta: i64) -> Result<()> {
        let delta = check_delta(delta)?;
        let key = self.inner.labels.key_from_values(values)?;
        self.add(key, delta)
    }

    /// Increment by 1 using `(name, value)` pairs in any order.
    pub fn inc_labels(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let key = self.inner.labels.key_from_pairs(pairs)?;
        self.add(key, 1)
    }

    /// Current value of one series; zero if it was never touched.
    pub fn get(&self, values: &[&str]) -> Result<u64> {
        let key = self.inner.labels.key_from_values(values)?;
        Ok(self
            .inner
            .series
            .get(&key)
            .map(|v| v.load(Ordering::Relaxed))
            .unwrap_or(0))
    }

    /// Number of series recorded so far.
    pub fn series_count(&self) -> usize {
        self.inner.series.len()
    }

    fn add(&self, key: LabelKey, delta: u64) -> Result<()> {
        if let Some(counter) = self.inner.series.get(&key) {
            return self.bump(&counter, delta);
        }
        let counter = self
            .inner
            .series
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0));
        self.bump(&counter, delta)
    }

    // An add that would overflow is rejected and leaves the value untouched.
    fn bump(&self, counter: &AtomicU64, delta: u64) -> Result<()> {
        counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_add(delta))
            .map(|_| ())
            .map_err(|_| BeaconError::CounterOverflow(self.inner.name.clone()))
    }

    pub(crate) fn render(&self, out: &mut String) {
        let c = &self.inner;
        write_header(out, &c.name, &c.help, "counter");

        let mut rows: Vec<(LabelKey, u64)> = c
            .series
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, val) in rows {
            out.push_str(&c.name);
            write_labels(out, c.labels.names(), &key, None);
            out.push(' ');
            out.push_str(&val.to_string());
            out.push('\n');
        }
    }
}

fn check_delta(delta: i64) -> Result<u64> {
    u64::try_from(delta).map_err(|_| BeaconError::InvalidDelta(delta))
}

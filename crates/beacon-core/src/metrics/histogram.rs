use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashmap::DashMap;

use crate::error::{BeaconError, Result};

use super::encode::{format_float, write_header, write_labels};
use super::labels::{LabelKey, LabelNames};

/// Prometheus client default latency buckets (seconds).
pub const DEFAULT_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// One series. Guarded by a mutex so buckets, sum and count move together.
#[derive(Debug, Clone)]
struct SeriesState {
    /// Cumulative counts, one per configured bound (+Inf is `count`).
    buckets: Box<[u64]>,
    sum: f64,
    count: u64,
}

impl SeriesState {
    fn new(n: usize) -> Self {
        Self {
            buckets: vec![0; n].into_boxed_slice(),
            sum: 0.0,
            count: 0,
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub bounds: Vec<f64>,
    /// Cumulative count per bound, same order as `bounds`.
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramSnapshot {
    /// Cumulative count for the bucket with upper bound `le`.
    /// `f64::INFINITY` returns the total count.
    pub fn bucket(&self, le: f64) -> Option<u64> {
        if le == f64::INFINITY {
            return Some(self.count);
        }
        self.bounds
            .iter()
            .position(|b| *b == le)
            .map(|i| self.buckets[i])
    }
}

struct HistogramCore {
    name: String,
    help: String,
    labels: LabelNames,
    bounds: Box<[f64]>,
    series: DashMap<LabelKey, Mutex<SeriesState>>,
}

/// Handle to a registered labeled histogram with fixed bucket bounds.
#[derive(Clone)]
pub struct Histogram {
    inner: Arc<HistogramCore>,
}

impl Histogram {
    pub(crate) fn new(name: &str, help: &str, labels: LabelNames, bounds: Vec<f64>) -> Self {
        let series = DashMap::new();
        if labels.is_empty() {
            series.insert(LabelKey::default(), Mutex::new(SeriesState::new(bounds.len())));
        }
        Self {
            inner: Arc::new(HistogramCore {
                name: name.to_string(),
                help: help.to_string(),
                labels,
                bounds: bounds.into_boxed_slice(),
                series,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn bounds(&self) -> &[f64] {
        &self.inner.bounds
    }

    /// Record `value` (non-negative, finite). Values are given in label
    /// declaration order.
    pub fn observe(&self, values: &[&str], value: f64) -> Result<()> {
        let value = check_observation(value)?;
        let key = self.inner.labels.key_from_values(values)?;
        self.record(key, value);
        Ok(())
    }

    /// Record `value` using `(name, value)` label pairs in any order.
    pub fn observe_labels(&self, pairs: &[(&str, &str)], value: f64) -> Result<()> {
        let value = check_observation(value)?;
        let key = self.inner.labels.key_from_pairs(pairs)?;
        self.record(key, value);
        Ok(())
    }

    /// Record a duration in seconds.
    pub fn observe_duration(&self, values: &[&str], d: Duration) -> Result<()> {
        self.observe(values, d.as_secs_f64())
    }

    /// Copy of one series, or `None` if it was never observed.
    pub fn snapshot(&self, values: &[&str]) -> Result<Option<HistogramSnapshot>> {
        let key = self.inner.labels.key_from_values(values)?;
        Ok(self.inner.series.get(&key).map(|s| {
            let st = lock(s.value());
            HistogramSnapshot {
                bounds: self.inner.bounds.to_vec(),
                buckets: st.buckets.to_vec(),
                sum: st.sum,
                count: st.count,
            }
        }))
    }

    fn record(&self, key: LabelKey, value: f64) {
        // Fast path only takes the shard read lock.
        if let Some(slot) = self.inner.series.get(&key) {
            self.apply(&mut lock(slot.value()), value);
            return;
        }
        let n = self.inner.bounds.len();
        let slot = self
            .inner
            .series
            .entry(key)
            .or_insert_with(|| Mutex::new(SeriesState::new(n)));
        self.apply(&mut lock(slot.value()), value);
    }

    fn apply(&self, st: &mut SeriesState, value: f64) {
        // Cumulative: every bucket whose bound is >= value.
        for (bound, bucket) in self.inner.bounds.iter().zip(st.buckets.iter_mut()) {
            if value <= *bound {
                *bucket += 1;
            }
        }
        st.sum += value;
        st.count += 1;
    }

    pub(crate) fn render(&self, out: &mut String) {
        let h = &self.inner;
        write_header(out, &h.name, &h.help, "histogram");

        let mut rows: Vec<(LabelKey, SeriesState)> = h
            .series
            .iter()
            .map(|r| (r.key().clone(), lock(r.value()).clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let names = h.labels.names();
        for (key, st) in rows {
            for (bound, count) in h.bounds.iter().zip(st.buckets.iter()) {
                let le = format_float(*bound);
                let count = count.to_string();
                write_sample(out, &h.name, "_bucket", names, &key, Some(("le", le.as_str())), &count);
            }
            let total = st.count.to_string();
            write_sample(out, &h.name, "_bucket", names, &key, Some(("le", "+Inf")), &total);
            write_sample(out, &h.name, "_sum", names, &key, None, &format_float(st.sum));
            write_sample(out, &h.name, "_count", names, &key, None, &total);
        }
    }
}

fn write_sample(
    out: &mut String,
    name: &str,
    suffix: &str,
    names: &[String],
    values: &[String],
    extra: Option<(&str, &str)>,
    value: &str,
) {
    out.push_str(name);
    out.push_str(suffix);
    write_labels(out, names, values, extra);
    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

fn check_observation(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BeaconError::InvalidObservation(value))
    }
}

/// Bounds must be non-empty, finite, positive and strictly increasing.
pub fn check_bounds(name: &str, bounds: &[f64]) -> Result<()> {
    if bounds.is_empty() {
        return Err(BeaconError::InvalidBuckets(format!("{name}: no bucket bounds")));
    }
    if let Some(b) = bounds.iter().find(|b| !b.is_finite() || **b <= 0.0) {
        return Err(BeaconError::InvalidBuckets(format!(
            "{name}: bound {b} must be positive and finite"
        )));
    }
    if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
        return Err(BeaconError::InvalidBuckets(format!(
            "{name}: bounds not strictly increasing at {} -> {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

// A poisoned series still holds consistent numbers: updates never panic midway.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

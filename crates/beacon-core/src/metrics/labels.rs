//! Label dimensions and series keys.
//!
//! A series key is the list of label values in declaration order, so
//! `{method="GET", endpoint="/"}` and `{endpoint="/", method="GET"}` resolve to
//! the same key.

use crate::error::{BeaconError, Result};

/// Positional label values; slot `i` belongs to the `i`-th declared label name.
pub(crate) type LabelKey = Box<[String]>;

/// Label names fixed at registration.
#[derive(Debug, Clone)]
pub(crate) struct LabelNames {
    metric: String,
    names: Box<[String]>,
}

impl LabelNames {
    /// Validate and capture label names. `reserved` names are rejected on top
    /// of the usual identifier rules.
    pub(crate) fn new(metric: &str, names: &[&str], reserved: &[&str]) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::with_capacity(names.len());
        for &n in names {
            if !is_valid_label_name(n) || reserved.contains(&n) {
                return Err(BeaconError::InvalidName(format!("{metric}: label `{n}`")));
            }
            if seen.contains(&n) {
                return Err(BeaconError::InvalidName(format!(
                    "{metric}: label `{n}` declared twice"
                )));
            }
            seen.push(n);
        }

        Ok(Self {
            metric: metric.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build a key from values given in declaration order.
    pub(crate) fn key_from_values(&self, values: &[&str]) -> Result<LabelKey> {
        if values.len() != self.names.len() {
            return Err(BeaconError::label_mismatch(
                &self.metric,
                format!("expected {} label values, got {}", self.names.len(), values.len()),
            ));
        }
        Ok(values.iter().map(|v| v.to_string()).collect())
    }

    /// Build a key from `(name, value)` pairs in any order.
    pub(crate) fn key_from_pairs(&self, pairs: &[(&str, &str)]) -> Result<LabelKey> {
        if pairs.len() != self.names.len() {
            return Err(BeaconError::label_mismatch(
                &self.metric,
                format!("expected labels {:?}, got {} pairs", self.names, pairs.len()),
            ));
        }

        let mut slots: Vec<Option<&str>> = vec![None; self.names.len()];
        for &(name, value) in pairs {
            let idx = self
                .names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| {
                    BeaconError::label_mismatch(&self.metric, format!("unknown label `{name}`"))
                })?;
            if slots[idx].replace(value).is_some() {
                return Err(BeaconError::label_mismatch(
                    &self.metric,
                    format!("label `{name}` given twice"),
                ));
            }
        }

        // Equal lengths and no duplicates means every slot is filled.
        Ok(slots
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub(crate) fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, excluding the `__` prefix kept for internal use.
pub(crate) fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

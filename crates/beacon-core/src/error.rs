//! Shared error type across Beacon crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// Requested route does not exist.
    NotFound,
    /// Route exists but not for this method.
    MethodNotAllowed,
    /// Metric definition or update rejected by the registry.
    InvalidMetric,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::InvalidMetric => "INVALID_METRIC",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BeaconError>;

/// Unified error type used by core and server.
#[derive(Debug, Error, PartialEq)]
pub enum BeaconError {
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("invalid delta: {0} (counters only go up)")]
    InvalidDelta(i64),
    #[error("counter overflow on {0}")]
    CounterOverflow(String),
    #[error("invalid observation: {0}")]
    InvalidObservation(f64),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("label mismatch on {metric}: {detail}")]
    LabelMismatch { metric: String, detail: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BeaconError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            BeaconError::DuplicateMetric(_)
            | BeaconError::InvalidBuckets(_)
            | BeaconError::InvalidDelta(_)
            | BeaconError::CounterOverflow(_)
            | BeaconError::InvalidObservation(_)
            | BeaconError::InvalidName(_)
            | BeaconError::LabelMismatch { .. } => ClientCode::InvalidMetric,
            BeaconError::BadRequest(_) => ClientCode::BadRequest,
            BeaconError::NotFound => ClientCode::NotFound,
            BeaconError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            BeaconError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            BeaconError::Internal(_) => ClientCode::Internal,
        }
    }

    pub(crate) fn label_mismatch(metric: &str, detail: impl Into<String>) -> Self {
        BeaconError::LabelMismatch {
            metric: metric.to_string(),
            detail: detail.into(),
        }
    }
}

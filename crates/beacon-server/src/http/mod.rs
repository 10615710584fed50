//! HTTP endpoints.
//!
//! - `/`        : greeting
//! - `/health`  : liveness
//! - `/metrics` : Prometheus text format
//!
//! Anything else answers `404 {"error": "Not Found"}` and records nothing.

pub mod handlers;

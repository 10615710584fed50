//! Beacon server library entry.
//!
//! Wires config, shared state (metric registry), the axum router, and the
//! gateway event adapter. Consumed by the two binaries (`beacon-server`,
//! `beacon-event`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod endpoint;
pub mod event;
pub mod http;
pub mod router;
pub mod telemetry;

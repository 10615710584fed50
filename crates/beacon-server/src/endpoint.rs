//! Static endpoint table and response bodies shared by the HTTP router and
//! the gateway event adapter.

use axum::http::StatusCode;
use serde_json::{json, Value};

use beacon_core::error::{BeaconError, ClientCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Health,
    Metrics,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Root, Endpoint::Health, Endpoint::Metrics];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Root => "/",
            Endpoint::Health => "/health",
            Endpoint::Metrics => "/metrics",
        }
    }

    /// Exact path match; no trailing-slash or prefix handling.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.path() == path)
    }

    /// Every endpoint is a `GET` route; `HEAD` is served like `GET`.
    /// Method names are case-sensitive.
    pub fn allows(self, method: &str) -> bool {
        matches!(method, "GET" | "HEAD")
    }

    /// JSON body for content endpoints; `None` for `/metrics`.
    pub fn content_body(self, greeting: &str) -> Option<Value> {
        match self {
            Endpoint::Root => Some(greeting_body(greeting)),
            Endpoint::Health => Some(health_body()),
            Endpoint::Metrics => None,
        }
    }
}

pub fn greeting_body(greeting: &str) -> Value {
    json!({ "message": greeting })
}

pub fn health_body() -> Value {
    json!({ "status": "ok" })
}

/// Status and body for an error answered to a client, e.g.
/// `404 {"error": "Not Found"}`.
pub fn error_parts(err: &BeaconError) -> (StatusCode, Value) {
    let status = match err.client_code() {
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let reason = status.canonical_reason().unwrap_or("Error");
    (status, json!({ "error": reason }))
}

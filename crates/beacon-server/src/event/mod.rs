//! API-gateway style event entry point.
//!
//! Each invocation carries one `ApiGatewayEvent` and returns one
//! `ApiGatewayResponse` whose body is a JSON (or exposition text) string.
//! The same endpoint table and metrics as the HTTP router are used.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use beacon_core::error::BeaconError;
use beacon_core::metrics::CONTENT_TYPE;

use crate::app_state::AppState;
use crate::endpoint::{error_parts, Endpoint};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Inbound gateway event. Unknown fields are ignored; gateways send plenty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayEvent {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiGatewayEvent {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }

    pub fn method(&self) -> &str {
        self.http_method.as_deref().unwrap_or("GET")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl ApiGatewayResponse {
    fn json(status: StatusCode, body: &Value) -> Self {
        Self::with_content_type(status, body.to_string(), JSON_CONTENT_TYPE)
    }

    fn with_content_type(status: StatusCode, body: String, content_type: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), content_type.to_string());
        Self {
            status_code: status.as_u16(),
            body,
            headers,
        }
    }

    fn error(err: &BeaconError) -> Self {
        let (status, body) = error_parts(err);
        Self::json(status, &body)
    }
}

/// Handle one event.
pub fn handle_event(state: &AppState, event: &ApiGatewayEvent) -> ApiGatewayResponse {
    let start = Instant::now();
    tracing::debug!(?event, "event received");

    let Some(endpoint) = Endpoint::from_path(event.path()) else {
        return ApiGatewayResponse::error(&BeaconError::NotFound);
    };
    if !endpoint.allows(event.method()) {
        tracing::debug!(method = event.method(), path = endpoint.path(), "method not allowed");
        return ApiGatewayResponse::error(&BeaconError::MethodNotAllowed);
    }

    match endpoint.content_body(&state.cfg().app.event_greeting) {
        Some(body) => {
            let status = StatusCode::OK;
            let resp = ApiGatewayResponse::json(status, &body);
            state.record_request(event.method(), endpoint.path(), status, start.elapsed());
            resp
        }
        None => ApiGatewayResponse::with_content_type(
            StatusCode::OK,
            state.render_metrics(),
            CONTENT_TYPE,
        ),
    }
}

/// Handle one raw JSON event, answering `400` when it does not parse.
pub fn handle_json(state: &AppState, raw: &str) -> ApiGatewayResponse {
    match serde_json::from_str::<ApiGatewayEvent>(raw) {
        Ok(event) => handle_event(state, &event),
        Err(e) => {
            tracing::warn!(error = %e, "malformed event");
            ApiGatewayResponse::error(&BeaconError::BadRequest(e.to_string()))
        }
    }
}

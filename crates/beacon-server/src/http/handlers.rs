use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use beacon_core::error::BeaconError;
use beacon_core::metrics::CONTENT_TYPE;

use crate::app_state::AppState;
use crate::endpoint::{error_parts, greeting_body, health_body};

pub async fn hello(State(state): State<AppState>) -> impl IntoResponse {
    Json(greeting_body(&state.cfg().app.greeting))
}

pub async fn health() -> impl IntoResponse {
    Json(health_body())
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.render_metrics();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        body,
    )
        .into_response()
}

pub async fn not_found() -> Response {
    let (status, body) = error_parts(&BeaconError::NotFound);
    (status, Json(body)).into_response()
}

/// Route layer for content endpoints: counts each request once its status is
/// known and observes its latency.
pub async fn track_requests(
    State(state): State<AppState>,
    matched: MatchedPath,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let endpoint = matched.as_str().to_owned();
    let start = Instant::now();

    let resp = next.run(req).await;

    // Wrong-method hits on a content route are not served requests.
    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        state.record_request(method.as_str(), &endpoint, resp.status(), start.elapsed());
    }
    resp
}

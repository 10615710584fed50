//! Axum router wiring.
//!
//! Content routes sit behind the request-tracking layer; `/metrics` and the
//! fallback are added after it so they never touch the request metrics.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, endpoint::Endpoint, http::handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(Endpoint::Root.path(), get(handlers::hello))
        .route(Endpoint::Health.path(), get(handlers::health))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::track_requests,
        ))
        .route(Endpoint::Metrics.path(), get(handlers::metrics))
        .fallback(handlers::not_found)
        .with_state(state)
}

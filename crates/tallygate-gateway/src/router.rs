//! Axum router wiring (HTTP -> gateway).
//!
//! Exposes the invocation endpoint and metrics; everything else falls back to
//! the gateway proxy.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, transport::http};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(http::INVOKE_PATH, post(http::invoke))
        .route(http::METRICS_PATH, get(http::metrics))
        .fallback(http::proxy)
        .with_state(state)
}

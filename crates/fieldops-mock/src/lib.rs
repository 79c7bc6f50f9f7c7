//! In-memory implementation of the field, drone, mission and planner
//! services, served over the same REST contract as the real ones.

pub mod api;
pub mod config;
pub mod seed;

use std::sync::Arc;

use axum::{routing::get, Router};
use fieldops_core::InMemoryBackend;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared tables behind every handler.
pub type AppState = Arc<InMemoryBackend>;

/// Full application: API routes, health check, tracing and CORS.
pub fn app(state: AppState) -> Router {
    api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

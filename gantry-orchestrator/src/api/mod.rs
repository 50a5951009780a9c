//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod auth;
pub mod error;
pub mod health;
pub mod pipeline;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::service::Services;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Scheme used when assembling Location headers; TLS terminates at the
    /// edge, not in this process.
    pub public_scheme: String,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pipeline endpoints
        .route("/pipelines", post(pipeline::create_pipeline))
        .route("/pipelines/{id}", get(pipeline::get_pipeline))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

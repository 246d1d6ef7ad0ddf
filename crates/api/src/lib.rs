//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Budget statistics routes
//! - Error to HTTP response mapping
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use lexbudget_core::statistics::StatisticsService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Statistics service over the configured record source.
    pub statistics: Arc<StatisticsService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

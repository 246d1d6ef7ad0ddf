//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

impl HealthResponse {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            service: "lexbudget",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_response_serializes() {
        let value = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "lexbudget");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }
}

//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lexbudget_core::statistics::StatisticsError;
use lexbudget_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Maps an engine error onto the application error taxonomy.
#[must_use]
pub fn statistics_error(err: StatisticsError) -> AppError {
    match err {
        StatisticsError::InvalidYear(_) => AppError::Validation(err.to_string()),
        StatisticsError::InvalidAmount { .. } | StatisticsError::RecordOutsideYear { .. } => {
            AppError::BusinessRule(err.to_string())
        }
        StatisticsError::UpstreamFetchFailure(_) => AppError::ExternalService(err.to_string()),
    }
}

/// Builds the `{ error, message }` response for `err` and logs it once.
///
/// Server-side failures are logged at `error` and answered with a generic
/// message; request errors are logged at `warn` and echoed back.
#[must_use]
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_client_error() {
        warn!(error = %err, "Rejected statistics request");
        err.to_string()
    } else {
        error!(error = %err, "Statistics request failed");
        "Failed to compute statistics".to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

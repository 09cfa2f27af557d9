use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use dashboard::DashboardError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dashboard(DashboardError::Core(CoreError::UnknownMarketplace(name))) => {
                tracing::debug!(marketplace = %name, "Unknown marketplace requested.");
                (
                    StatusCode::NOT_FOUND,
                    format!("Unknown marketplace: '{}'", name),
                )
            }
            AppError::Dashboard(dashboard_err) => {
                tracing::error!(error = ?dashboard_err, "Dashboard error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while building the dashboard".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

//! Error types for the parent dashboard.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use monitor_core::MonitorError;
use thiserror::Error;

/// Errors that can occur while serving the dashboard.
#[derive(Debug, Error)]
pub enum WebError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Assistant, geocoder, or aggregation error.
    #[error("Service error: {0}")]
    Monitor(#[from] MonitorError),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Database(err) => database_status(err),
            WebError::Monitor(MonitorError::Database(err)) => database_status(err),
            WebError::Monitor(MonitorError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            WebError::Monitor(_) => StatusCode::BAD_GATEWAY,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    match err {
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::AlreadyExists { .. } => StatusCode::CONFLICT,
        DatabaseError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for dashboard handlers.
pub type Result<T> = std::result::Result<T, WebError>;

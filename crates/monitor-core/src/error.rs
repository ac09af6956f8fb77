//! Error types for monitor-core operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while loading dashboard data or calling external services.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Store read or write failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External service answered with a non-success status.
    #[error("{service} returned status {status}")]
    Upstream { service: &'static str, status: u16 },

    /// External service answered without usable content.
    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    /// A request was rejected before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for monitor-core operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

//! Route handlers for the parent dashboard.

pub mod assistant;
pub mod calls;
pub mod chat;
pub mod children;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod safe_zones;
pub mod schedules;

use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::error::{Result, WebError};
use crate::state::AppState;

/// Default page size for list endpoints.
const DEFAULT_LIMIT: i64 = 50;
/// Largest page size a client may ask for.
const MAX_LIMIT: i64 = 500;

/// `?limit=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// Requested limit, defaulted and bounds-checked.
    pub fn resolve(&self) -> Result<i64> {
        match self.limit {
            None => Ok(DEFAULT_LIMIT),
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit),
            Some(limit) => Err(WebError::BadRequest(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            ))),
        }
    }
}

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        .route("/children/:id/chat", get(chat::chat_page))
        .route("/assistant", get(assistant::assistant_page))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/overview", get(dashboard::overview_api))
        .route(
            "/api/children",
            get(children::list_api).post(children::create_api),
        )
        .route(
            "/api/children/:id",
            get(children::get_api)
                .put(children::update_api)
                .delete(children::delete_api),
        )
        .route(
            "/api/children/:id/messages",
            get(chat::messages_api).post(chat::send_api),
        )
        .route("/api/children/:id/messages/read", post(chat::mark_read_api))
        .route("/api/children/:id/location", get(locations::latest_api))
        .route("/api/children/:id/locations", get(locations::history_api))
        .route("/api/children/:id/calls", get(calls::list_api))
        .route("/api/children/:id/calls/stats", get(calls::stats_api))
        .route(
            "/api/children/:id/schedules",
            get(schedules::list_api).post(schedules::create_api),
        )
        .route("/api/schedules/:id/status", put(schedules::status_api))
        .route("/api/schedules/:id", delete(schedules::delete_api))
        .route(
            "/api/children/:id/safe-zones",
            get(safe_zones::list_api).post(safe_zones::create_api),
        )
        .route(
            "/api/children/:id/safe-zones/:zone_id",
            delete(safe_zones::delete_api),
        )
        .route(
            "/api/assistant",
            get(assistant::history_api).delete(assistant::clear_api),
        )
        .route("/api/assistant/ask", post(assistant::ask_api))
}

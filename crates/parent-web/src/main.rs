//! Parent dashboard for monitoring children.
//!
//! Serves the child overview, chat views, and the AI assistant via
//! server-rendered HTML, plus a JSON API for the same data.

mod config;
mod error;
mod routes;
mod state;
mod view;

use std::sync::Arc;

use database::Database;
use monitor_core::{AssistantConfig, AssistantSession, Conversation, HttpAssistant, ReverseGeocoder};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, parent_id = %config.parent_id, "Starting parent dashboard");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Assistant conversation resumes from stored history
    let history = routes::assistant::load_history(&db, &config.parent_id).await?;
    info!(exchanges = history.len(), "Loaded assistant history");
    let assistant = HttpAssistant::new(
        AssistantConfig::new(&config.assistant_url).with_timeout(config.assistant_timeout),
    )?;
    let session = AssistantSession::with_conversation(
        config.parent_id.clone(),
        Arc::new(assistant),
        Conversation::from_history(&history),
    );

    let geocoder = ReverseGeocoder::new(&config.geocoder_url)?;

    // Build application state
    let state = AppState::new(
        db,
        config.parent_id.as_str(),
        Arc::new(session),
        Arc::new(geocoder),
    );

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Parent dashboard listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

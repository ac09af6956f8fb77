//! AI assistant routes.

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chat_format::{format_message, FormattedMessage};
use database::AssistantMessage;
use monitor_core::{Conversation, Entry};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::state::AppState;
use crate::view::AssistantEntryView;

/// Number of stored exchanges returned by the history endpoint.
const HISTORY_LIMIT: i64 = 100;

/// Assistant page template.
#[derive(Template)]
#[template(path = "assistant.html")]
pub struct AssistantTemplate {
    pub entries: Vec<AssistantEntryView>,
}

/// Question sent by the parent.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// The assistant's reply with its classified segments.
#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub formatted: FormattedMessage,
}

/// Render the assistant page from the live conversation.
pub async fn assistant_page(State(state): State<AppState>) -> AssistantTemplate {
    let entries = state.assistant.snapshot().await;
    AssistantTemplate {
        entries: entries.iter().map(AssistantEntryView::from).collect(),
    }
}

/// Ask the assistant a question.
///
/// Answered exchanges are stored; a failed request leaves the conversation
/// with an apology entry and returns an error.
pub async fn ask_api(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let answer = state.assistant.ask(&req.question).await?;

    if let Err(err) = database::assistant_message::insert_exchange(
        state.db.pool(),
        &state.parent_id,
        req.question.trim(),
        &answer,
    )
    .await
    {
        warn!(error = %err, "Failed to store assistant exchange");
    }

    info!(parent_id = %state.parent_id, "Assistant answered");
    let formatted = format_message(&answer);
    Ok(Json(AskResponse { answer, formatted }))
}

/// Current conversation, including pending and failed replies.
pub async fn history_api(State(state): State<AppState>) -> Json<Vec<Entry>> {
    Json(state.assistant.snapshot().await)
}

/// Delete stored history and start a fresh conversation.
pub async fn clear_api(State(state): State<AppState>) -> Result<StatusCode> {
    let removed =
        database::assistant_message::clear_history(state.db.pool(), &state.parent_id).await?;
    state.assistant.reset(Conversation::new()).await;
    info!(removed, "Assistant history cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Load stored exchanges to seed the conversation at startup.
pub async fn load_history(
    db: &database::Database,
    parent_id: &str,
) -> database::Result<Vec<AssistantMessage>> {
    database::assistant_message::list_history(db.pool(), parent_id, HISTORY_LIMIT).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebError;
    use crate::routes::test_support::{test_state, PARENT};
    use monitor_core::{DeliveryState, MonitorError, FAILED_ANSWER_TEXT};

    fn ask(question: &str) -> Json<AskRequest> {
        Json(AskRequest {
            question: question.to_string(),
        })
    }

    #[tokio::test]
    async fn test_ask_stores_exchange() {
        let state = test_state().await;

        let Json(reply) = ask_api(State(state.clone()), ask("Di mana Ayu?")).await.unwrap();
        assert_eq!(reply.answer, "**Jawaban:** Di mana Ayu?");
        assert!(matches!(
            reply.formatted.segments[0],
            chat_format::Segment::Bold { .. }
        ));

        let stored = load_history(&state.db, PARENT).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].question, "Di mana Ayu?");

        let Json(entries) = history_api(State(state)).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].delivery, DeliveryState::Resolved);
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_apology() {
        let state = test_state().await;

        let result = ask_api(State(state.clone()), ask("please fail")).await;
        assert!(matches!(
            result,
            Err(WebError::Monitor(MonitorError::Upstream { .. }))
        ));
        assert!(load_history(&state.db, PARENT).await.unwrap().is_empty());

        let page = assistant_page(State(state)).await;
        assert_eq!(page.entries.len(), 2);
        assert!(page.entries[1].failed);

        let html = page.render().unwrap();
        assert!(html.contains(FAILED_ANSWER_TEXT));
    }

    #[tokio::test]
    async fn test_clear_resets_conversation() {
        let state = test_state().await;
        ask_api(State(state.clone()), ask("Halo")).await.unwrap();

        assert_eq!(
            clear_api(State(state.clone())).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        assert!(load_history(&state.db, PARENT).await.unwrap().is_empty());
        let Json(entries) = history_api(State(state)).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let state = test_state().await;
        assert!(matches!(
            ask_api(State(state), ask("  ")).await,
            Err(WebError::Monitor(MonitorError::InvalidRequest(_)))
        ));
    }
}

//! Parent/child chat routes.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chat_format::{format_message, FormattedMessage};
use chrono::Utc;
use database::{AttachmentKind, ChatMessage, NewChatMessage, SenderRole};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::routes::LimitQuery;
use crate::state::AppState;
use crate::view::MessageView;

/// Chat page template.
#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub child_id: String,
    pub child_name: String,
    pub is_online: bool,
    pub messages: Vec<MessageView>,
}

/// A stored message with its classified segments.
#[derive(Serialize)]
pub struct MessageResponse {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub formatted: FormattedMessage,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        let formatted = format_message(&message.message);
        Self { message, formatted }
    }
}

/// Message sent by the parent.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub message: String,
    pub file_url: Option<String>,
    pub file_type: Option<AttachmentKind>,
    pub file_name: Option<String>,
}

/// Mark-read result.
#[derive(Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// Render the chat page for one child.
pub async fn chat_page(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(limit): Query<LimitQuery>,
) -> Result<ChatTemplate> {
    let child = state.owned_child(&child_id).await?;
    let pool = state.db.pool();

    let messages =
        database::chat_message::list_conversation(pool, &state.parent_id, &child.id, limit.resolve()?)
            .await?;
    let is_online = database::presence::get_presence(pool, &child.id)
        .await?
        .is_some_and(|p| p.is_online);

    let now = Utc::now();
    Ok(ChatTemplate {
        child_id: child.id,
        child_name: child.name,
        is_online,
        messages: messages.iter().map(|m| MessageView::new(m, now)).collect(),
    })
}

/// List a conversation, oldest first, with classified segments.
pub async fn messages_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(limit): Query<LimitQuery>,
) -> Result<Json<Vec<MessageResponse>>> {
    let child = state.owned_child(&child_id).await?;
    let messages = database::chat_message::list_conversation(
        state.db.pool(),
        &state.parent_id,
        &child.id,
        limit.resolve()?,
    )
    .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Send a message from the parent to a child.
pub async fn send_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let child = state.owned_child(&child_id).await?;

    let message = database::chat_message::insert_message(
        state.db.pool(),
        &NewChatMessage {
            child_id: child.id,
            parent_id: state.parent_id.to_string(),
            sender_role: SenderRole::Parent,
            message: req.message,
            file_url: req.file_url,
            file_type: req.file_type,
            file_name: req.file_name,
            created_at: None,
        },
    )
    .await?;

    info!(message_id = message.id, child_id = %message.child_id, "Message sent to child");
    Ok((StatusCode::CREATED, Json(message.into())))
}

/// Mark the child's messages in a conversation as read.
pub async fn mark_read_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Result<Json<MarkReadResponse>> {
    let child = state.owned_child(&child_id).await?;
    let updated = database::chat_message::mark_read(
        state.db.pool(),
        &state.parent_id,
        &child.id,
        SenderRole::Child,
    )
    .await?;

    Ok(Json(MarkReadResponse { updated }))
}

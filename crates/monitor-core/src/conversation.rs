//! Conversation state for the assistant panel.
//!
//! Messages move through an explicit reducer: sending a question appends
//! the question and a pending placeholder, and the outcome of the request
//! settles that placeholder in place. A settled placeholder never changes
//! again, so a late result for a request that already failed is dropped.

use database::{AssistantMessage, SenderRole};
use serde::Serialize;
use tracing::debug;

/// Text shown in place of an answer that could not be obtained.
pub const FAILED_ANSWER_TEXT: &str = "Sorry, the assistant could not answer right now.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Parent,
    Child,
}

impl From<SenderRole> for Role {
    fn from(role: SenderRole) -> Self {
        match role {
            SenderRole::Parent => Role::Parent,
            SenderRole::Child => Role::Child,
        }
    }
}

/// Delivery state of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DeliveryState {
    Pending,
    Resolved,
    Failed { error: String },
}

impl DeliveryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, DeliveryState::Pending)
    }
}

/// Identifier tying a pending placeholder to the request that fills it.
pub type RequestId = u64;

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub role: Role,
    pub text: String,
    pub created_at: String,
    pub delivery: DeliveryState,
    /// Set on assistant placeholders created by a request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl Entry {
    fn settled(role: Role, text: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: created_at.into(),
            delivery: DeliveryState::Resolved,
            request_id: None,
        }
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user asked a question.
    SendRequested { request_id: RequestId, question: String },
    /// The assistant answered.
    SendResolved { request_id: RequestId, answer: String },
    /// The request failed.
    SendFailed { request_id: RequestId, error: String },
}

impl Action {
    pub fn request_id(&self) -> RequestId {
        match self {
            Action::SendRequested { request_id, .. }
            | Action::SendResolved { request_id, .. }
            | Action::SendFailed { request_id, .. } => *request_id,
        }
    }
}

/// Whether an action changed the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Ordered assistant conversation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    entries: Vec<Entry>,
    #[serde(skip)]
    next_request: RequestId,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a conversation from stored question/answer pairs.
    pub fn from_history(history: &[AssistantMessage]) -> Self {
        let entries = history
            .iter()
            .flat_map(|exchange| {
                [
                    Entry::settled(Role::User, &exchange.question, &exchange.created_at),
                    Entry::settled(Role::Assistant, &exchange.answer, &exchange.created_at),
                ]
            })
            .collect();

        Self {
            entries,
            next_request: 0,
        }
    }

    /// Allocate an id for a new request.
    pub fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    /// Continue request ids after those handed out by `previous`.
    ///
    /// Results of requests still in flight from `previous` then never match
    /// a placeholder in this conversation.
    pub fn continue_request_ids(&mut self, previous: &Conversation) {
        self.next_request = self.next_request.max(previous.next_request);
    }

    /// Apply an action at time `now`.
    pub fn apply(&mut self, action: Action, now: &str) -> Outcome {
        let request_id = action.request_id();
        let outcome = match action {
            Action::SendRequested { request_id, question } => {
                if self.placeholder_index(request_id).is_some() {
                    Outcome::Ignored
                } else {
                    self.entries.push(Entry::settled(Role::User, question, now));
                    self.entries.push(Entry {
                        role: Role::Assistant,
                        text: String::new(),
                        created_at: now.to_string(),
                        delivery: DeliveryState::Pending,
                        request_id: Some(request_id),
                    });
                    Outcome::Applied
                }
            }
            Action::SendResolved { request_id, answer } => {
                self.settle(request_id, answer, DeliveryState::Resolved, now)
            }
            Action::SendFailed { request_id, error } => self.settle(
                request_id,
                FAILED_ANSWER_TEXT.to_string(),
                DeliveryState::Failed { error },
                now,
            ),
        };

        debug!(request_id, ?outcome, "Conversation action");
        outcome
    }

    fn settle(
        &mut self,
        request_id: RequestId,
        text: String,
        delivery: DeliveryState,
        now: &str,
    ) -> Outcome {
        let Some(index) = self.placeholder_index(request_id) else {
            return Outcome::Ignored;
        };
        let entry = &mut self.entries[index];
        if !entry.delivery.is_pending() {
            return Outcome::Ignored;
        }
        entry.text = text;
        entry.delivery = delivery;
        entry.created_at = now.to_string();
        Outcome::Applied
    }

    fn placeholder_index(&self, request_id: RequestId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.request_id == Some(request_id))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of replies still awaited.
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.delivery.is_pending())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

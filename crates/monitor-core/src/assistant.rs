//! AI assistant client and per-parent session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::conversation::{Action, Conversation, Entry, Outcome};
use crate::error::{MonitorError, Result};

/// Maximum question length accepted by [`AssistantSession::ask`].
pub const MAX_QUESTION_LENGTH: usize = 2000;

/// Answers parent questions about their children.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, user_id: &str, question: &str) -> Result<String>;
}

/// Configuration for [`HttpAssistant`].
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Endpoint receiving `POST {question, userId}`.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AssistantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest<'a> {
    question: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: Option<String>,
}

/// Assistant reached over HTTP.
pub struct HttpAssistant {
    client: Client,
    config: AssistantConfig,
}

impl HttpAssistant {
    pub fn new(config: AssistantConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!(url = %config.url, "Assistant client initialized");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }
}

#[async_trait]
impl Assistant for HttpAssistant {
    async fn ask(&self, user_id: &str, question: &str) -> Result<String> {
        debug!(user_id, "Sending question to assistant");

        let response = self
            .client
            .post(&self.config.url)
            .json(&AskRequest { question, user_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Upstream {
                service: "assistant",
                status: status.as_u16(),
            });
        }

        let body: AskResponse = response.json().await?;
        body.answer
            .filter(|answer| !answer.trim().is_empty())
            .ok_or(MonitorError::EmptyResponse("assistant"))
    }
}

/// A parent's assistant conversation plus the client answering it.
pub struct AssistantSession {
    user_id: String,
    conversation: Mutex<Conversation>,
    assistant: Arc<dyn Assistant>,
}

impl AssistantSession {
    pub fn new(user_id: impl Into<String>, assistant: Arc<dyn Assistant>) -> Self {
        Self::with_conversation(user_id, assistant, Conversation::new())
    }

    /// Start from an existing conversation, e.g. one rebuilt from history.
    pub fn with_conversation(
        user_id: impl Into<String>,
        assistant: Arc<dyn Assistant>,
        conversation: Conversation,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            conversation: Mutex::new(conversation),
            assistant,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Ask a question and wait for the reply.
    ///
    /// The conversation gets the question and a pending placeholder before
    /// the request is sent. The placeholder is settled with the answer or,
    /// on failure, with an apology while the error is returned.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(MonitorError::InvalidRequest("question is empty".to_string()));
        }
        if question.chars().count() > MAX_QUESTION_LENGTH {
            return Err(MonitorError::InvalidRequest(format!(
                "question exceeds {} characters",
                MAX_QUESTION_LENGTH
            )));
        }

        let request_id = {
            let mut conversation = self.conversation.lock().await;
            let request_id = conversation.next_request_id();
            conversation.apply(
                Action::SendRequested {
                    request_id,
                    question: question.to_string(),
                },
                &now(),
            );
            request_id
        };

        let result = self.assistant.ask(&self.user_id, question).await;

        let mut conversation = self.conversation.lock().await;
        let action = match &result {
            Ok(answer) => Action::SendResolved {
                request_id,
                answer: answer.clone(),
            },
            Err(err) => {
                warn!(user_id = %self.user_id, request_id, error = %err, "Assistant request failed");
                Action::SendFailed {
                    request_id,
                    error: err.to_string(),
                }
            }
        };
        if conversation.apply(action, &now()) == Outcome::Ignored {
            debug!(request_id, "Discarded stale assistant result");
        }

        result
    }

    /// Copy of the current conversation entries.
    pub async fn snapshot(&self) -> Vec<Entry> {
        self.conversation.lock().await.entries().to_vec()
    }

    /// Replace the conversation, e.g. after history is cleared.
    ///
    /// Requests sent before the reset settle nothing when they finish.
    pub async fn reset(&self, mut conversation: Conversation) {
        let mut current = self.conversation.lock().await;
        conversation.continue_request_ids(&current);
        *current = conversation;
    }
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

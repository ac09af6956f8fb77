//! Child overview aggregation for the dashboard and chat list.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use database::{Child, SenderRole};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::store::{ChatStore, PresenceSource};

/// Maximum characters shown in a last-message preview.
const PREVIEW_CHARS: usize = 60;

/// Timestamp layout used by the store.
const STORE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the child overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildOverviewEntry {
    pub child_id: String,
    pub child_name: String,
    /// Raw text of the newest message, if any.
    pub last_message: Option<String>,
    /// Single-line preview of the newest message.
    pub last_preview: Option<String>,
    /// Who sent the newest message.
    pub last_sender: Option<SenderRole>,
    /// Store timestamp of the newest message.
    pub last_time: Option<String>,
    pub is_online: bool,
    /// Unread messages from the child; 0 when the count could not be loaded.
    pub unread: i64,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    /// One entry per child whose data loaded.
    pub entries: Vec<ChildOverviewEntry>,
    /// Children left out because their latest message could not be loaded.
    pub failed: Vec<String>,
}

impl Overview {
    /// Entries whose child name contains `query`, ignoring case.
    ///
    /// An empty or blank query returns every entry.
    pub fn filter_by_name(&self, query: &str) -> Vec<&ChildOverviewEntry> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| query.is_empty() || entry.child_name.to_lowercase().contains(&query))
            .collect()
    }

    /// Sort entries by newest activity first; children without messages go last.
    pub fn sort_by_recent(&mut self) {
        self.entries
            .sort_by(|a, b| b.last_time.cmp(&a.last_time).then_with(|| a.child_name.cmp(&b.child_name)));
    }

    /// Whether some children could not be loaded.
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Builds the overview from injected store and presence sources.
#[derive(Clone)]
pub struct OverviewAggregator {
    store: Arc<dyn ChatStore>,
    presence: Arc<dyn PresenceSource>,
}

impl OverviewAggregator {
    pub fn new(store: Arc<dyn ChatStore>, presence: Arc<dyn PresenceSource>) -> Self {
        Self { store, presence }
    }

    /// Load the latest message and presence of every child of `parent_id`.
    ///
    /// Children are fetched concurrently. A child whose latest message
    /// cannot be loaded is left out of `entries` and listed in `failed`; the
    /// call itself never fails. A presence failure only marks the child
    /// offline and an unread-count failure reports 0.
    pub async fn build(&self, parent_id: &str, children: &[Child]) -> Overview {
        let owned = children.iter().filter(|child| {
            let ours = child.parent_id == parent_id;
            if !ours {
                warn!(child_id = %child.id, parent_id, "Skipping child of another parent");
            }
            ours
        });

        let results = join_all(owned.map(|child| self.load_entry(parent_id, child))).await;

        let mut overview = Overview::default();
        for (child, result) in results {
            match result {
                Some(entry) => overview.entries.push(entry),
                None => overview.failed.push(child.id.clone()),
            }
        }

        debug!(
            parent_id,
            loaded = overview.entries.len(),
            failed = overview.failed.len(),
            "Overview built"
        );
        overview
    }

    async fn load_entry<'a>(
        &self,
        parent_id: &str,
        child: &'a Child,
    ) -> (&'a Child, Option<ChildOverviewEntry>) {
        let (message, online, unread) = futures::join!(
            self.store.latest_message(&child.id),
            self.presence.is_online(&child.id),
            self.store.unread_count(parent_id, &child.id)
        );

        let message = match message {
            Ok(message) => message,
            Err(err) => {
                warn!(child_id = %child.id, error = %err, "Failed to load latest message");
                return (child, None);
            }
        };

        let is_online = online.unwrap_or_else(|err| {
            warn!(child_id = %child.id, error = %err, "Failed to load presence");
            false
        });

        let unread = unread.unwrap_or_else(|err| {
            warn!(child_id = %child.id, error = %err, "Failed to count unread messages");
            0
        });

        let entry = ChildOverviewEntry {
            child_id: child.id.clone(),
            child_name: child.name.clone(),
            last_preview: message
                .as_ref()
                .map(|m| preview_for(&m.message, m.file_name.as_deref())),
            last_sender: message.as_ref().map(|m| m.sender_role),
            last_time: message.as_ref().map(|m| m.created_at.clone()),
            last_message: message.map(|m| m.message),
            is_online,
            unread,
        };
        (child, Some(entry))
    }
}

/// Preview for a message body, falling back to the attachment name.
fn preview_for(text: &str, file_name: Option<&str>) -> String {
    if text.trim().is_empty() {
        if let Some(name) = file_name {
            return format!("📎 {}", name);
        }
    }
    chat_format::preview(text, PREVIEW_CHARS)
}

/// Short relative label for a store timestamp, e.g. "5m ago".
///
/// Unparseable timestamps are returned unchanged.
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, STORE_TIME_FORMAT) else {
        return timestamp.to_string();
    };

    let seconds = (now - parsed.and_utc()).num_seconds().max(0);
    match seconds {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", seconds / 60),
        3600..=86_399 => format!("{}h ago", seconds / 3600),
        86_400..=604_799 => format!("{}d ago", seconds / 86_400),
        _ => parsed.format("%Y-%m-%d").to_string(),
    }
}

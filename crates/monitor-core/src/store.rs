//! Store and presence traits injected into dashboard services.

use async_trait::async_trait;
use database::{ChatMessage, Database};

use crate::error::Result;

/// Read access to chat messages.
///
/// Abstracted so services can be exercised without a live store.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Newest message exchanged with a child, if any.
    async fn latest_message(&self, child_id: &str) -> Result<Option<ChatMessage>>;

    /// Messages from a child the parent has not read yet.
    async fn unread_count(&self, parent_id: &str, child_id: &str) -> Result<i64>;
}

/// Online/offline state of child devices.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// Whether the child's device is currently online.
    async fn is_online(&self, child_id: &str) -> Result<bool>;
}

#[async_trait]
impl ChatStore for Database {
    async fn latest_message(&self, child_id: &str) -> Result<Option<ChatMessage>> {
        let message = database::chat_message::latest_for_child(self.pool(), child_id).await?;
        Ok(message)
    }

    async fn unread_count(&self, parent_id: &str, child_id: &str) -> Result<i64> {
        let count =
            database::chat_message::count_unread_from_child(self.pool(), parent_id, child_id)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl PresenceSource for Database {
    async fn is_online(&self, child_id: &str) -> Result<bool> {
        let presence = database::presence::get_presence(self.pool(), child_id).await?;
        Ok(presence.is_some_and(|p| p.is_online))
    }
}

/// A presence source that reports every device as offline.
#[derive(Debug, Clone, Default)]
pub struct OfflinePresence;

#[async_trait]
impl PresenceSource for OfflinePresence {
    async fn is_online(&self, _child_id: &str) -> Result<bool> {
        Ok(false)
    }
}

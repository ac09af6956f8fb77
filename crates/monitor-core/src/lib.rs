//! Dashboard services built on top of the store.
//!
//! This crate provides the pieces of the parent dashboard that go beyond a
//! single query:
//!
//! - [`OverviewAggregator`] loads the latest message and presence of every
//!   child concurrently, dropping children whose data fails to load.
//! - [`Conversation`] tracks assistant questions and their pending, resolved,
//!   or failed replies through an explicit reducer.
//! - [`AssistantSession`] and [`HttpAssistant`] talk to the AI assistant.
//! - [`ReverseGeocoder`] resolves coordinates to addresses.
//!
//! Store access, presence, the assistant, and the geocoder are all traits so
//! callers can inject fakes.
//!
//! # Architecture
//!
//! ```text
//!   parent-web handler
//!          ↓
//! ┌──────────────────────────────────────────────┐
//! │ OverviewAggregator                           │
//! │   per child, concurrently:                   │
//! │     ChatStore::latest_message ─┐             │
//! │     PresenceSource::is_online ─┴→ entry      │
//! │   failed children → Overview::failed         │
//! └──────────────────────────────────────────────┘
//!
//!   AssistantSession::ask
//!     SendRequested  → question + pending placeholder
//!     Assistant::ask   (lock released)
//!     SendResolved / SendFailed → placeholder settled
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use monitor_core::{OverviewAggregator, OfflinePresence};
//!
//! # async fn example(db: database::Database) -> database::Result<()> {
//! let children = database::child::list_children(db.pool(), "parent-1").await?;
//! let aggregator = OverviewAggregator::new(Arc::new(db.clone()), Arc::new(OfflinePresence));
//! let overview = aggregator.build("parent-1", &children).await;
//! for entry in overview.filter_by_name("ay") {
//!     println!("{}: {:?}", entry.child_name, entry.last_preview);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod geocode;
pub mod overview;
pub mod store;

pub use assistant::{Assistant, AssistantConfig, AssistantSession, HttpAssistant};
pub use conversation::{
    Action, Conversation, DeliveryState, Entry, Outcome, RequestId, Role, FAILED_ANSWER_TEXT,
};
pub use error::{MonitorError, Result};
pub use geocode::{
    address_or_fallback, Geocoder, ReverseGeocoder, ADDRESS_NOT_FOUND, DEFAULT_GEOCODER_URL,
};
pub use overview::{relative_time, ChildOverviewEntry, Overview, OverviewAggregator};
pub use store::{ChatStore, OfflinePresence, PresenceSource};

//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use monitor_core::{AssistantSession, Geocoder, OverviewAggregator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Signed-in parent account.
    pub parent_id: Arc<str>,
    /// Child overview builder.
    pub overview: OverviewAggregator,
    /// Assistant conversation of the signed-in parent.
    pub assistant: Arc<AssistantSession>,
    /// Address lookup for location fixes.
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The overview reads messages and presence from `db`.
    pub fn new(
        db: Database,
        parent_id: impl Into<Arc<str>>,
        assistant: Arc<AssistantSession>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let store = Arc::new(db.clone());
        let overview = OverviewAggregator::new(store.clone(), store);
        Self {
            db,
            parent_id: parent_id.into(),
            overview,
            assistant,
            geocoder,
        }
    }

    /// Make sure a child belongs to the signed-in parent.
    pub async fn owned_child(&self, child_id: &str) -> database::Result<database::Child> {
        database::child::get_child_for_parent(self.db.pool(), &self.parent_id, child_id).await
    }
}

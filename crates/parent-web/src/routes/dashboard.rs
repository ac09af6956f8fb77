//! Dashboard routes.

use askama::Template;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use monitor_core::{relative_time, ChildOverviewEntry, Overview};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub query: String,
    pub children: Vec<ChildCard>,
    pub failed_count: usize,
    pub total_children: usize,
}

/// One child card on the dashboard.
#[derive(Clone, Serialize)]
pub struct ChildCard {
    pub child_id: String,
    pub child_name: String,
    pub preview: String,
    pub time_label: String,
    pub is_online: bool,
    pub unread: i64,
}

impl ChildCard {
    fn new(entry: &ChildOverviewEntry, now: chrono::DateTime<Utc>) -> Self {
        Self {
            child_id: entry.child_id.clone(),
            child_name: entry.child_name.clone(),
            preview: entry
                .last_preview
                .clone()
                .unwrap_or_else(|| "No messages yet".to_string()),
            time_label: entry
                .last_time
                .as_deref()
                .map(|time| relative_time(time, now))
                .unwrap_or_default(),
            is_online: entry.is_online,
            unread: entry.unread,
        }
    }
}

/// `?q=` name filter.
#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub q: String,
}

/// Overview response for the API.
#[derive(Serialize)]
pub struct OverviewResponse {
    pub children: Vec<ChildOverviewEntry>,
    pub failed: Vec<String>,
}

/// Render the dashboard page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<DashboardTemplate> {
    let overview = load_overview(&state).await?;
    let now = Utc::now();

    let children: Vec<ChildCard> = overview
        .filter_by_name(&query.q)
        .into_iter()
        .map(|entry| ChildCard::new(entry, now))
        .collect();

    Ok(DashboardTemplate {
        query: query.q,
        children,
        failed_count: overview.failed.len(),
        total_children: overview.entries.len() + overview.failed.len(),
    })
}

/// Get the child overview as JSON.
pub async fn overview_api(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<OverviewResponse>> {
    let overview = load_overview(&state).await?;
    let children = overview
        .filter_by_name(&query.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(OverviewResponse {
        children,
        failed: overview.failed,
    }))
}

/// Build the overview for the signed-in parent, newest activity first.
async fn load_overview(state: &AppState) -> Result<Overview> {
    let children = database::child::list_children(state.db.pool(), &state.parent_id).await?;
    let mut overview = state.overview.build(&state.parent_id, &children).await;
    overview.sort_by_recent();
    Ok(overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{add_child, test_state, PARENT};
    use async_trait::async_trait;
    use database::{ChatMessage, Database, NewChatMessage, SenderRole};
    use monitor_core::{ChatStore, MonitorError, OverviewAggregator};
    use std::sync::Arc;

    /// Database-backed store whose unread count fails for one child.
    struct UnreadOutage {
        db: Database,
        broken_child: String,
    }

    #[async_trait]
    impl ChatStore for UnreadOutage {
        async fn latest_message(&self, child_id: &str) -> monitor_core::Result<Option<ChatMessage>> {
            self.db.latest_message(child_id).await
        }

        async fn unread_count(&self, parent_id: &str, child_id: &str) -> monitor_core::Result<i64> {
            if child_id == self.broken_child {
                return Err(MonitorError::EmptyResponse("unread"));
            }
            self.db.unread_count(parent_id, child_id).await
        }
    }

    async fn say(state: &AppState, child_id: &str, text: &str, at: &str) {
        database::chat_message::insert_message(
            state.db.pool(),
            &NewChatMessage {
                child_id: child_id.to_string(),
                parent_id: PARENT.to_string(),
                sender_role: SenderRole::Child,
                message: text.to_string(),
                file_url: None,
                file_type: None,
                file_name: None,
                created_at: Some(at.to_string()),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_overview_api_sorted_and_filtered() {
        let state = test_state().await;
        let ayu = add_child(&state, PARENT, "Ayu").await;
        let budi = add_child(&state, PARENT, "Budi").await;
        add_child(&state, "someone-else", "Citra").await;

        say(&state, &ayu, "Sudah di sekolah", "2024-05-01 07:00:00").await;
        say(&state, &budi, "**Pulang** jam 3", "2024-05-01 09:00:00").await;
        database::presence::set_presence(state.db.pool(), &ayu, true)
            .await
            .unwrap();

        let Json(all) = overview_api(State(state.clone()), Query(OverviewQuery::default()))
            .await
            .unwrap();
        let names: Vec<_> = all.children.iter().map(|c| c.child_name.as_str()).collect();
        assert_eq!(names, ["Budi", "Ayu"]);
        assert_eq!(all.children[0].last_preview.as_deref(), Some("Pulang jam 3"));
        assert!(all.children[1].is_online);
        assert!(all.failed.is_empty());

        let Json(filtered) = overview_api(
            State(state),
            Query(OverviewQuery {
                q: "AY".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(filtered.children.len(), 1);
        assert_eq!(filtered.children[0].child_id, ayu);
    }

    #[tokio::test]
    async fn test_dashboard_page_renders() {
        let state = test_state().await;
        let ayu = add_child(&state, PARENT, "Ayu").await;
        add_child(&state, PARENT, "Budi").await;
        say(&state, &ayu, "Halo Bunda", "2024-05-01 07:00:00").await;

        let page = dashboard_page(State(state), Query(OverviewQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.total_children, 2);
        assert_eq!(page.children[0].preview, "Halo Bunda");
        assert_eq!(page.children[1].preview, "No messages yet");
        assert_eq!(page.children[0].unread, 1);

        let html = page.render().unwrap();
        assert!(html.contains("Ayu"));
        assert!(html.contains(&format!("/children/{}/chat", ayu)));
    }

    #[tokio::test]
    async fn test_dashboard_survives_unread_failure() {
        let mut state = test_state().await;
        let ayu = add_child(&state, PARENT, "Ayu").await;
        let budi = add_child(&state, PARENT, "Budi").await;
        say(&state, &ayu, "Halo Bunda", "2024-05-01 07:00:00").await;
        say(&state, &budi, "Sudah makan", "2024-05-01 08:00:00").await;

        let store = UnreadOutage {
            db: state.db.clone(),
            broken_child: budi.clone(),
        };
        state.overview = OverviewAggregator::new(Arc::new(store), Arc::new(state.db.clone()));

        let page = dashboard_page(State(state), Query(OverviewQuery::default()))
            .await
            .unwrap();
        assert_eq!(page.children.len(), 2);
        assert_eq!(page.failed_count, 0);
        assert_eq!(page.children[0].child_id, budi);
        assert_eq!(page.children[0].preview, "Sudah makan");
        assert_eq!(page.children[0].unread, 0);
        assert_eq!(page.children[1].unread, 1);
    }
}

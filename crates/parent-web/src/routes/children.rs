//! Child profile routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{Child, NewChild};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Child profile fields sent by the client.
#[derive(Debug, Deserialize)]
pub struct ChildRequest {
    pub name: String,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
}

impl ChildRequest {
    fn into_new_child(self, parent_id: &str) -> NewChild {
        NewChild {
            parent_id: parent_id.to_string(),
            name: self.name,
            date_of_birth: self.date_of_birth.filter(|d| !d.trim().is_empty()),
            sex: self.sex.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// List the parent's children.
pub async fn list_api(State(state): State<AppState>) -> Result<Json<Vec<Child>>> {
    let children = database::child::list_children(state.db.pool(), &state.parent_id).await?;
    Ok(Json(children))
}

/// Add a child; the response carries the generated pairing code.
pub async fn create_api(
    State(state): State<AppState>,
    Json(req): Json<ChildRequest>,
) -> Result<(StatusCode, Json<Child>)> {
    let child =
        database::child::create_child(state.db.pool(), &req.into_new_child(&state.parent_id))
            .await?;
    info!(child_id = %child.id, "Child added");
    Ok((StatusCode::CREATED, Json(child)))
}

/// Get one child.
pub async fn get_api(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Child>> {
    Ok(Json(state.owned_child(&id).await?))
}

/// Update a child's profile.
pub async fn update_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChildRequest>,
) -> Result<Json<Child>> {
    let pool = state.db.pool();
    database::child::update_child(pool, &id, &req.into_new_child(&state.parent_id)).await?;
    Ok(Json(database::child::get_child(pool, &id).await?))
}

/// Remove a child and everything recorded for it.
pub async fn delete_api(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    database::child::delete_child(state.db.pool(), &state.parent_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Safe zone routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::SafeZone;
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Safe zone sent by the client.
#[derive(Debug, Deserialize)]
pub struct SafeZoneRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

/// List a child's safe zones.
pub async fn list_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Result<Json<Vec<SafeZone>>> {
    let child = state.owned_child(&child_id).await?;
    Ok(Json(
        database::safe_zone::list_safe_zones(state.db.pool(), &child.id).await?,
    ))
}

/// Add a safe zone for a child.
pub async fn create_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(req): Json<SafeZoneRequest>,
) -> Result<(StatusCode, Json<SafeZone>)> {
    let child = state.owned_child(&child_id).await?;
    let zone = database::safe_zone::create_safe_zone(
        state.db.pool(),
        &child.id,
        &req.name,
        req.latitude,
        req.longitude,
        req.radius_m,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Remove a safe zone.
pub async fn delete_api(
    State(state): State<AppState>,
    Path((child_id, zone_id)): Path<(String, i64)>,
) -> Result<StatusCode> {
    let child = state.owned_child(&child_id).await?;
    database::safe_zone::delete_safe_zone(state.db.pool(), &child.id, zone_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{add_child, test_state, PARENT};

    fn zone(name: &str, radius_m: f64) -> SafeZoneRequest {
        SafeZoneRequest {
            name: name.to_string(),
            latitude: -6.2,
            longitude: 106.8,
            radius_m,
        }
    }

    #[tokio::test]
    async fn test_safe_zone_routes() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;

        let (_, Json(home)) = create_api(State(state.clone()), Path(child.clone()), Json(zone("Rumah", 150.0)))
            .await
            .unwrap();
        assert!(create_api(State(state.clone()), Path(child.clone()), Json(zone("Jauh", 1.0)))
            .await
            .is_err());

        let Json(zones) = list_api(State(state.clone()), Path(child.clone())).await.unwrap();
        assert_eq!(zones.len(), 1);

        delete_api(State(state.clone()), Path((child.clone(), home.id)))
            .await
            .unwrap();
        let Json(zones) = list_api(State(state), Path(child)).await.unwrap();
        assert!(zones.is_empty());
    }
}

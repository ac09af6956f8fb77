//! Location routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::Location;
use monitor_core::address_or_fallback;
use serde::Serialize;

use crate::error::Result;
use crate::routes::LimitQuery;
use crate::state::AppState;

/// Latest fix with its resolved address.
#[derive(Serialize)]
pub struct LatestLocation {
    #[serde(flatten)]
    pub location: Location,
    pub address: String,
    pub map_url: String,
}

/// Latest known location of a child, or `null` if none was recorded.
pub async fn latest_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Result<Json<Option<LatestLocation>>> {
    let child = state.owned_child(&child_id).await?;
    let Some(location) = database::location::latest_location(state.db.pool(), &child.id).await?
    else {
        return Ok(Json(None));
    };

    let address =
        address_or_fallback(state.geocoder.as_ref(), location.latitude, location.longitude).await;
    let map_url = chat_format::MapTarget::Coordinates {
        lat: location.latitude,
        lng: location.longitude,
    }
    .href();

    Ok(Json(Some(LatestLocation {
        location,
        address,
        map_url,
    })))
}

/// Location history, newest first.
pub async fn history_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(limit): Query<LimitQuery>,
) -> Result<Json<Vec<Location>>> {
    let child = state.owned_child(&child_id).await?;
    let history =
        database::location::location_history(state.db.pool(), &child.id, limit.resolve()?).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{add_child, test_state, PARENT};
    use monitor_core::ADDRESS_NOT_FOUND;

    #[tokio::test]
    async fn test_latest_with_address() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;
        let pool = state.db.pool();

        let Json(none) = latest_api(State(state.clone()), Path(child.clone()))
            .await
            .unwrap();
        assert!(none.is_none());

        database::location::record_location(pool, &child, -6.3, 106.7, None, Some("2024-05-01 07:00:00"))
            .await
            .unwrap();
        database::location::record_location(pool, &child, -6.2, 106.8, Some(12.5), Some("2024-05-01 08:00:00"))
            .await
            .unwrap();

        let Json(latest) = latest_api(State(state.clone()), Path(child.clone()))
            .await
            .unwrap();
        let latest = latest.unwrap();
        assert_eq!(latest.location.latitude, -6.2);
        assert_eq!(latest.address, "Jl. Merdeka 1, Jakarta");
        assert_eq!(latest.map_url, "https://www.google.com/maps?q=-6.2,106.8");

        let Json(history) = history_api(
            State(state),
            Path(child),
            Query(LimitQuery { limit: Some(1) }),
        )
        .await
        .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, "2024-05-01 08:00:00");
    }

    #[tokio::test]
    async fn test_unresolvable_address_falls_back() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;
        database::location::record_location(state.db.pool(), &child, 0.0, 0.0, None, None)
            .await
            .unwrap();

        let Json(latest) = latest_api(State(state), Path(child)).await.unwrap();
        assert_eq!(latest.unwrap().address, ADDRESS_NOT_FOUND);
    }
}

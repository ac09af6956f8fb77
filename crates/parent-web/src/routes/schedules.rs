//! Activity schedule routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{NewSchedule, Schedule};
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Schedule entry sent by the client.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub activity_type: String,
    pub description: Option<String>,
    #[serde(default = "default_urgency")]
    pub urgency: String,
    #[serde(default = "default_recurrence")]
    pub recurrence: String,
    #[serde(default)]
    pub notify_before: i64,
}

fn default_urgency() -> String {
    "low".to_string()
}

fn default_recurrence() -> String {
    "weekly".to_string()
}

/// New status for a schedule entry.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// List a child's schedule by weekday and start time.
pub async fn list_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Result<Json<Vec<Schedule>>> {
    let child = state.owned_child(&child_id).await?;
    let schedules = database::schedule::list_schedules(state.db.pool(), &child.id).await?;
    Ok(Json(schedules))
}

/// Add a schedule entry for a child.
pub async fn create_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(req): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>)> {
    let child = state.owned_child(&child_id).await?;

    let schedule = database::schedule::create_schedule(
        state.db.pool(),
        &NewSchedule {
            child_id: child.id,
            day_of_week: req.day_of_week,
            start_time: req.start_time,
            end_time: req.end_time,
            activity_type: req.activity_type,
            description: req.description.filter(|d| !d.trim().is_empty()),
            urgency: req.urgency,
            recurrence: req.recurrence,
            notify_before: req.notify_before,
        },
    )
    .await?;

    info!(schedule_id = schedule.id, child_id = %schedule.child_id, "Schedule created");
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Update the status of a schedule entry.
pub async fn status_api(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Schedule>> {
    let schedule = owned_schedule(&state, id).await?;
    let pool = state.db.pool();
    database::schedule::update_status(pool, schedule.id, &req.status).await?;
    Ok(Json(database::schedule::get_schedule(pool, schedule.id).await?))
}

/// Delete a schedule entry.
pub async fn delete_api(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let schedule = owned_schedule(&state, id).await?;
    database::schedule::delete_schedule(state.db.pool(), schedule.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load a schedule entry whose child belongs to the signed-in parent.
async fn owned_schedule(state: &AppState, id: i64) -> Result<Schedule> {
    let schedule = database::schedule::get_schedule(state.db.pool(), id).await?;
    state.owned_child(&schedule.child_id).await?;
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebError;
    use crate::routes::test_support::{add_child, test_state, PARENT};
    use database::DatabaseError;

    fn request(day: i64, start: &str, end: &str) -> ScheduleRequest {
        ScheduleRequest {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            activity_type: "sekolah".to_string(),
            description: Some(String::new()),
            urgency: default_urgency(),
            recurrence: default_recurrence(),
            notify_before: 15,
        }
    }

    #[tokio::test]
    async fn test_schedule_routes() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;

        let (status, Json(created)) = create_api(
            State(state.clone()),
            Path(child.clone()),
            Json(request(1, "07:00", "12:00")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.description.is_none());

        let Json(updated) = status_api(
            State(state.clone()),
            Path(created.id),
            Json(StatusRequest {
                status: "done".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, "done");

        let Json(list) = list_api(State(state.clone()), Path(child)).await.unwrap();
        assert_eq!(list.len(), 1);

        assert_eq!(
            delete_api(State(state), Path(created.id)).await.unwrap(),
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn test_rejects_inverted_times() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;

        let result = create_api(State(state), Path(child), Json(request(2, "15:00", "14:00"))).await;
        assert!(matches!(
            result,
            Err(WebError::Database(DatabaseError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_other_parents_schedule_hidden() {
        let state = test_state().await;
        let stranger = add_child(&state, "someone-else", "Citra").await;
        let schedule = database::schedule::create_schedule(
            state.db.pool(),
            &NewSchedule {
                child_id: stranger,
                day_of_week: 3,
                start_time: "10:00".to_string(),
                end_time: "11:00".to_string(),
                activity_type: "les".to_string(),
                description: None,
                urgency: "low".to_string(),
                recurrence: "once".to_string(),
                notify_before: 0,
            },
        )
        .await
        .unwrap();

        assert!(delete_api(State(state.clone()), Path(schedule.id)).await.is_err());
        assert!(database::schedule::get_schedule(state.db.pool(), schedule.id)
            .await
            .is_ok());
    }
}

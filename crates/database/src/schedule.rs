//! Activity schedule persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewSchedule, Schedule};
use crate::validation::{validate_schedule, validate_status};

/// Create a schedule entry with status `pending`.
pub async fn create_schedule(pool: &SqlitePool, schedule: &NewSchedule) -> Result<Schedule> {
    validate_schedule(schedule)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO schedules
            (child_id, day_of_week, start_time, end_time, activity_type, description,
             urgency, recurrence, notify_before, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        RETURNING id
        "#,
    )
    .bind(&schedule.child_id)
    .bind(schedule.day_of_week)
    .bind(&schedule.start_time)
    .bind(&schedule.end_time)
    .bind(schedule.activity_type.trim())
    .bind(&schedule.description)
    .bind(&schedule.urgency)
    .bind(&schedule.recurrence)
    .bind(schedule.notify_before)
    .fetch_one(pool)
    .await?;

    get_schedule(pool, id).await
}

/// Get a schedule entry by ID.
pub async fn get_schedule(pool: &SqlitePool, id: i64) -> Result<Schedule> {
    sqlx::query_as::<_, Schedule>(
        r#"
        SELECT id, child_id, day_of_week, start_time, end_time, activity_type, description,
               urgency, recurrence, notify_before, status
        FROM schedules
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Schedule",
        id: id.to_string(),
    })
}

/// List a child's schedule ordered by weekday, then start time.
pub async fn list_schedules(pool: &SqlitePool, child_id: &str) -> Result<Vec<Schedule>> {
    let schedules = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT id, child_id, day_of_week, start_time, end_time, activity_type, description,
               urgency, recurrence, notify_before, status
        FROM schedules
        WHERE child_id = ?
        ORDER BY day_of_week, start_time
        "#,
    )
    .bind(child_id)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

/// Update the status of a schedule entry.
pub async fn update_status(pool: &SqlitePool, id: i64, status: &str) -> Result<()> {
    validate_status(status)?;

    let result = sqlx::query(
        r#"
        UPDATE schedules
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Schedule",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a schedule entry.
pub async fn delete_schedule(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM schedules
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Schedule",
            id: id.to_string(),
        });
    }

    Ok(())
}

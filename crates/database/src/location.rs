//! Location history persistence.

use sqlx::SqlitePool;

use crate::models::Location;
use crate::validation::validate_coordinates;
use crate::Result;

/// Record a location fix for a child.
///
/// `timestamp` defaults to the current time when `None`.
pub async fn record_location(
    pool: &SqlitePool,
    child_id: &str,
    latitude: f64,
    longitude: f64,
    accuracy: Option<f64>,
    timestamp: Option<&str>,
) -> Result<i64> {
    validate_coordinates(latitude, longitude)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO locations (child_id, latitude, longitude, accuracy, timestamp)
        VALUES (?, ?, ?, ?, COALESCE(?, datetime('now')))
        RETURNING id
        "#,
    )
    .bind(child_id)
    .bind(latitude)
    .bind(longitude)
    .bind(accuracy)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Get the most recent location of a child.
pub async fn latest_location(pool: &SqlitePool, child_id: &str) -> Result<Option<Location>> {
    let location = sqlx::query_as::<_, Location>(
        r#"
        SELECT id, child_id, latitude, longitude, accuracy, timestamp
        FROM locations
        WHERE child_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(child_id)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

/// List a child's location history, newest first.
pub async fn location_history(
    pool: &SqlitePool,
    child_id: &str,
    limit: i64,
) -> Result<Vec<Location>> {
    let locations = sqlx::query_as::<_, Location>(
        r#"
        SELECT id, child_id, latitude, longitude, accuracy, timestamp
        FROM locations
        WHERE child_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(child_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

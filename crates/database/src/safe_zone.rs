//! Safe zone persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::SafeZone;
use crate::validation::validate_safe_zone;

/// Create a safe zone around a point.
pub async fn create_safe_zone(
    pool: &SqlitePool,
    child_id: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
) -> Result<SafeZone> {
    validate_safe_zone(name, latitude, longitude, radius_m)?;

    let zone = sqlx::query_as::<_, SafeZone>(
        r#"
        INSERT INTO safe_zones (child_id, name, latitude, longitude, radius_m)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, child_id, name, latitude, longitude, radius_m, created_at
        "#,
    )
    .bind(child_id)
    .bind(name.trim())
    .bind(latitude)
    .bind(longitude)
    .bind(radius_m)
    .fetch_one(pool)
    .await?;

    tracing::info!(zone_id = zone.id, child_id = %child_id, "Safe zone created");
    Ok(zone)
}

/// List a child's safe zones by name.
pub async fn list_safe_zones(pool: &SqlitePool, child_id: &str) -> Result<Vec<SafeZone>> {
    let zones = sqlx::query_as::<_, SafeZone>(
        r#"
        SELECT id, child_id, name, latitude, longitude, radius_m, created_at
        FROM safe_zones
        WHERE child_id = ?
        ORDER BY name
        "#,
    )
    .bind(child_id)
    .fetch_all(pool)
    .await?;

    Ok(zones)
}

/// Delete a safe zone belonging to a child.
pub async fn delete_safe_zone(pool: &SqlitePool, child_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM safe_zones
        WHERE id = ? AND child_id = ?
        "#,
    )
    .bind(id)
    .bind(child_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "SafeZone",
            id: id.to_string(),
        });
    }

    Ok(())
}

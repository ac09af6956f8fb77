//! Child device presence.

use sqlx::SqlitePool;

use crate::models::Presence;
use crate::Result;

/// Record whether a child device is online.
pub async fn set_presence(pool: &SqlitePool, child_id: &str, is_online: bool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO child_presence (child_id, is_online)
        VALUES (?, ?)
        ON CONFLICT(child_id) DO UPDATE SET
            is_online = excluded.is_online,
            last_seen = datetime('now')
        "#,
    )
    .bind(child_id)
    .bind(is_online)
    .execute(pool)
    .await?;

    tracing::debug!(child_id = %child_id, is_online, "Presence updated");
    Ok(())
}

/// Get the last known presence of a child device.
pub async fn get_presence(pool: &SqlitePool, child_id: &str) -> Result<Option<Presence>> {
    let presence = sqlx::query_as::<_, Presence>(
        r#"
        SELECT child_id, is_online, last_seen
        FROM child_presence
        WHERE child_id = ?
        "#,
    )
    .bind(child_id)
    .fetch_optional(pool)
    .await?;

    Ok(presence)
}

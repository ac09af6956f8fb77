//! Call log persistence.

use sqlx::SqlitePool;

use crate::models::{CallLog, CallType};
use crate::validation::ValidationError;
use crate::Result;

/// Record a call made or received on a child device.
pub async fn record_call(
    pool: &SqlitePool,
    child_id: &str,
    phone_number: &str,
    call_type: CallType,
    duration: i64,
    timestamp: Option<&str>,
) -> Result<i64> {
    if phone_number.trim().is_empty() {
        return Err(ValidationError::Empty("phone_number".to_string()).into());
    }
    if duration < 0 {
        return Err(ValidationError::InvalidValue {
            field: "duration".to_string(),
            value: duration.to_string(),
        }
        .into());
    }

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO call_logs (child_id, phone_number, type, duration, timestamp)
        VALUES (?, ?, ?, ?, COALESCE(?, datetime('now')))
        RETURNING id
        "#,
    )
    .bind(child_id)
    .bind(phone_number.trim())
    .bind(call_type)
    .bind(duration)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List a child's calls, newest first.
pub async fn list_calls(pool: &SqlitePool, child_id: &str, limit: i64) -> Result<Vec<CallLog>> {
    let calls = sqlx::query_as::<_, CallLog>(
        r#"
        SELECT id, child_id, phone_number, type, duration, timestamp
        FROM call_logs
        WHERE child_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(child_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(calls)
}

/// Count a child's calls grouped by call type.
pub async fn count_calls_by_type(pool: &SqlitePool, child_id: &str) -> Result<Vec<(CallType, i64)>> {
    let rows = sqlx::query_as::<_, (CallType, i64)>(
        r#"
        SELECT type, COUNT(*) as count
        FROM call_logs
        WHERE child_id = ?
        GROUP BY type
        ORDER BY count DESC
        "#,
    )
    .bind(child_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total talk time in seconds for a child.
pub async fn total_duration(pool: &SqlitePool, child_id: &str) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(duration), 0) FROM call_logs WHERE child_id = ?
        "#,
    )
    .bind(child_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_child, test_db};
    use crate::DatabaseError;

    #[tokio::test]
    async fn test_calls_and_stats() {
        let db = test_db().await;
        let pool = db.pool();
        let child = seed_child(pool, "p1", "Ayu").await;

        record_call(pool, &child, "+6281234567890", CallType::Incoming, 60, Some("2024-05-01 08:00:00"))
            .await
            .unwrap();
        record_call(pool, &child, "+6281234567890", CallType::Missed, 0, Some("2024-05-01 09:00:00"))
            .await
            .unwrap();
        record_call(pool, &child, "+6289876543210", CallType::Missed, 0, Some("2024-05-01 10:00:00"))
            .await
            .unwrap();

        let calls = list_calls(pool, &child, 10).await.unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].phone_number, "+6289876543210");

        let stats = count_calls_by_type(pool, &child).await.unwrap();
        assert_eq!(stats[0], (CallType::Missed, 2));
        assert_eq!(stats[1], (CallType::Incoming, 1));

        assert_eq!(total_duration(pool, &child).await.unwrap(), 60);
    }

    #[tokio::test]
    async fn test_rejects_negative_duration() {
        let db = test_db().await;
        let child = seed_child(db.pool(), "p1", "Ayu").await;
        let result = record_call(db.pool(), &child, "+62811", CallType::Outgoing, -1, None).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}

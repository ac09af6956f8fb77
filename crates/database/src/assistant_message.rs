//! AI assistant question/answer history.

use sqlx::SqlitePool;

use crate::models::AssistantMessage;
use crate::Result;

/// Store an answered question.
pub async fn insert_exchange(
    pool: &SqlitePool,
    parent_id: &str,
    question: &str,
    answer: &str,
) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO assistant_messages (parent_id, question, answer)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(parent_id)
    .bind(question)
    .bind(answer)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List a parent's most recent exchanges, oldest first.
pub async fn list_history(
    pool: &SqlitePool,
    parent_id: &str,
    limit: i64,
) -> Result<Vec<AssistantMessage>> {
    let mut history = sqlx::query_as::<_, AssistantMessage>(
        r#"
        SELECT id, parent_id, question, answer, created_at
        FROM assistant_messages
        WHERE parent_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(parent_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    history.reverse();
    Ok(history)
}

/// Delete a parent's assistant history.
pub async fn clear_history(pool: &SqlitePool, parent_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM assistant_messages
        WHERE parent_id = ?
        "#,
    )
    .bind(parent_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_history() {
        let db = test_db().await;
        let pool = db.pool();

        insert_exchange(pool, "p1", "Di mana Ayu?", "Di sekolah").await.unwrap();
        insert_exchange(pool, "p1", "Berapa panggilan?", "Tiga").await.unwrap();
        insert_exchange(pool, "p2", "Halo", "Hai").await.unwrap();

        let history = list_history(pool, "p1", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "Di mana Ayu?");

        assert_eq!(clear_history(pool, "p1").await.unwrap(), 2);
        assert!(list_history(pool, "p1", 10).await.unwrap().is_empty());
    }
}

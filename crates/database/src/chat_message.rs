//! Parent/child chat message persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ChatMessage, NewChatMessage, SenderRole};
use crate::validation::validate_chat_message;

/// Insert a chat message and return the stored row.
pub async fn insert_message(pool: &SqlitePool, message: &NewChatMessage) -> Result<ChatMessage> {
    validate_chat_message(message)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO chat_messages
            (child_id, parent_id, sender_role, message, file_url, file_type, file_name, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, datetime('now')))
        RETURNING id
        "#,
    )
    .bind(&message.child_id)
    .bind(&message.parent_id)
    .bind(message.sender_role)
    .bind(&message.message)
    .bind(&message.file_url)
    .bind(message.file_type)
    .bind(&message.file_name)
    .bind(&message.created_at)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        message_id = id,
        child_id = %message.child_id,
        role = message.sender_role.as_str(),
        "Chat message stored"
    );

    get_message(pool, id).await
}

/// Get a chat message by ID.
pub async fn get_message(pool: &SqlitePool, id: i64) -> Result<ChatMessage> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, child_id, parent_id, sender_role, message, file_url, file_type,
               file_name, created_at, is_read
        FROM chat_messages
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ChatMessage",
        id: id.to_string(),
    })
}

/// List the most recent messages of a conversation, oldest first.
pub async fn list_conversation(
    pool: &SqlitePool,
    parent_id: &str,
    child_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>> {
    let mut messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, child_id, parent_id, sender_role, message, file_url, file_type,
               file_name, created_at, is_read
        FROM chat_messages
        WHERE parent_id = ? AND child_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(parent_id)
    .bind(child_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

/// Get the newest message exchanged with a child, if any.
pub async fn latest_for_child(pool: &SqlitePool, child_id: &str) -> Result<Option<ChatMessage>> {
    let message = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, child_id, parent_id, sender_role, message, file_url, file_type,
               file_name, created_at, is_read
        FROM chat_messages
        WHERE child_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(child_id)
    .fetch_optional(pool)
    .await?;

    Ok(message)
}

/// Mark every message sent by `sender` in a conversation as read.
///
/// Returns the number of messages that changed.
pub async fn mark_read(
    pool: &SqlitePool,
    parent_id: &str,
    child_id: &str,
    sender: SenderRole,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE chat_messages
        SET is_read = 1
        WHERE parent_id = ? AND child_id = ? AND sender_role = ? AND is_read = 0
        "#,
    )
    .bind(parent_id)
    .bind(child_id)
    .bind(sender)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count unread messages sent by a child to the parent.
pub async fn count_unread_from_child(
    pool: &SqlitePool,
    parent_id: &str,
    child_id: &str,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_messages
        WHERE parent_id = ? AND child_id = ? AND sender_role = 'child' AND is_read = 0
        "#,
    )
    .bind(parent_id)
    .bind(child_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::child::create_child;
    use crate::models::{AttachmentKind, NewChild};
    use crate::test_support::test_db;

    fn message(child_id: &str, role: SenderRole, text: &str, at: &str) -> NewChatMessage {
        NewChatMessage {
            child_id: child_id.to_string(),
            parent_id: "p1".to_string(),
            sender_role: role,
            message: text.to_string(),
            file_url: None,
            file_type: None,
            file_name: None,
            created_at: Some(at.to_string()),
        }
    }

    async fn child_id(pool: &SqlitePool) -> String {
        create_child(
            pool,
            &NewChild {
                parent_id: "p1".to_string(),
                name: "Ayu".to_string(),
                date_of_birth: None,
                sex: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_conversation_order_and_latest() {
        let db = test_db().await;
        let pool = db.pool();
        let child = child_id(pool).await;

        insert_message(pool, &message(&child, SenderRole::Child, "pertama", "2024-05-01 08:00:00"))
            .await
            .unwrap();
        insert_message(pool, &message(&child, SenderRole::Parent, "ketiga", "2024-05-01 10:00:00"))
            .await
            .unwrap();
        insert_message(pool, &message(&child, SenderRole::Child, "kedua", "2024-05-01 09:00:00"))
            .await
            .unwrap();

        let texts: Vec<_> = list_conversation(pool, "p1", &child, 50)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.message)
            .collect();
        assert_eq!(texts, ["pertama", "kedua", "ketiga"]);

        // limit keeps the newest
        let last_two = list_conversation(pool, "p1", &child, 2).await.unwrap();
        assert_eq!(last_two[0].message, "kedua");

        let latest = latest_for_child(pool, &child).await.unwrap().unwrap();
        assert_eq!(latest.message, "ketiga");
        assert_eq!(latest.sender_role, SenderRole::Parent);
    }

    #[tokio::test]
    async fn test_latest_for_child_without_messages() {
        let db = test_db().await;
        let child = child_id(db.pool()).await;
        assert!(latest_for_child(db.pool(), &child).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attachment_roundtrip() {
        let db = test_db().await;
        let pool = db.pool();
        let child = child_id(pool).await;

        let mut new = message(&child, SenderRole::Child, "", "2024-05-01 08:00:00");
        new.file_url = Some("https://files.test/a.jpg".to_string());
        new.file_type = Some(AttachmentKind::Image);
        new.file_name = Some("a.jpg".to_string());
        let stored = insert_message(pool, &new).await.unwrap();

        assert_eq!(stored.file_type, Some(AttachmentKind::Image));
        assert!(!stored.is_read);
    }

    #[tokio::test]
    async fn test_unread_and_mark_read() {
        let db = test_db().await;
        let pool = db.pool();
        let child = child_id(pool).await;

        for text in ["a", "b"] {
            insert_message(pool, &message(&child, SenderRole::Child, text, "2024-05-01 08:00:00"))
                .await
                .unwrap();
        }
        insert_message(pool, &message(&child, SenderRole::Parent, "c", "2024-05-01 08:01:00"))
            .await
            .unwrap();

        assert_eq!(count_unread_from_child(pool, "p1", &child).await.unwrap(), 2);
        assert_eq!(
            mark_read(pool, "p1", &child, SenderRole::Child).await.unwrap(),
            2
        );
        assert_eq!(count_unread_from_child(pool, "p1", &child).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_key_enforced() {
        let db = test_db().await;
        let result = insert_message(
            db.pool(),
            &message("missing-child", SenderRole::Parent, "hi", "2024-05-01 08:00:00"),
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
    }
}

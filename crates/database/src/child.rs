//! Child profile CRUD operations.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Child, NewChild};
use crate::validation::validate_child;

/// Generate a pairing code for a child device.
fn pairing_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("KID-{}", raw[..8].to_ascii_uppercase())
}

/// Create a new child with a generated ID and pairing code.
pub async fn create_child(pool: &SqlitePool, child: &NewChild) -> Result<Child> {
    validate_child(child)?;

    let id = Uuid::new_v4().to_string();
    let qr_code = pairing_code();

    sqlx::query(
        r#"
        INSERT INTO children (id, parent_id, name, date_of_birth, sex, qr_code)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&child.parent_id)
    .bind(child.name.trim())
    .bind(&child.date_of_birth)
    .bind(&child.sex)
    .bind(&qr_code)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Child",
                    id: id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::info!(child_id = %id, parent_id = %child.parent_id, "Child created");

    get_child(pool, &id).await
}

/// Get a child by ID.
pub async fn get_child(pool: &SqlitePool, id: &str) -> Result<Child> {
    sqlx::query_as::<_, Child>(
        r#"
        SELECT id, parent_id, name, date_of_birth, sex, qr_code, created_at
        FROM children
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Child",
        id: id.to_string(),
    })
}

/// Get a child by ID, only if it belongs to the given parent.
pub async fn get_child_for_parent(pool: &SqlitePool, parent_id: &str, id: &str) -> Result<Child> {
    sqlx::query_as::<_, Child>(
        r#"
        SELECT id, parent_id, name, date_of_birth, sex, qr_code, created_at
        FROM children
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(id)
    .bind(parent_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Child",
        id: id.to_string(),
    })
}

/// Look up a child by its pairing code.
pub async fn get_child_by_qr_code(pool: &SqlitePool, qr_code: &str) -> Result<Child> {
    sqlx::query_as::<_, Child>(
        r#"
        SELECT id, parent_id, name, date_of_birth, sex, qr_code, created_at
        FROM children
        WHERE qr_code = ?
        "#,
    )
    .bind(qr_code)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Child",
        id: qr_code.to_string(),
    })
}

/// List a parent's children by name.
pub async fn list_children(pool: &SqlitePool, parent_id: &str) -> Result<Vec<Child>> {
    let children = sqlx::query_as::<_, Child>(
        r#"
        SELECT id, parent_id, name, date_of_birth, sex, qr_code, created_at
        FROM children
        WHERE parent_id = ?
        ORDER BY name COLLATE NOCASE
        "#,
    )
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    Ok(children)
}

/// Update a child's profile fields.
pub async fn update_child(pool: &SqlitePool, id: &str, child: &NewChild) -> Result<()> {
    validate_child(child)?;

    let result = sqlx::query(
        r#"
        UPDATE children
        SET name = ?, date_of_birth = ?, sex = ?
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(child.name.trim())
    .bind(&child.date_of_birth)
    .bind(&child.sex)
    .bind(id)
    .bind(&child.parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Child",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a child and, through cascading keys, its related rows.
pub async fn delete_child(pool: &SqlitePool, parent_id: &str, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM children
        WHERE id = ? AND parent_id = ?
        "#,
    )
    .bind(id)
    .bind(parent_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Child",
            id: id.to_string(),
        });
    }

    tracing::info!(child_id = %id, "Child deleted");
    Ok(())
}

/// Count a parent's children.
pub async fn count_children(pool: &SqlitePool, parent_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM children WHERE parent_id = ?
        "#,
    )
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

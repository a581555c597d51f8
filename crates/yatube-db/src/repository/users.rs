//! Users. Posts, comments and follows all point at these rows.

use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use uuid::Uuid;
use yatube_common::models::User;

use crate::any_compat::{encode_datetime, get_datetime, get_uuid};

fn row_to_user(row: &AnyRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: get_uuid(row, "id")?,
        username: row.try_get("username")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

/// Create a new user.
pub async fn create_user(
    pool: &AnyPool,
    id: Uuid,
    username: &str,
    created_at: DateTime<Utc>,
) -> Result<User, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO users (id, username, created_at)
        VALUES (?, ?, ?)
        RETURNING id, username, created_at
        "#,
    )
    .bind(id.to_string())
    .bind(username)
    .bind(encode_datetime(created_at))
    .fetch_one(pool)
    .await?;
    row_to_user(&row)
}

/// Find a user by their unique ID.
pub async fn find_by_id(pool: &AnyPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query("SELECT id, username, created_at FROM users WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(row_to_user)
        .transpose()
}

/// Find a user by username (exact match).
pub async fn find_by_username(pool: &AnyPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query("SELECT id, username, created_at FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(row_to_user)
        .transpose()
}

/// Delete a user together with their posts, comments and follow edges.
pub async fn delete_user(pool: &AnyPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

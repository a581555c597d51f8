//! Directed `(user, author)` follow edges.
//!
//! The `(user_id, author_id)` uniqueness constraint is what makes concurrent
//! duplicate follows safe: the insert is a no-op on conflict, never an error.

use chrono::{DateTime, Utc};
use sqlx::{AnyPool, Row};
use uuid::Uuid;
use yatube_common::models::Follow;

use crate::any_compat::{encode_datetime, get_datetime, get_uuid};

/// Insert an edge. Returns the number of rows created (0 if it already existed).
pub async fn insert_follow(
    pool: &AnyPool,
    user_id: Uuid,
    author_id: Uuid,
    created_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (user_id, author_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id, author_id) DO NOTHING
        "#,
    )
    .bind(user_id.to_string())
    .bind(author_id.to_string())
    .bind(encode_datetime(created_at))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Remove an edge. Returns the number of rows removed (0 if there was none).
pub async fn delete_follow(
    pool: &AnyPool,
    user_id: Uuid,
    author_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id.to_string())
        .bind(author_id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Check whether `user_id` follows `author_id`.
pub async fn exists(pool: &AnyPool, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id.to_string())
        .bind(author_id.to_string())
        .fetch_one(pool)
        .await?;
    let n: i64 = row.try_get("n")?;
    Ok(n > 0)
}

/// Edges going out of `user_id`, oldest first.
pub async fn list_following(pool: &AnyPool, user_id: Uuid) -> Result<Vec<Follow>, sqlx::Error> {
    sqlx::query(
        "SELECT user_id, author_id, created_at FROM follows WHERE user_id = ? ORDER BY created_at",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(|row| {
        Ok(Follow {
            user_id: get_uuid(row, "user_id")?,
            author_id: get_uuid(row, "author_id")?,
            created_at: get_datetime(row, "created_at")?,
        })
    })
    .collect()
}

/// Number of edges pointing at `author_id`.
pub async fn count_followers(pool: &AnyPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM follows WHERE author_id = ?")
        .bind(author_id.to_string())
        .fetch_one(pool)
        .await?;
    row.try_get("n")
}

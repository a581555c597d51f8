//! Comment repository.

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use uuid::Uuid;
use yatube_common::models::{AuthorRef, Comment, CommentView};

use crate::any_compat::{encode_datetime, get_datetime, get_uuid};

fn row_to_comment_view(row: &AnyRow) -> Result<CommentView, sqlx::Error> {
    Ok(CommentView {
        id: get_uuid(row, "id")?,
        post_id: get_uuid(row, "post_id")?,
        author: AuthorRef {
            id: get_uuid(row, "author_id")?,
            username: row.try_get("author_username")?,
        },
        text: row.try_get("text")?,
        created: get_datetime(row, "created")?,
    })
}

/// Insert a comment. The caller supplies the ID and `created`.
pub async fn create_comment(pool: &AnyPool, comment: &Comment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, author_id, text, created)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(comment.id.to_string())
    .bind(comment.post_id.to_string())
    .bind(comment.author_id.to_string())
    .bind(&comment.text)
    .bind(encode_datetime(comment.created))
    .execute(pool)
    .await?;
    Ok(())
}

/// Comments under one post, newest first.
pub async fn list_for_post(pool: &AnyPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT c.id, c.post_id, c.text, c.created,
               u.id AS author_id, u.username AS author_username
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created DESC, c.id DESC
        "#,
    )
    .bind(post_id.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(row_to_comment_view)
    .collect()
}

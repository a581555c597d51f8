//! Post repository: writes, and the filtered, ordered reads every feed is built on.
//!
//! Listings are always `pub_date` newest first, ties broken by ID (UUID v7,
//! also newest first). Feeds page through [`count_posts`] + [`list_posts`].

use std::collections::BTreeSet;

use sqlx::any::AnyRow;
use sqlx::{Any, AnyPool, QueryBuilder, Row};
use uuid::Uuid;
use yatube_common::models::{AuthorRef, GroupRef, Post, PostView};

use crate::any_compat::{encode_datetime, get_datetime, get_opt_uuid, get_uuid, usize_to_i64};

/// Which posts a feed covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
    /// Posts by any of these authors. An empty set matches nothing.
    Authors(BTreeSet<Uuid>),
}

const POST_VIEW_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.image,
           u.id AS author_id, u.username AS author_username,
           g.id AS group_id, g.slug AS group_slug, g.title AS group_title
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
"#;

fn row_to_post_view(row: &AnyRow) -> Result<PostView, sqlx::Error> {
    let group = match get_opt_uuid(row, "group_id")? {
        Some(id) => Some(GroupRef {
            id,
            slug: row.try_get("group_slug")?,
            title: row.try_get("group_title")?,
        }),
        None => None,
    };

    Ok(PostView {
        id: get_uuid(row, "id")?,
        text: row.try_get("text")?,
        pub_date: get_datetime(row, "pub_date")?,
        author: AuthorRef {
            id: get_uuid(row, "author_id")?,
            username: row.try_get("author_username")?,
        },
        group,
        image: row.try_get("image")?,
    })
}

fn push_filter(qb: &mut QueryBuilder<'_, Any>, filter: &PostFilter) {
    match filter {
        PostFilter::All => {}
        PostFilter::Group(group_id) => {
            qb.push(" WHERE p.group_id = ").push_bind(group_id.to_string());
        }
        PostFilter::Author(author_id) => {
            qb.push(" WHERE p.author_id = ").push_bind(author_id.to_string());
        }
        PostFilter::Authors(authors) if authors.is_empty() => {
            qb.push(" WHERE 1 = 0");
        }
        PostFilter::Authors(authors) => {
            qb.push(" WHERE p.author_id IN (");
            let mut ids = qb.separated(", ");
            for id in authors {
                ids.push_bind(id.to_string());
            }
            ids.push_unseparated(")");
        }
    }
}

/// Insert a new post. The caller supplies the ID and `pub_date`.
pub async fn create_post(pool: &AnyPool, post: &Post) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO posts (id, text, pub_date, author_id, group_id, image)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(post.id.to_string())
    .bind(&post.text)
    .bind(encode_datetime(post.pub_date))
    .bind(post.author_id.to_string())
    .bind(post.group_id.map(|g| g.to_string()))
    .bind(post.image.as_deref())
    .execute(pool)
    .await?;
    Ok(())
}

/// Find a post with its author and group.
pub async fn find_by_id(pool: &AnyPool, id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
    let mut qb = QueryBuilder::<Any>::new(POST_VIEW_SELECT);
    qb.push(" WHERE p.id = ").push_bind(id.to_string());
    qb.build()
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(row_to_post_view)
        .transpose()
}

/// Overwrite the editable fields of a post. `author_id` and `pub_date` are never touched.
pub async fn update_post(
    pool: &AnyPool,
    id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE posts SET text = ?, group_id = ?, image = ? WHERE id = ?")
        .bind(text)
        .bind(group_id.map(|g| g.to_string()))
        .bind(image)
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of posts matching `filter`.
pub async fn count_posts(pool: &AnyPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Any>::new("SELECT COUNT(*) AS n FROM posts p");
    push_filter(&mut qb, filter);
    let row = qb.build().fetch_one(pool).await?;
    row.try_get("n")
}

/// One slice of the posts matching `filter`, newest first.
pub async fn list_posts(
    pool: &AnyPool,
    filter: &PostFilter,
    limit: usize,
    offset: usize,
) -> Result<Vec<PostView>, sqlx::Error> {
    let mut qb = QueryBuilder::<Any>::new(POST_VIEW_SELECT);
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY p.pub_date DESC, p.id DESC LIMIT ")
        .push_bind(usize_to_i64(limit))
        .push(" OFFSET ")
        .push_bind(usize_to_i64(offset));

    qb.build()
        .fetch_all(pool)
        .await?
        .iter()
        .map(row_to_post_view)
        .collect()
}

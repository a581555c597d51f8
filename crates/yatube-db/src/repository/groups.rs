//! Group repository.

use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use uuid::Uuid;
use yatube_common::models::Group;

use crate::any_compat::get_uuid;

fn row_to_group(row: &AnyRow) -> Result<Group, sqlx::Error> {
    Ok(Group {
        id: get_uuid(row, "id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
    })
}

/// Create a group. Fails on a duplicate slug.
pub async fn create_group(
    pool: &AnyPool,
    id: Uuid,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO post_groups (id, title, slug, description)
        VALUES (?, ?, ?, ?)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(id.to_string())
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await?;
    row_to_group(&row)
}

pub async fn find_by_id(pool: &AnyPool, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query("SELECT id, title, slug, description FROM post_groups WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(row_to_group)
        .transpose()
}

pub async fn find_by_slug(pool: &AnyPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query("SELECT id, title, slug, description FROM post_groups WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .as_ref()
        .map(row_to_group)
        .transpose()
}

/// All groups, alphabetically by title.
pub async fn list_groups(pool: &AnyPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query("SELECT id, title, slug, description FROM post_groups ORDER BY title, slug")
        .fetch_all(pool)
        .await?
        .iter()
        .map(row_to_group)
        .collect()
}

/// Delete a group. Its posts stay, with `group_id` cleared.
pub async fn delete_group(pool: &AnyPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post_groups WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixtures, posts};
    use yatube_common::snowflake;

    #[tokio::test]
    async fn test_find_by_slug() {
        let db = fixtures::db().await;
        let group = fixtures::group(&db, "test-slug").await;

        assert_eq!(find_by_slug(&db.pool, "test-slug").await.unwrap(), Some(group.clone()));
        assert_eq!(find_by_id(&db.pool, group.id).await.unwrap(), Some(group));
        assert_eq!(find_by_slug(&db.pool, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slugs_are_unique() {
        let db = fixtures::db().await;
        fixtures::group(&db, "test-slug").await;
        let dup = create_group(&db.pool, snowflake::generate_id(), "Other", "test-slug", "").await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_delete_keeps_posts_and_clears_group() {
        let db = fixtures::db().await;
        let author = fixtures::user(&db, "author").await;
        let group = fixtures::group(&db, "test-slug").await;
        let post = fixtures::post(&db, author.id, Some(group.id), "filed", 0).await;

        assert!(delete_group(&db.pool, group.id).await.unwrap());

        let stored = posts::find_by_id(&db.pool, post.id)
            .await
            .unwrap()
            .expect("post survives group deletion");
        assert_eq!(stored.group, None);
        assert_eq!(stored.text, "filed");
        assert!(list_groups(&db.pool).await.unwrap().is_empty());
    }
}

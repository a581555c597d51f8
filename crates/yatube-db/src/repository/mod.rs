//! Query functions, one module per entity.

pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;
    use yatube_common::models::{Group, Post, User};
    use yatube_common::snowflake;

    use crate::Database;

    pub(crate) async fn db() -> Database {
        Database::in_memory().await.expect("in-memory store")
    }

    pub(crate) fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    pub(crate) async fn user(db: &Database, username: &str) -> User {
        super::users::create_user(&db.pool, snowflake::generate_id(), username, t0())
            .await
            .expect("create user")
    }

    pub(crate) async fn group(db: &Database, slug: &str) -> Group {
        super::groups::create_group(
            &db.pool,
            snowflake::generate_id(),
            "Test group",
            slug,
            "Test description",
        )
        .await
        .expect("create group")
    }

    /// Insert a post published `minutes` after [`t0`].
    pub(crate) async fn post(
        db: &Database,
        author: Uuid,
        group: Option<Uuid>,
        text: &str,
        minutes: i64,
    ) -> Post {
        let post = Post {
            id: snowflake::generate_id(),
            text: text.into(),
            pub_date: t0() + Duration::minutes(minutes),
            author_id: author,
            group_id: group,
            image: None,
        };
        super::posts::create_post(&db.pool, &post)
            .await
            .expect("create post");
        post
    }
}

//! Follow edges between readers and authors.
//!
//! At most one edge per ordered `(user, author)` pair, enforced by the store's
//! unique constraint so concurrent duplicate follows collapse into one row.
//! Self-follows are refused here, not by the store.

use std::collections::BTreeSet;

use uuid::Uuid;
use yatube_common::error::{YatubeError, YatubeResult};
use yatube_db::{
    repository::{follows, users},
    Database,
};

use crate::SharedClock;

#[derive(Clone)]
pub struct SocialGraph {
    db: Database,
    clock: SharedClock,
}

impl SocialGraph {
    pub fn new(db: Database, clock: SharedClock) -> Self {
        Self { db, clock }
    }

    /// Make `user` follow `author`. Returns the number of edges created (0 or 1).
    ///
    /// `NotFound` if `user` has been deleted since their token was issued.
    pub async fn follow(&self, user: Uuid, author: Uuid) -> YatubeResult<u64> {
        if user == author {
            tracing::debug!(%user, "Ignoring self-follow");
            return Ok(0);
        }

        users::find_by_id(&self.db.pool, user)
            .await?
            .ok_or_else(|| YatubeError::not_found("User"))?;

        let created = follows::insert_follow(&self.db.pool, user, author, self.clock.utc()).await?;
        if created > 0 {
            tracing::info!(%user, %author, "Follow created");
        }
        Ok(created)
    }

    /// Remove the edge if it exists. Returns the number of edges removed (0 or 1).
    pub async fn unfollow(&self, user: Uuid, author: Uuid) -> YatubeResult<u64> {
        let removed = follows::delete_follow(&self.db.pool, user, author).await?;
        if removed > 0 {
            tracing::info!(%user, %author, "Follow removed");
        }
        Ok(removed)
    }

    pub async fn is_following(&self, user: Uuid, author: Uuid) -> YatubeResult<bool> {
        Ok(follows::exists(&self.db.pool, user, author).await?)
    }

    /// Everyone `user` follows.
    pub async fn followed_authors(&self, user: Uuid) -> YatubeResult<BTreeSet<Uuid>> {
        Ok(follows::list_following(&self.db.pool, user)
            .await?
            .into_iter()
            .map(|edge| edge.author_id)
            .collect())
    }

    pub async fn follower_count(&self, author: Uuid) -> YatubeResult<i64> {
        Ok(follows::count_followers(&self.db.pool, author).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestApp;

    #[tokio::test]
    async fn test_follow_twice_yields_one_edge() {
        let app = TestApp::new().await;
        let reader = app.user("reader").await;
        let author = app.user("author").await;
        let graph = &app.state.social;

        assert_eq!(graph.follow(reader.id, author.id).await.unwrap(), 1);
        assert_eq!(graph.follow(reader.id, author.id).await.unwrap(), 0);
        assert_eq!(graph.follower_count(author.id).await.unwrap(), 1);
        assert!(graph.is_following(reader.id, author.id).await.unwrap());
        // Edges are directed
        assert!(!graph.is_following(author.id, reader.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_self_follow_is_ignored() {
        let app = TestApp::new().await;
        let user = app.user("narcissus").await;
        let graph = &app.state.social;

        assert_eq!(graph.follow(user.id, user.id).await.unwrap(), 0);
        assert_eq!(graph.follower_count(user.id).await.unwrap(), 0);
        assert!(graph.followed_authors(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unfollow() {
        let app = TestApp::new().await;
        let reader = app.user("reader").await;
        let author = app.user("author").await;
        let graph = &app.state.social;

        // Missing edge: no error, no change
        assert_eq!(graph.unfollow(reader.id, author.id).await.unwrap(), 0);

        graph.follow(reader.id, author.id).await.unwrap();
        assert_eq!(graph.unfollow(reader.id, author.id).await.unwrap(), 1);
        assert!(!graph.is_following(reader.id, author.id).await.unwrap());
        assert_eq!(graph.follower_count(author.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_follows_create_one_edge() {
        let app = TestApp::new().await;
        let reader = app.user("reader").await;
        let author = app.user("author").await;
        let graph = app.state.social.clone();

        let attempts = (0..8).map(|_| {
            let graph = graph.clone();
            tokio::spawn(async move { graph.follow(reader.id, author.id).await })
        });
        let mut created = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            created += attempt.await.unwrap().unwrap();
        }

        assert_eq!(created, 1);
        assert_eq!(graph.follower_count(author.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_followed_authors() {
        let app = TestApp::new().await;
        let reader = app.user("reader").await;
        let a = app.user("a").await;
        let b = app.user("b").await;
        let graph = &app.state.social;

        graph.follow(reader.id, a.id).await.unwrap();
        graph.follow(reader.id, b.id).await.unwrap();

        let expected: BTreeSet<Uuid> = [a.id, b.id].into_iter().collect();
        assert_eq!(graph.followed_authors(reader.id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_follow_by_deleted_user_is_not_found() {
        let app = TestApp::new().await;
        let ghost = app.user("ghost").await;
        let author = app.user("author").await;
        users::delete_user(&app.db.pool, ghost.id).await.unwrap();

        let result = app.state.social.follow(ghost.id, author.id).await;
        assert!(matches!(result, Err(YatubeError::NotFound { .. })));
        assert_eq!(app.state.social.follower_count(author.id).await.unwrap(), 0);
    }
}

//! Validated writes of posts and comments.
//!
//! `author_id` and `pub_date`/`created` are stamped here and never accepted
//! from the client. Edits pass [`is_author`] before any validation runs.

use uuid::Uuid;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::{
        Comment, CreateCommentRequest, CreatePostRequest, Post, PostView, UpdatePostRequest,
    },
    snowflake,
    validation::required_text,
};
use yatube_db::{
    repository::{comments, groups, posts, users},
    Database,
};

use crate::SharedClock;

const INVALID_GROUP: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Whether `editor` may change `post`.
pub fn is_author(editor: Uuid, post: &PostView) -> bool {
    post.author.id == editor
}

/// Create and edit posts, add comments.
#[derive(Clone)]
pub struct AuthoringService {
    db: Database,
    clock: SharedClock,
}

impl AuthoringService {
    pub fn new(db: Database, clock: SharedClock) -> Self {
        Self { db, clock }
    }

    /// Publish a new post by `author`, dated now.
    pub async fn create_post(&self, author: Uuid, body: CreatePostRequest) -> YatubeResult<Post> {
        let text = required_text("text", &body.text)?;
        self.check_group(body.group).await?;

        self.check_user(author).await?;

        let post = Post {
            id: snowflake::generate_id(),
            text,
            pub_date: self.clock.utc(),
            author_id: author,
            group_id: body.group,
            image: normalize_image(body.image),
        };
        posts::create_post(&self.db.pool, &post).await?;

        tracing::info!(post_id = %post.id, author_id = %author, "Post created");
        Ok(post)
    }

    /// Apply an edit from `editor`.
    ///
    /// Fails with `NotFound` for an unknown post and `PermissionDenied` for
    /// anyone but the author; in both cases nothing is written.
    pub async fn update_post(
        &self,
        editor: Uuid,
        post_id: Uuid,
        body: UpdatePostRequest,
    ) -> YatubeResult<Post> {
        let current = posts::find_by_id(&self.db.pool, post_id)
            .await?
            .ok_or_else(|| YatubeError::not_found("Post"))?;

        if !is_author(editor, &current) {
            tracing::debug!(%post_id, %editor, "Edit refused, not the author");
            return Err(YatubeError::PermissionDenied);
        }

        let text = required_text("text", &body.text)?;
        self.check_group(body.group).await?;

        let image = match normalize_image(body.image) {
            Some(new_image) => Some(new_image),
            None if body.clear_image => None,
            None => current.image.clone(),
        };

        posts::update_post(&self.db.pool, post_id, &text, body.group, image.as_deref()).await?;

        tracing::info!(%post_id, "Post edited");
        Ok(Post {
            text,
            group_id: body.group,
            image,
            ..current.to_post()
        })
    }

    /// Add a comment by `author` under `post_id`, dated now.
    pub async fn create_comment(
        &self,
        author: Uuid,
        post_id: Uuid,
        body: CreateCommentRequest,
    ) -> YatubeResult<Comment> {
        posts::find_by_id(&self.db.pool, post_id)
            .await?
            .ok_or_else(|| YatubeError::not_found("Post"))?;
        self.check_user(author).await?;

        let comment = Comment {
            id: snowflake::generate_id(),
            post_id,
            author_id: author,
            text: required_text("text", &body.text)?,
            created: self.clock.utc(),
        };
        comments::create_comment(&self.db.pool, &comment).await?;

        tracing::info!(comment_id = %comment.id, %post_id, "Comment added");
        Ok(comment)
    }

    /// `NotFound` unless the acting user still exists. Tokens outlive deleted accounts.
    async fn check_user(&self, user: Uuid) -> YatubeResult<()> {
        users::find_by_id(&self.db.pool, user)
            .await?
            .ok_or_else(|| YatubeError::not_found("User"))?;
        Ok(())
    }

    async fn check_group(&self, group: Option<Uuid>) -> YatubeResult<()> {
        if let Some(group_id) = group {
            groups::find_by_id(&self.db.pool, group_id)
                .await?
                .ok_or_else(|| YatubeError::validation("group", INVALID_GROUP))?;
        }
        Ok(())
    }
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestApp;
    use mockable::Clock;

    fn new_post(text: &str, group: Option<Uuid>) -> CreatePostRequest {
        CreatePostRequest {
            text: text.into(),
            group,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_post_stamps_author_and_date() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let group = app.group("test-slug").await;

        let post = app
            .state
            .authoring
            .create_post(author.id, new_post("  Тестовый пост  ", Some(group.id)))
            .await
            .unwrap();

        assert_eq!(post.text, "Тестовый пост");
        assert_eq!(post.author_id, author.id);
        assert_eq!(post.group_id, Some(group.id));
        assert_eq!(post.pub_date, app.clock.utc());

        let stored = posts::find_by_id(&app.db.pool, post.id).await.unwrap().unwrap();
        assert_eq!(stored.to_post(), post);
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_text_and_unknown_group() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let authoring = &app.state.authoring;

        let blank = authoring.create_post(author.id, new_post("   ", None)).await;
        assert!(matches!(blank, Err(YatubeError::Validation { ref field, .. }) if field == "text"));

        let stray = authoring
            .create_post(author.id, new_post("text", Some(Uuid::now_v7())))
            .await;
        assert!(matches!(stray, Err(YatubeError::Validation { ref field, .. }) if field == "group"));

        let count = posts::count_posts(&app.db.pool, &posts::PostFilter::All).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_empty_image_key_is_dropped() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;

        let post = app
            .state
            .authoring
            .create_post(
                author.id,
                CreatePostRequest {
                    text: "with image".into(),
                    group: None,
                    image: Some(" ".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(post.image, None);
    }

    #[tokio::test]
    async fn test_author_can_edit() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let group = app.group("test-slug").await;
        let post_id = app.post(author.id, None, "before").await;
        let before = posts::find_by_id(&app.db.pool, post_id).await.unwrap().unwrap();

        app.clock.advance_seconds(60);
        let edited = app
            .state
            .authoring
            .update_post(
                author.id,
                post_id,
                UpdatePostRequest {
                    text: "after".into(),
                    group: Some(group.id),
                    image: Some("posts/small.gif".into()),
                    clear_image: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.text, "after");
        assert_eq!(edited.group_id, Some(group.id));
        assert_eq!(edited.image.as_deref(), Some("posts/small.gif"));
        assert_eq!(edited.pub_date, before.pub_date);
        assert_eq!(edited.author_id, author.id);

        let stored = posts::find_by_id(&app.db.pool, post_id).await.unwrap().unwrap();
        assert_eq!(stored.to_post(), edited);
    }

    #[tokio::test]
    async fn test_edit_keeps_image_unless_replaced_or_cleared() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let authoring = &app.state.authoring;
        let post = authoring
            .create_post(
                author.id,
                CreatePostRequest {
                    text: "pic".into(),
                    group: None,
                    image: Some("posts/a.gif".into()),
                },
            )
            .await
            .unwrap();

        let kept = authoring
            .update_post(
                author.id,
                post.id,
                UpdatePostRequest {
                    text: "pic".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.image.as_deref(), Some("posts/a.gif"));

        let cleared = authoring
            .update_post(
                author.id,
                post.id,
                UpdatePostRequest {
                    text: "pic".into(),
                    clear_image: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.image, None);
    }

    #[tokio::test]
    async fn test_non_author_edit_is_denied_and_changes_nothing() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let stranger = app.user("stranger").await;
        let post_id = app.post(author.id, None, "original").await;
        let before = posts::find_by_id(&app.db.pool, post_id).await.unwrap().unwrap();

        let result = app
            .state
            .authoring
            .update_post(
                stranger.id,
                post_id,
                UpdatePostRequest {
                    // Invalid as well: denial must win over validation
                    text: "".into(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(YatubeError::PermissionDenied)));
        let after = posts::find_by_id(&app.db.pool, post_id).await.unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_edit_unknown_post_is_not_found() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;

        let result = app
            .state
            .authoring
            .update_post(
                author.id,
                Uuid::now_v7(),
                UpdatePostRequest {
                    text: "x".into(),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(YatubeError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_comments() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let reader = app.user("reader").await;
        let post_id = app.post(author.id, None, "post").await;
        let authoring = &app.state.authoring;

        let comment = authoring
            .create_comment(
                reader.id,
                post_id,
                CreateCommentRequest {
                    text: "Тестовый комментарий".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.author_id, reader.id);
        assert_eq!(comment.created, app.clock.utc());

        let blank = authoring
            .create_comment(reader.id, post_id, CreateCommentRequest { text: " ".into() })
            .await;
        assert!(matches!(blank, Err(YatubeError::Validation { .. })));

        let orphan = authoring
            .create_comment(reader.id, Uuid::now_v7(), CreateCommentRequest { text: "hi".into() })
            .await;
        assert!(matches!(orphan, Err(YatubeError::NotFound { .. })));

        let listed = comments::list_for_post(&app.db.pool, post_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, comment.id);
    }

    #[tokio::test]
    async fn test_comment_by_deleted_user_is_not_found() {
        let app = TestApp::new().await;
        let author = app.user("auth").await;
        let ghost = app.user("ghost").await;
        let post_id = app.post(author.id, None, "post").await;
        users::delete_user(&app.db.pool, ghost.id).await.unwrap();

        let result = app
            .state
            .authoring
            .create_comment(ghost.id, post_id, CreateCommentRequest { text: "boo".into() })
            .await;
        assert!(matches!(result, Err(YatubeError::NotFound { .. })));
        assert!(comments::list_for_post(&app.db.pool, post_id).await.unwrap().is_empty());
    }
}

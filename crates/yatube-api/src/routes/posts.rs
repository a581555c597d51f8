//! The global feed, post detail, authoring and comments.

use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use yatube_common::{
    error::{YatubeError, YatubeResult},
    models::{
        CommentView, CreateCommentRequest, CreatePostRequest, Post, PostView, UpdatePostRequest,
    },
};
use yatube_db::repository::{
    comments,
    posts::{self, PostFilter},
};

use super::{profile_path, to_post_detail, PageParams};
use crate::{
    middleware::{AuthContext, Viewer},
    services::feed::PostPage,
    AppState,
};

/// Routes readable without signing in.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(index))
        .route("/posts/{post_id}", get(post_detail))
}

/// Routes that need an access token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_post))
        .route("/posts/{post_id}/edit", post(edit_post))
        .route("/posts/{post_id}/comment", post(add_comment))
}

#[derive(Serialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    /// Total posts by the same author
    pub author_post_count: i64,
    /// Comments on this post, newest first
    pub comments: Vec<CommentView>,
    /// Whether the viewer may comment
    pub can_comment: bool,
}

/// GET /api/v1/posts?page=N
async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> YatubeResult<Json<PostPage>> {
    let page = state.feeds.index(params.page.as_deref()).await?;
    Ok(Json(page))
}

/// GET /api/v1/posts/:post_id
async fn post_detail(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(post_id): Path<Uuid>,
) -> YatubeResult<Json<PostDetailResponse>> {
    let post = posts::find_by_id(&state.db.pool, post_id)
        .await?
        .ok_or_else(|| YatubeError::not_found("Post"))?;

    let author_post_count =
        posts::count_posts(&state.db.pool, &PostFilter::Author(post.author.id)).await?;
    let comments = comments::list_for_post(&state.db.pool, post_id).await?;

    Ok(Json(PostDetailResponse {
        post,
        author_post_count,
        comments,
        can_comment: viewer.0.is_some(),
    }))
}

/// POST /api/v1/create
async fn create_post(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePostRequest>,
) -> YatubeResult<impl IntoResponse> {
    let post = state.authoring.create_post(auth.user_id, body).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, profile_path(&auth.username))],
        Json(post),
    ))
}

/// POST /api/v1/posts/:post_id/edit
///
/// A non-author is sent back to the read-only view instead of getting an error.
async fn edit_post(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> YatubeResult<Response> {
    match state.authoring.update_post(auth.user_id, post_id, body).await {
        Ok(post) => Ok(Json::<Post>(post).into_response()),
        Err(YatubeError::PermissionDenied) => Ok(to_post_detail(post_id).into_response()),
        Err(e) => Err(e),
    }
}

/// POST /api/v1/posts/:post_id/comment
///
/// Always lands back on the post; an empty comment is dropped, not reported.
async fn add_comment(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> YatubeResult<Response> {
    match state.authoring.create_comment(auth.user_id, post_id, body).await {
        Ok(_) => {}
        Err(YatubeError::Validation { field, message }) => {
            tracing::debug!(%post_id, %field, %message, "Comment rejected");
        }
        Err(e) => return Err(e),
    }
    Ok(to_post_detail(post_id).into_response())
}

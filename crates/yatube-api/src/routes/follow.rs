//! The personalized feed and the follow/unfollow actions.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use yatube_common::error::{YatubeError, YatubeResult};
use yatube_db::repository::users;

use super::{to_profile, PageParams};
use crate::{middleware::AuthContext, services::feed::PostPage, AppState};

/// Follow routes. All of them need an access token.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/follow", get(follow_index))
        .route("/profile/{username}/follow", post(profile_follow))
        .route("/profile/{username}/unfollow", post(profile_unfollow))
}

/// GET /api/v1/follow?page=N
async fn follow_index(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> YatubeResult<Json<PostPage>> {
    let page = state.feeds.follow_feed(auth.user_id, params.request()).await?;
    Ok(Json(page))
}

/// POST /api/v1/profile/:username/follow
async fn profile_follow(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> YatubeResult<Redirect> {
    let author = users::find_by_username(&state.db.pool, &username)
        .await?
        .ok_or_else(|| YatubeError::not_found("User"))?;

    state.social.follow(auth.user_id, author.id).await?;
    Ok(to_profile(&username))
}

/// POST /api/v1/profile/:username/unfollow
///
/// Unknown usernames are not an error: there is simply no edge to remove.
async fn profile_unfollow(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> YatubeResult<Redirect> {
    if let Some(author) = users::find_by_username(&state.db.pool, &username).await? {
        state.social.unfollow(auth.user_id, author.id).await?;
    }
    Ok(to_profile(&username))
}

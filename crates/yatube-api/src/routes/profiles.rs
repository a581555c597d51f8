//! Profile routes: an author's posts and whether the viewer follows them.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use yatube_common::{error::YatubeResult, models::User};

use super::PageParams;
use crate::{middleware::Viewer, services::feed::PostPage, AppState};

/// Profile routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/profile/{username}", get(profile))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub author: User,
    /// The viewer follows this author; always false for anonymous viewers
    pub following: bool,
    pub post_count: usize,
    pub follower_count: i64,
    pub page: PostPage,
}

/// GET /api/v1/profile/:username?page=N
async fn profile(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> YatubeResult<Json<ProfileResponse>> {
    let (author, page) = state.feeds.profile_feed(&username, params.request()).await?;

    let following = match viewer.user_id() {
        Some(user_id) => state.social.is_following(user_id, author.id).await?,
        None => false,
    };
    let follower_count = state.social.follower_count(author.id).await?;

    Ok(Json(ProfileResponse {
        post_count: page.count,
        author,
        following,
        follower_count,
        page,
    }))
}

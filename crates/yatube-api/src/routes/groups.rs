//! Group feed routes.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use yatube_common::{error::YatubeResult, models::Group};

use super::PageParams;
use crate::{services::feed::PostPage, AppState};

/// Group routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/group/{slug}", get(group_posts))
}

#[derive(Serialize)]
pub struct GroupFeedResponse {
    pub group: Group,
    pub page: PostPage,
}

/// GET /api/v1/group/:slug?page=N
async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> YatubeResult<Json<GroupFeedResponse>> {
    let (group, page) = state.feeds.group_feed(&slug, params.request()).await?;
    Ok(Json(GroupFeedResponse { group, page }))
}

//! Route modules, one per area of the API.

pub mod follow;
pub mod groups;
pub mod health;
pub mod posts;
pub mod profiles;

use axum::response::Redirect;
use serde::Deserialize;
use uuid::Uuid;
use yatube_common::pagination::PageRequest;

/// `?page=` as sent by the client. Kept raw so bad values fall back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

pub(crate) fn post_detail_path(post_id: Uuid) -> String {
    format!("/api/v1/posts/{post_id}")
}

/// Path of a profile, with the username percent-encoded as one segment.
pub(crate) fn profile_path(username: &str) -> String {
    format!("/api/v1/profile/{}", urlencoding::encode(username))
}

/// 303 to the read-only view of a post.
pub(crate) fn to_post_detail(post_id: Uuid) -> Redirect {
    Redirect::to(&post_detail_path(post_id))
}

/// 303 to a profile.
pub(crate) fn to_profile(username: &str) -> Redirect {
    Redirect::to(&profile_path(username))
}

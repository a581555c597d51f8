//! Post model, the core content unit.
//!
//! A post belongs to exactly one author and optionally to one group. Only
//! `text`, `group_id` and `image` change after creation; `author_id` and
//! `pub_date` are fixed by the authoring service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{excerpt, AuthorRef, GroupRef};

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,

    /// Post body, never blank
    pub text: String,

    /// Publication time, primary sort key, newest first
    pub pub_date: DateTime<Utc>,

    pub author_id: Uuid,

    /// Cleared when the group is deleted
    pub group_id: Option<Uuid>,

    /// Storage key of the attached image
    pub image: Option<String>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(excerpt(&self.text))
    }
}

/// A post joined with its author and group, as feeds and detail views return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
    pub image: Option<String>,
}

impl PostView {
    pub fn to_post(&self) -> Post {
        Post {
            id: self.id,
            text: self.text.clone(),
            pub_date: self.pub_date,
            author_id: self.author.id,
            group_id: self.group.as_ref().map(|g| g.id),
            image: self.image.clone(),
        }
    }
}

impl fmt::Display for PostView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(excerpt(&self.text))
    }
}

/// Create post request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    pub text: String,

    /// Group to file the post under
    pub group: Option<Uuid>,

    /// Storage key of an already uploaded image
    pub image: Option<String>,
}

/// Edit post request.
///
/// `group` replaces the current group (absent clears it). `image` replaces the
/// current image only when present; `clear_image` removes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub text: String,
    pub group: Option<Uuid>,
    pub image: Option<String>,
    #[serde(default)]
    pub clear_image: bool,
}

//! A reader's reply under a post. Immutable once written.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{excerpt, AuthorRef};

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    /// Sort key, newest first
    pub created: DateTime<Utc>,
}

/// A comment joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorRef,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl fmt::Display for CommentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Author: {}, Post: {} text: {}",
            self.author.username,
            self.post_id,
            excerpt(&self.text)
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

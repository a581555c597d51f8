//! An optional category a post can be filed under.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::SLUG_REGEX;

/// A group of posts, addressed externally by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    /// Unique, stable identifier used in group routes
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Compact group reference embedded in post views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
}

impl From<&Group> for GroupRef {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id,
            slug: g.slug.clone(),
            title: g.title.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 50, message = "Slug must be 1-50 characters"))]
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "Slug can only contain letters, numbers, underscores, and hyphens"
    ))]
    pub slug: String,

    #[serde(default)]
    pub description: String,
}

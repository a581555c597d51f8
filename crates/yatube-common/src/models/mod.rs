//! Core domain models shared across all Yatube crates.
//!
//! These are what the store returns and the API serializes.
//! IDs are UUID v7 (see [`crate::snowflake`]), so they sort by creation time.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

/// Re-export all model types for convenience.
pub use comment::*;
pub use follow::*;
pub use group::*;
pub use post::*;
pub use user::*;

/// How many characters of free text a `Display` impl shows.
pub const SYMBOLS_IN_TEXT: usize = 15;

/// First [`SYMBOLS_IN_TEXT`] characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(SYMBOLS_IN_TEXT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

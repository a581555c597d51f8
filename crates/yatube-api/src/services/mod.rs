//! Core services sitting between the route handlers and the repositories.
//!
//! Handlers stay thin: they resolve the caller and the path, then hand off to
//! one of these. Every service holds a clone of the [`Database`] handle and,
//! where it stamps times, the shared clock.
//!
//! [`Database`]: yatube_db::Database

pub mod authoring;
pub mod feed;
pub mod social_graph;

pub use authoring::AuthoringService;
pub use feed::FeedComposer;
pub use social_graph::SocialGraph;

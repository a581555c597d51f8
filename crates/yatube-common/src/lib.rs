//! # yatube-common
//!
//! Shared types, configuration, error handling, and pagination used across all Yatube crates.
//! No storage access here, only primitives and contracts.

pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod snowflake;
pub mod validation;

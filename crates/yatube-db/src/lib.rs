//! # yatube-db
//!
//! Entity store for Yatube. All access goes through a `sqlx::AnyPool`; the
//! schema in `migrations/` declares the delete policies:
//! - posts, comments and follows are removed with their user
//! - comments are removed with their post
//! - a deleted group leaves its posts in place with `group_id` cleared

pub mod any_compat;
pub mod repository;

use anyhow::Result;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// Shared database state passed through Axum state.
#[derive(Clone)]
pub struct Database {
    pub pool: AnyPool,
}

impl Database {
    /// Connect to the configured store.
    pub async fn connect(config: &yatube_common::config::AppConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();

        tracing::info!("Connecting to database...");
        let pool = AnyPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!("Connected to database");

        Ok(Self { pool })
    }

    /// A private, migrated in-memory SQLite store. Lives as long as the returned handle.
    pub async fn in_memory() -> Result<Self> {
        sqlx::any::install_default_drivers();

        // A single connection that never recycles: every new in-memory
        // connection would see its own empty database.
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Verify the database is reachable.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

//! # Yatube Server
//!
//! Runs the REST API, and carries the admin commands the API deliberately
//! does not expose: managing users and groups, minting development tokens.
//! Migrations run before any command touches the store.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use yatube_api::{build_router, AppState};
use yatube_common::{
    config::AppConfig,
    error::YatubeError,
    models::CreateGroupRequest,
    snowflake,
    validation::{validate_request, validate_username},
};
use yatube_db::{
    repository::{groups, users},
    Database,
};

/// Yatube blogging platform.
#[derive(Parser)]
#[command(name = "yatube")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (the default)
    Serve,
    /// Register a user
    CreateUser { username: String },
    /// Delete a user together with their posts, comments and follows
    DeleteUser { username: String },
    /// Create a group
    CreateGroup {
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a group; its posts stay, ungrouped
    DeleteGroup { slug: String },
    /// List groups
    ListGroups,
    /// Print an access token for a user (development only)
    IssueToken { username: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = yatube_common::config::init()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let db = Database::connect(config).await?;
    db.migrate().await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, db).await,
        Commands::CreateUser { username } => {
            validate_username(&username)?;
            if users::find_by_username(&db.pool, &username).await?.is_some() {
                return Err(YatubeError::AlreadyExists {
                    resource: format!("User {username}"),
                }
                .into());
            }
            let user = users::create_user(
                &db.pool,
                snowflake::generate_id(),
                &username,
                chrono::Utc::now(),
            )
            .await
            .with_context(|| format!("creating user {username}"))?;
            println!("{} {}", user.id, user.username);
            Ok(())
        }
        Commands::DeleteUser { username } => {
            let user = users::find_by_username(&db.pool, &username)
                .await?
                .with_context(|| format!("no user named {username}"))?;
            users::delete_user(&db.pool, user.id).await?;
            tracing::info!(user_id = %user.id, "User deleted");
            Ok(())
        }
        Commands::CreateGroup {
            slug,
            title,
            description,
        } => {
            let request = CreateGroupRequest {
                title,
                slug,
                description,
            };
            validate_request(&request)?;
            if groups::find_by_slug(&db.pool, &request.slug).await?.is_some() {
                return Err(YatubeError::AlreadyExists {
                    resource: format!("Group {}", request.slug),
                }
                .into());
            }
            let group = groups::create_group(
                &db.pool,
                snowflake::generate_id(),
                &request.title,
                &request.slug,
                &request.description,
            )
            .await
            .with_context(|| format!("creating group {}", request.slug))?;
            println!("{} {}", group.id, group.slug);
            Ok(())
        }
        Commands::DeleteGroup { slug } => {
            let Some(group) = groups::find_by_slug(&db.pool, &slug).await? else {
                bail!("no group with slug {slug}");
            };
            groups::delete_group(&db.pool, group.id).await?;
            tracing::info!(group_id = %group.id, %slug, "Group deleted");
            Ok(())
        }
        Commands::ListGroups => {
            for group in groups::list_groups(&db.pool).await? {
                println!("{}\t{}", group.slug, group);
            }
            Ok(())
        }
        Commands::IssueToken { username } => {
            let user = users::find_by_username(&db.pool, &username)
                .await?
                .with_context(|| format!("no user named {username}"))?;
            let token = yatube_api::auth::generate_access_token(
                user.id,
                &user.username,
                &config.auth.jwt_secret,
                config.auth.access_token_ttl_secs,
            )?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, db: Database) -> anyhow::Result<()> {
    tracing::info!("Starting Yatube v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(
        db,
        Arc::new(DefaultClock),
        config.auth.jwt_secret.clone(),
        Duration::from_secs(config.cache.index_ttl_secs),
    );
    let router = build_router(state);
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    tracing::info!("REST API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

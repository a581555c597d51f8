//! # yatube-api
//!
//! Feeds, authoring and the follow graph, plus the REST layer that exposes
//! them. Handlers in [`routes`] resolve the caller and path parameters and
//! delegate to the [`services`].

pub mod auth;
pub mod cache;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use mockable::Clock;
use yatube_db::Database;

use crate::cache::HomeFeedCache;
use crate::services::{AuthoringService, FeedComposer, SocialGraph};

/// Source of "now" for every timestamp the services stamp.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub feeds: FeedComposer,
    pub social: SocialGraph,
    pub authoring: AuthoringService,
    /// HS256 secret for access tokens.
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(db: Database, clock: SharedClock, jwt_secret: String, index_ttl: Duration) -> Self {
        let social = SocialGraph::new(db.clone(), clock.clone());
        let feeds = FeedComposer::new(
            db.clone(),
            social.clone(),
            HomeFeedCache::new(index_ttl, clock.clone()),
        );
        let authoring = AuthoringService::new(db.clone(), clock);

        Self {
            db,
            feeds,
            social,
            authoring,
            jwt_secret,
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let public_routes = Router::new()
        .merge(routes::posts::public_router())
        .merge(routes::groups::router())
        .merge(routes::profiles::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth_middleware,
        ));

    let protected_routes = Router::new()
        .merge(routes::posts::protected_router())
        .merge(routes::follow::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let api_routes = Router::new()
        .merge(routes::health::router())
        .merge(public_routes)
        .merge(protected_routes);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .with_state(state)
}

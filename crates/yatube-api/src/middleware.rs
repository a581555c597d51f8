//! Bearer authentication and security headers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use yatube_common::error::YatubeError;

use crate::{auth, AppState};

/// Authentication context extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: uuid::Uuid,
    pub username: String,
}

/// The caller on routes where signing in is optional.
///
/// Holds the `AuthContext` that `optional_auth_middleware` attached, if any.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<AuthContext>);

impl Viewer {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthContext>().cloned()))
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn decode_context(token: &str, secret: &str) -> Result<AuthContext, YatubeError> {
    let claims = auth::verify_access_token(token, secret).map_err(|e| {
        tracing::debug!("Rejected bearer token: {e}");
        YatubeError::InvalidToken
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        username: claims.username,
    })
}

/// Require a valid access token. Handlers read the result as `Extension<AuthContext>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, YatubeError> {
    let token = bearer_token(&request).ok_or(YatubeError::Unauthorized)?;
    let auth_ctx = decode_context(token, &state.jwt_secret)?;

    request.extensions_mut().insert(auth_ctx);
    Ok(next.run(request).await)
}

/// Attach an `AuthContext` when a valid token is present; otherwise the
/// request proceeds anonymously.
pub async fn optional_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let decoded = bearer_token(&request).map(|token| decode_context(token, &state.jwt_secret));
    if let Some(Ok(auth_ctx)) = decoded {
        request.extensions_mut().insert(auth_ctx);
    }

    next.run(request).await
}

// ── Security headers ──────────────────────────────────────────────────────────

/// Add security headers to every HTTP response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    macro_rules! set {
        ($name:expr, $val:expr) => {
            if let Ok(v) = $val.parse::<axum::http::HeaderValue>() {
                h.insert(header::HeaderName::from_static($name), v);
            }
        };
    }

    set!("x-content-type-options", "nosniff");
    set!("x-frame-options", "DENY");
    set!("referrer-policy", "same-origin");
    set!("content-security-policy", "default-src 'none'; frame-ancestors 'none'");

    response
}

//! Bearer token handling.
//!
//! Credentials live with the external identity provider. This crate only
//! checks the HS256 access tokens it issues and, for development, mints them
//! (`yatube issue-token`).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a token may be used for. Only access tokens open API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by a Yatube token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "token_type")]
    pub kind: TokenKind,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("expected an access token, got {0:?}")]
    WrongKind(TokenKind),
}

/// Sign an access token for `user_id` valid for `ttl_secs`.
///
/// TTLs too large to represent saturate at the latest representable expiry.
pub fn generate_access_token(
    user_id: Uuid,
    username: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, TokenError> {
    let issued = Utc::now();
    let expires = i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| issued.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        iat: issued.timestamp(),
        exp: expires.timestamp(),
        kind: TokenKind::Access,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Check signature and expiry, and that the token is an access token.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;

    match claims.kind {
        TokenKind::Access => Ok(claims),
        other => Err(TokenError::WrongKind(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let id = Uuid::now_v7();
        let token = generate_access_token(id, "leo", "secret", 60).unwrap();
        let claims = verify_access_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "leo");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let token = generate_access_token(Uuid::now_v7(), "leo", "secret", u64::MAX).unwrap();
        let claims = verify_access_token(&token, "secret").unwrap();
        assert_eq!(claims.exp, DateTime::<Utc>::MAX_UTC.timestamp());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_access_token(Uuid::now_v7(), "leo", "secret", 60).unwrap();
        assert!(matches!(
            verify_access_token(&token, "other"),
            Err(TokenError::Jwt(_))
        ));
    }

    #[test]
    fn test_refresh_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7(),
            username: "leo".into(),
            iat: now,
            exp: now + 60,
            kind: TokenKind::Refresh,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            verify_access_token(&token, "secret"),
            Err(TokenError::WrongKind(TokenKind::Refresh))
        ));
    }
}

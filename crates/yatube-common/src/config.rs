//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let app_config = load(
        config::Environment::with_prefix("YATUBE")
            .separator("__")
            .try_parsing(true),
    )?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a config from the defaults, an optional `config.toml`, and `overrides`.
pub fn load<S>(overrides: S) -> Result<AppConfig, config::ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite://yatube.db?mode=rwc")?
        .set_default("database.max_connections", 20)?
        .set_default("database.min_connections", 1)?
        .set_default("auth.access_token_ttl_secs", 86_400)? // 1 day
        .set_default("cache.index_ttl_secs", 20)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (YATUBE__SERVER__HOST, YATUBE__DATABASE__URL, etc.)
        .add_source(overrides)
        .build()?
        .try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://yatube.db?mode=rwc`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// JWT signing secret (HS256). Shared with the identity provider that issues tokens.
    pub jwt_secret: String,
    /// Access token TTL in seconds
    pub access_token_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// How long a rendered global feed page is served before recomputation.
    pub index_ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_everything_but_the_secret() {
        let overrides = config::Environment::default().source(Some(
            [("auth.jwt_secret".to_string(), "s3cret".to_string())]
                .into_iter()
                .collect(),
        ));

        let cfg = load(overrides).expect("config should load");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.cache.index_ttl_secs, 20);
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert!(cfg.database.url.starts_with("sqlite:"));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let overrides = config::Environment::default().source(Some(Default::default()));
        assert!(load(overrides).is_err());
    }
}

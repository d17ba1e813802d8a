mod cors;
mod database;
mod link;
mod rate_limit;
mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use link::LinkConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

use crate::error::{AppError, AppResult};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub link: LinkConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// Read an optional variable, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: &str) -> AppResult<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_or("SERVER_PORT", "8080")?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
                max_connections: env_or("DB_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DB_MIN_CONNECTIONS", "1")?,
                acquire_timeout_seconds: env_or("DB_ACQUIRE_TIMEOUT_SECONDS", "30")?,
            },
            link: LinkConfig {
                short_code_length: env_or("SHORT_CODE_LENGTH", "6")?,
                short_code_max_attempts: env_or("SHORT_CODE_MAX_ATTEMPTS", "20")?,
                default_expiry_hours: env_or("DEFAULT_EXPIRY_HOURS", "24")?,
            },
            rate_limit: RateLimitConfig {
                max_requests: env_or("MAX_REQUESTS_PER_MINUTE", "40")?,
                window_seconds: env_or("RATE_LIMIT_WINDOW_SECONDS", "60")?,
                trust_proxy_headers: env_or("TRUST_PROXY_HEADERS", "false")?,
            },
            cors: CorsConfig::from_list(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        };

        config.validate()?;

        tracing::info!(
            max_requests = config.rate_limit.max_requests,
            window_seconds = config.rate_limit.window_seconds,
            "Loaded rate limiter configuration"
        );

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.database.validate().map_err(AppError::Configuration)?;
        self.link.validate().map_err(AppError::Configuration)?;
        self.rate_limit.validate().map_err(AppError::Configuration)?;
        Ok(())
    }

    /// The database URL, required whenever the Postgres backend is used.
    pub fn database_url(&self) -> AppResult<&str> {
        self.database.require_url()
    }
}

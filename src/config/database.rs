use crate::error::{AppError, AppResult};

/// Postgres pool settings. Ignored when running with `--in-memory`.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `DATABASE_URL`; absent is fine until the Postgres backend is selected
    pub url: Option<String>,

    pub max_connections: u32,
    pub min_connections: u32,

    /// Bounds how long a storage call waits for a free connection
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.min_connections > self.max_connections {
            return Err("DB_MIN_CONNECTIONS cannot be greater than DB_MAX_CONNECTIONS".to_string());
        }

        if self.acquire_timeout_seconds == 0 {
            return Err("DB_ACQUIRE_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// The connection URL, or `MissingEnvVar` when Postgres is used without one.
    pub fn require_url(&self) -> AppResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| AppError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Validation(String),

    #[error("Custom slug already exists")]
    SlugConflict(String),

    #[error("URL does not exist or it might have expired")]
    NotFound(String),

    #[error("URL has expired")]
    Expired(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Could not allocate a unique short code after {0} attempts")]
    AllocationExhausted(u32),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SlugConflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Expired(_) => StatusCode::GONE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Validation(_)
            | AppError::SlugConflict(_)
            | AppError::NotFound(_)
            | AppError::Expired(_)
            | AppError::RateLimited => self.to_string(),
            AppError::StorageUnavailable(detail) => {
                tracing::error!(detail = %detail, "Storage unavailable");
                "Service temporarily unavailable".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                "Migration error occurred".to_string()
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                "An internal error occurred".to_string()
            }
        };

        let body = json!({
            "status": status.as_u16().to_string(),
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

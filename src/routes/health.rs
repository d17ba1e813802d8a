use crate::error::{AppError, AppResult};
use crate::routes::types::PingResponse;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::AppState;

const STORAGE_PING_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Health check endpoint
pub async fn ping(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let start = std::time::Instant::now();

    match tokio::time::timeout(STORAGE_PING_TIMEOUT, state.links.ping()).await {
        Ok(Ok(())) => {
            tracing::debug!(
                latency_ms = start.elapsed().as_millis() as u64,
                "Storage ping succeeded"
            );
        }
        Ok(Err(e)) => {
            return Err(match e {
                AppError::StorageUnavailable(_) => e,
                other => AppError::StorageUnavailable(other.to_string()),
            });
        }
        Err(_) => {
            return Err(AppError::StorageUnavailable(format!(
                "ping timed out after {:?}",
                STORAGE_PING_TIMEOUT
            )));
        }
    }

    Ok(Json(PingResponse {
        message: "pong".to_string(),
        status: "ok".to_string(),
    }))
}

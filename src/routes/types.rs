use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
    pub status: String,
}

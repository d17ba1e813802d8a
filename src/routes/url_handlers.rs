use crate::error::{AppError, AppResult};
use crate::models::{
    non_empty, CreateShortLinkRequest, MessageResponse, ShortLinkResponse, UpdateExpirationRequest,
    ValidateSlugRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use super::AppState;

/// Unwrap a JSON body, reporting malformed input as a 400.
fn json_body<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    body.validate()
        .map_err(|e| AppError::Validation(format!("Validation failed: {}", e)))?;
    Ok(body)
}

/// Create a short link
pub async fn create_short_link(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateShortLinkRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let payload = json_body(payload)?;

    let link = state
        .links
        .create(
            payload.url.trim(),
            non_empty(payload.custom_slug.as_ref()),
            non_empty(payload.expiration_date.as_ref()),
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ShortLinkResponse::from(link))))
}

/// Resolve a short link and redirect
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(short_link): Path<String>,
) -> AppResult<impl IntoResponse> {
    let link = state.links.resolve(&short_link, Utc::now()).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, link.original_url)]))
}

/// Delete a short link
pub async fn delete_short_link(
    State(state): State<Arc<AppState>>,
    Path(short_link): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.links.delete(&short_link, Utc::now()).await?;

    Ok(Json(MessageResponse::new(
        "Short URL has been successfully deleted",
    )))
}

/// Check whether a custom slug is free to claim
pub async fn validate_custom_slug(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ValidateSlugRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let payload = json_body(payload)?;

    if state
        .links
        .is_slug_available(&payload.custom_slug, Utc::now())
        .await?
    {
        Ok(Json(MessageResponse::new("Custom slug is available")))
    } else {
        Err(AppError::SlugConflict(payload.custom_slug))
    }
}

/// Reset the expiration date of a short link
pub async fn set_expiration(
    State(state): State<Arc<AppState>>,
    Path(short_link): Path<String>,
    payload: Result<Json<UpdateExpirationRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let payload = json_body(payload)?;

    let link = state
        .links
        .set_expiration(&short_link, &payload.expiration_date, Utc::now())
        .await?;

    Ok(Json(ShortLinkResponse::from(link)))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

/// Short link record in the database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields needed to insert a new short link
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Request to create a short link
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be between 1 and 2048 characters"))]
    pub url: String,

    #[serde(default)]
    pub custom_slug: Option<String>,

    #[serde(default)]
    pub expiration_date: Option<String>,
}

/// Request to check whether a custom slug is free
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSlugRequest {
    #[validate(length(min = 3, max = 8, message = "Custom slug must be 3-8 characters"))]
    pub custom_slug: String,
}

/// Request to reset a link's expiration date
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpirationRequest {
    #[validate(length(equal = 10, message = "Expiration date must be formatted YYYY-MM-DD"))]
    pub expiration_date: String,
}

/// Response describing a short link
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub original_url: String,
    pub short_link: String,
    #[serde(serialize_with = "serialize_naive_timestamp")]
    pub expiration_date: DateTime<Utc>,
}

impl From<ShortLink> for ShortLinkResponse {
    fn from(link: ShortLink) -> Self {
        ShortLinkResponse {
            original_url: link.original_url,
            short_link: link.short_code,
            expiration_date: link.expires_at,
        }
    }
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Treat `""` the same as an absent optional field.
pub fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// UTC timestamps go out as `YYYY-MM-DDTHH:MM:SS`, without an offset.
fn serialize_naive_timestamp<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.naive_utc().format("%Y-%m-%dT%H:%M:%S"))
}

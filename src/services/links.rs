use crate::config::LinkConfig;
use crate::error::{AppError, AppResult};
use crate::models::ShortLink;
use crate::services::allocator::Allocator;
use crate::services::expiry::{parse_expiration_date, ExpiryPolicy, Lookup};
use crate::services::short_code::{is_valid_custom_slug, SlugGenerator};
use crate::store::LinkStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url::Url as UrlParser;

/// Short link operations behind the HTTP handlers.
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    allocator: Allocator,
    expiry: ExpiryPolicy,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, generator: SlugGenerator, config: &LinkConfig) -> Self {
        let expiry = ExpiryPolicy::from_hours(config.default_expiry_hours);
        let allocator = Allocator::new(
            store.clone(),
            generator,
            expiry,
            config.short_code_length,
            config.short_code_max_attempts,
        );

        Self {
            store,
            allocator,
            expiry,
        }
    }

    /// Validate the request and allocate a new link.
    pub async fn create(
        &self,
        original_url: &str,
        custom_slug: Option<&str>,
        expiration_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<ShortLink> {
        validate_original_url(original_url)?;
        let expires_at = self.expiry.effective_expiry(expiration_date, now)?;

        let link = self
            .allocator
            .allocate(original_url, custom_slug, now, expires_at)
            .await?;

        tracing::info!(
            short_code = %link.short_code,
            custom = custom_slug.is_some(),
            expires_at = %link.expires_at,
            "Created short link"
        );
        Ok(link)
    }

    /// Resolve a code for redirection.
    ///
    /// The access that evicts a lapsed link reports `Expired`; later ones see `NotFound`.
    pub async fn resolve(&self, short_code: &str, now: DateTime<Utc>) -> AppResult<ShortLink> {
        match self.lookup(short_code, now).await? {
            Lookup::Live(link) => Ok(link),
            Lookup::Expired(link) => Err(AppError::Expired(link.short_code)),
            Lookup::Missing => Err(AppError::NotFound(short_code.to_string())),
        }
    }

    pub async fn delete(&self, short_code: &str, now: DateTime<Utc>) -> AppResult<()> {
        let link = self.find_live(short_code, now).await?;

        if !self.store.soft_delete(&link).await? {
            return Err(AppError::NotFound(short_code.to_string()));
        }

        tracing::info!(short_code = %short_code, "Deleted short link");
        Ok(())
    }

    /// Whether `custom_slug` could be claimed right now.
    pub async fn is_slug_available(&self, custom_slug: &str, now: DateTime<Utc>) -> AppResult<bool> {
        if !is_valid_custom_slug(custom_slug) {
            return Err(AppError::Validation(
                "Custom slug must be 3-8 alphanumeric characters".to_string(),
            ));
        }

        Ok(!self.allocator.is_taken(custom_slug, now).await?)
    }

    /// Reset the expiration of a live link to midnight UTC of `expiration_date`.
    pub async fn set_expiration(
        &self,
        short_code: &str,
        expiration_date: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ShortLink> {
        let expires_at = parse_expiration_date(expiration_date)?;
        let link = self.find_live(short_code, now).await?;

        let updated = self
            .store
            .update_expiration(&link, expires_at)
            .await?
            .ok_or_else(|| AppError::NotFound(short_code.to_string()))?;

        tracing::info!(
            short_code = %short_code,
            expires_at = %updated.expires_at,
            "Updated short link expiration"
        );
        Ok(updated)
    }

    /// Backend reachability, for the health check.
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    async fn lookup(&self, short_code: &str, now: DateTime<Utc>) -> AppResult<Lookup> {
        self.expiry.lookup(self.store.as_ref(), short_code, now).await
    }

    /// Lookup outside the redirect path, where an expired link is just absent.
    async fn find_live(&self, short_code: &str, now: DateTime<Utc>) -> AppResult<ShortLink> {
        match self.lookup(short_code, now).await? {
            Lookup::Live(link) => Ok(link),
            Lookup::Expired(_) | Lookup::Missing => Err(AppError::NotFound(short_code.to_string())),
        }
    }
}

/// Original URLs must be absolute `http://` or `https://` URLs.
pub fn validate_original_url(raw: &str) -> AppResult<()> {
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(AppError::Validation(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    let parsed = UrlParser::parse(raw)
        .map_err(|_| AppError::Validation("Invalid URL format".to_string()))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::Validation("URL must include a host".to_string()));
    }

    Ok(())
}

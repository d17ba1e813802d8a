use crate::error::{AppError, AppResult};
use crate::models::{NewShortLink, ShortLink};
use crate::services::expiry::{ExpiryPolicy, Lookup};
use crate::services::short_code::{is_valid_custom_slug, SlugGenerator};
use crate::store::LinkStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Reserves short codes and persists new links.
///
/// The liveness pre-check only saves a round trip. The store's uniqueness
/// constraint decides races: a conflicting insert is a `SlugConflict` for a
/// custom slug and another attempt for a generated one.
pub struct Allocator {
    store: Arc<dyn LinkStore>,
    generator: SlugGenerator,
    expiry: ExpiryPolicy,
    code_length: usize,
    max_attempts: u32,
}

impl Allocator {
    pub fn new(
        store: Arc<dyn LinkStore>,
        generator: SlugGenerator,
        expiry: ExpiryPolicy,
        code_length: usize,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            generator,
            expiry,
            code_length,
            max_attempts,
        }
    }

    /// Whether a live record currently holds `short_code`. Lapsed holders are evicted.
    pub async fn is_taken(&self, short_code: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let lookup = self
            .expiry
            .lookup(self.store.as_ref(), short_code, now)
            .await?;
        Ok(matches!(lookup, Lookup::Live(_)))
    }

    /// Create a link under `custom_slug`, or under a freshly generated code.
    pub async fn allocate(
        &self,
        original_url: &str,
        custom_slug: Option<&str>,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<ShortLink> {
        let new_link = |short_code: String| NewShortLink {
            short_code,
            original_url: original_url.to_string(),
            created_at: now,
            expires_at,
        };

        if let Some(slug) = custom_slug {
            if !is_valid_custom_slug(slug) {
                return Err(AppError::Validation(
                    "Custom slug must be 3-8 alphanumeric characters".to_string(),
                ));
            }
            if self.is_taken(slug, now).await? {
                return Err(AppError::SlugConflict(slug.to_string()));
            }
            return self.store.insert(new_link(slug.to_string())).await;
        }

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate(self.code_length);

            if self.is_taken(&code, now).await? {
                tracing::debug!(attempt, code = %code, "Generated short code collided");
                continue;
            }

            match self.store.insert(new_link(code)).await {
                Err(AppError::SlugConflict(code)) => {
                    tracing::debug!(attempt, code = %code, "Short code taken at insert");
                }
                result => return result,
            }
        }

        tracing::error!(
            attempts = self.max_attempts,
            "Exhausted attempts to allocate a unique short code"
        );
        Err(AppError::AllocationExhausted(self.max_attempts))
    }
}

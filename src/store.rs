//! Storage seam for short links.
//!
//! [`LinkStore`] is implemented by the Postgres [`Repository`](crate::db::Repository)
//! and by [`MemoryStore`], which backs `--in-memory` runs and the test suite.
//! Both enforce short-code uniqueness among non-deleted records at insert time
//! and report a violation as [`AppError::SlugConflict`].

use crate::error::{AppError, AppResult};
use crate::models::{NewShortLink, ShortLink};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a record. Fails with `SlugConflict` if a non-deleted record holds the code.
    async fn insert(&self, link: NewShortLink) -> AppResult<ShortLink>;

    /// Find the non-deleted record holding `short_code`, expired or not.
    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<ShortLink>>;

    /// Delete a record, freeing its code. Returns false if it was already gone.
    async fn soft_delete(&self, link: &ShortLink) -> AppResult<bool>;

    /// Set a new expiration on a non-deleted record.
    async fn update_expiration(
        &self,
        link: &ShortLink,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ShortLink>>;

    /// Physically remove deleted and expired records.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Check the backend is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// In-process store keyed by short code.
///
/// Deleting a record removes it, so the code becomes reusable immediately.
#[derive(Clone, Default)]
pub struct MemoryStore {
    links: Arc<DashMap<String, ShortLink>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn insert(&self, link: NewShortLink) -> AppResult<ShortLink> {
        // The entry guard holds the shard lock, so check and insert are one step.
        match self.links.entry(link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::SlugConflict(link.short_code)),
            Entry::Vacant(vacant) => {
                let record = ShortLink {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    short_code: link.short_code,
                    original_url: link.original_url,
                    created_at: link.created_at,
                    expires_at: link.expires_at,
                    deleted_at: None,
                };
                vacant.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<ShortLink>> {
        Ok(self.links.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn soft_delete(&self, link: &ShortLink) -> AppResult<bool> {
        Ok(self
            .links
            .remove_if(&link.short_code, |_, stored| stored.id == link.id)
            .is_some())
    }

    async fn update_expiration(
        &self,
        link: &ShortLink,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ShortLink>> {
        match self.links.get_mut(&link.short_code) {
            Some(mut stored) if stored.id == link.id => {
                stored.expires_at = expires_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.links.len();
        self.links.retain(|_, link| link.expires_at > now);
        Ok(before.saturating_sub(self.links.len()) as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

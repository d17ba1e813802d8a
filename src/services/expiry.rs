use crate::error::{AppError, AppResult};
use crate::models::ShortLink;
use crate::store::LinkStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Calendar format accepted for explicit expiration dates.
pub const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of looking up a code with lazy eviction applied.
#[derive(Debug)]
pub enum Lookup {
    Live(ShortLink),
    /// The record had lapsed and has just been deleted.
    Expired(ShortLink),
    Missing,
}

/// Decides when links expire and whether they are still live.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryPolicy {
    default_ttl: Duration,
}

impl ExpiryPolicy {
    pub fn new(default_ttl: Duration) -> Self {
        Self { default_ttl }
    }

    /// Out-of-range hour counts saturate; `effective_expiry` then reports the overflow.
    pub fn from_hours(hours: i64) -> Self {
        Self::new(Duration::try_hours(hours).unwrap_or(Duration::MAX))
    }

    /// Expiration for a new link: midnight UTC of `explicit` if given, otherwise `now + default_ttl`.
    pub fn effective_expiry(
        &self,
        explicit: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<DateTime<Utc>> {
        match explicit {
            Some(date) => parse_expiration_date(date),
            None => now.checked_add_signed(self.default_ttl).ok_or_else(|| {
                AppError::Configuration("Default expiry is out of range".to_string())
            }),
        }
    }

    pub fn is_live(&self, link: &ShortLink, now: DateTime<Utc>) -> bool {
        link.expires_at > now
    }

    /// Look up `short_code`, deleting the record if it has lapsed.
    ///
    /// There is no background sweeper: expired rows linger until the next
    /// lookup touches them.
    pub async fn lookup(
        &self,
        store: &dyn LinkStore,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Lookup> {
        let Some(link) = store.find_by_code(short_code).await? else {
            return Ok(Lookup::Missing);
        };

        if self.is_live(&link, now) {
            return Ok(Lookup::Live(link));
        }

        // A concurrent lookup already evicted it.
        if !store.soft_delete(&link).await? {
            return Ok(Lookup::Missing);
        }

        tracing::info!(
            short_code = %link.short_code,
            expired_at = %link.expires_at,
            "Evicted expired short link"
        );
        Ok(Lookup::Expired(link))
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::from_hours(24)
    }
}

/// Parse a strict `YYYY-MM-DD` date into midnight UTC.
pub fn parse_expiration_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let invalid = || AppError::Validation("Invalid expiration date format".to_string());

    // chrono accepts unpadded fields; the wire format does not.
    if raw.len() != 10 {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(raw, EXPIRATION_DATE_FORMAT).map_err(|_| invalid())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    Ok(midnight.and_utc())
}

use crate::rate_limit::RateLimiter;
use crate::services::LinkService;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to handlers through Axum's `State` extractor.
pub struct AppState {
    /// Short link creation, lookup and lazy expiry
    pub links: LinkService,

    /// Per-client request limiter applied to every route
    pub rate_limiter: RateLimiter,
}

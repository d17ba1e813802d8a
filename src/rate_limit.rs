//! Per-client fixed-window rate limiting.
//!
//! Each client key owns a counter and the instant its window opened. A window
//! closes once more than `window` has elapsed since it opened; the next request
//! then starts a fresh window with a count of one.
//!
//! Entries are never removed, so memory grows with the number of distinct
//! clients seen over the process lifetime.

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::middleware_impls::client_key;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of asking the limiter to admit a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Reject,
}

/// Counting state for one client.
#[derive(Debug, Clone, Copy)]
pub struct VisitorState {
    pub request_count: u32,
    pub window_start: Instant,
}

/// Shared limiter; clones refer to the same visitor map.
#[derive(Clone)]
pub struct RateLimiter {
    visitors: Arc<DashMap<String, VisitorState>>,
    max_requests: u32,
    window: Duration,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            visitors: Arc::new(DashMap::new()),
            max_requests,
            window,
            trust_proxy_headers: false,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            trust_proxy_headers: config.trust_proxy_headers,
            ..Self::new(config.max_requests, Duration::from_secs(config.window_seconds))
        }
    }

    /// Decide whether `client_key` may make a request at `now`.
    pub fn admit(&self, client_key: &str, now: Instant) -> Admission {
        // The entry guard locks the key's shard for the whole read-modify-write.
        let mut state = self
            .visitors
            .entry(client_key.to_string())
            .or_insert_with(|| VisitorState {
                request_count: 0,
                window_start: now,
            });

        if state.request_count == 0 || now.saturating_duration_since(state.window_start) > self.window
        {
            state.request_count = 1;
            state.window_start = now;
            return Admission::Allow;
        }

        if state.request_count < self.max_requests {
            state.request_count += 1;
            Admission::Allow
        } else {
            Admission::Reject
        }
    }

    /// Current state for a client, if it has been seen.
    pub fn visitor(&self, client_key: &str) -> Option<VisitorState> {
        self.visitors.get(client_key).map(|entry| *entry.value())
    }

    /// Whether client keys come from `X-Forwarded-For`/`X-Real-IP`.
    pub fn trusts_proxy_headers(&self) -> bool {
        self.trust_proxy_headers
    }

    /// Number of distinct clients tracked.
    pub fn tracked_clients(&self) -> usize {
        self.visitors.len()
    }
}

/// Middleware rejecting requests over the per-client quota with 429.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req, limiter.trust_proxy_headers);

    match limiter.admit(&key, Instant::now()) {
        Admission::Allow => next.run(req).await,
        Admission::Reject => {
            tracing::warn!(
                client = %key,
                path = %req.uri().path(),
                "Rate limit exceeded"
            );
            AppError::RateLimited.into_response()
        }
    }
}

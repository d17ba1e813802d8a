use crate::config::CorsConfig;
use crate::middleware_impls::{
    request_id_middleware, request_logging_middleware, security_headers_middleware,
};
use crate::rate_limit::rate_limit_middleware;
use axum::middleware;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::health;
use super::url_handlers;
use super::AppState;

/// Create application router
pub fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> axum::Router {
    let cors = if cors.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let limiter = state.rate_limiter.clone();
    let trust_proxy_headers = limiter.trusts_proxy_headers();

    // Static paths take priority over `/{short_link}` in axum's matcher.
    // Layers run bottom-up: request id first, then logging, headers, rate limit.
    axum::Router::new()
        .route("/ping", get(health::ping))
        .route("/generate/shortlink", post(url_handlers::create_short_link))
        .route(
            "/validate/customslug",
            post(url_handlers::validate_custom_slug),
        )
        .route(
            "/{short_link}",
            get(url_handlers::redirect).delete(url_handlers::delete_short_link),
        )
        .route(
            "/{short_link}/expiration",
            put(url_handlers::set_expiration),
        )
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(middleware::from_fn_with_state(
            trust_proxy_headers,
            request_logging_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::rate_limit::RateLimiter;
    use crate::services::{LinkService, SlugGenerator};
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use std::net::SocketAddr;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(max_requests: u32) -> axum::Router {
        let state = Arc::new(AppState {
            links: LinkService::new(
                Arc::new(MemoryStore::new()),
                SlugGenerator::seeded(9),
                &LinkConfig::default(),
            ),
            rate_limiter: RateLimiter::new(max_requests, Duration::from_secs(60)),
        });
        create_router(state, &CorsConfig::from_list("*"))
    }

    fn ping_from(peer: &str) -> Request<Body> {
        let addr: SocketAddr = peer.parse().unwrap();
        let mut req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    #[tokio::test]
    async fn test_quota_is_per_peer() {
        let app = app(2);

        for _ in 0..2 {
            let res = app.clone().oneshot(ping_from("10.0.0.1:4000")).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
        let res = app.clone().oneshot(ping_from("10.0.0.1:4001")).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        let res = app.clone().oneshot(ping_from("10.0.0.2:4000")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejected_response_carries_security_headers() {
        let app = app(1);

        app.clone().oneshot(ping_from("10.0.0.3:4000")).await.unwrap();
        let res = app.oneshot(ping_from("10.0.0.3:4000")).await.unwrap();

        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()["x-frame-options"], "DENY");
    }
}

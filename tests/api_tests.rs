//! HTTP-level tests for the shortlink API.
//!
//! The router runs against the in-memory store, so no database is needed.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};
use shortlink::config::{CorsConfig, LinkConfig};
use shortlink::rate_limit::RateLimiter;
use shortlink::routes::{create_router, AppState};
use shortlink::services::{LinkService, SlugGenerator};
use shortlink::store::MemoryStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn server_with_limit(max_requests: u32) -> TestServer {
    let state = Arc::new(AppState {
        links: LinkService::new(
            Arc::new(MemoryStore::new()),
            SlugGenerator::seeded(2024),
            &LinkConfig::default(),
        ),
        rate_limiter: RateLimiter::new(max_requests, Duration::from_secs(60)),
    });

    TestServer::new(create_router(state, &CorsConfig::from_list("*"))).unwrap()
}

fn server() -> TestServer {
    server_with_limit(10_000)
}

/// Test module for link creation
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_with_expiration_date() {
        let server = server();

        let response = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "expirationDate": "2099-01-01"}))
            .await;

        assert_eq!(response.status_code(), 201);
        let body: Value = response.json();
        let short_link = body["shortLink"].as_str().unwrap();
        assert_eq!(short_link.len(), 6);
        assert!(short_link.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(body["originalUrl"], "https://example.com");
        assert_eq!(body["expirationDate"], "2099-01-01T00:00:00");
    }

    #[tokio::test]
    async fn test_create_defaults_expiration() {
        let server = server();

        let response = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com"}))
            .await;

        assert_eq!(response.status_code(), 201);
        let body: Value = response.json();
        let expiration = body["expirationDate"].as_str().unwrap();
        assert_eq!(expiration.len(), "2099-01-01T00:00:00".len());
    }

    #[tokio::test]
    async fn test_create_rejects_ftp_scheme() {
        let server = server();

        let response = server
            .post("/generate/shortlink")
            .json(&json!({"url": "ftp://example.com"}))
            .await;

        assert_eq!(response.status_code(), 400);
        let body: Value = response.json();
        assert_eq!(body["status"], "400");
        assert_eq!(body["error"], "URL must start with http:// or https://");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_date() {
        let server = server();

        let response = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "expirationDate": "31-12-2099"}))
            .await;

        assert_eq!(response.status_code(), 400);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let server = server();

        let missing_url = server
            .post("/generate/shortlink")
            .json(&json!({"customSlug": "abc123"}))
            .await;
        assert_eq!(missing_url.status_code(), 400);

        let not_json = server.post("/generate/shortlink").text("url=x").await;
        assert_eq!(not_json.status_code(), 400);
    }

    #[tokio::test]
    async fn test_custom_slug_echoed_then_conflicts() {
        let server = server();
        let request = json!({"url": "https://example.com", "customSlug": "abc123"});

        let first = server.post("/generate/shortlink").json(&request).await;
        assert_eq!(first.status_code(), 201);
        assert_eq!(first.json::<Value>()["shortLink"], "abc123");

        let second = server.post("/generate/shortlink").json(&request).await;
        assert_eq!(second.status_code(), 409);
        assert_eq!(second.json::<Value>()["error"], "Custom slug already exists");
    }

    #[tokio::test]
    async fn test_invalid_custom_slug() {
        let server = server();

        for slug in ["ab", "abcdefghi", "abc-12"] {
            let response = server
                .post("/generate/shortlink")
                .json(&json!({"url": "https://example.com", "customSlug": slug}))
                .await;
            assert_eq!(response.status_code(), 400, "slug {slug:?}");
        }
    }

    #[tokio::test]
    async fn test_empty_custom_slug_is_generated() {
        let server = server();

        let response = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "customSlug": "", "expirationDate": ""}))
            .await;

        assert_eq!(response.status_code(), 201);
        assert_eq!(
            response.json::<Value>()["shortLink"].as_str().unwrap().len(),
            6
        );
    }

    #[tokio::test]
    async fn test_generated_codes_are_distinct() {
        let server = server();
        let mut codes = HashSet::new();

        for i in 0..50 {
            let response = server
                .post("/generate/shortlink")
                .json(&json!({"url": format!("https://example.com/{i}")}))
                .await;
            assert_eq!(response.status_code(), 201);
            let code = response.json::<Value>()["shortLink"]
                .as_str()
                .unwrap()
                .to_string();
            assert!(codes.insert(code));
        }
    }
}

/// Test module for redirects, expiry and deletion
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_redirect_found() {
        let server = server();
        server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://www.rust-lang.org/learn", "customSlug": "rust"}))
            .await;

        let response = server.get("/rust").await;

        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), "https://www.rust-lang.org/learn");
    }

    #[tokio::test]
    async fn test_redirect_unknown_is_404() {
        let server = server();

        let response = server.get("/nothing").await;

        assert_eq!(response.status_code(), 404);
        assert_eq!(
            response.json::<Value>()["error"],
            "URL does not exist or it might have expired"
        );
    }

    #[tokio::test]
    async fn test_expired_is_gone_then_not_found() {
        let server = server();
        let created = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "customSlug": "past", "expirationDate": "2000-01-01"}))
            .await;
        assert_eq!(created.status_code(), 201);

        assert_eq!(server.get("/past").await.status_code(), 410);
        for _ in 0..3 {
            assert_eq!(server.get("/past").await.status_code(), 404);
        }

        // The evicted code can be claimed again.
        let reclaimed = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.org", "customSlug": "past"}))
            .await;
        assert_eq!(reclaimed.status_code(), 201);
    }

    #[tokio::test]
    async fn test_delete() {
        let server = server();
        server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "customSlug": "bye"}))
            .await;

        let deleted = server.delete("/bye").await;
        assert_eq!(deleted.status_code(), 200);
        assert_eq!(
            deleted.json::<Value>()["message"],
            "Short URL has been successfully deleted"
        );

        assert_eq!(server.get("/bye").await.status_code(), 404);
        assert_eq!(server.delete("/bye").await.status_code(), 404);
    }

    #[tokio::test]
    async fn test_set_expiration() {
        let server = server();
        server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "customSlug": "ext"}))
            .await;

        let response = server
            .put("/ext/expiration")
            .json(&json!({"expirationDate": "2099-12-31"}))
            .await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["expirationDate"], "2099-12-31T00:00:00");

        let missing = server
            .put("/nope/expiration")
            .json(&json!({"expirationDate": "2099-12-31"}))
            .await;
        assert_eq!(missing.status_code(), 404);

        let malformed = server
            .put("/ext/expiration")
            .json(&json!({"expirationDate": "2099-12-3x"}))
            .await;
        assert_eq!(malformed.status_code(), 400);
    }

    #[tokio::test]
    async fn test_validate_custom_slug() {
        let server = server();

        let free = server
            .post("/validate/customslug")
            .json(&json!({"customSlug": "mine"}))
            .await;
        assert_eq!(free.status_code(), 200);
        assert_eq!(free.json::<Value>()["message"], "Custom slug is available");

        server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com", "customSlug": "mine"}))
            .await;

        let taken = server
            .post("/validate/customslug")
            .json(&json!({"customSlug": "mine"}))
            .await;
        assert_eq!(taken.status_code(), 409);

        let invalid = server
            .post("/validate/customslug")
            .json(&json!({"customSlug": "x"}))
            .await;
        assert_eq!(invalid.status_code(), 400);
    }
}

/// Test module for cross-cutting middleware
mod middleware_tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        let server = server();

        let response = server.get("/ping").await;

        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        assert_eq!(body["message"], "pong");
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_rate_limit_applies_to_all_routes() {
        let server = server_with_limit(3);

        assert_eq!(server.get("/ping").await.status_code(), 200);
        assert_eq!(server.get("/missing").await.status_code(), 404);
        let created = server
            .post("/generate/shortlink")
            .json(&json!({"url": "https://example.com"}))
            .await;
        assert_eq!(created.status_code(), 201);

        let limited = server.get("/ping").await;
        assert_eq!(limited.status_code(), 429);
        assert_eq!(limited.json::<Value>()["error"], "Too many requests");
    }

    #[tokio::test]
    async fn test_security_headers() {
        let server = server();

        let response = server.get("/ping").await;

        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert_eq!(response.header("x-xss-protection"), "1; mode=block");
        assert!(response
            .header("content-security-policy")
            .to_str()
            .unwrap()
            .contains("object-src 'none'"));
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let server = server();

        let response = server
            .get("/ping")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-123"),
            )
            .await;

        assert_eq!(response.header("x-request-id"), "req-123");
    }
}

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use uuid::Uuid;

/// Request ID wrapper for use in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extract client IP address from proxy headers
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    // Check for X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                let first_ip = first_ip.trim();
                if !first_ip.is_empty() {
                    return Some(first_ip.to_string());
                }
            }
        }
    }

    // Check for X-Real-IP header
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Identify the caller: proxy headers when trusted, else the socket peer.
pub fn client_key<B>(req: &axum::http::Request<B>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = extract_client_ip(req.headers()) {
            return ip;
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract user agent from headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Request ID middleware - adds a unique ID to each request
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    // Try to get existing request ID from header, or generate new one
    let request_id: String = req
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", header_value);
    }

    response
}

/// Request fields captured before the handler runs
#[derive(Debug)]
struct RequestLog {
    request_id: String,
    method: Method,
    path: String,
    client_ip: String,
    user_agent: String,
}

impl RequestLog {
    fn capture(req: &Request, trust_proxy_headers: bool) -> Self {
        Self {
            request_id: req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.as_str().to_string())
                .unwrap_or_default(),
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            client_ip: client_key(req, trust_proxy_headers),
            user_agent: extract_user_agent(req.headers()).unwrap_or_default(),
        }
    }
}

/// Log one line per request, at a level matching the response status.
///
/// The state flag mirrors `TRUST_PROXY_HEADERS`; untrusted proxy headers never reach the log.
pub async fn request_logging_middleware(
    State(trust_proxy_headers): State<bool>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let RequestLog {
        request_id,
        method,
        path,
        client_ip,
        user_agent,
    } = RequestLog::capture(&req, trust_proxy_headers);

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;

    macro_rules! log_request {
        ($level:ident, $msg:literal) => {
            tracing::$level!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                latency_ms,
                client_ip = %client_ip,
                user_agent = %user_agent,
                $msg
            )
        };
    }

    if status >= 500 {
        log_request!(error, "Server error");
    } else if status >= 400 {
        log_request!(warn, "Client error");
    } else {
        log_request!(info, "Request processed");
    }

    response
}

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self'; object-src 'none';",
    ),
    ("x-xss-protection", "1; mode=block"),
];

/// Security headers middleware - hardens every response
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

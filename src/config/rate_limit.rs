/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests a client may make within one window
    pub max_requests: u32,

    /// Length of the counting window in seconds
    pub window_seconds: u64,

    /// Whether to key clients by `X-Forwarded-For`/`X-Real-IP` instead of the peer address
    pub trust_proxy_headers: bool,
}

impl RateLimitConfig {
    /// Validate rate limiting configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests == 0 {
            return Err("MAX_REQUESTS_PER_MINUTE must be greater than 0".to_string());
        }

        if self.window_seconds == 0 {
            return Err("RATE_LIMIT_WINDOW_SECONDS must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 40,
            window_seconds: 60,
            trust_proxy_headers: false,
        }
    }
}

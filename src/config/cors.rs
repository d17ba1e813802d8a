/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API; `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Parse a comma-separated `ALLOWED_ORIGINS` value
    pub fn from_list(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

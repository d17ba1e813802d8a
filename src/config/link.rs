/// Upper bound for `DEFAULT_EXPIRY_HOURS`: one hundred years.
pub const MAX_DEFAULT_EXPIRY_HOURS: i64 = 24 * 365 * 100;

/// Short link allocation and expiry configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Length of randomly generated short codes
    pub short_code_length: usize,

    /// Maximum number of attempts to generate a unique short code
    pub short_code_max_attempts: u32,

    /// Lifetime of a link created without an explicit expiration date (in hours)
    pub default_expiry_hours: i64,
}

impl LinkConfig {
    /// Validate link configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.short_code_length < 3 || self.short_code_length > 10 {
            return Err("SHORT_CODE_LENGTH must be between 3 and 10".to_string());
        }

        if self.short_code_max_attempts < 1 || self.short_code_max_attempts > 100 {
            return Err("SHORT_CODE_MAX_ATTEMPTS must be between 1 and 100".to_string());
        }

        if self.default_expiry_hours < 1 || self.default_expiry_hours > MAX_DEFAULT_EXPIRY_HOURS {
            return Err(format!(
                "DEFAULT_EXPIRY_HOURS must be between 1 and {}",
                MAX_DEFAULT_EXPIRY_HOURS
            ));
        }

        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            short_code_length: 6,
            short_code_max_attempts: 20,
            default_expiry_hours: 24,
        }
    }
}

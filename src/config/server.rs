/// Listen address, from `SERVER_HOST` / `SERVER_PORT`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` to bind, with command-line overrides applied.
    pub fn bind_addr(&self, host: Option<String>, port: Option<u16>) -> String {
        let host = host.unwrap_or_else(|| self.host.clone());
        format!("{}:{}", host, port.unwrap_or(self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_overrides() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };

        assert_eq!(config.bind_addr(None, None), "127.0.0.1:8080");
        assert_eq!(config.bind_addr(Some("0.0.0.0".to_string()), None), "0.0.0.0:8080");
        assert_eq!(config.bind_addr(None, Some(9000)), "127.0.0.1:9000");
    }
}

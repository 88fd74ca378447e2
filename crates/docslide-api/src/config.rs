//! HTTP server configuration.

use docslide_core::defaults::{MAX_BODY_SIZE_BYTES, SERVER_PORT};

/// Listener address and request limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body in bytes.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: SERVER_PORT,
            body_limit: MAX_BODY_SIZE_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `BODY_LIMIT_BYTES`, falling back to defaults
    /// for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            body_limit: std::env::var("BODY_LIMIT_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.body_limit),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

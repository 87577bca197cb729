//! Configuration for the PlaylistGateway

use crate::Result;
use health_monitor::AlertThresholds;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main configuration for the PlaylistGateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Health alert thresholds
    pub thresholds: AlertThresholds,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl GatewayConfig {
    /// Get the server address
    pub fn server_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    /// Load configuration from file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_addr() {
        let config = GatewayConfig::default();
        let addr = config.server_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_thresholds_parse_from_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [thresholds]
            max_capture_gap_minutes = 10
            min_captures_per_hour = 20
            max_correction_rate = 5.0
            min_cache_hit_rate = 40.0
            min_cache_sample = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.thresholds.max_capture_gap_minutes, 10);
        assert_eq!(config.thresholds.min_cache_sample, 50);
    }
}

//! Configuration for PlaylistStore

use serde::{Deserialize, Serialize};

/// Configuration for the playlist store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database connection URL
    pub database_url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/chirp_playlist".to_string(),
            max_connections: 5,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/chirp_playlist".to_string());

        Self { database_url, ..Self::default() }
    }
}

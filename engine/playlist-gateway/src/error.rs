//! Error types for the PlaylistGateway

use thiserror::Error;

/// Errors that can occur in the PlaylistGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Store error: {0}")]
    Store(#[from] playlist_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid listen address: {0}")]
    ListenAddr(#[from] std::net::AddrParseError),
}

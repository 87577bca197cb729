//! PlaylistGateway - HTTP surface for playlist history, stats, and health
//!
//! This crate wires the playlist store and the health monitor into three
//! read-only JSON endpoints served by warp: the cron health check, the
//! filtered history listing, and the period statistics rollup.

pub mod config;
pub mod error;
pub mod health;
pub mod rest_api;

pub use config::GatewayConfig;
pub use error::GatewayError;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

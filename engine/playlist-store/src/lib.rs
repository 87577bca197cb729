//! PlaylistStore - read-only query layer over the playlist capture table
//!
//! This crate provides the PlaylistStore, which wraps a Postgres pool and
//! exposes the parameterized aggregation queries the playlist gateway needs:
//! capture freshness, windowed counts, album-art cache statistics, correction
//! counts, top DJ/artist rollups, and filtered history listings.

pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod store;

pub use config::StoreConfig;
pub use entry::{ArchiveRange, CacheStats, GroupCount, GroupField, PlayStats, PlaylistEntry};
pub use error::StoreError;
pub use filter::HistoryFilter;
pub use store::PlaylistStore;

// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

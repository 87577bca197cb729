//! Row and aggregate types read from the playlist_history table

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// PlaylistEntry represents one played-track capture.
///
/// Rows are written by the external ingestion process; this crate only reads
/// them. Entries carrying `is_superseded = true` have been replaced by a later
/// correction and are excluded from all current listings and counts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaylistEntry {
    pub id: i64,
    pub chirp_id: Option<String>,
    pub artist: String,
    pub track: String,
    pub release: Option<String>,
    pub label: Option<String>,
    pub dj_name: Option<String>,
    pub notes: Option<String>,
    pub played_at_gmt: DateTime<Utc>,
    pub played_at_local: NaiveDateTime,
    pub captured_at: DateTime<Utc>,
    pub album_art_small: Option<String>,
    pub album_art_medium: Option<String>,
    pub album_art_large: Option<String>,
    pub album_art_enhanced: Option<String>,
    pub artist_is_local: bool,
    pub correction_of: Option<i64>, // id of the entry this one supersedes
    pub is_superseded: bool,
}

/// Album-art cache statistics for a time window.
///
/// Plays are grouped by `(artist, release)` over entries that have both a
/// release and enhanced album art; every repeat play of an already-seen album
/// within the window counts as a cache hit, the first play does not.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct CacheStats {
    pub total_plays: i64,
    pub cache_hits: i64,
}

/// Windowed play rollup for the stats endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayStats {
    pub total_plays: i64,
    pub unique_artists: i64,
    pub local_plays: i64,
}

/// Global first/last play timestamps, unbounded by any window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArchiveRange {
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

/// One row of a top-N rollup: a grouped value and its play count
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupCount {
    pub value: String,
    pub plays: i64,
}

/// Column a top-N rollup groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Dj,
    Artist,
}

impl GroupField {
    /// Column name in playlist_history
    pub fn column(&self) -> &'static str {
        match self {
            GroupField::Dj => "dj_name",
            GroupField::Artist => "artist",
        }
    }
}

//! PlaylistStore implementation
//!
//! Every method is a single parameterized read; failures propagate to the
//! caller as StoreError with no retries.

use crate::config::StoreConfig;
use crate::entry::{ArchiveRange, CacheStats, GroupCount, GroupField, PlayStats, PlaylistEntry};
use crate::filter::HistoryFilter;
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, QueryBuilder};

const ENTRY_COLUMNS: &str = "id, chirp_id, artist, track, release, label, dj_name, notes, \
     played_at_gmt, played_at_local, captured_at, \
     album_art_small, album_art_medium, album_art_large, album_art_enhanced, \
     artist_is_local, correction_of, is_superseded";

/// PlaylistStore provides read-only aggregation queries over playlist_history
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    db_pool: PgPool,
}

impl PlaylistStore {
    /// Wrap an existing pool
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Connect a new pool from configuration
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self { db_pool })
    }

    /// Connectivity probe, used at server startup
    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.db_pool).await?;
        Ok(())
    }

    /// Most recent capture timestamp across all rows, None if the table is empty
    pub async fn latest_capture_time(&self) -> Result<Option<DateTime<Utc>>> {
        let latest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(captured_at) FROM playlist_history",
        )
        .fetch_one(&self.db_pool)
        .await?;

        Ok(latest)
    }

    /// Count of non-superseded entries played within the window
    pub async fn count_since(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM playlist_history \
             WHERE is_superseded = FALSE AND played_at_gmt BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count)
    }

    /// Album-art cache statistics for the window.
    ///
    /// Only entries with both a release and enhanced art participate. Within
    /// each (artist, release) group the first play is a miss and every repeat
    /// is counted as a hit.
    pub async fn cache_stats(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<CacheStats> {
        let stats = sqlx::query_as::<_, CacheStats>(
            "SELECT COALESCE(SUM(plays), 0)::BIGINT AS total_plays, \
                    COALESCE(SUM(GREATEST(plays - 1, 0)), 0)::BIGINT AS cache_hits \
             FROM ( \
                 SELECT COUNT(*) AS plays \
                 FROM playlist_history \
                 WHERE played_at_gmt BETWEEN $1 AND $2 \
                   AND release IS NOT NULL \
                   AND album_art_enhanced IS NOT NULL \
                 GROUP BY artist, release \
             ) album_plays",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stats)
    }

    /// Count of correction entries in the window.
    ///
    /// A correction counts whether or not the entry it replaces is still
    /// flagged superseded.
    pub async fn corrections_since(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM playlist_history \
             WHERE correction_of IS NOT NULL AND played_at_gmt BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count)
    }

    /// Global oldest/newest play timestamps, unbounded by any window
    pub async fn date_range(&self) -> Result<ArchiveRange> {
        let range = sqlx::query_as::<_, ArchiveRange>(
            "SELECT MIN(played_at_gmt) AS oldest, MAX(played_at_gmt) AS newest \
             FROM playlist_history",
        )
        .fetch_one(&self.db_pool)
        .await?;

        Ok(range)
    }

    /// Windowed totals for the stats endpoint in one round trip
    pub async fn play_stats(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<PlayStats> {
        let stats = sqlx::query_as::<_, PlayStats>(
            "SELECT COUNT(*)::BIGINT AS total_plays, \
                    COUNT(DISTINCT artist)::BIGINT AS unique_artists, \
                    (COUNT(*) FILTER (WHERE artist_is_local))::BIGINT AS local_plays \
             FROM playlist_history \
             WHERE is_superseded = FALSE AND played_at_gmt BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stats)
    }

    /// Top N DJs or artists by non-superseded play count within the window.
    ///
    /// Ties are broken by the grouped value ascending so the ordering is
    /// deterministic.
    pub async fn top_group_counts(
        &self,
        field: GroupField,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<GroupCount>> {
        // Column name comes from the GroupField enum, never from user input.
        let column = field.column();
        let sql = format!(
            "SELECT {column} AS value, COUNT(*)::BIGINT AS plays \
             FROM playlist_history \
             WHERE is_superseded = FALSE \
               AND {column} IS NOT NULL \
               AND played_at_gmt BETWEEN $1 AND $2 \
             GROUP BY {column} \
             ORDER BY plays DESC, value ASC \
             LIMIT $3"
        );

        let rows = sqlx::query_as::<_, GroupCount>(&sql)
            .bind(start)
            .bind(end)
            .bind(limit)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(rows)
    }

    /// Filtered history listing, newest first
    pub async fn filtered_history(&self, filter: &HistoryFilter) -> Result<Vec<PlaylistEntry>> {
        let mut qb = QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM playlist_history"));
        filter.apply_to(&mut qb);

        let entries = qb.build_query_as::<PlaylistEntry>().fetch_all(&self.db_pool).await?;

        tracing::debug!(
            "History query returned {} entries for window {} .. {}",
            entries.len(),
            filter.start,
            filter.end
        );

        Ok(entries)
    }
}

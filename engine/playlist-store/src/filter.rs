//! History filter and the dynamic WHERE-clause builder
//!
//! A filter clause is appended only when the corresponding field is supplied;
//! each clause binds its parameter positionally in the same step.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Postgres, QueryBuilder};

/// Rows returned when no limit is supplied
pub const DEFAULT_LIMIT: i64 = 100;

/// Hard cap on rows returned regardless of the requested limit
pub const MAX_LIMIT: i64 = 1000;

/// Default lookback window for history listings, in days
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Filters for a history listing query
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,

    /// Window end (inclusive)
    pub end: DateTime<Utc>,

    /// Maximum rows to return, already clamped to `1..=MAX_LIMIT`
    pub limit: i64,

    /// Case-insensitive substring match on dj_name
    pub dj: Option<String>,

    /// Case-insensitive substring match on artist
    pub artist: Option<String>,

    /// Restrict to entries flagged artist_is_local
    pub local_only: bool,
}

impl HistoryFilter {
    /// Default filter: the last seven days ending at `now`, default limit
    pub fn last_seven_days(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(DEFAULT_WINDOW_DAYS),
            end: now,
            limit: DEFAULT_LIMIT,
            dj: None,
            artist: None,
            local_only: false,
        }
    }

    /// Clamp a requested limit to `1..=MAX_LIMIT`
    pub fn clamp_limit(limit: i64) -> i64 {
        limit.clamp(1, MAX_LIMIT)
    }

    /// Set the row limit, clamping it to the allowed range
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Self::clamp_limit(limit);
        self
    }

    /// Append the WHERE conditions, ordering, and limit for this filter.
    ///
    /// The caller supplies the SELECT head; superseded entries are always
    /// excluded and the window is always applied. Optional clauses are only
    /// pushed when their filter is present.
    pub fn apply_to(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" WHERE is_superseded = FALSE");
        qb.push(" AND played_at_gmt >= ").push_bind(self.start);
        qb.push(" AND played_at_gmt <= ").push_bind(self.end);

        if let Some(dj) = &self.dj {
            qb.push(" AND dj_name ILIKE ").push_bind(format!("%{dj}%"));
        }

        if let Some(artist) = &self.artist {
            qb.push(" AND artist ILIKE ").push_bind(format!("%{artist}%"));
        }

        if self.local_only {
            qb.push(" AND artist_is_local = TRUE");
        }

        qb.push(" ORDER BY played_at_gmt DESC LIMIT ").push_bind(self.limit);
    }
}

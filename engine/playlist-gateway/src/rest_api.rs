//! REST API endpoints for the PlaylistGateway
//!
//! Three read-only JSON routes: the cron health check, the filtered history
//! listing, and the period statistics rollup. Each handler wraps its whole
//! body in a single catch-all; one failing query fails the response.

use crate::health::{self, HealthCheckResponse};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use health_monitor::{evaluate, AlertThresholds};
use playlist_store::{ArchiveRange, GroupCount, GroupField, HistoryFilter, PlaylistEntry, PlaylistStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

/// Entries in the top-DJ/top-artist rollups
const TOP_LIST_SIZE: i64 = 10;

/// Raw query parameters accepted by the history endpoint
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
    pub dj: Option<String>,
    pub artist: Option<String>,
    pub local: Option<String>,
}

/// Raw query parameters accepted by the stats endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub period: Option<String>,
}

/// Statistics period, resolved from the `period` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    All,
}

// 2020-01-01T00:00:00Z, the fixed floor of the "all" period
const ARCHIVE_EPOCH_UNIX: i64 = 1_577_836_800;

impl Period {
    /// Parse a period string; unrecognized values fall back to Week
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("day") => Period::Day,
            Some("month") => Period::Month,
            Some("all") => Period::All,
            _ => Period::Week,
        }
    }

    /// Window start for this period, ending at `now`
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Day => now - Duration::days(1),
            Period::Week => now - Duration::days(7),
            Period::Month => now - Duration::days(30),
            Period::All => DateTime::from_timestamp(ARCHIVE_EPOCH_UNIX, 0).unwrap_or_default(),
        }
    }

    /// Name echoed back in the response
    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::All => "all",
        }
    }
}

/// Parse an ISO 8601 timestamp or a bare `YYYY-MM-DD` date
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolve raw history parameters into a concrete filter.
///
/// Unparseable dates and limits fall back to the defaults rather than
/// erroring, matching the silent-fallback posture of the stats period.
pub fn resolve_filter(params: &HistoryParams, now: DateTime<Utc>) -> HistoryFilter {
    let mut filter = HistoryFilter::last_seven_days(now);

    if let Some(end) = params.end.as_deref().and_then(parse_timestamp) {
        filter.end = end;
    }
    if let Some(start) = params.start.as_deref().and_then(parse_timestamp) {
        filter.start = start;
    }
    if let Some(limit) = params.limit.as_deref().and_then(|s| s.parse::<i64>().ok()) {
        filter.limit = HistoryFilter::clamp_limit(limit);
    }

    filter.dj = params.dj.clone().filter(|s| !s.is_empty());
    filter.artist = params.artist.clone().filter(|s| !s.is_empty());
    filter.local_only = params.local.as_deref() == Some("true");

    filter
}

/// Resolved filter values echoed back to the client
#[derive(Debug, Serialize)]
pub struct QueryEcho {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub limit: i64,
    pub dj: Option<String>,
    pub artist: Option<String>,
    pub local: bool,
}

impl From<&HistoryFilter> for QueryEcho {
    fn from(filter: &HistoryFilter) -> Self {
        Self {
            start: filter.start,
            end: filter.end,
            limit: filter.limit,
            dj: filter.dj.clone(),
            artist: filter.artist.clone(),
            local: filter.local_only,
        }
    }
}

/// History listing response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PlaylistEntry>,
    pub query: QueryEcho,
}

/// Windowed rollup block of the stats response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBlock {
    pub total_plays: i64,
    pub unique_artists: i64,
    pub local_artist_plays: i64,
    pub corrections: i64,
}

/// All-time first/last plays, independent of the requested period
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveBlock {
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

impl From<ArchiveRange> for ArchiveBlock {
    fn from(range: ArchiveRange) -> Self {
        Self { oldest_entry: range.oldest, newest_entry: range.newest }
    }
}

/// Resolved statistics window
#[derive(Debug, Serialize)]
pub struct DateRangeEcho {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Statistics response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub period: String,
    pub date_range: DateRangeEcho,
    pub stats: StatsBlock,
    pub archive: ArchiveBlock,
    pub top_djs: Vec<GroupCount>,
    pub top_artists: Vec<GroupCount>,
}

/// Error envelope for the data endpoints
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    fn new(message: String) -> Self {
        Self { success: false, error: message }
    }
}

/// Health-check endpoint: collect metrics, classify, map status to HTTP code
pub async fn health_check(
    store: Arc<PlaylistStore>,
    thresholds: Arc<AlertThresholds>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let now = Utc::now();

    let response = match health::collect_metrics(&store, now).await {
        Ok(metrics) => {
            let report = evaluate(&metrics, &thresholds);
            if !report.status.is_ok() {
                tracing::warn!("Health check {:?}: {:?}", report.status, report.alerts);
            }
            HealthCheckResponse::from_report(metrics, report, now)
        }
        Err(e) => {
            tracing::error!("Health check failed to collect metrics: {}", e);
            HealthCheckResponse::from_failure(format!("Health check failed: {e}"), now)
        }
    };

    let code = health::http_status(response.status);
    Ok(warp::reply::with_status(warp::reply::json(&response), code))
}

/// History endpoint: resolve filters, run the listing query, echo the filters
pub async fn get_history(
    params: HistoryParams,
    store: Arc<PlaylistStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let filter = resolve_filter(&params, Utc::now());

    match store.filtered_history(&filter).await {
        Ok(entries) => {
            let response = HistoryResponse {
                success: true,
                count: entries.len(),
                data: entries,
                query: QueryEcho::from(&filter),
            };
            Ok(warp::reply::with_status(warp::reply::json(&response), StatusCode::OK))
        }
        Err(e) => {
            tracing::error!("Failed to query playlist history: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiError::new(e.to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Stats endpoint: windowed rollups plus the all-time archive range
pub async fn get_stats(
    params: StatsParams,
    store: Arc<PlaylistStore>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let now = Utc::now();
    let period = Period::parse(params.period.as_deref());
    let start = period.window_start(now);

    match collect_stats(&store, period, start, now).await {
        Ok(response) => Ok(warp::reply::with_status(warp::reply::json(&response), StatusCode::OK)),
        Err(e) => {
            tracing::error!("Failed to compute playlist stats: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiError::new(e.to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn collect_stats(
    store: &PlaylistStore,
    period: Period,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> crate::Result<StatsResponse> {
    let plays = store.play_stats(start, now).await?;
    let corrections = store.corrections_since(start, now).await?;
    let top_djs = store.top_group_counts(GroupField::Dj, start, now, TOP_LIST_SIZE).await?;
    let top_artists = store.top_group_counts(GroupField::Artist, start, now, TOP_LIST_SIZE).await?;
    let archive = store.date_range().await?;

    Ok(StatsResponse {
        success: true,
        period: period.label().to_string(),
        date_range: DateRangeEcho { start, end: now },
        stats: StatsBlock {
            total_plays: plays.total_plays,
            unique_artists: plays.unique_artists,
            local_artist_plays: plays.local_plays,
            corrections,
        },
        archive: ArchiveBlock::from(archive),
        top_djs,
        top_artists,
    })
}

/// JSON bodies for rejected requests; status codes per the API contract
async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, std::convert::Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(warp::reply::json(&ApiError::new(message)), code))
}

/// Create REST API routes
pub fn create_routes(
    store: Arc<PlaylistStore>,
    thresholds: Arc<AlertThresholds>,
) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let thresholds_filter = warp::any().map(move || thresholds.clone());

    // Cron health-check endpoint
    let health = warp::path("api")
        .and(warp::path("cron"))
        .and(warp::path("health-check"))
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and(thresholds_filter)
        .and_then(health_check);

    // Playlist history endpoint
    let history = warp::path("api")
        .and(warp::path("playlist"))
        .and(warp::path("history"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HistoryParams>())
        .and(store_filter.clone())
        .and_then(get_history);

    // Playlist stats endpoint
    let stats = warp::path("api")
        .and(warp::path("playlist"))
        .and(warp::path("stats"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<StatsParams>())
        .and(store_filter)
        .and_then(get_stats);

    health
        .or(history)
        .or(stats)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "OPTIONS"]),
        )
        .recover(handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing_falls_back_to_week() {
        assert_eq!(Period::parse(Some("day")), Period::Day);
        assert_eq!(Period::parse(Some("week")), Period::Week);
        assert_eq!(Period::parse(Some("month")), Period::Month);
        assert_eq!(Period::parse(Some("all")), Period::All);
        assert_eq!(Period::parse(Some("bogus")), Period::Week);
        assert_eq!(Period::parse(None), Period::Week);
    }

    #[test]
    fn test_period_windows() {
        let now = Utc::now();

        assert_eq!(Period::Day.window_start(now), now - Duration::days(1));
        assert_eq!(Period::Week.window_start(now), now - Duration::days(7));
        assert_eq!(Period::Month.window_start(now), now - Duration::days(30));

        let epoch = Period::All.window_start(now);
        assert_eq!(epoch.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc3339 = parse_timestamp("2025-06-01T12:30:00Z").unwrap();
        assert_eq!(rfc3339.to_rfc3339(), "2025-06-01T12:30:00+00:00");

        let date_only = parse_timestamp("2025-06-01").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2025-06-01T00:00:00+00:00");

        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_resolve_filter_defaults() {
        let now = Utc::now();
        let filter = resolve_filter(&HistoryParams::default(), now);

        assert_eq!(filter.end, now);
        assert_eq!(filter.start, now - Duration::days(7));
        assert_eq!(filter.limit, 100);
        assert!(filter.dj.is_none());
        assert!(filter.artist.is_none());
        assert!(!filter.local_only);
    }

    #[test]
    fn test_resolve_filter_bad_values_fall_back() {
        let now = Utc::now();
        let params = HistoryParams {
            start: Some("garbage".to_string()),
            end: Some("also garbage".to_string()),
            limit: Some("not-a-number".to_string()),
            ..Default::default()
        };
        let filter = resolve_filter(&params, now);

        assert_eq!(filter.end, now);
        assert_eq!(filter.start, now - Duration::days(7));
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn test_resolve_filter_limit_clamp() {
        let now = Utc::now();
        let params = HistoryParams { limit: Some("5000".to_string()), ..Default::default() };
        assert_eq!(resolve_filter(&params, now).limit, 1000);

        let params = HistoryParams { limit: Some("250".to_string()), ..Default::default() };
        assert_eq!(resolve_filter(&params, now).limit, 250);
    }

    #[test]
    fn test_resolve_filter_local_flag() {
        let now = Utc::now();

        let params = HistoryParams { local: Some("true".to_string()), ..Default::default() };
        assert!(resolve_filter(&params, now).local_only);

        // Anything other than the literal "true" leaves the filter off
        let params = HistoryParams { local: Some("1".to_string()), ..Default::default() };
        assert!(!resolve_filter(&params, now).local_only);
    }

    #[test]
    fn test_stats_response_field_names() {
        let response = StatsResponse {
            success: true,
            period: "week".to_string(),
            date_range: DateRangeEcho { start: Utc::now(), end: Utc::now() },
            stats: StatsBlock {
                total_plays: 100,
                unique_artists: 40,
                local_artist_plays: 12,
                corrections: 3,
            },
            archive: ArchiveBlock { oldest_entry: None, newest_entry: None },
            top_djs: vec![],
            top_artists: vec![],
        };

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["stats"]["totalPlays"], 100);
        assert_eq!(body["stats"]["localArtistPlays"], 12);
        assert!(body["dateRange"].is_object());
        assert!(body["topDjs"].is_array());
        assert!(body["archive"]["oldestEntry"].is_null());
    }
}

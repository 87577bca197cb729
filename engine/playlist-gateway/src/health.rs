//! Health-check metric collection and response shaping

use crate::Result;
use chrono::{DateTime, Duration, Utc};
use health_monitor::{minutes_since, rate, HealthMetrics, HealthReport, HealthStatus};
use playlist_store::PlaylistStore;
use serde::Serialize;
use warp::http::StatusCode;

/// Body of the health-check endpoint.
///
/// `metrics` is None only when metric collection itself failed; the alert
/// list then carries the failure text instead of rule output.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    pub metrics: Option<HealthMetrics>,
    pub alerts: Vec<String>,
    pub ok: bool,
}

impl HealthCheckResponse {
    /// Response for a completed evaluation pass
    pub fn from_report(metrics: HealthMetrics, report: HealthReport, now: DateTime<Utc>) -> Self {
        Self {
            ok: report.status.is_ok(),
            status: report.status,
            timestamp: now.to_rfc3339(),
            metrics: Some(metrics),
            alerts: report.alerts,
        }
    }

    /// Synthetic down response when metric collection failed
    pub fn from_failure(message: String, now: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Down,
            timestamp: now.to_rfc3339(),
            metrics: None,
            alerts: vec![message],
            ok: false,
        }
    }
}

/// HTTP code for a health status.
///
/// Degraded still answers 200 so uptime monitors can tell "unreachable"
/// apart from "responding but impaired"; only Down maps to 503.
pub fn http_status(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Degraded | HealthStatus::Healthy => StatusCode::OK,
    }
}

/// Run the aggregation queries and assemble the metric snapshot.
///
/// Queries run sequentially; every window is anchored to the single `now`
/// the caller captured for the request.
pub async fn collect_metrics(store: &PlaylistStore, now: DateTime<Utc>) -> Result<HealthMetrics> {
    let hour_ago = now - Duration::hours(1);
    let day_ago = now - Duration::hours(24);

    let last_capture = store.latest_capture_time().await?;
    let captures_last_hour = store.count_since(hour_ago, now).await?;
    let captures_last_24h = store.count_since(day_ago, now).await?;
    let cache = store.cache_stats(day_ago, now).await?;
    let corrections_last_24h = store.corrections_since(day_ago, now).await?;

    Ok(HealthMetrics {
        minutes_since_last_capture: minutes_since(last_capture, now),
        last_capture_at: last_capture,
        captures_last_hour,
        captures_last_24h,
        corrections_last_24h,
        error_rate_24h: rate(corrections_last_24h, captures_last_24h),
        cache_hit_rate_24h: rate(cache.cache_hits, cache.total_plays),
        cacheable_plays_24h: cache.total_plays,
    })
}

//! Threshold-based health classification
//!
//! A fresh classification of the current metric snapshot, not a stateful
//! machine: nothing here persists between evaluations.

use crate::metrics::HealthMetrics;
use crate::thresholds::AlertThresholds;
use serde::{Deserialize, Serialize};

/// Overall pipeline health, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

impl HealthStatus {
    /// Whether the snapshot passed every rule
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Result of one evaluation pass: a status and its explanatory alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub alerts: Vec<String>,
}

/// Classify a metric snapshot against the configured thresholds.
///
/// Rules run in fixed order and may only escalate the severity; a later
/// degraded-level rule never downgrades an earlier down-level one.
pub fn evaluate(metrics: &HealthMetrics, thresholds: &AlertThresholds) -> HealthReport {
    let mut status = HealthStatus::Healthy;
    let mut alerts = Vec::new();

    if metrics.minutes_since_last_capture > thresholds.max_capture_gap_minutes {
        alerts.push(format!(
            "No captures in {} minutes (expected every 30 seconds)",
            metrics.minutes_since_last_capture
        ));
        status = status.max(HealthStatus::Down);
    }

    if metrics.captures_last_hour < thresholds.min_captures_per_hour {
        alerts.push(format!(
            "Low capture rate: {} songs/hour (expected 60-120)",
            metrics.captures_last_hour
        ));
        status = status.max(HealthStatus::Degraded);
    }

    if metrics.error_rate_24h > thresholds.max_correction_rate {
        alerts.push(format!(
            "High correction rate: {}% (expected <5%)",
            metrics.error_rate_24h
        ));
        status = status.max(HealthStatus::Degraded);
    }

    // The cache rule only applies once the window holds a meaningful sample.
    if metrics.cache_hit_rate_24h < thresholds.min_cache_hit_rate
        && metrics.cacheable_plays_24h > thresholds.min_cache_sample
    {
        alerts.push(format!(
            "Low cache hit rate: {}% (expected >50%)",
            metrics.cache_hit_rate_24h
        ));
        status = status.max(HealthStatus::Degraded);
    }

    if !alerts.is_empty() {
        tracing::debug!("Health evaluation raised {} alert(s): {:?}", alerts.len(), status);
    }

    HealthReport { status, alerts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NEVER_CAPTURED_MINUTES;

    fn healthy_metrics() -> HealthMetrics {
        HealthMetrics {
            minutes_since_last_capture: 1,
            last_capture_at: None,
            captures_last_hour: 90,
            captures_last_24h: 2000,
            corrections_last_24h: 10,
            error_rate_24h: 0.5,
            cache_hit_rate_24h: 80.0,
            cacheable_plays_24h: 1500,
        }
    }

    #[test]
    fn test_all_nominal_is_healthy() {
        let report = evaluate(&healthy_metrics(), &AlertThresholds::default());

        assert_eq!(report.status, HealthStatus::Healthy);
        assert!(report.alerts.is_empty());
        assert!(report.status.is_ok());
    }

    #[test]
    fn test_low_capture_rate_degrades() {
        let mut metrics = healthy_metrics();
        metrics.captures_last_hour = 5;
        metrics.minutes_since_last_capture = 2;
        metrics.error_rate_24h = 0.0;
        metrics.cache_hit_rate_24h = 80.0;
        metrics.cacheable_plays_24h = 200;

        let report = evaluate(&metrics, &AlertThresholds::default());

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0], "Low capture rate: 5 songs/hour (expected 60-120)");
    }

    #[test]
    fn test_capture_gap_is_down() {
        let mut metrics = healthy_metrics();
        metrics.minutes_since_last_capture = 12;

        let report = evaluate(&metrics, &AlertThresholds::default());

        assert_eq!(report.status, HealthStatus::Down);
        assert_eq!(
            report.alerts[0],
            "No captures in 12 minutes (expected every 30 seconds)"
        );
    }

    #[test]
    fn test_empty_table_sentinel_is_down() {
        let mut metrics = healthy_metrics();
        metrics.minutes_since_last_capture = NEVER_CAPTURED_MINUTES;
        metrics.captures_last_hour = 0;
        metrics.captures_last_24h = 0;

        let report = evaluate(&metrics, &AlertThresholds::default());
        assert_eq!(report.status, HealthStatus::Down);
    }

    #[test]
    fn test_degraded_rule_never_downgrades_down() {
        // Rules 1 and 3 together: the gap outage must win over the
        // correction-rate degradation.
        let mut metrics = healthy_metrics();
        metrics.minutes_since_last_capture = 30;
        metrics.error_rate_24h = 25.0;

        let report = evaluate(&metrics, &AlertThresholds::default());

        assert_eq!(report.status, HealthStatus::Down);
        assert_eq!(report.alerts.len(), 2);
    }

    #[test]
    fn test_cache_rule_needs_sample_size() {
        let mut metrics = healthy_metrics();
        metrics.cache_hit_rate_24h = 10.0;
        metrics.cacheable_plays_24h = 100;

        let report = evaluate(&metrics, &AlertThresholds::default());
        assert_eq!(report.status, HealthStatus::Healthy);

        metrics.cacheable_plays_24h = 101;
        let report = evaluate(&metrics, &AlertThresholds::default());
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.alerts[0], "Low cache hit rate: 10% (expected >50%)");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Down);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&HealthStatus::Down).unwrap(), "\"down\"");
        assert_eq!(serde_json::to_string(&HealthStatus::Healthy).unwrap(), "\"healthy\"");
    }
}

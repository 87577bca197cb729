//! Alert threshold configuration

use serde::{Deserialize, Serialize};

/// Thresholds the alert evaluator classifies a metric snapshot against.
///
/// The capture pipeline is expected to ingest a row roughly every 30 seconds,
/// so the defaults treat a 5-minute silence as an outage and under 10 rows an
/// hour as degraded throughput.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Minutes without a capture before the station is considered down
    pub max_capture_gap_minutes: i64,

    /// Minimum captures per hour before throughput is considered degraded
    pub min_captures_per_hour: i64,

    /// Correction rate (percent) above which data quality is degraded
    pub max_correction_rate: f64,

    /// Cache-hit rate (percent) below which art caching is degraded
    pub min_cache_hit_rate: f64,

    /// Minimum cacheable plays before the cache-hit rule applies at all
    pub min_cache_sample: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_capture_gap_minutes: 5,
            min_captures_per_hour: 10,
            max_correction_rate: 10.0,
            min_cache_hit_rate: 30.0,
            min_cache_sample: 100,
        }
    }
}

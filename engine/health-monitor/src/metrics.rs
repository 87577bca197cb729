//! Metric calculations over raw aggregation results
//!
//! All functions here are total: defined for every numeric input, including
//! empty-table and zero-denominator cases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel minute count reported when no capture has ever been recorded
pub const NEVER_CAPTURED_MINUTES: i64 = 999_999;

/// Whole minutes elapsed since the last capture, truncated toward zero.
///
/// Returns the `NEVER_CAPTURED_MINUTES` sentinel when the table has never
/// seen a capture, which trips the capture-gap alert on an empty store.
pub fn minutes_since(last_capture: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match last_capture {
        Some(last) => (now - last).num_minutes(),
        None => NEVER_CAPTURED_MINUTES,
    }
}

/// Percentage rate rounded to one decimal place.
///
/// A non-positive denominator yields 0 rather than propagating a division
/// error; an empty window reads as a zero rate.
pub fn rate(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }

    let pct = numerator as f64 / denominator as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Snapshot of capture-pipeline metrics, computed fresh per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub minutes_since_last_capture: i64,
    pub last_capture_at: Option<DateTime<Utc>>,
    pub captures_last_hour: i64,
    pub captures_last_24h: i64,
    pub corrections_last_24h: i64,
    pub error_rate_24h: f64,
    pub cache_hit_rate_24h: f64,
    pub cacheable_plays_24h: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_minutes_since_never_captured() {
        let now = Utc::now();
        assert_eq!(minutes_since(None, now), NEVER_CAPTURED_MINUTES);
    }

    #[test]
    fn test_minutes_since_truncates() {
        let now = Utc::now();

        let last = now - Duration::seconds(90);
        assert_eq!(minutes_since(Some(last), now), 1);

        let last = now - Duration::seconds(59);
        assert_eq!(minutes_since(Some(last), now), 0);

        let last = now - Duration::minutes(31);
        assert_eq!(minutes_since(Some(last), now), 31);
    }

    #[test]
    fn test_rate_zero_denominator() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(5, -1), 0.0);
    }

    #[test]
    fn test_rate_rounds_to_one_decimal() {
        assert_eq!(rate(1, 3), 33.3);
        assert_eq!(rate(2, 3), 66.7);
        assert_eq!(rate(1, 1), 100.0);
        assert_eq!(rate(0, 10), 0.0);
    }
}

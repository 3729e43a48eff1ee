use chrono::{DateTime, Duration, Utc};
use common::detection::detection_result::DetectionResult;
use common::detection::system_metrics::{SystemMetrics, DEFAULT_AVG_PROCESSING_TIME};

pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Rebuilds the derived counters of `metrics` from the full result set.
/// Accuracy, precision and recall are carried over untouched.
pub fn recompute(metrics: &SystemMetrics, results: &[DetectionResult], now: DateTime<Utc>) -> SystemMetrics {
    let total_processed = results.len();
    let avg_processing_time = if total_processed > 0 {
        results.iter().map(|result| result.processing_time).sum::<f64>() / total_processed as f64
    } else {
        DEFAULT_AVG_PROCESSING_TIME
    };
    let recent_since = now - Duration::hours(RECENT_WINDOW_HOURS);
    let recent_detections = results.iter()
        .filter(|result| result.created_at > recent_since)
        .map(|result| result.total_pedestrians as u64)
        .sum();
    let high_risk_detections = results.iter()
        .map(|result| result.high_risk_count() as u64)
        .sum();
    SystemMetrics {
        total_processed: total_processed as u64,
        avg_processing_time,
        recent_detections,
        high_risk_detections,
        updated_at: now,
        ..metrics.clone()
    }
}

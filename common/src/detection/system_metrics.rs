use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ACCURACY: f64 = 94.2;
pub const DEFAULT_PRECISION: f64 = 91.8;
pub const DEFAULT_RECALL: f64 = 89.5;
pub const DEFAULT_AVG_PROCESSING_TIME: f64 = 0.21;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub id: Uuid,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub avg_processing_time: f64, //seconds
    pub total_processed: u64,
    pub high_risk_detections: u64,
    pub recent_detections: u64,
    pub updated_at: DateTime<Utc>,
}

/// Administrative override of [`SystemMetrics`]; `id` and `updated_at` are kept by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSystemMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub avg_processing_time: f64,
    pub total_processed: u64,
    pub high_risk_detections: u64,
    pub recent_detections: u64,
}

impl SystemMetrics {
    pub fn seed() -> Self {
        Self {
            id: Uuid::new_v4(),
            accuracy: DEFAULT_ACCURACY,
            precision: DEFAULT_PRECISION,
            recall: DEFAULT_RECALL,
            avg_processing_time: DEFAULT_AVG_PROCESSING_TIME,
            total_processed: 0,
            high_risk_detections: 0,
            recent_detections: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn overridden(&self, new: NewSystemMetrics, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            accuracy: new.accuracy,
            precision: new.precision,
            recall: new.recall,
            avg_processing_time: new.avg_processing_time,
            total_processed: new.total_processed,
            high_risk_detections: new.high_risk_detections,
            recent_detections: new.recent_detections,
            updated_at,
        }
    }
}

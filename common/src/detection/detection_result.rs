use crate::detection::detection::Detection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub id: Uuid,
    pub filename: String,
    pub original_url: String,
    pub processed_url: Option<String>,
    pub detections: Vec<Detection>,
    pub processing_time: f64, //seconds
    pub total_pedestrians: u32,
    pub created_at: DateTime<Utc>,
}

/// Insert form of [`DetectionResult`]; the store assigns `id` and `created_at`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewDetectionResult {
    pub filename: String,
    pub original_url: String,
    #[serde(default)]
    pub processed_url: Option<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
    pub processing_time: f64,
    #[serde(default)]
    pub total_pedestrians: u32,
}

impl DetectionResult {
    pub fn from_new(id: Uuid, created_at: DateTime<Utc>, new: NewDetectionResult) -> Self {
        Self {
            id,
            filename: new.filename,
            original_url: new.original_url,
            processed_url: new.processed_url,
            detections: new.detections,
            processing_time: new.processing_time,
            total_pedestrians: new.total_pedestrians,
            created_at,
        }
    }

    pub fn high_risk_count(&self) -> usize {
        self.detections.iter().filter(|detection| detection.is_high_risk()).count()
    }
}

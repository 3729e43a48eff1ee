use crate::storage::Storage;
use crate::storage::metrics::recompute;
use crate::utils::logging::*;
use chrono::{DateTime, Utc};
use common::detection::detection_result::{DetectionResult, NewDetectionResult};
use common::detection::system_metrics::{NewSystemMetrics, SystemMetrics};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

struct Inner {
    detection_results: Vec<DetectionResult>,
    index: HashMap<Uuid, usize>,
    system_metrics: SystemMetrics,
}

impl Inner {
    fn insert(&mut self, result: DetectionResult, now: DateTime<Utc>) {
        self.index.insert(result.id, self.detection_results.len());
        self.detection_results.push(result);
        self.refresh_metrics(now);
    }

    fn refresh_metrics(&mut self, now: DateTime<Utc>) {
        self.system_metrics = recompute(&self.system_metrics, &self.detection_results, now);
    }
}

pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                detection_results: Vec::new(),
                index: HashMap::new(),
                system_metrics: SystemMetrics::seed(),
            }),
        }
    }

    async fn insert_at(&self, new: NewDetectionResult, created_at: DateTime<Utc>) -> DetectionResult {
        let result = DetectionResult::from_new(Uuid::new_v4(), created_at, new);
        self.inner.write().await.insert(result.clone(), Utc::now());
        result
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    async fn create_detection_result(&self, new: NewDetectionResult) -> DetectionResult {
        let result = self.insert_at(new, Utc::now()).await;
        logging_information!(DetectionEntry::ResultStored(result.id));
        result
    }

    async fn get_detection_result(&self, id: &Uuid) -> Option<DetectionResult> {
        let inner = self.inner.read().await;
        inner.index.get(id).map(|position| inner.detection_results[*position].clone())
    }

    async fn get_all_detection_results(&self) -> Vec<DetectionResult> {
        let mut results = self.inner.read().await.detection_results.clone();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results
    }

    async fn get_system_metrics(&self) -> SystemMetrics {
        let mut inner = self.inner.write().await;
        inner.refresh_metrics(Utc::now());
        inner.system_metrics.clone()
    }

    async fn update_system_metrics(&self, new: NewSystemMetrics) -> SystemMetrics {
        let metrics = {
            let mut inner = self.inner.write().await;
            inner.system_metrics = inner.system_metrics.overridden(new, Utc::now());
            inner.system_metrics.clone()
        };
        logging_notice!(DetectionEntry::MetricsOverridden);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use common::detection::detection::Detection;
    use common::detection::system_metrics::DEFAULT_AVG_PROCESSING_TIME;

    fn new_result(pedestrians: u32, processing_time: f64) -> NewDetectionResult {
        let detections = (0..pedestrians)
            .map(|i| Detection::new([0.1 * i as f64, 0.2, 0.1, 0.3], if i == 0 { 0.95 } else { 0.8 }, "person"))
            .collect();
        NewDetectionResult {
            filename: format!("street_{pedestrians}.jpg"),
            original_url: format!("/uploads/street_{pedestrians}.jpg"),
            detections,
            processing_time,
            total_pedestrians: pedestrians,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_timestamp_and_defaults() {
        let storage = MemStorage::new();
        let before = Utc::now();
        let result = storage.create_detection_result(NewDetectionResult {
            filename: "empty.png".to_string(),
            original_url: "/uploads/empty.png".to_string(),
            processing_time: 0.3,
            ..Default::default()
        }).await;
        assert!(result.created_at >= before);
        assert_eq!(result.processed_url, None);
        assert!(result.detections.is_empty());
        assert_eq!(result.total_pedestrians, 0);
        assert_eq!(storage.get_detection_result(&result.id).await, Some(result));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let storage = MemStorage::new();
        storage.create_detection_result(new_result(1, 0.2)).await;
        assert_eq!(storage.get_detection_result(&Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let storage = MemStorage::new();
        let now = Utc::now();
        let oldest = storage.insert_at(new_result(1, 0.1), now - Duration::minutes(10)).await;
        let newest = storage.insert_at(new_result(2, 0.1), now).await;
        let middle = storage.insert_at(new_result(3, 0.1), now - Duration::minutes(5)).await;
        let ids = storage.get_all_detection_results().await
            .into_iter().map(|result| result.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let storage = MemStorage::new();
        let now = Utc::now();
        let first = storage.insert_at(new_result(1, 0.1), now).await;
        let second = storage.insert_at(new_result(1, 0.1), now).await;
        let results = storage.get_all_detection_results().await;
        assert_eq!(results[0].id, first.id);
        assert_eq!(results[1].id, second.id);
    }

    #[tokio::test]
    async fn listing_is_never_increasing_in_time() {
        let storage = MemStorage::new();
        for i in 0..8 {
            storage.create_detection_result(new_result(i % 3, 0.1)).await;
        }
        let results = storage.get_all_detection_results().await;
        assert_eq!(results.len(), 8);
        assert!(results.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn metrics_follow_three_uploads() {
        let storage = MemStorage::new();
        assert_eq!(storage.get_system_metrics().await.avg_processing_time, DEFAULT_AVG_PROCESSING_TIME);
        for (pedestrians, processing_time) in [(2, 0.1), (3, 0.2), (5, 0.3)] {
            storage.create_detection_result(new_result(pedestrians, processing_time)).await;
        }
        let metrics = storage.get_system_metrics().await;
        assert_eq!(metrics.total_processed, 3);
        assert!((metrics.avg_processing_time - 0.2).abs() < 1e-9);
        assert_eq!(metrics.recent_detections, 10);
        assert_eq!(metrics.high_risk_detections, 3);
    }

    #[tokio::test]
    async fn backdated_result_is_not_recent() {
        let storage = MemStorage::new();
        storage.insert_at(new_result(4, 0.2), Utc::now() - Duration::hours(30)).await;
        storage.create_detection_result(new_result(2, 0.2)).await;
        let metrics = storage.get_system_metrics().await;
        assert_eq!(metrics.total_processed, 2);
        assert_eq!(metrics.recent_detections, 2);
    }

    #[tokio::test]
    async fn override_is_returned_verbatim_then_counters_recompute() {
        let storage = MemStorage::new();
        let seeded = storage.get_system_metrics().await;
        storage.create_detection_result(new_result(2, 0.4)).await;
        let overridden = storage.update_system_metrics(NewSystemMetrics {
            accuracy: 80.0,
            precision: 70.0,
            recall: 60.0,
            avg_processing_time: 9.0,
            total_processed: 1000,
            high_risk_detections: 50,
            recent_detections: 75,
        }).await;
        assert_eq!(overridden.id, seeded.id);
        assert_eq!(overridden.total_processed, 1000);
        assert_eq!(overridden.avg_processing_time, 9.0);
        let metrics = storage.get_system_metrics().await;
        assert_eq!(metrics.accuracy, 80.0);
        assert_eq!(metrics.total_processed, 1);
        assert!((metrics.avg_processing_time - 0.4).abs() < 1e-9);
    }
}

pub mod mem_storage;
pub mod metrics;

use common::detection::detection_result::{DetectionResult, NewDetectionResult};
use common::detection::system_metrics::{NewSystemMetrics, SystemMetrics};
use std::future::Future;
use uuid::Uuid;

pub use mem_storage::MemStorage;

/// Repository of detection results and the derived metrics singleton.
///
/// [`MemStorage`] keeps everything in process memory; a durable backend only
/// has to implement this trait.
pub trait Storage: Send + Sync {
    fn create_detection_result(&self, new: NewDetectionResult) -> impl Future<Output = DetectionResult> + Send;

    fn get_detection_result(&self, id: &Uuid) -> impl Future<Output = Option<DetectionResult>> + Send;

    /// Every stored result, newest first.
    fn get_all_detection_results(&self) -> impl Future<Output = Vec<DetectionResult>> + Send;

    /// Recomputes the derived counters before returning.
    fn get_system_metrics(&self) -> impl Future<Output = SystemMetrics> + Send;

    /// Replaces the metrics wholesale without recomputing.
    fn update_system_metrics(&self, new: NewSystemMetrics) -> impl Future<Output = SystemMetrics> + Send;
}

/// Backend handed to the request handlers.
pub type AppStorage = MemStorage;

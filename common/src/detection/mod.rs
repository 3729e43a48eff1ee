pub mod detection;
pub mod detection_result;
pub mod system_metrics;

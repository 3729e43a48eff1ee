pub mod constant_mock;

use crate::detector::constant_mock::ConstantMock;
use crate::utils::config::Config;
use common::detection::detection::Detection;
use std::path::Path;

/// Source of detections for an uploaded image.
///
/// Only the constant mock exists; a real inference backend becomes another variant.
#[derive(Debug, Clone)]
pub enum Detector {
    ConstantMock(ConstantMock),
}

impl Detector {
    pub fn from_config(config: &Config) -> Self {
        Detector::ConstantMock(ConstantMock::new(config.detection_delay))
    }

    pub async fn detect(&self, image_path: &Path) -> Vec<Detection> {
        match self {
            Detector::ConstantMock(mock) => mock.detect(image_path).await,
        }
    }
}

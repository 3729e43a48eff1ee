use common::detection::detection::Detection;
use rand::Rng;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

pub const PERSON_CLASS: &str = "person";

/// Returns the same three pedestrians for every image after an artificial delay.
#[derive(Debug, Clone)]
pub struct ConstantMock {
    delay_range: [u64; 2], //milliseconds
}

impl ConstantMock {
    pub fn new(delay_range: [u64; 2]) -> Self {
        Self {
            delay_range,
        }
    }

    pub async fn detect(&self, _image_path: &Path) -> Vec<Detection> {
        let delay = self.pick_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        Self::detections()
    }

    pub fn detections() -> Vec<Detection> {
        vec![
            Detection::new([0.15, 0.2, 0.35, 0.65], 0.92, PERSON_CLASS),
            Detection::new([0.45, 0.25, 0.63, 0.65], 0.89, PERSON_CLASS),
            Detection::new([0.7, 0.3, 0.85, 0.65], 0.84, PERSON_CLASS),
        ]
    }

    fn pick_delay(&self) -> Duration {
        let [start, end] = self.delay_range;
        let millis = if end > start {
            rand::thread_rng().gen_range(start..=end)
        } else {
            start
        };
        Duration::from_millis(millis)
    }
}

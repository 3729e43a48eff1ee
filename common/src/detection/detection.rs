use serde::{Deserialize, Serialize};

/// Confidence above which a detection counts as high risk.
pub const HIGH_RISK_CONFIDENCE: f64 = 0.9;

/// One predicted object. `bbox` is `[x, y, width, height]` as fractions of the
/// image size, origin top-left.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: [f64; 4],
    pub confidence: f64,
    pub class: String,
}

impl Detection {
    pub fn new<T: Into<String>>(bbox: [f64; 4], confidence: f64, class: T) -> Self {
        Self {
            bbox,
            confidence,
            class: class.into(),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.confidence > HIGH_RISK_CONFIDENCE
    }
}

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DetectionEntry {
    #[error("Detection result {0} stored")]
    ResultStored(Uuid),
    #[error("System metrics overridden")]
    MetricsOverridden,
    #[error("Font {0} could not be loaded, overlay labels will have no text")]
    FontUnavailable(String),
    #[error("Failed to render overlay for {0}: {1}")]
    OverlayRenderError(String, String),
}

impl From<DetectionEntry> for String {
    #[inline(always)]
    fn from(value: DetectionEntry) -> Self {
        value.to_string()
    }
}

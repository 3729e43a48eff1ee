use crate::overlay::canvas::Canvas;
use crate::overlay::renderer::OverlayRenderer;
use common::detection::detection::Detection;
use common::detection::detection_result::DetectionResult;

/// Image the overlay is aligned to. The natural size is unknown until it has loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    source: String,
    natural_size: Option<(u32, u32)>,
}

impl ImageElement {
    pub fn new<T: Into<String>>(source: T) -> Self {
        Self {
            source: source.into(),
            natural_size: None,
        }
    }

    pub fn loaded<T: Into<String>>(source: T, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            natural_size: Some((width, height)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_complete(&self) -> bool {
        self.natural_size.is_some()
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.natural_size
    }
}

/// Overlay bound to one image and one set of detections.
///
/// Every new result triggers a full redraw. Drawing waits for the image to
/// finish loading and silently does nothing while the surface or the image
/// is missing.
pub struct DetectionCanvas<C: Canvas> {
    renderer: OverlayRenderer,
    canvas: Option<C>,
    image: Option<ImageElement>,
    detections: Vec<Detection>,
    pending: bool,
}

impl<C: Canvas> DetectionCanvas<C> {
    pub fn new(renderer: OverlayRenderer) -> Self {
        Self {
            renderer,
            canvas: None,
            image: None,
            detections: Vec::new(),
            pending: false,
        }
    }

    pub fn attach_canvas(&mut self, canvas: C) -> bool {
        self.canvas = Some(canvas);
        self.redraw()
    }

    pub fn detach_canvas(&mut self) -> Option<C> {
        self.canvas.take()
    }

    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Shows a stored result over its original upload, which still has to load.
    pub fn set_result(&mut self, result: &DetectionResult) -> bool {
        self.show(ImageElement::new(result.original_url.clone()), &result.detections)
    }

    /// Returns whether the overlay was drawn right away.
    pub fn show(&mut self, image: ImageElement, detections: &[Detection]) -> bool {
        self.image = Some(image);
        self.detections = detections.to_vec();
        self.redraw()
    }

    /// Load completion of `source`; finishes a deferred draw. Completions for an
    /// image that has since been replaced are ignored.
    pub fn image_loaded(&mut self, source: &str, width: u32, height: u32) -> bool {
        match self.image.as_mut() {
            Some(image) if image.source() == source => image.natural_size = Some((width, height)),
            _ => return false,
        }
        if self.pending {
            self.redraw()
        } else {
            false
        }
    }

    fn redraw(&mut self) -> bool {
        let (Some(canvas), Some(image)) = (self.canvas.as_mut(), self.image.as_ref()) else {
            return false;
        };
        match image.natural_size() {
            Some(natural_size) => {
                self.renderer.draw(canvas, natural_size, &self.detections);
                self.pending = false;
                true
            }
            None => {
                self.pending = true;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::canvas::PixelRect;
    use crate::overlay::renderer::tests::{Command, RecordingCanvas};
    use chrono::Utc;
    use common::detection::detection_result::NewDetectionResult;
    use uuid::Uuid;

    fn detections() -> Vec<Detection> {
        vec![Detection::new([0.1, 0.2, 0.3, 0.4], 0.923, "person")]
    }

    fn overlay() -> DetectionCanvas<RecordingCanvas> {
        let mut overlay = DetectionCanvas::new(OverlayRenderer::default());
        overlay.attach_canvas(RecordingCanvas::default());
        overlay
    }

    #[test]
    fn loaded_image_draws_immediately() {
        let mut overlay = overlay();
        assert!(overlay.show(ImageElement::loaded("/uploads/a.png", 1000, 500), &detections()));
        let canvas = overlay.canvas().unwrap();
        assert_eq!(canvas.size, (1000, 500));
        assert!(canvas.commands.contains(&Command::Stroke(PixelRect::new(100.0, 100.0, 300.0, 200.0))));
    }

    #[test]
    fn draw_waits_for_image_load() {
        let mut overlay = overlay();
        assert!(!overlay.show(ImageElement::new("/uploads/a.png"), &detections()));
        assert!(overlay.is_pending());
        assert!(overlay.canvas().unwrap().commands.is_empty());
        assert!(overlay.image_loaded("/uploads/a.png", 1000, 500));
        assert!(!overlay.is_pending());
        assert_eq!(overlay.canvas().unwrap().commands[0], Command::Resize(1000, 500));
    }

    #[test]
    fn missing_surface_is_a_silent_no_op() {
        let mut overlay: DetectionCanvas<RecordingCanvas> = DetectionCanvas::new(OverlayRenderer::default());
        assert!(!overlay.show(ImageElement::loaded("/uploads/a.png", 10, 10), &detections()));
        assert!(!overlay.image_loaded("/uploads/a.png", 10, 10));
        assert!(overlay.canvas().is_none());
    }

    #[test]
    fn missing_image_is_a_silent_no_op() {
        let mut overlay = overlay();
        assert!(!overlay.image_loaded("/uploads/a.png", 10, 10));
        assert!(overlay.canvas().unwrap().commands.is_empty());
    }

    #[test]
    fn new_result_clears_and_redraws_everything() {
        let mut overlay = overlay();
        overlay.show(ImageElement::loaded("/uploads/a.png", 1000, 500), &detections());
        let result = DetectionResult::from_new(Uuid::new_v4(), Utc::now(), NewDetectionResult {
            filename: "b.png".to_string(),
            original_url: "/uploads/b.png".to_string(),
            detections: vec![Detection::new([0.5, 0.5, 0.25, 0.25], 0.5, "person")],
            processing_time: 0.2,
            total_pedestrians: 1,
            ..Default::default()
        });
        assert!(!overlay.set_result(&result));
        assert!(overlay.image_loaded("/uploads/b.png", 400, 400));
        let canvas = overlay.detach_canvas().unwrap();
        let last_clear = canvas.commands.iter().rposition(|command| *command == Command::Clear).unwrap();
        let redraw = &canvas.commands[last_clear - 1..];
        assert_eq!(redraw[0], Command::Resize(400, 400));
        assert_eq!(redraw.iter().filter(|command| matches!(command, Command::Stroke(_))).count(), 1);
        assert!(redraw.contains(&Command::Stroke(PixelRect::new(200.0, 200.0, 100.0, 100.0))));
    }

    #[test]
    fn stale_load_does_not_draw_the_new_result() {
        let mut overlay = overlay();
        assert!(!overlay.show(ImageElement::new("/uploads/a.png"), &detections()));
        assert!(!overlay.show(ImageElement::new("/uploads/b.png"), &detections()));
        assert!(!overlay.image_loaded("/uploads/a.png", 1000, 500));
        assert!(overlay.is_pending());
        assert!(overlay.canvas().unwrap().commands.is_empty());
        assert!(overlay.image_loaded("/uploads/b.png", 200, 100));
        assert_eq!(overlay.canvas().unwrap().commands[0], Command::Resize(200, 100));
    }
}

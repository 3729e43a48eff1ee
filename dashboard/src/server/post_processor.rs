use crate::overlay::canvas::RasterCanvas;
use crate::overlay::detection_canvas::{DetectionCanvas, ImageElement};
use crate::overlay::renderer::{OverlayRenderer, OverlayStyle};
use crate::utils::config::Config;
use crate::utils::logging::*;
use ab_glyph::FontArc;
use common::detection::detection::Detection;
use image::imageops;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::task::spawn_blocking;

/// Writes `<stem>_overlay.png` next to an upload: the original image with the
/// detection overlay composited on top.
#[derive(Clone)]
pub struct PostProcessor {
    renderer: OverlayRenderer,
    font: Option<FontArc>,
    output_folder: PathBuf,
}

impl PostProcessor {
    pub fn new(renderer: OverlayRenderer, font: Option<FontArc>, output_folder: PathBuf) -> Self {
        Self {
            renderer,
            font,
            output_folder,
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        let renderer = OverlayRenderer::new(OverlayStyle::from_config(config));
        let font = Self::load_font(&config.font_path).await;
        Self::new(renderer, font, PathBuf::from(&config.upload_folder))
    }

    async fn load_font(font_path: &str) -> Option<FontArc> {
        let font_data = match fs::read(font_path).await {
            Ok(font_data) => font_data,
            Err(err) => {
                logging_warning!(DetectionEntry::FontUnavailable(font_path.to_string()), err.to_string());
                return None;
            }
        };
        match FontArc::try_from_vec(font_data) {
            Ok(font) => Some(font),
            Err(err) => {
                logging_warning!(DetectionEntry::FontUnavailable(font_path.to_string()), err.to_string());
                None
            }
        }
    }

    /// Folder uploads are saved to and served from; fixed for the lifetime of the server.
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    pub fn processed_file_name(source_path: &Path) -> String {
        let stem = source_path.file_stem().and_then(OsStr::to_str).unwrap_or("upload");
        format!("{stem}_overlay.png")
    }

    /// Returns the file name of the processed image inside the output folder.
    pub async fn render(&self, source_path: PathBuf, detections: Vec<Detection>) -> Result<String, LogEntry> {
        let file_name = Self::processed_file_name(&source_path);
        let target_path = self.output_folder.join(&file_name);
        let renderer = self.renderer.clone();
        let font = self.font.clone();
        spawn_blocking(move || Self::compose(renderer, font, &source_path, &target_path, &detections))
            .await
            .map_err(|err| error_entry!(SystemEntry::TaskPanickedError(err)))??;
        Ok(file_name)
    }

    fn compose(renderer: OverlayRenderer, font: Option<FontArc>, source_path: &Path, target_path: &Path, detections: &[Detection]) -> Result<(), LogEntry> {
        let source = source_path.display().to_string();
        let mut image = image::open(source_path)
            .map_err(|err| error_entry!(DetectionEntry::OverlayRenderError(source.clone(), err.to_string())))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let mut overlay = DetectionCanvas::new(renderer);
        overlay.attach_canvas(RasterCanvas::new(font));
        overlay.show(ImageElement::loaded(source.clone(), width, height), detections);
        if let Some(canvas) = overlay.detach_canvas() {
            imageops::overlay(&mut image, canvas.image(), 0, 0);
        }
        image.save(target_path)
            .map_err(|err| error_entry!(DetectionEntry::OverlayRenderError(source, err.to_string())))
    }
}

use crate::overlay::canvas::{Canvas, PixelRect};
use crate::utils::config::Config;
use common::detection::detection::Detection;
use image::Rgba;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub stroke_color: Rgba<u8>,
    pub line_width: u32, //pixels
    pub label_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
    pub font_size: f32, //pixels
    pub label_width: f64, //pixels
    pub label_height: f64, //pixels
    pub label_offset: [f64; 2], //pixels left and up from the box corner
    pub text_inset: f64, //pixels
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba([54, 211, 153, 255]),
            line_width: 2,
            label_color: Rgba([54, 211, 153, 255]),
            text_color: Rgba([15, 19, 26, 255]),
            font_size: 12.0,
            label_width: 60.0,
            label_height: 20.0,
            label_offset: [2.0, 22.0],
            text_inset: 4.0,
        }
    }
}

impl OverlayStyle {
    pub fn from_config(config: &Config) -> Self {
        let [r, g, b] = config.border_color;
        let stroke_color = Rgba([r, g, b, 255]);
        let [r, g, b] = config.label_color;
        let label_color = Rgba([r, g, b, 255]);
        let [r, g, b] = config.text_color;
        let text_color = Rgba([r, g, b, 255]);
        Self {
            stroke_color,
            line_width: config.border_width,
            label_color,
            text_color,
            font_size: config.font_size,
            ..Self::default()
        }
    }
}

/// Confidence as a rounded whole percentage, e.g. `0.923` becomes `"92%"`.
pub fn confidence_label(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
        }
    }

    /// Full redraw: the surface is resized to the image's natural size and cleared first.
    pub fn draw<C: Canvas>(&self, canvas: &mut C, natural_size: (u32, u32), detections: &[Detection]) {
        let (width, height) = natural_size;
        canvas.resize(width, height);
        canvas.clear();
        let surface_width = canvas.width() as f64;
        let surface_height = canvas.height() as f64;
        for detection in detections {
            let bounding_box = PixelRect::from_normalized(detection.bbox, surface_width, surface_height);
            canvas.stroke_rect(bounding_box, self.style.stroke_color, self.style.line_width);
            let label = self.label_rect(&bounding_box);
            canvas.fill_rect(label, self.style.label_color);
            let text_y = label.y + (label.height - self.style.font_size as f64).max(0.0) / 2.0;
            canvas.fill_text(&confidence_label(detection.confidence), bounding_box.x + self.style.text_inset, text_y, self.style.font_size, self.style.text_color);
        }
    }

    /// Label background sits above the box so it never covers it.
    pub fn label_rect(&self, bounding_box: &PixelRect) -> PixelRect {
        let [left, up] = self.style.label_offset;
        PixelRect::new(bounding_box.x - left, bounding_box.y - up, self.style.label_width, self.style.label_height)
    }
}

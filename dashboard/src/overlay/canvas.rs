use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

/// Axis-aligned rectangle in surface pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scales a normalized `[x, y, width, height]` box to a surface of the given size.
    pub fn from_normalized(bbox: [f64; 4], surface_width: f64, surface_height: f64) -> Self {
        let [x, y, width, height] = bbox;
        Self::new(x * surface_width, y * surface_height, width * surface_width, height * surface_height)
    }

    fn to_rect(self) -> Rect {
        let width = (self.width.round() as u32).max(1);
        let height = (self.height.round() as u32).max(1);
        Rect::at(self.x.round() as i32, self.y.round() as i32).of_size(width, height)
    }
}

/// Drawing surface the overlay renderer paints on.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resizing discards the previous contents.
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self);

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>, line_width: u32);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>);

    /// `(x, y)` is the top-left corner of the text, which is left-aligned.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f32, color: Rgba<u8>);
}

/// [`Canvas`] backed by a transparent RGBA buffer.
pub struct RasterCanvas {
    image: RgbaImage,
    font: Option<FontArc>,
}

impl RasterCanvas {
    pub fn new(font: Option<FontArc>) -> Self {
        Self {
            image: RgbaImage::new(0, 0),
            font,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        self.image.pixels_mut().for_each(|pixel| *pixel = Rgba([0, 0, 0, 0]));
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>, line_width: u32) {
        let base_rectangle = rect.to_rect();
        for i in 0..line_width.max(1) {
            let offset_rect = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
                .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
            draw_hollow_rect_mut(&mut self.image, offset_rect, color);
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        draw_filled_rect_mut(&mut self.image, rect.to_rect(), color);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size: f32, color: Rgba<u8>) {
        if let Some(font) = &self.font {
            draw_text_mut(&mut self.image, color, x.round() as i32, y.round() as i32, PxScale::from(size), font, text);
        }
    }
}

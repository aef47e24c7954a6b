//! Drawing surface abstraction and its `image`-backed implementation.

use facemesh_core::BoundingBox;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    #[error("canvas must be non-empty, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
}

/// Primitive operations graphics render through. Coordinates are view pixels.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn draw_rect(&mut self, rect: &BoundingBox, color: Rgba<u8>, stroke_width: f32);
    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>);
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>, stroke_width: f32);
}

/// RGBA raster canvas.
pub struct ImageCanvas {
    image: RgbaImage,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::EmptyCanvas { width, height });
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background),
        })
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, OverlayError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OverlayError::EmptyCanvas {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self { image })
    }

    /// Load a background image from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OverlayError> {
        let path = path.as_ref();
        self.image.save(path)?;
        tracing::info!(
            path = %path.display(),
            width = self.image.width(),
            height = self.image.height(),
            "overlay saved"
        );
        Ok(())
    }
}

fn stroke_count(stroke_width: f32) -> i32 {
    (stroke_width.round() as i32).max(1)
}

impl Canvas for ImageCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    /// Strokes grow inwards from the rect's edges.
    fn draw_rect(&mut self, rect: &BoundingBox, color: Rgba<u8>, stroke_width: f32) {
        let left = rect.left.round() as i32;
        let top = rect.top.round() as i32;
        let width = rect.width().round() as i32;
        let height = rect.height().round() as i32;

        for inset in 0..stroke_count(stroke_width) {
            let w = width - 2 * inset;
            let h = height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let r = Rect::at(left + inset, top + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut self.image, r, color);
        }
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Rgba<u8>) {
        let c = (center.0.round() as i32, center.1.round() as i32);
        draw_filled_circle_mut(&mut self.image, c, radius.round().max(0.0) as i32, color);
    }

    /// Wide strokes are drawn as parallel one-pixel segments.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>, stroke_width: f32) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

        let n = stroke_count(stroke_width);
        for k in 0..n {
            let off = k as f32 - (n - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + nx * off, from.1 + ny * off),
                (to.0 + nx * off, to.1 + ny * off),
                color,
            );
        }
    }
}

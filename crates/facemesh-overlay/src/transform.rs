//! Image-to-view coordinate mapping: uniform scale, center-crop offset and
//! optional horizontal mirroring for front-facing cameras.

use facemesh_core::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale_factor: f32,
    /// Horizontal crop offset, in view pixels.
    pub offset_x: f32,
    /// Vertical crop offset, in view pixels.
    pub offset_y: f32,
    /// Mirror horizontally around the view's vertical center line.
    pub flipped: bool,
    pub view_width: f32,
}

impl ViewTransform {
    /// 1:1 mapping onto a view of the given width.
    pub fn identity(view_width: u32) -> Self {
        Self {
            scale_factor: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            flipped: false,
            view_width: view_width as f32,
        }
    }

    /// Scale an image to fill the view, cropping the overflowing dimension
    /// evenly on both sides.
    pub fn fit(image_width: u32, image_height: u32, view_width: u32, view_height: u32, flipped: bool) -> Self {
        let (iw, ih) = (image_width as f32, image_height as f32);
        let (vw, vh) = (view_width as f32, view_height as f32);
        if iw <= 0.0 || ih <= 0.0 || vw <= 0.0 || vh <= 0.0 {
            return Self {
                flipped,
                ..Self::identity(view_width)
            };
        }

        let view_aspect = vw / vh;
        let image_aspect = iw / ih;

        let (scale_factor, offset_x, offset_y) = if view_aspect > image_aspect {
            // Image is taller than the view: crop top and bottom.
            (vw / iw, 0.0, (vw / image_aspect - vh) / 2.0)
        } else {
            // Image is wider than the view: crop left and right.
            (vh / ih, (vh * image_aspect - vw) / 2.0, 0.0)
        };

        Self {
            scale_factor,
            offset_x,
            offset_y,
            flipped,
            view_width: vw,
        }
    }

    pub fn scale(&self, image_pixels: f32) -> f32 {
        image_pixels * self.scale_factor
    }

    pub fn translate_x(&self, x: f32) -> f32 {
        let x = self.scale(x) - self.offset_x;
        if self.flipped {
            self.view_width - x
        } else {
            x
        }
    }

    pub fn translate_y(&self, y: f32) -> f32 {
        self.scale(y) - self.offset_y
    }

    pub fn translate(&self, x: f32, y: f32) -> (f32, f32) {
        (self.translate_x(x), self.translate_y(y))
    }

    /// Map a box into view coordinates. Under mirroring the edges swap, so
    /// left/right are re-ordered to keep `left <= right`.
    pub fn map_box(&self, b: &BoundingBox) -> BoundingBox {
        let x0 = self.translate_x(b.left);
        let x1 = self.translate_x(b.right);
        BoundingBox {
            left: x0.min(x1),
            top: self.translate_y(b.top),
            right: x0.max(x1),
            bottom: self.translate_y(b.bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = ViewTransform::identity(640);
        assert_eq!(t.translate(12.0, 34.0), (12.0, 34.0));
    }

    #[test]
    fn test_flipped_mirrors_x() {
        let t = ViewTransform {
            flipped: true,
            ..ViewTransform::identity(640)
        };
        assert_eq!(t.translate_x(40.0), 600.0);
        assert_eq!(t.translate_y(40.0), 40.0);
    }

    #[test]
    fn test_map_box_keeps_edges_ordered_when_flipped() {
        let t = ViewTransform {
            flipped: true,
            ..ViewTransform::identity(100)
        };
        let b = t.map_box(&BoundingBox {
            left: 10.0,
            top: 5.0,
            right: 30.0,
            bottom: 25.0,
        });
        assert_eq!((b.left, b.right), (70.0, 90.0));
        assert_eq!((b.top, b.bottom), (5.0, 25.0));
    }

    #[test]
    fn test_fit_wider_image_crops_sides() {
        // 640x480 image into a 480x480 view: scale 1, 80 px cropped per side.
        let t = ViewTransform::fit(640, 480, 480, 480, false);
        assert!((t.scale_factor - 1.0).abs() < 1e-6);
        assert!((t.offset_x - 80.0).abs() < 1e-4);
        assert_eq!(t.offset_y, 0.0);
        assert!((t.translate_x(80.0)).abs() < 1e-4);
    }

    #[test]
    fn test_fit_taller_image_crops_top_bottom() {
        // 480x640 image into a 960x960 view: scale 2, 160 px cropped top and bottom.
        let t = ViewTransform::fit(480, 640, 960, 960, false);
        assert!((t.scale_factor - 2.0).abs() < 1e-6);
        assert_eq!(t.offset_x, 0.0);
        assert!((t.offset_y - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_degenerate_sizes() {
        let t = ViewTransform::fit(0, 480, 320, 240, true);
        assert_eq!(t.scale_factor, 1.0);
        assert!(t.flipped);
    }
}

//! Depth color-coding for landmark points and segments.

use crate::transform::ViewTransform;
use facemesh_core::ZRange;
use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Smallest magnitude the rescaled bounds may take, keeping the division
/// defined when every point lies on one side of z = 0.
const MIN_BOUND: f32 = 0.001;

/// Tint for a depth value: white at z = 0, fading to red towards the
/// nearest point (negative z) and to blue towards the farthest (positive z).
///
/// With `rescale` the bounds come from the frame's z-range; otherwise, or
/// when the range is empty, they are plus/minus the view width.
pub fn depth_color(z: f32, range: ZRange, transform: &ViewTransform, rescale: bool) -> Rgba<u8> {
    let (lower, upper) = if rescale && !range.is_empty() {
        (
            transform.scale(range.z_min).min(-MIN_BOUND),
            transform.scale(range.z_max).max(MIN_BOUND),
        )
    } else {
        (-transform.view_width, transform.view_width)
    };

    let z = transform.scale(z);
    if z < 0.0 {
        let v = channel(z / lower);
        Rgba([255, 255 - v, 255 - v, 255])
    } else {
        let v = channel(z / upper);
        Rgba([255 - v, 255 - v, 255, 255])
    }
}

fn channel(ratio: f32) -> u8 {
    // `as` saturates and maps NaN to zero.
    ((ratio * 255.0) as i32).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(z_min: f32, z_max: f32) -> ZRange {
        ZRange { z_min, z_max }
    }

    #[test]
    fn test_zero_is_white() {
        let t = ViewTransform::identity(100);
        assert_eq!(depth_color(0.0, range(-10.0, 10.0), &t, true), WHITE);
    }

    #[test]
    fn test_nearest_is_red() {
        let t = ViewTransform::identity(100);
        assert_eq!(depth_color(-10.0, range(-10.0, 10.0), &t, true), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_farthest_is_blue() {
        let t = ViewTransform::identity(100);
        assert_eq!(depth_color(10.0, range(-10.0, 10.0), &t, true), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_midway_is_half_tinted() {
        let t = ViewTransform::identity(100);
        let c = depth_color(-5.0, range(-10.0, 10.0), &t, true);
        assert_eq!(c, Rgba([255, 128, 128, 255]));
    }

    #[test]
    fn test_unscaled_uses_view_width() {
        let t = ViewTransform::identity(100);
        assert_eq!(depth_color(-50.0, range(-10.0, 10.0), &t, false), Rgba([255, 128, 128, 255]));
    }

    #[test]
    fn test_empty_range_falls_back_to_view_width() {
        let t = ViewTransform::identity(100);
        assert_eq!(
            depth_color(100.0, ZRange::EMPTY, &t, true),
            depth_color(100.0, range(-1.0, 1.0), &t, false)
        );
    }

    #[test]
    fn test_one_sided_range_clamps() {
        // All points in front of z = 0: the upper bound collapses to MIN_BOUND.
        let t = ViewTransform::identity(100);
        assert_eq!(depth_color(-1.0, range(-4.0, -1.0), &t, true), Rgba([255, 192, 192, 255]));
        assert_eq!(depth_color(5.0, range(-4.0, -1.0), &t, true), Rgba([0, 0, 255, 255]));
    }
}

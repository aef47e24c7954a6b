//! Overlay graphics composed into a render list.
//!
//! Each overlay element implements [`Drawable`]; [`build_overlay`] turns a
//! frame and its analysis into the list of elements to draw.

use crate::canvas::Canvas;
use crate::color::{depth_color, WHITE};
use crate::transform::ViewTransform;
use facemesh_core::{BoundingBox, FrameAnalysis, FrameLandmarks, MeshUseCase};
use image::Rgba;
use serde::{Deserialize, Serialize};

/// Something that can paint itself onto a canvas.
pub trait Drawable: Send + Sync {
    fn render(&self, canvas: &mut dyn Canvas);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub circle_radius: f32,
    pub box_stroke_width: f32,
    pub line_stroke_width: f32,
    pub box_color: [u8; 4],
    /// Scale depth colors to the frame's own z-range instead of the view width.
    pub rescale_z: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            circle_radius: 8.0,
            box_stroke_width: 5.0,
            line_stroke_width: 1.0,
            box_color: WHITE.0,
            rescale_z: true,
        }
    }
}

pub struct FaceBoxGraphic {
    pub rect: BoundingBox,
    pub color: Rgba<u8>,
    pub stroke_width: f32,
}

impl Drawable for FaceBoxGraphic {
    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_rect(&self.rect, self.color, self.stroke_width);
    }
}

pub struct LandmarkCircleGraphic {
    pub center: (f32, f32),
    pub radius: f32,
    pub color: Rgba<u8>,
}

impl Drawable for LandmarkCircleGraphic {
    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_circle(self.center, self.radius, self.color);
    }
}

pub struct LandmarkLineGraphic {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: Rgba<u8>,
    pub stroke_width: f32,
}

impl Drawable for LandmarkLineGraphic {
    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_line(self.from, self.to, self.color, self.stroke_width);
    }
}

/// Ordered collection of drawables; later items paint over earlier ones.
#[derive(Default)]
pub struct RenderList {
    items: Vec<Box<dyn Drawable>>,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Drawable + 'static) {
        self.items.push(Box::new(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Drawable for RenderList {
    fn render(&self, canvas: &mut dyn Canvas) {
        for item in &self.items {
            item.render(canvas);
        }
    }
}

/// Assemble the overlay for one frame.
///
/// Draws the face box when the detector reported one, a depth-colored
/// circle at each fixed landmark, and in [`MeshUseCase::FaceMesh`] mode
/// the eyebrow and eye segments. Segments need mesh topology: a frame
/// without triangles gets none.
pub fn build_overlay(
    frame: &FrameLandmarks,
    analysis: &FrameAnalysis,
    style: &OverlayStyle,
    transform: &ViewTransform,
    use_case: MeshUseCase,
) -> RenderList {
    let mut list = RenderList::new();

    if let Some(b) = frame.bounding_box() {
        list.push(FaceBoxGraphic {
            rect: transform.map_box(b),
            color: Rgba(style.box_color),
            stroke_width: style.box_stroke_width,
        });
    }

    let z_range = analysis.z_range;

    for named in &analysis.circles {
        let p = named.point.position;
        list.push(LandmarkCircleGraphic {
            center: transform.translate(p.x, p.y),
            radius: style.circle_radius,
            color: depth_color(p.z, z_range, transform, style.rescale_z),
        });
    }

    if use_case == MeshUseCase::FaceMesh && !frame.triangles().is_empty() {
        for (a, b) in &analysis.segments {
            let (pa, pb) = (a.point.position, b.point.position);
            list.push(LandmarkLineGraphic {
                from: transform.translate(pa.x, pa.y),
                to: transform.translate(pb.x, pb.y),
                color: depth_color((pa.z + pb.z) / 2.0, z_range, transform, style.rescale_z),
                stroke_width: style.line_stroke_width,
            });
        }
    }

    tracing::debug!(items = list.len(), ?use_case, "overlay built");
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageCanvas;
    use crate::color::BLACK;
    use facemesh_core::{analyze_frame, Landmark, Point3D, Triangle, FACE_MESH_POINT_COUNT};

    /// Records calls instead of rasterizing.
    #[derive(Default)]
    struct RecordingCanvas {
        rects: Vec<BoundingBox>,
        circles: Vec<((f32, f32), Rgba<u8>)>,
        lines: Vec<((f32, f32), (f32, f32))>,
    }

    impl Canvas for RecordingCanvas {
        fn width(&self) -> u32 {
            200
        }
        fn height(&self) -> u32 {
            200
        }
        fn draw_rect(&mut self, rect: &BoundingBox, _: Rgba<u8>, _: f32) {
            self.rects.push(*rect);
        }
        fn draw_circle(&mut self, center: (f32, f32), _: f32, color: Rgba<u8>) {
            self.circles.push((center, color));
        }
        fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), _: Rgba<u8>, _: f32) {
            self.lines.push((from, to));
        }
    }

    fn mesh_frame(with_triangles: bool) -> FrameLandmarks {
        let mut positions = vec![Point3D::new(100.0, 100.0, 0.0); FACE_MESH_POINT_COUNT];
        positions[Landmark::NoseBridge.index()] = Point3D::new(50.0, 60.0, -10.0);
        positions[Landmark::LeftEyebrowTip.index()] = Point3D::new(20.0, 30.0, 10.0);
        positions[Landmark::LeftEarProximal.index()] = Point3D::new(10.0, 40.0, 0.0);
        let frame = FrameLandmarks::from_positions(positions);
        let triangles = if with_triangles {
            vec![Triangle([0, 1, 2])]
        } else {
            Vec::new()
        };
        FrameLandmarks::new(frame.points().to_vec(), triangles)
            .unwrap()
            .with_bounding_box(Some(BoundingBox {
                left: 5.0,
                top: 5.0,
                right: 150.0,
                bottom: 160.0,
            }))
    }

    #[test]
    fn test_full_mesh_overlay_contents() {
        let frame = mesh_frame(true);
        let analysis = analyze_frame(&frame).unwrap();
        let list = build_overlay(
            &frame,
            &analysis,
            &OverlayStyle::default(),
            &ViewTransform::identity(200),
            MeshUseCase::FaceMesh,
        );
        // 1 box + 5 circles + 4 segments
        assert_eq!(list.len(), 10);

        let mut rec = RecordingCanvas::default();
        list.render(&mut rec);
        assert_eq!(rec.rects.len(), 1);
        assert_eq!(rec.circles.len(), 5);
        assert_eq!(rec.lines.len(), 4);

        // Nose bridge is the nearest point: fully red.
        assert_eq!(rec.circles[0], ((50.0, 60.0), Rgba([255, 0, 0, 255])));
        // Left eyebrow tip is the farthest: fully blue.
        assert_eq!(rec.circles[1], ((20.0, 30.0), Rgba([0, 0, 255, 255])));
        assert_eq!(rec.lines[0], ((20.0, 30.0), (10.0, 40.0)));
    }

    #[test]
    fn test_no_segments_without_triangles() {
        let frame = mesh_frame(false);
        let analysis = analyze_frame(&frame).unwrap();
        let list = build_overlay(
            &frame,
            &analysis,
            &OverlayStyle::default(),
            &ViewTransform::identity(200),
            MeshUseCase::FaceMesh,
        );
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_contour_mode_skips_segments() {
        let frame = mesh_frame(true);
        let analysis = analyze_frame(&frame).unwrap();
        let list = build_overlay(
            &frame,
            &analysis,
            &OverlayStyle::default(),
            &ViewTransform::identity(200),
            MeshUseCase::ContourOnly,
        );
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_flipped_overlay_mirrors_circles() {
        let frame = mesh_frame(true);
        let analysis = analyze_frame(&frame).unwrap();
        let transform = ViewTransform {
            flipped: true,
            ..ViewTransform::identity(200)
        };
        let list = build_overlay(&frame, &analysis, &OverlayStyle::default(), &transform, MeshUseCase::FaceMesh);
        let mut rec = RecordingCanvas::default();
        list.render(&mut rec);
        assert_eq!(rec.circles[0].0, (150.0, 60.0));
        assert_eq!(rec.rects[0].left, 50.0);
        assert_eq!(rec.rects[0].right, 195.0);
    }

    #[test]
    fn test_renders_onto_image() {
        let frame = mesh_frame(true);
        let analysis = analyze_frame(&frame).unwrap();
        let list = build_overlay(
            &frame,
            &analysis,
            &OverlayStyle::default(),
            &ViewTransform::identity(200),
            MeshUseCase::FaceMesh,
        );
        let mut canvas = ImageCanvas::new(200, 200, BLACK).unwrap();
        list.render(&mut canvas);

        let img = canvas.image();
        assert_eq!(*img.get_pixel(50, 60), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(5, 100), WHITE);
        assert_eq!(*img.get_pixel(180, 190), BLACK);
    }
}

use crate::contour::ContourType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// A position in frame coordinates. `z` is depth, in the same units as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A face-mesh landmark: stable detector label plus its position in this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub index: u32,
    pub position: Point3D,
}

impl LandmarkPoint {
    pub const fn new(index: u32, position: Point3D) -> Self {
        Self { index, position }
    }
}

/// Three positions into a frame's point sequence forming one mesh face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle(pub [usize; 3]);

/// Face region in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("landmark index {0} appears more than once in the frame")]
    DuplicateIndex(u32),
    #[error("triangle {triangle} references position {position}, frame has {len} points")]
    TriangleOutOfRange {
        triangle: usize,
        position: usize,
        len: usize,
    },
    #[error("contour {contour:?} references position {position}, frame has {len} points")]
    ContourOutOfRange {
        contour: ContourType,
        position: usize,
        len: usize,
    },
}

/// Landmarks of one detected face in one frame.
///
/// Validated on construction: landmark indices are unique, and every
/// triangle and contour entry points at an existing position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrameLandmarks")]
pub struct FrameLandmarks {
    points: Vec<LandmarkPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    triangles: Vec<Triangle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    contours: BTreeMap<ContourType, Vec<usize>>,
}

#[derive(Deserialize)]
struct RawFrameLandmarks {
    points: Vec<LandmarkPoint>,
    #[serde(default)]
    triangles: Vec<Triangle>,
    #[serde(default)]
    bounding_box: Option<BoundingBox>,
    #[serde(default)]
    contours: BTreeMap<ContourType, Vec<usize>>,
}

impl TryFrom<RawFrameLandmarks> for FrameLandmarks {
    type Error = FrameError;

    fn try_from(raw: RawFrameLandmarks) -> Result<Self, Self::Error> {
        Self::new(raw.points, raw.triangles)?
            .with_bounding_box(raw.bounding_box)
            .with_contours(raw.contours)
    }
}

impl FrameLandmarks {
    pub fn new(points: Vec<LandmarkPoint>, triangles: Vec<Triangle>) -> Result<Self, FrameError> {
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !seen.insert(p.index) {
                return Err(FrameError::DuplicateIndex(p.index));
            }
        }

        let len = points.len();
        for (t, tri) in triangles.iter().enumerate() {
            if let Some(&position) = tri.0.iter().find(|&&pos| pos >= len) {
                return Err(FrameError::TriangleOutOfRange {
                    triangle: t,
                    position,
                    len,
                });
            }
        }

        Ok(Self {
            points,
            triangles,
            bounding_box: None,
            contours: BTreeMap::new(),
        })
    }

    /// A frame with sequential labels `0..positions.len()` and no topology.
    pub fn from_positions(positions: impl IntoIterator<Item = Point3D>) -> Self {
        let points = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| LandmarkPoint::new(i as u32, position))
            .collect();
        Self {
            points,
            triangles: Vec::new(),
            bounding_box: None,
            contours: BTreeMap::new(),
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: Option<BoundingBox>) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Attach the detector's contour grouping (positions into `points`).
    pub fn with_contours(
        mut self,
        contours: BTreeMap<ContourType, Vec<usize>>,
    ) -> Result<Self, FrameError> {
        let len = self.points.len();
        for (&contour, positions) in &contours {
            if let Some(&position) = positions.iter().find(|&&pos| pos >= len) {
                return Err(FrameError::ContourOutOfRange {
                    contour,
                    position,
                    len,
                });
            }
        }
        self.contours = contours;
        Ok(self)
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    pub fn contours(&self) -> &BTreeMap<ContourType, Vec<usize>> {
        &self.contours
    }

    /// Resolve a triangle to its three points. Positions were checked at construction.
    pub fn triangle_points(&self, triangle: &Triangle) -> [&LandmarkPoint; 3] {
        triangle.0.map(|pos| &self.points[pos])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

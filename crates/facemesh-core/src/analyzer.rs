//! Per-frame landmark geometry: depth range, the offset distance metric and
//! exact-match identity verification.
//!
//! Everything here is a pure function of its inputs. The z-range is
//! returned to the caller and threaded explicitly into whatever needs it.

use crate::landmarks::{self, Landmark, LandmarkError, CIRCLE_LANDMARKS, DISTANCE_LANDMARKS, LINE_SEGMENTS};
use crate::types::{FrameLandmarks, LandmarkPoint, Point3D};
use serde::{Deserialize, Serialize};

/// Minimum and maximum depth among a frame's landmarks.
///
/// An empty input produces [`ZRange::EMPTY`] (`+inf`, `-inf`), which
/// callers must check with [`is_empty`](Self::is_empty) before use.
/// Serialized as `null` when empty, so the sentinel survives formats
/// without infinities such as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Option<ZBounds>", from = "Option<ZBounds>")]
pub struct ZRange {
    pub z_min: f32,
    pub z_max: f32,
}

impl ZRange {
    pub const EMPTY: ZRange = ZRange {
        z_min: f32::INFINITY,
        z_max: f32::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.z_min > self.z_max
    }

    pub fn span(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.z_max - self.z_min)
    }
}

#[derive(Serialize, Deserialize)]
struct ZBounds {
    z_min: f32,
    z_max: f32,
}

impl From<ZRange> for Option<ZBounds> {
    fn from(r: ZRange) -> Self {
        (!r.is_empty()).then_some(ZBounds {
            z_min: r.z_min,
            z_max: r.z_max,
        })
    }
}

impl From<Option<ZBounds>> for ZRange {
    fn from(bounds: Option<ZBounds>) -> Self {
        bounds.map_or(ZRange::EMPTY, |b| ZRange {
            z_min: b.z_min,
            z_max: b.z_max,
        })
    }
}

pub fn compute_z_range(points: &[LandmarkPoint]) -> ZRange {
    points.iter().fold(ZRange::EMPTY, |r, p| ZRange {
        z_min: r.z_min.min(p.position.z),
        z_max: r.z_max.max(p.position.z),
    })
}

/// `|2·origin − (p2 − p1)|`.
///
/// Not a point-to-point distance: the offset depends only on `origin`, so
/// the result is not symmetric under exchanging `origin` with `p1` or `p2`.
pub fn distance_metric(p1: Point3D, p2: Point3D, origin: Point3D) -> f32 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let dz = p2.z - p1.z;

    let offset_x = origin.x * 2.0;
    let offset_y = origin.y * 2.0;
    let offset_z = origin.z * 2.0;

    ((offset_x - dx).powi(2) + (offset_y - dy).powi(2) + (offset_z - dz).powi(2)).sqrt()
}

/// Outcome of comparing two landmark lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerdict {
    pub same_person: bool,
    /// Number of position pairs examined before the verdict was reached.
    pub compared: usize,
    /// Sequence position of the first differing point, if any.
    pub first_mismatch: Option<usize>,
}

impl IdentityVerdict {
    pub fn label(&self) -> &'static str {
        if self.same_person {
            "Same Person"
        } else {
            "Different Person"
        }
    }
}

/// Strategy for deciding whether two landmark lists describe the same face.
pub trait IdentityVerifier {
    fn verify(&self, a: &[LandmarkPoint], b: &[LandmarkPoint]) -> IdentityVerdict;
}

/// Position-by-position exact float comparison.
///
/// No tolerance is applied, so two detections of the same face on real
/// sensor data will almost never match.
pub struct ExactMatchVerifier;

impl IdentityVerifier for ExactMatchVerifier {
    fn verify(&self, a: &[LandmarkPoint], b: &[LandmarkPoint]) -> IdentityVerdict {
        if a.len() != b.len() {
            return IdentityVerdict {
                same_person: false,
                compared: 0,
                first_mismatch: None,
            };
        }

        let first_mismatch = a.iter().zip(b).position(|(pa, pb)| {
            pa.position.x != pb.position.x
                || pa.position.y != pb.position.y
                || pa.position.z != pb.position.z
        });

        IdentityVerdict {
            same_person: first_mismatch.is_none(),
            compared: first_mismatch.map_or(a.len(), |i| i + 1),
            first_mismatch,
        }
    }
}

pub fn same_face_identity(a: &[LandmarkPoint], b: &[LandmarkPoint]) -> bool {
    ExactMatchVerifier.verify(a, b).same_person
}

/// A resolved landmark, tagged with its name for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub landmark: Landmark,
    pub point: LandmarkPoint,
}

/// Everything the overlay and exporter need from one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub point_count: usize,
    pub z_range: ZRange,
    pub circles: Vec<NamedPoint>,
    pub segments: Vec<(NamedPoint, NamedPoint)>,
    /// Only computed when the frame has more than ten points.
    pub distance: Option<f32>,
}

fn named(points: &[LandmarkPoint], landmark: Landmark) -> Result<NamedPoint, LandmarkError> {
    landmarks::lookup(points, landmark).map(|&point| NamedPoint { landmark, point })
}

/// Resolve the fixed landmarks of a frame and compute its derived values.
pub fn analyze_frame(frame: &FrameLandmarks) -> Result<FrameAnalysis, LandmarkError> {
    analyze_points(frame.points())
}

/// Same as [`analyze_frame`] over an arbitrary point selection, such as
/// the contour-only subset. Fixed landmarks are looked up by position in
/// `points`.
///
/// An empty selection is not an error: it yields an empty analysis with the
/// sentinel z-range. A non-empty selection missing any fixed landmark fails
/// with [`LandmarkError::IndexOutOfRange`].
pub fn analyze_points(points: &[LandmarkPoint]) -> Result<FrameAnalysis, LandmarkError> {
    let z_range = compute_z_range(points);

    if points.is_empty() {
        tracing::debug!("empty frame, nothing to analyze");
        return Ok(FrameAnalysis {
            point_count: 0,
            z_range,
            circles: Vec::new(),
            segments: Vec::new(),
            distance: None,
        });
    }

    let circles = CIRCLE_LANDMARKS
        .iter()
        .map(|&lm| named(points, lm))
        .collect::<Result<Vec<_>, _>>()?;

    let segments = LINE_SEGMENTS
        .iter()
        .map(|&(a, b)| Ok((named(points, a)?, named(points, b)?)))
        .collect::<Result<Vec<_>, LandmarkError>>()?;

    let distance = if points.len() > 10 {
        let (p1, p2, origin) = DISTANCE_LANDMARKS;
        Some(distance_metric(
            landmarks::lookup(points, p1)?.position,
            landmarks::lookup(points, p2)?.position,
            landmarks::lookup(points, origin)?.position,
        ))
    } else {
        None
    };

    tracing::debug!(
        points = points.len(),
        z_min = z_range.z_min,
        z_max = z_range.z_max,
        ?distance,
        "frame analyzed"
    );

    Ok(FrameAnalysis {
        point_count: points.len(),
        z_range,
        circles,
        segments,
        distance,
    })
}

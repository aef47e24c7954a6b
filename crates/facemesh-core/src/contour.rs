//! Contour subsets and the mesh/contour display mode.
//!
//! Grouping landmarks into contours is the detector's job; frames carry that
//! grouping as positions and this module only selects and concatenates.

use crate::types::{FrameLandmarks, LandmarkPoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourType {
    FaceOval,
    LeftEyebrowTop,
    LeftEyebrowBottom,
    RightEyebrowTop,
    RightEyebrowBottom,
    LeftEye,
    RightEye,
    UpperLipTop,
    UpperLipBottom,
    LowerLipTop,
    LowerLipBottom,
    NoseBridge,
}

/// Contours drawn in contour-only mode, in drawing order.
pub const DISPLAY_CONTOURS: [ContourType; 12] = [
    ContourType::FaceOval,
    ContourType::LeftEyebrowTop,
    ContourType::LeftEyebrowBottom,
    ContourType::RightEyebrowTop,
    ContourType::RightEyebrowBottom,
    ContourType::LeftEye,
    ContourType::RightEye,
    ContourType::UpperLipTop,
    ContourType::UpperLipBottom,
    ContourType::LowerLipTop,
    ContourType::LowerLipBottom,
    ContourType::NoseBridge,
];

/// Which points of a detection the overlay works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshUseCase {
    /// Every mesh point; eyebrow and eye segments are drawn.
    #[default]
    FaceMesh,
    /// Only the display contours; no segments.
    ContourOnly,
}

impl std::str::FromStr for MeshUseCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "face_mesh" | "mesh" => Ok(MeshUseCase::FaceMesh),
            "contour_only" | "contour" => Ok(MeshUseCase::ContourOnly),
            other => Err(format!("unknown use case: {other}")),
        }
    }
}

/// Source of per-contour landmark groups.
pub trait ContourSource {
    fn contour(&self, contour: ContourType) -> Vec<LandmarkPoint>;
}

impl ContourSource for FrameLandmarks {
    fn contour(&self, contour: ContourType) -> Vec<LandmarkPoint> {
        self.contours()
            .get(&contour)
            .map(|positions| positions.iter().map(|&pos| self.points()[pos]).collect())
            .unwrap_or_default()
    }
}

/// Concatenate the display contours in [`DISPLAY_CONTOURS`] order.
pub fn contour_points<S: ContourSource + ?Sized>(source: &S) -> Vec<LandmarkPoint> {
    DISPLAY_CONTOURS
        .iter()
        .flat_map(|&c| source.contour(c))
        .collect()
}

/// The points a given use case operates on.
pub fn points_for_use_case(frame: &FrameLandmarks, use_case: MeshUseCase) -> Vec<LandmarkPoint> {
    match use_case {
        MeshUseCase::FaceMesh => frame.points().to_vec(),
        MeshUseCase::ContourOnly => contour_points(frame),
    }
}

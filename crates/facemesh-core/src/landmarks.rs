//! Named face-mesh landmark positions with bounds-checked lookup.
//!
//! Positions follow the 468-point face mesh topology. Lookups are by
//! position in the frame's point sequence, not by landmark label.

use crate::types::LandmarkPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in a complete face-mesh detection.
pub const FACE_MESH_POINT_COUNT: usize = 468;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("landmark position {index} out of range, frame has {len} points")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Landmarks the overlay and distance metric refer to by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    UpperLipCenter,
    NoseUpper,
    NoseBridge,
    ForeheadCenter,
    LeftEyebrowTip,
    LeftEarProximal,
    LeftEyeLower,
    LeftEyeUpper,
    RightEyebrowTip,
    RightEyeLower,
    RightEyeUpper,
    RightEarProximal,
}

impl Landmark {
    pub const ALL: [Landmark; 12] = [
        Landmark::UpperLipCenter,
        Landmark::NoseUpper,
        Landmark::NoseBridge,
        Landmark::ForeheadCenter,
        Landmark::LeftEyebrowTip,
        Landmark::LeftEarProximal,
        Landmark::LeftEyeLower,
        Landmark::LeftEyeUpper,
        Landmark::RightEyebrowTip,
        Landmark::RightEyeLower,
        Landmark::RightEyeUpper,
        Landmark::RightEarProximal,
    ];

    pub const fn index(self) -> usize {
        match self {
            Landmark::UpperLipCenter => 0,
            Landmark::NoseUpper => 5,
            Landmark::NoseBridge => 6,
            Landmark::ForeheadCenter => 10,
            Landmark::LeftEyebrowTip => 46,
            Landmark::LeftEarProximal => 127,
            Landmark::LeftEyeLower => 145,
            Landmark::LeftEyeUpper => 159,
            Landmark::RightEyebrowTip => 276,
            Landmark::RightEyeLower => 374,
            Landmark::RightEyeUpper => 386,
            Landmark::RightEarProximal => 389,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Landmark::UpperLipCenter => "upper_lip_center",
            Landmark::NoseUpper => "nose_upper",
            Landmark::NoseBridge => "nose_bridge",
            Landmark::ForeheadCenter => "forehead_center",
            Landmark::LeftEyebrowTip => "left_eyebrow_tip",
            Landmark::LeftEarProximal => "left_ear_proximal",
            Landmark::LeftEyeLower => "left_eye_lower",
            Landmark::LeftEyeUpper => "left_eye_upper",
            Landmark::RightEyebrowTip => "right_eyebrow_tip",
            Landmark::RightEyeLower => "right_eye_lower",
            Landmark::RightEyeUpper => "right_eye_upper",
            Landmark::RightEarProximal => "right_ear_proximal",
        }
    }
}

/// Landmarks marked with a circle on every frame.
pub const CIRCLE_LANDMARKS: [Landmark; 5] = [
    Landmark::NoseBridge,
    Landmark::LeftEyebrowTip,
    Landmark::RightEyebrowTip,
    Landmark::LeftEarProximal,
    Landmark::RightEarProximal,
];

/// Segments drawn in full-mesh mode: eyebrow tip to ear, and across each eye.
pub const LINE_SEGMENTS: [(Landmark, Landmark); 4] = [
    (Landmark::LeftEyebrowTip, Landmark::LeftEarProximal),
    (Landmark::RightEyebrowTip, Landmark::RightEarProximal),
    (Landmark::LeftEyeUpper, Landmark::LeftEyeLower),
    (Landmark::RightEyeUpper, Landmark::RightEyeLower),
];

/// Landmarks feeding the distance metric: `(p1, p2, origin)`.
pub const DISTANCE_LANDMARKS: (Landmark, Landmark, Landmark) = (
    Landmark::NoseUpper,
    Landmark::ForeheadCenter,
    Landmark::UpperLipCenter,
);

pub fn point_at(points: &[LandmarkPoint], index: usize) -> Result<&LandmarkPoint, LandmarkError> {
    points.get(index).ok_or(LandmarkError::IndexOutOfRange {
        index,
        len: points.len(),
    })
}

pub fn lookup(points: &[LandmarkPoint], landmark: Landmark) -> Result<&LandmarkPoint, LandmarkError> {
    point_at(points, landmark.index())
}

/// Copy out the points at `indices`, in request order.
///
/// Fails on the first index past the end of `points`; nothing is returned
/// for a partially valid request.
pub fn select_by_fixed_indices(
    points: &[LandmarkPoint],
    indices: &[usize],
) -> Result<Vec<LandmarkPoint>, LandmarkError> {
    indices
        .iter()
        .map(|&i| point_at(points, i).copied())
        .collect()
}

//! facemesh-core — Landmark geometry for face-mesh detections.
//!
//! Takes one frame of labeled 3D landmarks as produced by an external
//! face-mesh detector and derives the depth range, the fixed landmark
//! constructs the overlay draws, the offset distance metric and an
//! exact-match "same person" verdict. Also exports accumulated points
//! as plain text.

pub mod analyzer;
pub mod contour;
pub mod export;
pub mod landmarks;
pub mod listener;
pub mod types;

pub use analyzer::{
    analyze_frame, analyze_points, compute_z_range, distance_metric, same_face_identity, ExactMatchVerifier,
    FrameAnalysis, IdentityVerdict, IdentityVerifier, NamedPoint, ZRange,
};
pub use contour::{ContourSource, ContourType, MeshUseCase};
pub use export::{ExportError, ExportFormat};
pub use landmarks::{select_by_fixed_indices, Landmark, LandmarkError, FACE_MESH_POINT_COUNT};
pub use listener::{FrameListener, PointAccumulator};
pub use types::{BoundingBox, FrameError, FrameLandmarks, LandmarkPoint, Point3D, Triangle};

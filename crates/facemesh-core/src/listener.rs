//! Per-frame callback seam and the cross-frame point accumulator.

use crate::types::{FrameLandmarks, LandmarkPoint};

/// Receives each frame as the detector produces it.
pub trait FrameListener {
    fn on_frame(&mut self, frame: &FrameLandmarks);
}

/// Collects every frame's points, in arrival order, for later export.
#[derive(Debug, Default)]
pub struct PointAccumulator {
    points: Vec<LandmarkPoint>,
    frames: usize,
}

impl PointAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.frames = 0;
    }
}

impl FrameListener for PointAccumulator {
    fn on_frame(&mut self, frame: &FrameLandmarks) {
        self.points.extend_from_slice(frame.points());
        self.frames += 1;
        tracing::trace!(
            frame_points = frame.len(),
            total = self.points.len(),
            "accumulated frame"
        );
    }
}

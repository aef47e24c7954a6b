use anyhow::{Context, Result};
use facemesh_core::FrameLandmarks;
use std::path::Path;

/// Read one detector frame from a JSON file.
pub fn load_frame(path: &Path) -> Result<FrameLandmarks> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading frame {}", path.display()))?;
    let frame: FrameLandmarks = serde_json::from_str(&text)
        .with_context(|| format!("parsing frame {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        points = frame.len(),
        triangles = frame.triangles().len(),
        "frame loaded"
    );
    Ok(frame)
}

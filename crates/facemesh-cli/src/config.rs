use anyhow::{Context, Result};
use facemesh_core::{ExportFormat, MeshUseCase};
use facemesh_overlay::OverlayStyle;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CLI configuration: an optional TOML file, overridden by `FACEMESH_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which points the overlay and analysis operate on.
    pub use_case: MeshUseCase,
    /// Format used by `export` when `--format` is not given.
    pub export_format: ExportFormat,
    /// Directory for exports written without an explicit `--output`.
    pub export_dir: PathBuf,
    /// Blank canvas size for `render` without a background image.
    pub render_width: u32,
    pub render_height: u32,
    pub style: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_case: MeshUseCase::FaceMesh,
            export_format: ExportFormat::Legacy,
            export_dir: PathBuf::from("."),
            render_width: 480,
            render_height: 640,
            style: OverlayStyle::default(),
        }
    }
}

impl Config {
    /// Load from `path` (or `FACEMESH_CONFIG` when `path` is `None`), then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("FACEMESH_CONFIG").ok().map(PathBuf::from));

        let base = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(config)
    }

    /// Override fields from `FACEMESH_*` variables. Unparseable values are
    /// logged and ignored.
    pub fn with_env(self, var: impl Fn(&str) -> Option<String>) -> Self {
        let style = OverlayStyle {
            circle_radius: env_or(&var, "FACEMESH_CIRCLE_RADIUS", self.style.circle_radius),
            box_stroke_width: env_or(&var, "FACEMESH_BOX_STROKE_WIDTH", self.style.box_stroke_width),
            line_stroke_width: env_or(&var, "FACEMESH_LINE_STROKE_WIDTH", self.style.line_stroke_width),
            rescale_z: var("FACEMESH_RESCALE_Z")
                .map(|v| v != "0")
                .unwrap_or(self.style.rescale_z),
            ..self.style
        };

        Self {
            use_case: env_or(&var, "FACEMESH_USE_CASE", self.use_case),
            export_format: env_or(&var, "FACEMESH_EXPORT_FORMAT", self.export_format),
            export_dir: var("FACEMESH_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.export_dir),
            render_width: env_or(&var, "FACEMESH_RENDER_WIDTH", self.render_width),
            render_height: env_or(&var, "FACEMESH_RENDER_HEIGHT", self.render_height),
            style,
        }
    }
}

fn env_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match var(key) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "ignoring unparseable config override");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.use_case, MeshUseCase::FaceMesh);
        assert_eq!(c.export_format, ExportFormat::Legacy);
        assert_eq!(c.style.circle_radius, 8.0);
        assert_eq!(c.style.box_stroke_width, 5.0);
    }

    #[test]
    fn test_env_overrides() {
        let c = Config::default().with_env(vars(&[
            ("FACEMESH_USE_CASE", "contour_only"),
            ("FACEMESH_EXPORT_FORMAT", "csv"),
            ("FACEMESH_CIRCLE_RADIUS", "4.5"),
            ("FACEMESH_RESCALE_Z", "0"),
            ("FACEMESH_EXPORT_DIR", "/tmp/meshes"),
        ]));
        assert_eq!(c.use_case, MeshUseCase::ContourOnly);
        assert_eq!(c.export_format, ExportFormat::Csv);
        assert_eq!(c.style.circle_radius, 4.5);
        assert!(!c.style.rescale_z);
        assert_eq!(c.export_dir, PathBuf::from("/tmp/meshes"));
        assert_eq!(c.render_width, 480);
    }

    #[test]
    fn test_bad_env_value_keeps_default() {
        let c = Config::default().with_env(vars(&[("FACEMESH_RENDER_WIDTH", "wide")]));
        assert_eq!(c.render_width, 480);
    }

    #[test]
    fn test_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facemesh.toml");
        std::fs::write(
            &path,
            r#"
use_case = "contour_only"
export_format = "csv"
render_width = 720

[style]
circle_radius = 3.0
box_color = [255, 0, 0, 255]
"#,
        )
        .unwrap();

        let c = Config::from_file(&path).unwrap();
        assert_eq!(c.use_case, MeshUseCase::ContourOnly);
        assert_eq!(c.render_width, 720);
        assert_eq!(c.render_height, 640);
        assert_eq!(c.style.circle_radius, 3.0);
        assert_eq!(c.style.box_stroke_width, 5.0);
        assert_eq!(c.style.box_color, [255, 0, 0, 255]);
    }

    #[test]
    fn test_toml_rejects_unknown_use_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "use_case = \"wireframe\"\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}

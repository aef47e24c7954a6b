//! Plain-text export of accumulated landmark positions.

use crate::types::LandmarkPoint;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// One point per line, `x`, `y` and `z` concatenated without separators,
    /// in the float notation of existing mesh dumps. Not parseable back.
    #[default]
    Legacy,
    /// `index,x,y,z` header followed by one comma-separated row per point.
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(ExportFormat::Legacy),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Shortest round-trip form, with `.0` on integral values (`1.0`, not `1`).
fn fmt_coord(v: f32) -> String {
    format!("{v:?}")
}

/// Float text as existing mesh dumps carry it: plain decimal for
/// magnitudes in `[1e-3, 1e7)`, `d.dddE±n` otherwise, and always at least
/// one fractional digit.
fn fmt_legacy_coord(v: f32) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return (if v > 0.0 { "Infinity" } else { "-Infinity" }).to_string();
    }

    let abs = v.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        return fmt_coord(v);
    }

    let sci = format!("{v:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

fn header(format: ExportFormat) -> Option<&'static str> {
    match format {
        ExportFormat::Legacy => None,
        ExportFormat::Csv => Some("index,x,y,z"),
    }
}

fn format_point(p: &LandmarkPoint, format: ExportFormat) -> String {
    let pos = p.position;
    match format {
        ExportFormat::Legacy => format!(
            "{}{}{}",
            fmt_legacy_coord(pos.x),
            fmt_legacy_coord(pos.y),
            fmt_legacy_coord(pos.z)
        ),
        ExportFormat::Csv => format!(
            "{},{},{},{}",
            p.index,
            fmt_coord(pos.x),
            fmt_coord(pos.y),
            fmt_coord(pos.z)
        ),
    }
}

pub fn write_points<W: Write>(
    mut out: W,
    points: &[LandmarkPoint],
    format: ExportFormat,
) -> Result<(), ExportError> {
    if let Some(h) = header(format) {
        writeln!(out, "{h}")?;
    }
    for p in points {
        writeln!(out, "{}", format_point(p, format))?;
    }
    out.flush()?;
    tracing::debug!(points = points.len(), ?format, "points written");
    Ok(())
}

/// In-memory counterpart of [`write_points`], same text.
pub fn render_points(points: &[LandmarkPoint], format: ExportFormat) -> String {
    let mut text = String::new();
    if let Some(h) = header(format) {
        text.push_str(h);
        text.push('\n');
    }
    for p in points {
        text.push_str(&format_point(p, format));
        text.push('\n');
    }
    text
}

/// Default export file name, `Mesh_<unix millis>.txt`.
pub fn export_file_name(unix_millis: i64) -> String {
    format!("Mesh_{unix_millis}.txt")
}

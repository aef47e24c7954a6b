use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use facemesh_core::contour::points_for_use_case;
use facemesh_core::export::{export_file_name, write_points};
use facemesh_core::{
    analyze_points, select_by_fixed_indices, ExactMatchVerifier, ExportFormat, FrameAnalysis,
    FrameListener, IdentityVerifier, MeshUseCase, PointAccumulator,
};
use facemesh_overlay::color::BLACK;
use facemesh_overlay::{build_overlay, Canvas, Drawable, ImageCanvas, ViewTransform};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod input;

use config::Config;
use input::load_frame;

#[derive(Parser)]
#[command(name = "facemesh", about = "Face-mesh landmark analysis, verification and export")]
struct Cli {
    /// TOML config file (defaults to $FACEMESH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured use case (face_mesh, contour_only)
    #[arg(long, global = true)]
    use_case: Option<MeshUseCase>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print z-range, fixed landmarks and distance metric of a frame as JSON
    Analyze {
        frame: PathBuf,
    },
    /// Compare two frames point by point
    Verify {
        a: PathBuf,
        b: PathBuf,
    },
    /// Print the points at the given sequence positions as JSON
    Select {
        frame: PathBuf,
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Accumulate the points of every frame and write them to a text file
    Export {
        #[arg(required = true)]
        frames: Vec<PathBuf>,
        /// Output file (defaults to Mesh_<millis>.txt in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// legacy or csv
        #[arg(long)]
        format: Option<ExportFormat>,
    },
    /// Draw the overlay of a frame into a PNG
    Render {
        frame: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Image to draw onto instead of a blank canvas
        #[arg(long)]
        background: Option<PathBuf>,
        /// Blank canvas width; not allowed with --background
        #[arg(long, conflicts_with = "background")]
        width: Option<u32>,
        #[arg(long, conflicts_with = "background")]
        height: Option<u32>,
        /// Size of the image the detector ran on, when it differs from the canvas
        #[arg(long, requires = "source_height")]
        source_width: Option<u32>,
        #[arg(long, requires = "source_width")]
        source_height: Option<u32>,
        /// Mirror horizontally (front camera)
        #[arg(long)]
        mirror: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(use_case) = cli.use_case {
        config.use_case = use_case;
    }

    match cli.command {
        Commands::Analyze { frame } => {
            let frame = load_frame(&frame)?;
            let points = points_for_use_case(&frame, config.use_case);
            let analysis = analyze_points(&points)?;
            if analysis.z_range.is_empty() {
                tracing::warn!("frame has no points, z-range is undefined");
            }
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Commands::Verify { a, b } => {
            let fa = load_frame(&a)?;
            let fb = load_frame(&b)?;
            let pa = points_for_use_case(&fa, config.use_case);
            let pb = points_for_use_case(&fb, config.use_case);
            let verdict = ExactMatchVerifier.verify(&pa, &pb);
            tracing::info!(
                same_person = verdict.same_person,
                compared = verdict.compared,
                first_mismatch = ?verdict.first_mismatch,
                "verification done"
            );
            println!("{}", verdict.label());
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Commands::Select { frame, indices } => {
            let frame = load_frame(&frame)?;
            let points = points_for_use_case(&frame, config.use_case);
            let selected = select_by_fixed_indices(&points, &indices)?;
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        Commands::Export {
            frames,
            output,
            format,
        } => {
            let format = format.unwrap_or(config.export_format);
            let output = output.unwrap_or_else(|| {
                config
                    .export_dir
                    .join(export_file_name(chrono::Utc::now().timestamp_millis()))
            });
            run_export(&frames, &output, format)?;
        }
        Commands::Render {
            frame,
            output,
            background,
            width,
            height,
            source_width,
            source_height,
            mirror,
        } => {
            let mut canvas = match background {
                Some(path) => ImageCanvas::open(&path)
                    .with_context(|| format!("opening background {}", path.display()))?,
                None => ImageCanvas::new(
                    width.unwrap_or(config.render_width),
                    height.unwrap_or(config.render_height),
                    BLACK,
                )?,
            };
            let (cw, ch) = (canvas.width(), canvas.height());
            let transform = ViewTransform::fit(
                source_width.unwrap_or(cw),
                source_height.unwrap_or(ch),
                cw,
                ch,
                mirror,
            );
            run_render(&frame, &config, &transform, &mut canvas)?;
            canvas.save(&output)?;
        }
    }

    Ok(())
}

/// Frames that cannot be read are skipped with a warning; the export fails
/// only when nothing was accumulated.
fn run_export(frames: &[PathBuf], output: &Path, format: ExportFormat) -> Result<()> {
    let mut acc = PointAccumulator::new();
    for path in frames {
        match load_frame(path) {
            Ok(frame) => acc.on_frame(&frame),
            Err(e) => tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "skipping frame"),
        }
    }
    if acc.frame_count() == 0 {
        bail!("no readable frames to export");
    }

    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_points(BufWriter::new(file), acc.points(), format)?;
    tracing::info!(
        path = %output.display(),
        frames = acc.frame_count(),
        points = acc.points().len(),
        ?format,
        "mesh points exported"
    );
    Ok(())
}

/// Draw one frame's overlay. A frame missing a fixed landmark still gets
/// its face box; the landmark constructs are skipped.
fn run_render(
    frame_path: &Path,
    config: &Config,
    transform: &ViewTransform,
    canvas: &mut dyn Canvas,
) -> Result<()> {
    let frame = load_frame(frame_path)?;
    let points = points_for_use_case(&frame, config.use_case);
    let analysis = match analyze_points(&points) {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(error = %e, "skipping landmark overlay for this frame");
            FrameAnalysis {
                point_count: points.len(),
                z_range: facemesh_core::compute_z_range(&points),
                circles: Vec::new(),
                segments: Vec::new(),
                distance: None,
            }
        }
    };

    if analysis.z_range.is_empty() {
        tracing::debug!("no points to color");
    }

    let list = build_overlay(&frame, &analysis, &config.style, transform, config.use_case);
    list.render(canvas);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facemesh_core::{BoundingBox, FrameLandmarks, Point3D, FACE_MESH_POINT_COUNT};
    use image::Rgba;

    fn write_frame(dir: &Path, name: &str, frame: &FrameLandmarks) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(frame).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_export_skips_unreadable_frames() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_frame(
            dir.path(),
            "a.json",
            &FrameLandmarks::from_positions([Point3D::new(1.0, 2.0, 3.0)]),
        );
        let bad = dir.path().join("missing.json");
        let out = dir.path().join("out.txt");

        run_export(&[bad, good], &out, ExportFormat::Legacy).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "1.02.03.0\n");
    }

    #[test]
    fn test_export_fails_without_frames() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        assert!(run_export(&[dir.path().join("none.json")], &out, ExportFormat::Csv).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_render_size_conflicts_with_background() {
        let err = Cli::try_parse_from([
            "facemesh", "render", "f.json", "-o", "out.png", "--background", "bg.png", "--width", "100",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let cli = Cli::try_parse_from([
            "facemesh", "render", "f.json", "-o", "out.png", "--width", "100", "--height", "80",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render { width: Some(100), height: Some(80), .. }
        ));
    }

    #[test]
    fn test_render_degraded_frame_draws_box_only() {
        let dir = tempfile::tempdir().unwrap();
        let frame = FrameLandmarks::from_positions(vec![Point3D::new(10.0, 10.0, 0.0); 50])
            .with_bounding_box(Some(BoundingBox {
                left: 2.0,
                top: 2.0,
                right: 30.0,
                bottom: 30.0,
            }));
        let path = write_frame(dir.path(), "degraded.json", &frame);

        let mut canvas = ImageCanvas::new(40, 40, BLACK).unwrap();
        let transform = ViewTransform::identity(40);
        run_render(&path, &Config::default(), &transform, &mut canvas).unwrap();

        let img = canvas.image();
        assert_eq!(*img.get_pixel(2, 15), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(10, 10), BLACK);
    }

    #[test]
    fn test_render_full_frame_draws_circles() {
        let dir = tempfile::tempdir().unwrap();
        let mut positions = vec![Point3D::default(); FACE_MESH_POINT_COUNT];
        positions[6] = Point3D::new(20.0, 20.0, 0.0);
        let path = write_frame(dir.path(), "full.json", &FrameLandmarks::from_positions(positions));

        let mut canvas = ImageCanvas::new(40, 40, BLACK).unwrap();
        run_render(&path, &Config::default(), &ViewTransform::identity(40), &mut canvas).unwrap();
        assert_eq!(*canvas.image().get_pixel(20, 20), Rgba([255, 255, 255, 255]));
    }
}

//! svgsplit: split an SVG into percentage segments and export the
//! labelled composite.
//!
//! Loads an SVG, composes clipped and recolored copies of the artwork
//! side by side with bracket annotations, and writes the result as PNG,
//! JPEG or SVG.
//!
//! # Usage
//!
//! ```text
//! svgsplit drawing.svg --split 30:零件A --split 70:零件B -o out.png
//! svgsplit drawing.svg --config job.json --format svg --summary-json
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod config;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use svgsplit_engine::{ResolvedSegment, Session, SplitSpec};
use svgsplit_export::{Artifact, ExportFormat, SvgMetadata};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{JobConfig, mime_for_path, parse_split_arg};
use crate::error::CliError;

/// Split an SVG into labelled, recolored percentage segments.
///
/// Each split takes a window of the source artwork as wide as its
/// percentage of the source width. Windows are laid out left to right
/// with a fixed gap and annotated with a bracket, the percentage and a
/// name.
#[derive(Parser)]
#[command(name = "svgsplit", version)]
struct Cli {
    /// Path to the input SVG.
    input: PathBuf,

    /// A split segment: `PCT[:LABEL[:FILL[:STROKE]]]`, e.g.
    /// `30:零件A:#FF6B6B:#C92A2A`. Repeat for more segments (up to 8).
    /// Replaces the splits of `--config`.
    #[arg(long = "split", value_name = "SPEC", value_parser = parse_split_arg)]
    splits: Vec<SplitSpec>,

    /// JSON job file with `splits`, `style` and `raster` sections.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Label font size in px.
    #[arg(long, value_name = "PX")]
    label_size: Option<f64>,

    /// Annotation inset as a percent of the output height (0-50).
    #[arg(long, value_name = "PCT")]
    text_distance: Option<f64>,

    /// Vertical scale of the artwork in percent (10-200).
    #[arg(long, value_name = "PCT")]
    vertical_scale: Option<f64>,

    /// Hide brackets and labels in the output.
    #[arg(long)]
    hide_annotations: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// Output path [default: svg-split-result.<ext>].
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Raster pixels per SVG unit.
    #[arg(long, value_name = "N")]
    pixel_ratio: Option<f64>,

    /// JPEG quality (1-100).
    #[arg(long, value_name = "Q", value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: Option<u8>,

    /// Print the output size and segment rectangles as JSON on stdout.
    #[arg(long)]
    summary_json: bool,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Raster PNG at the pixel ratio.
    Png,
    /// Raster JPEG at the pixel ratio.
    #[value(alias = "jpg")]
    Jpeg,
    /// Scalable SVG text.
    Svg,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => Self::Png,
            Format::Jpeg => Self::Jpeg,
            Format::Svg => Self::Svg,
        }
    }
}

/// What `--summary-json` prints.
#[derive(Serialize)]
struct Summary<'a> {
    output: &'a Path,
    format: String,
    fell_back: bool,
    width: f64,
    height: f64,
    segments: &'a [ResolvedSegment],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the job file (if any) with the individual flags.
fn job_from_cli(cli: &Cli) -> Result<JobConfig, CliError> {
    let mut job = match &cli.config {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::default(),
    };

    if !cli.splits.is_empty() {
        job.splits.clone_from(&cli.splits);
    }
    if job.splits.is_empty() {
        job.splits = SplitSpec::default_layout();
    }

    if let Some(size) = cli.label_size {
        job.style.label_font_size_px = size;
    }
    if let Some(distance) = cli.text_distance {
        job.style.text_distance_percent = distance;
    }
    if let Some(percent) = cli.vertical_scale {
        job.style = job.style.with_vertical_scale_percent(percent);
    }
    if let Some(ratio) = cli.pixel_ratio {
        job.raster.pixel_ratio = ratio;
    }
    if let Some(quality) = cli.jpeg_quality {
        job.raster.jpeg_quality = quality;
    }
    Ok(job)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let job = job_from_cli(cli)?;
    debug!(?job, "job resolved");

    let bytes = std::fs::read(&cli.input).map_err(|source| CliError::FileRead {
        path: cli.input.clone(),
        source,
    })?;

    let mut session = Session::new();
    session.load_source(&bytes, mime_for_path(&cli.input))?;
    session.set_annotations_visible(!cli.hide_annotations);
    let result = session.preview(&job.splits, &job.style)?;
    info!(
        width = result.width(),
        height = result.height(),
        segments = result.segments().len(),
        "composite ready"
    );

    let title = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(svgsplit_export::DEFAULT_FILE_STEM);
    let description = describe(result.segments());
    let metadata = SvgMetadata {
        title: Some(title),
        description: Some(&description),
    };
    let format = ExportFormat::from(cli.format);
    let artifact = svgsplit_export::export_cached(&session, format, &job.raster, &metadata)?;
    if artifact.fell_back {
        eprintln!("Warning: {format} rendering failed, wrote SVG instead");
    }

    let output = output_path(cli.output.as_deref(), &artifact);
    std::fs::write(&output, &artifact.bytes).map_err(|source| CliError::FileWrite {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), bytes = artifact.bytes.len(), "output written");

    if cli.summary_json
        && let Some(result) = session.composite()
    {
        let summary = Summary {
            output: &output,
            format: artifact.format.to_string(),
            fell_back: artifact.fell_back,
            width: result.width(),
            height: result.height(),
            segments: result.segments(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        eprintln!(
            "{} written to {} ({} bytes)",
            artifact.format,
            output.display(),
            artifact.bytes.len(),
        );
    }

    Ok(())
}

/// `<desc>` text, e.g. `30% 零件A, 70% 零件B`.
fn describe(segments: &[ResolvedSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}% {}", s.rect.percentage, s.label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where to write `artifact`.
///
/// An explicit path keeps its name, but takes the `.svg` extension when
/// the export fell back from a raster format.
fn output_path(requested: Option<&Path>, artifact: &Artifact) -> PathBuf {
    match requested {
        Some(path) if artifact.fell_back => path.with_extension(artifact.format.extension()),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(artifact.file_name()),
    }
}

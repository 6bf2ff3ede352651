//! svgsplit-export: Pure format serializers for svgsplit composites
//! (sans-IO).
//!
//! Turns a [`CompositeResult`] into file bytes: SVG text, or a PNG/JPEG
//! raster rendered at twice the logical size. When rasterization fails
//! the SVG text is returned instead, flagged as a fallback.

pub mod raster;
pub mod svg;

use std::fmt;
use std::str::FromStr;

use svgsplit_engine::{CompositeResult, Session};
use tracing::{info, instrument, warn};

pub use raster::RasterOptions;
pub use svg::{SvgMetadata, to_svg};

/// Base name of exported files.
pub const DEFAULT_FILE_STEM: &str = "svg-split-result";

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// No composite has been generated yet.
    #[error("nothing to export: generate a preview first")]
    NothingToExport,

    /// The logical size cannot be turned into a pixmap.
    #[error("cannot rasterize a {width}x{height} canvas")]
    InvalidSize { width: f64, height: f64 },

    /// SVG parsing or rendering failed.
    #[error("rasterization failed: {0}")]
    Rasterize(String),

    /// PNG/JPEG encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Default download name, e.g. `svg-split-result.png`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{DEFAULT_FILE_STEM}.{}", self.extension())
    }

    /// Returns `true` for PNG and JPEG.
    #[must_use]
    pub const fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            other => Err(format!("unknown export format {other:?} (expected png, jpeg or svg)")),
        }
    }
}

/// Encoded export output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Format of [`bytes`](Self::bytes). Differs from the requested
    /// format when [`fell_back`](Self::fell_back) is set.
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Rasterization failed and SVG text was produced instead.
    pub fell_back: bool,
}

impl Artifact {
    /// Default file name for this artifact's actual format.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }
}

/// Export a composite in `format`.
///
/// Raster formats fall back to SVG text (with
/// [`Artifact::fell_back`] set) if rendering or encoding fails.
///
/// # Errors
///
/// Currently infallible for valid composites; the `Result` covers
/// future formats without a fallback.
#[instrument(skip(result, options, metadata), fields(width = result.width(), height = result.height()))]
pub fn export(
    result: &CompositeResult,
    format: ExportFormat,
    options: &RasterOptions,
    metadata: &SvgMetadata<'_>,
) -> Result<Artifact, ExportError> {
    let svg_text = to_svg(result.document(), metadata);
    if !format.is_raster() {
        return Ok(svg_artifact(svg_text, false));
    }

    match render_raster(&svg_text, result, format, options) {
        Ok(bytes) => {
            info!(bytes = bytes.len(), "raster export complete");
            Ok(Artifact {
                format,
                bytes,
                fell_back: false,
            })
        }
        Err(e) => {
            warn!(error = %e, "raster export failed, falling back to SVG");
            Ok(svg_artifact(svg_text, true))
        }
    }
}

/// Export the session's cached composite.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] if no preview has been
/// generated.
pub fn export_cached(
    session: &Session,
    format: ExportFormat,
    options: &RasterOptions,
    metadata: &SvgMetadata<'_>,
) -> Result<Artifact, ExportError> {
    let result = session.composite().ok_or(ExportError::NothingToExport)?;
    export(result, format, options, metadata)
}

fn render_raster(
    svg_text: &str,
    result: &CompositeResult,
    format: ExportFormat,
    options: &RasterOptions,
) -> Result<Vec<u8>, ExportError> {
    let img = raster::rasterize(svg_text, result.width(), result.height(), options.pixel_ratio)?;
    match format {
        ExportFormat::Jpeg => raster::encode_jpeg(&img, options.jpeg_quality),
        ExportFormat::Png | ExportFormat::Svg => raster::encode_png(&img),
    }
}

fn svg_artifact(svg_text: String, fell_back: bool) -> Artifact {
    Artifact {
        format: ExportFormat::Svg,
        bytes: svg_text.into_bytes(),
        fell_back,
    }
}

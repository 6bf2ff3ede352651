//! Job configuration: `--split` argument parsing and JSON job files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use svgsplit_engine::{SegmentColor, SplitSpec, StyleParams};
use svgsplit_export::RasterOptions;

use crate::error::CliError;

/// A complete job as read from `--config`.
///
/// Every field is optional in the file; missing ones take their defaults.
///
/// ```json
/// {
///   "splits": [
///     { "percentage": 30, "label": "零件A", "color": { "fill": "#FF6B6B", "stroke": "#C92A2A" } },
///     { "percentage": 70 }
///   ],
///   "style": { "label_font_size_px": 24, "vertical_scale": 0.8 },
///   "raster": { "pixel_ratio": 3 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub splits: Vec<SplitSpec>,
    pub style: StyleParams,
    pub raster: RasterOptions,
}

impl JobConfig {
    /// Parse a job from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the JSON is malformed or holds a
    /// color that is not `#rgb` or `#rrggbb`. Percentages are range-checked later,
    /// when the job is composed.
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|e| CliError::Config(format!("invalid job file: {e}")))
    }

    /// Read and parse a job file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileRead`] if the file cannot be read, or
    /// [`CliError::Config`] as for [`from_json`](Self::from_json).
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Parse a `PCT[:LABEL[:FILL[:STROKE]]]` split argument.
///
/// An empty label segment (`30::#FF0000:#880000`) leaves the label
/// unset so the default name applies. A fill without a stroke reuses
/// the fill as the stroke.
///
/// # Errors
///
/// Returns a message suitable for clap if the percentage is not an
/// integer in 10-90 or a color is not `#rgb` or `#rrggbb`.
pub fn parse_split_arg(arg: &str) -> Result<SplitSpec, String> {
    let mut parts = arg.splitn(4, ':');
    let pct_text = parts.next().unwrap_or_default().trim();
    let percentage: u8 = pct_text
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("percentage {pct_text:?} is not a whole number"))?;
    let mut spec = SplitSpec::new(percentage).map_err(|e| e.to_string())?;

    if let Some(label) = parts.next().filter(|l| !l.is_empty()) {
        spec = spec.with_label(label);
    }

    if let Some(fill) = parts.next().filter(|f| !f.is_empty()) {
        let stroke = parts.next().filter(|s| !s.is_empty()).unwrap_or(fill);
        let color = SegmentColor::parse(fill, stroke).map_err(|e| e.to_string())?;
        spec = spec.with_color(color);
    }

    Ok(spec)
}

/// MIME type implied by a file extension.
///
/// Only `.svg` maps to `image/svg+xml`; anything else is reported as
/// `application/octet-stream` and rejected by the engine.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => svgsplit_engine::SVG_MIME_TYPE,
        _ => "application/octet-stream",
    }
}

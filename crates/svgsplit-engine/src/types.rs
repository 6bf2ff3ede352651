//! Shared types for the svgsplit composition engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest split percentage accepted at the input boundary.
pub const MIN_PERCENTAGE: u8 = 10;

/// Largest split percentage accepted at the input boundary.
pub const MAX_PERCENTAGE: u8 = 90;

/// Maximum number of split segments in one composition.
pub const MAX_SPLITS: usize = 8;

/// Label used when a segment's label is supplied but blank.
pub const UNNAMED_LABEL: &str = "Unnamed";

/// A validated hex color (`#rgb` or `#rrggbb`).
///
/// Not normalized: the spelling and case given are written to the
/// output document unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub(crate) String);

impl Color {
    /// Parse a hex color string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `value` is not `#` followed
    /// by exactly 3 or 6 hex digits.
    pub fn parse(value: &str) -> Result<Self, EngineError> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| EngineError::Validation(format!("color must start with '#': {value:?}")))?;
        let valid_len = matches!(digits.len(), 3 | 6);
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EngineError::Validation(format!(
                "color must be #rgb or #rrggbb: {value:?}"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    /// Returns the color as written, including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Fill and stroke color applied to every drawable in one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentColor {
    /// Fill color for drawables.
    pub fill: Color,
    /// Stroke color for drawables.
    pub stroke: Color,
}

impl SegmentColor {
    /// Parse a fill/stroke pair.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if either color is malformed.
    pub fn parse(fill: &str, stroke: &str) -> Result<Self, EngineError> {
        Ok(Self {
            fill: Color::parse(fill)?,
            stroke: Color::parse(stroke)?,
        })
    }
}

/// One user-defined split: a percentage-sized segment with optional
/// label and color.
///
/// `label` and `color` are optional so that callers can under-supply
/// them; the engine pads missing entries with generated defaults (see
/// [`crate::splits::resolve_labels`] and
/// [`crate::splits::resolve_colors`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    /// Segment width as a percentage of the source width (10–90).
    pub percentage: u8,
    /// Segment label. `None` is padded with a generated name; a blank
    /// string resolves to [`UNNAMED_LABEL`].
    #[serde(default)]
    pub label: Option<String>,
    /// Segment colors. `None` is padded from the default palette.
    #[serde(default)]
    pub color: Option<SegmentColor>,
}

impl SplitSpec {
    /// Create a split with only a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `percentage` is outside
    /// [`MIN_PERCENTAGE`]..=[`MAX_PERCENTAGE`].
    pub fn new(percentage: u8) -> Result<Self, EngineError> {
        check_percentage(percentage)?;
        Ok(Self {
            percentage,
            label: None,
            color: None,
        })
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the fill/stroke colors.
    #[must_use]
    pub fn with_color(mut self, color: SegmentColor) -> Self {
        self.color = Some(color);
        self
    }
}

fn check_percentage(percentage: u8) -> Result<(), EngineError> {
    if (MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&percentage) {
        Ok(())
    } else {
        Err(EngineError::Validation(format!(
            "split percentage {percentage} is outside {MIN_PERCENTAGE}..={MAX_PERCENTAGE}"
        )))
    }
}

/// Validate a whole split list at the input boundary.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if the list is empty, longer than
/// [`MAX_SPLITS`], or contains an out-of-range percentage.
pub fn validate_splits(splits: &[SplitSpec]) -> Result<(), EngineError> {
    if splits.is_empty() {
        return Err(EngineError::Validation(
            "at least one split segment is required".to_owned(),
        ));
    }
    if splits.len() > MAX_SPLITS {
        return Err(EngineError::Validation(format!(
            "at most {MAX_SPLITS} split segments are supported, got {}",
            splits.len()
        )));
    }
    splits.iter().try_for_each(|s| check_percentage(s.percentage))
}

/// Global style parameters shared by every segment.
///
/// # Invariants
///
/// Enforced by [`StyleParams::validate`] at the input boundary; the
/// engine itself trusts these bounds.
///
/// - `label_font_size_px` is finite and positive.
/// - `text_distance_percent` is within `0.0..=50.0`.
/// - `vertical_scale` is within `0.1..=2.0` (10%–200%).
/// - `gap` is finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleParams {
    /// Font size of the percentage and name labels, in px.
    pub label_font_size_px: f64,
    /// Vertical inset of the annotation lines, as a percent of the
    /// output height.
    pub text_distance_percent: f64,
    /// Uniform vertical scale applied to the artwork (1.0 = unscaled).
    pub vertical_scale: f64,
    /// Horizontal gap between segments and the left margin.
    pub gap: f64,
}

impl StyleParams {
    /// Default label font size in px.
    pub const DEFAULT_LABEL_FONT_SIZE_PX: f64 = 20.0;
    /// Default annotation inset, percent of output height.
    pub const DEFAULT_TEXT_DISTANCE_PERCENT: f64 = 3.0;
    /// Default vertical scale, as a percent.
    pub const DEFAULT_VERTICAL_SCALE_PERCENT: f64 = 100.0;
    /// Fixed gap between segments.
    pub const GAP: f64 = 20.0;

    /// Set the vertical scale from a percent control value (100 = 1.0).
    #[must_use]
    pub fn with_vertical_scale_percent(mut self, percent: f64) -> Self {
        self.vertical_scale = percent / 100.0;
        self
    }

    /// Check the invariants listed on the type.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] naming the first parameter
    /// that is out of range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.label_font_size_px.is_finite() || self.label_font_size_px <= 0.0 {
            return Err(EngineError::Validation(format!(
                "label font size must be positive, got {}",
                self.label_font_size_px
            )));
        }
        if !(0.0..=50.0).contains(&self.text_distance_percent) {
            return Err(EngineError::Validation(format!(
                "text distance must be within 0..=50 percent, got {}",
                self.text_distance_percent
            )));
        }
        if !(0.1..=2.0).contains(&self.vertical_scale) {
            return Err(EngineError::Validation(format!(
                "vertical scale must be within 10..=200 percent, got {}",
                self.vertical_scale * 100.0
            )));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(EngineError::Validation(format!(
                "gap must be non-negative, got {}",
                self.gap
            )));
        }
        Ok(())
    }
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            label_font_size_px: Self::DEFAULT_LABEL_FONT_SIZE_PX,
            text_distance_percent: Self::DEFAULT_TEXT_DISTANCE_PERCENT,
            vertical_scale: Self::DEFAULT_VERTICAL_SCALE_PERCENT / 100.0,
            gap: Self::GAP,
        }
    }
}

/// Intrinsic coordinate space of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge of the viewBox.
    pub x: f64,
    /// Top edge of the viewBox.
    pub y: f64,
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
}

impl Viewport {
    /// Width used when the source declares neither viewBox nor width.
    pub const FALLBACK_WIDTH: f64 = 800.0;
    /// Height used when the source declares neither viewBox nor height.
    pub const FALLBACK_HEIGHT: f64 = 600.0;

    /// A viewport anchored at the origin.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Returns `true` if the viewBox origin is not `(0, 0)`.
    #[must_use]
    pub fn has_offset_origin(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

/// Placement of one segment in the output canvas.
///
/// Derived fresh on every composition by [`crate::planner::plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRect {
    /// Left edge in output space.
    pub x: f64,
    /// Segment width in output space.
    pub width: f64,
    /// Percentage copied from the originating [`SplitSpec`].
    pub percentage: u8,
}

impl SegmentRect {
    /// Right edge in output space.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Horizontal center in output space.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// The percentage rendered as text, without the `%` suffix.
    #[must_use]
    pub fn percentage_label(&self) -> String {
        self.percentage.to_string()
    }
}

/// Errors produced by the engine.
///
/// File-system failures are not represented here: reading uploads and
/// writing exports happen outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The upload is not declared as an SVG document.
    #[error("unsupported file type {mime:?}, expected image/svg+xml")]
    InvalidFileType {
        /// The MIME type that was offered.
        mime: String,
    },

    /// The upload could not be parsed as an SVG document.
    #[error("invalid SVG document: {0}")]
    InvalidSvg(String),

    /// Input parameters are missing or out of range.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Composition failed on otherwise valid input.
    #[error("composition failed: {0}")]
    Render(String),
}

//! Composition: plan, clip, recolor, annotate, assemble.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::annotate::{AnnotationParams, BORDER_CLASS, TEXT_CLASS, annotate};
use crate::clip::{SegmentContext, compose_segment};
use crate::ids::IdAllocator;
use crate::planner::{plan, total_width};
use crate::source::{SVG_NAMESPACE, SourceDocument, XLINK_NAMESPACE};
use crate::splits::{resolve_colors, resolve_labels};
use crate::tree::{Element, Num};
use crate::types::{EngineError, SegmentColor, SegmentRect, SplitSpec, StyleParams, validate_splits};

/// Fill of the canvas background rectangle.
pub const BACKGROUND_FILL: &str = "#f8f9fa";
/// Stroke of the canvas background rectangle.
pub const BACKGROUND_STROKE: &str = "#dee2e6";

/// One segment as it was rendered, with padding applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSegment {
    pub rect: SegmentRect,
    pub label: String,
    pub color: SegmentColor,
}

/// The output of one composition pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeResult {
    document: Element,
    width: f64,
    height: f64,
    segments: Vec<ResolvedSegment>,
    annotations_visible: bool,
}

impl CompositeResult {
    /// The root `<svg>` element.
    #[must_use]
    pub const fn document(&self) -> &Element {
        &self.document
    }

    /// Output width: right edge of the last segment.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Output height: intrinsic height times the vertical scale.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Segments in left-to-right order.
    #[must_use]
    pub fn segments(&self) -> &[ResolvedSegment] {
        &self.segments
    }

    #[must_use]
    pub const fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    /// Show or hide every annotation group without touching geometry.
    ///
    /// Hidden groups carry `display="none"`; shown groups carry no
    /// `display` attribute at all.
    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
        self.document.for_each_mut(&mut |element: &mut Element| {
            if element.has_class(BORDER_CLASS) || element.has_class(TEXT_CLASS) {
                if visible {
                    element.remove_attr("display");
                } else {
                    element.set_attr("display", "none");
                }
            }
        });
    }
}

/// Compose the split view of `source`.
///
/// `composition_id` is embedded in every generated element id; callers
/// that keep several compositions alive must pass distinct ids.
///
/// # Errors
///
/// - [`EngineError::Validation`] if `splits` is empty, has more than
///   [`crate::MAX_SPLITS`] entries or an out-of-range percentage, or
///   `composition_id` is not usable as an id prefix.
/// - [`EngineError::Render`] if the resulting canvas size is not
///   finite and positive.
///
/// # Examples
///
/// ```
/// use svgsplit_engine::{SourceDocument, SplitSpec, StyleParams, compose};
///
/// let source = SourceDocument::parse(
///     r#"<svg viewBox="0 0 800 600"><rect width="800" height="600"/></svg>"#,
/// ).unwrap();
/// let splits = [SplitSpec::new(30).unwrap(), SplitSpec::new(70).unwrap()];
/// let result = compose(&source, &splits, &StyleParams::default(), "s1").unwrap();
/// assert_eq!(result.width(), 840.0);
/// assert_eq!(result.height(), 600.0);
/// ```
#[instrument(skip(source, splits, style), fields(split_count = splits.len()))]
pub fn compose(
    source: &SourceDocument,
    splits: &[SplitSpec],
    style: &StyleParams,
    composition_id: &str,
) -> Result<CompositeResult, EngineError> {
    validate_splits(splits)?;
    let mut ids = IdAllocator::new(composition_id)?;

    let viewport = source.viewport();
    let rects = plan(viewport.width, splits, style.gap);
    let width = total_width(&rects);
    let height = viewport.height * style.vertical_scale;
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(EngineError::Render(format!(
            "output canvas {width}x{height} is not a positive finite size"
        )));
    }
    debug!(width, height, segments = rects.len(), "planned canvas");

    let colors = resolve_colors(splits);
    let labels = resolve_labels(splits);
    let segment_ctx = SegmentContext {
        source,
        segments: &rects,
        vertical_scale: style.vertical_scale,
        output_height: height,
    };
    let annotation_params = AnnotationParams {
        label_font_size_px: style.label_font_size_px,
        text_distance_percent: style.text_distance_percent,
        output_height: height,
    };

    let mut defs = Element::new("defs");
    let mut layers = Vec::with_capacity(rects.len() * 3);
    for (index, (rect, (color, label))) in rects.iter().zip(colors.iter().zip(&labels)).enumerate() {
        let segment_ids = ids.next_segment();
        let artwork = compose_segment(&segment_ctx, index, color, &segment_ids);
        let annotation = annotate(rect, &segment_ids, label, &annotation_params);
        defs.push(artwork.clip_path);
        layers.push(artwork.group);
        layers.push(annotation.border);
        layers.push(annotation.text);
    }

    let mut document = Element::new("svg")
        .with_attr("xmlns", SVG_NAMESPACE)
        .with_attr("xmlns:xlink", XLINK_NAMESPACE)
        .with_attr("width", Num(width))
        .with_attr("height", Num(height))
        .with_attr("viewBox", format!("0 0 {} {}", Num(width), Num(height)))
        .with_child(
            Element::new("rect")
                .with_attr("width", Num(width))
                .with_attr("height", Num(height))
                .with_attr("fill", BACKGROUND_FILL)
                .with_attr("stroke", BACKGROUND_STROKE)
                .with_attr("stroke-width", 1),
        )
        .with_child(defs);
    for layer in layers {
        document.push(layer);
    }

    let segments = rects
        .into_iter()
        .zip(colors)
        .zip(labels)
        .map(|((rect, color), label)| ResolvedSegment { rect, label, color })
        .collect();

    debug!("composition assembled");
    Ok(CompositeResult {
        document,
        width,
        height,
        segments,
        annotations_visible: true,
    })
}

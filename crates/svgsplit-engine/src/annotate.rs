//! Bracket and label annotations.
//!
//! Each segment gets two groups: a border group with a horizontal line
//! and two L-shaped brackets at the top and at the bottom, and a text
//! group with the percentage above and the segment name below. The
//! groups carry the [`BORDER_CLASS`] and [`TEXT_CLASS`] markers so their
//! visibility can be switched later without regenerating geometry.

use crate::ids::SegmentIds;
use crate::tree::{Element, Num};
use crate::types::SegmentRect;

/// Class marker on every annotation border group.
pub const BORDER_CLASS: &str = "annotation-border";
/// Class marker on every annotation text group.
pub const TEXT_CLASS: &str = "annotation-text";

/// Stroke and text color of all annotations.
pub const ANNOTATION_COLOR: &str = "#333333";
/// Annotation line width.
pub const ANNOTATION_STROKE_WIDTH: f64 = 2.0;
/// Horizontal inset of the bracket hooks from the segment edges.
pub const BRACKET_OFFSET: f64 = 15.0;
/// Horizontal inset of the lines from the segment edges.
pub const LINE_OFFSET: f64 = 20.0;
/// Vertical length of a bracket hook.
pub const HOOK_LENGTH: f64 = 10.0;
/// Gap between a line and its label baseline.
pub const TEXT_PADDING: f64 = 2.0;

/// Font stack for labels containing CJK ideographs.
pub const CJK_FONT_FAMILY: &str =
    "'Microsoft YaHei', 'SimHei', 'SimSun', 'FangSong', 'KaiTi', 'Arial Unicode MS', sans-serif";
/// Font stack for all other labels.
pub const LATIN_FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// Inputs shared by every segment's annotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationParams {
    pub label_font_size_px: f64,
    pub text_distance_percent: f64,
    /// Output canvas height (already vertically scaled).
    pub output_height: f64,
}

/// The annotation groups of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub border: Element,
    pub text: Element,
}

/// Vertical inset of the annotation lines from the top and bottom edges.
#[must_use]
pub fn distance_px(text_distance_percent: f64, output_height: f64) -> f64 {
    text_distance_percent * output_height / 100.0
}

/// Returns `true` if `text` contains a CJK Unified Ideograph
/// (U+4E00..=U+9FFF).
#[must_use]
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Pick the font stack able to render `label`.
#[must_use]
pub fn font_family_for(label: &str) -> &'static str {
    if contains_cjk(label) {
        CJK_FONT_FAMILY
    } else {
        LATIN_FONT_FAMILY
    }
}

/// Build the border and text groups for one segment.
///
/// `label` is used verbatim; blank labels are resolved upstream.
#[must_use]
pub fn annotate(
    rect: &SegmentRect,
    ids: &SegmentIds,
    label: &str,
    params: &AnnotationParams,
) -> Annotation {
    let distance = distance_px(params.text_distance_percent, params.output_height);
    let top = distance;
    let bottom = params.output_height - distance;

    let border = Element::new("g")
        .with_attr("id", &ids.border)
        .with_attr("class", BORDER_CLASS)
        .with_child(stroke_path(horizontal_line(rect, top)))
        .with_child(stroke_path(left_bracket(rect, top, HOOK_LENGTH)))
        .with_child(stroke_path(right_bracket(rect, top, HOOK_LENGTH)))
        .with_child(stroke_path(horizontal_line(rect, bottom)))
        .with_child(stroke_path(left_bracket(rect, bottom, -HOOK_LENGTH)))
        .with_child(stroke_path(right_bracket(rect, bottom, -HOOK_LENGTH)));

    let font_family = font_family_for(label);
    let percentage = format!("{}%", rect.percentage_label());
    let text = Element::new("g")
        .with_attr("id", &ids.text)
        .with_attr("class", TEXT_CLASS)
        .with_child(label_text(
            rect,
            top + params.label_font_size_px + TEXT_PADDING,
            font_family,
            params.label_font_size_px,
            percentage,
        ))
        .with_child(label_text(
            rect,
            bottom - TEXT_PADDING,
            font_family,
            params.label_font_size_px,
            label,
        ));

    Annotation { border, text }
}

fn point(x: f64, y: f64) -> String {
    format!("{},{}", Num(x), Num(y))
}

fn horizontal_line(rect: &SegmentRect, y: f64) -> String {
    format!(
        "M {} L {}",
        point(rect.x + LINE_OFFSET, y),
        point(rect.right() - LINE_OFFSET, y)
    )
}

fn left_bracket(rect: &SegmentRect, y: f64, hook: f64) -> String {
    format!(
        "M {} L {} L {}",
        point(rect.x + LINE_OFFSET, y),
        point(rect.x + BRACKET_OFFSET, y),
        point(rect.x + BRACKET_OFFSET, y + hook)
    )
}

fn right_bracket(rect: &SegmentRect, y: f64, hook: f64) -> String {
    format!(
        "M {} L {} L {}",
        point(rect.right() - LINE_OFFSET, y),
        point(rect.right() - BRACKET_OFFSET, y),
        point(rect.right() - BRACKET_OFFSET, y + hook)
    )
}

fn stroke_path(d: String) -> Element {
    Element::new("path")
        .with_attr("d", d)
        .with_attr("stroke", ANNOTATION_COLOR)
        .with_attr("stroke-width", Num(ANNOTATION_STROKE_WIDTH))
        .with_attr("fill", "none")
}

fn label_text(
    rect: &SegmentRect,
    y: f64,
    font_family: &str,
    font_size: f64,
    content: impl Into<String>,
) -> Element {
    Element::new("text")
        .with_attr("x", Num(rect.center_x()))
        .with_attr("y", Num(y))
        .with_attr("text-anchor", "middle")
        .with_attr("font-family", font_family)
        .with_attr("font-size", Num(font_size))
        .with_attr("font-weight", "bold")
        .with_attr("fill", ANNOTATION_COLOR)
        .with_text(content)
}

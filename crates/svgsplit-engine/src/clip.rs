//! Per-segment artwork: clip region, placement transform, recoloring.
//!
//! Every segment gets its own deep copy of the source graphics, so
//! segments never share mutable state.

use tracing::trace;

use crate::ids::SegmentIds;
use crate::source::{GraphicElement, ShapeKind, SourceDocument};
use crate::tree::{Attributes, Element, Num};
use crate::types::{SegmentColor, SegmentRect, Viewport};
use crate::visit::{GraphicVisitor, walk_mut};

/// Stroke width applied to recolored drawables.
pub const RECOLOR_STROKE_WIDTH: &str = "2";
/// Fill opacity applied to recolored drawables.
pub const RECOLOR_FILL_OPACITY: &str = "0.9";
/// Stroke opacity applied to recolored drawables.
pub const RECOLOR_STROKE_OPACITY: &str = "1";

/// Visitor that paints every drawable with one segment's colors.
///
/// The inline `style` attribute is removed so it cannot override the
/// presentation attributes set here. Groups and other elements are left
/// untouched but their children are still visited.
#[derive(Debug)]
pub struct Recolor<'a> {
    color: &'a SegmentColor,
}

impl<'a> Recolor<'a> {
    #[must_use]
    pub const fn new(color: &'a SegmentColor) -> Self {
        Self { color }
    }
}

impl GraphicVisitor for Recolor<'_> {
    fn visit_shape(&mut self, _kind: ShapeKind, attributes: &mut Attributes) {
        attributes.remove("style");
        attributes.set("fill", &self.color.fill);
        attributes.set("stroke", &self.color.stroke);
        attributes.set("stroke-width", RECOLOR_STROKE_WIDTH);
        attributes.set("stroke-opacity", RECOLOR_STROKE_OPACITY);
        attributes.set("fill-opacity", RECOLOR_FILL_OPACITY);
    }
}

/// Recolor `element` and all of its drawable descendants in place.
///
/// Idempotent: a second call with the same color changes nothing.
pub fn apply_colors(element: &mut GraphicElement, color: &SegmentColor) {
    walk_mut(&mut Recolor::new(color), element);
}

/// Source-space x where segment `index` starts sampling: the summed
/// slice widths of all segments before it.
#[must_use]
pub fn source_slice_start(segments: &[SegmentRect], index: usize, intrinsic_width: f64) -> f64 {
    segments
        .iter()
        .take(index)
        .map(|rect| intrinsic_width * f64::from(rect.percentage) / 100.0)
        .sum()
}

/// Horizontal translation that brings the segment's source slice under
/// its clip rectangle.
#[must_use]
pub fn segment_offset(segments: &[SegmentRect], index: usize, intrinsic_width: f64) -> f64 {
    segments.get(index).map_or(0.0, |rect| {
        rect.x - source_slice_start(segments, index, intrinsic_width)
    })
}

/// Build the `transform` for one copied top-level node.
///
/// Outer to inner: the segment translation, the vertical scale (only
/// when it is not 1), a shift of the viewBox origin to `(0, 0)` (only
/// when the origin is offset), then the node's own transform.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn placement_transform(
    offset: f64,
    vertical_scale: f64,
    viewport: &Viewport,
    existing: Option<&str>,
) -> String {
    let mut transform = format!("translate({}, 0)", Num(offset));
    if vertical_scale != 1.0 {
        transform.push_str(&format!(" scale(1, {})", Num(vertical_scale)));
    }
    if viewport.has_offset_origin() {
        transform.push_str(&format!(
            " translate({}, {})",
            Num(-viewport.x),
            Num(-viewport.y)
        ));
    }
    if let Some(existing) = existing.map(str::trim).filter(|t| !t.is_empty()) {
        transform.push(' ');
        transform.push_str(existing);
    }
    transform
}

/// Inputs shared by every segment of one composition.
#[derive(Debug, Clone, Copy)]
pub struct SegmentContext<'a> {
    /// The loaded source.
    pub source: &'a SourceDocument,
    /// All planned segments, in order.
    pub segments: &'a [SegmentRect],
    /// Vertical scale fraction.
    pub vertical_scale: f64,
    /// Output canvas height (already scaled).
    pub output_height: f64,
}

/// The two output pieces of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentArtwork {
    /// `<clipPath>` holding the segment rectangle, destined for `<defs>`.
    pub clip_path: Element,
    /// Group of transformed, recolored source copies clipped to it.
    pub group: Element,
}

/// Render segment `index`: a clip path over its rectangle and a group of
/// recolored copies of every top-level source node, translated so that
/// the segment's source slice shows through the clip.
///
/// A source with no graphic nodes yields an empty clipped group.
#[must_use]
pub fn compose_segment(
    ctx: &SegmentContext<'_>,
    index: usize,
    color: &SegmentColor,
    ids: &SegmentIds,
) -> SegmentArtwork {
    let viewport = ctx.source.viewport();
    let (x, width) = ctx
        .segments
        .get(index)
        .map_or((0.0, 0.0), |rect| (rect.x, rect.width));
    let offset = segment_offset(ctx.segments, index, viewport.width);
    trace!(index, x, width, offset, "composing segment");

    let clip_path = Element::new("clipPath")
        .with_attr("id", &ids.clip)
        .with_child(
            Element::new("rect")
                .with_attr("x", Num(x))
                .with_attr("y", 0)
                .with_attr("width", Num(width))
                .with_attr("height", Num(ctx.output_height)),
        );

    let mut group = Element::new("g")
        .with_attr("id", &ids.group)
        .with_attr("clip-path", ids.clip_url());
    for node in ctx.source.graphics() {
        let mut copy = node.clone();
        let transform = placement_transform(
            offset,
            ctx.vertical_scale,
            &viewport,
            copy.attributes.get("transform"),
        );
        copy.attributes.set("transform", transform);
        apply_colors(&mut copy, color);
        group.push(copy.to_element());
    }

    SegmentArtwork { clip_path, group }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::IdAllocator;
    use crate::planner::plan;
    use crate::source::Tag;
    use crate::types::SplitSpec;

    fn red() -> SegmentColor {
        SegmentColor::parse("#FF0000", "#880000").unwrap()
    }

    fn rects(percentages: &[u8]) -> Vec<SegmentRect> {
        let splits: Vec<_> = percentages
            .iter()
            .map(|&p| SplitSpec::new(p).unwrap())
            .collect();
        plan(800.0, &splits, 20.0)
    }

    #[test]
    fn recolor_strips_style_and_sets_presentation_attributes() {
        let doc = SourceDocument::parse(
            r#"<svg><g fill="blue"><path style="fill:green" d="M0 0"/><text>t</text></g></svg>"#,
        )
        .unwrap();
        let mut group = doc.graphics()[0].clone();
        apply_colors(&mut group, &red());

        let element = group.to_element();
        assert_eq!(element.attr("fill"), Some("blue"), "groups are not recolored");
        let path = element.child_elements().next().unwrap();
        assert_eq!(path.attr("style"), None);
        assert_eq!(path.attr("fill"), Some("#FF0000"));
        assert_eq!(path.attr("stroke"), Some("#880000"));
        assert_eq!(path.attr("stroke-width"), Some("2"));
        assert_eq!(path.attr("fill-opacity"), Some("0.9"));
        assert_eq!(path.attr("stroke-opacity"), Some("1"));
        let text = element.child_elements().nth(1).unwrap();
        assert_eq!(text.attr("fill"), None);
    }

    #[test]
    fn recolor_is_idempotent() {
        let doc = SourceDocument::parse(
            r#"<svg><g><rect style="stroke:red" width="5"/><a><circle r="2"/></a></g></svg>"#,
        )
        .unwrap();
        let mut once = doc.graphics()[0].clone();
        apply_colors(&mut once, &red());
        let mut twice = once.clone();
        apply_colors(&mut twice, &red());
        assert_eq!(once, twice);
    }

    #[test]
    fn recolor_reaches_shapes_under_non_graphic_elements() {
        let doc = SourceDocument::parse(r#"<svg><g><a><switch><line/></switch></a></g></svg>"#)
            .unwrap();
        let mut group = doc.graphics()[0].clone();
        apply_colors(&mut group, &red());
        let element = group.to_element();
        let line = element
            .descendants()
            .into_iter()
            .find(|e| e.name() == "line")
            .unwrap();
        assert_eq!(line.attr("fill"), Some("#FF0000"));
    }

    #[test]
    fn slice_start_and_offset() {
        let segments = rects(&[30, 70]);
        assert_eq!(source_slice_start(&segments, 0, 800.0), 0.0);
        assert_eq!(source_slice_start(&segments, 1, 800.0), 240.0);
        assert_eq!(segment_offset(&segments, 0, 800.0), 20.0);
        // Segment 1 sits at x=280 and samples from source x=240.
        assert_eq!(segment_offset(&segments, 1, 800.0), 40.0);
    }

    #[test]
    fn transform_order() {
        let origin = Viewport::sized(800.0, 600.0);
        assert_eq!(
            placement_transform(20.0, 1.0, &origin, None),
            "translate(20, 0)"
        );
        assert_eq!(
            placement_transform(20.0, 0.5, &origin, Some("rotate(45)")),
            "translate(20, 0) scale(1, 0.5) rotate(45)"
        );
        assert_eq!(
            placement_transform(-40.0, 1.0, &origin, Some("  ")),
            "translate(-40, 0)"
        );
    }

    #[test]
    fn transform_compensates_offset_view_box_origin() {
        let viewport = Viewport {
            x: 10.0,
            y: -5.0,
            width: 100.0,
            height: 100.0,
        };
        assert_eq!(
            placement_transform(20.0, 1.0, &viewport, Some("scale(2)")),
            "translate(20, 0) translate(-10, 5) scale(2)"
        );
    }

    #[test]
    fn compose_segment_builds_clip_and_group() {
        let doc = SourceDocument::parse(
            r#"<svg viewBox="0 0 800 600"><rect width="800" height="600"/><circle r="5" transform="translate(1,2)"/></svg>"#,
        )
        .unwrap();
        let segments = rects(&[30, 70]);
        let ctx = SegmentContext {
            source: &doc,
            segments: &segments,
            vertical_scale: 1.0,
            output_height: 600.0,
        };
        let mut alloc = IdAllocator::new("t").unwrap();
        let _ = alloc.next_segment();
        let ids = alloc.next_segment();
        let artwork = compose_segment(&ctx, 1, &red(), &ids);

        assert_eq!(artwork.clip_path.attr("id"), Some("clip-part-t-2"));
        let clip_rect = artwork.clip_path.child_elements().next().unwrap();
        assert_eq!(clip_rect.attr("x"), Some("280"));
        assert_eq!(clip_rect.attr("y"), Some("0"));
        assert_eq!(clip_rect.attr("width"), Some("560"));
        assert_eq!(clip_rect.attr("height"), Some("600"));

        assert_eq!(artwork.group.attr("id"), Some("part-t-2"));
        assert_eq!(artwork.group.attr("clip-path"), Some("url(#clip-part-t-2)"));
        let copies: Vec<_> = artwork.group.child_elements().collect();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].attr("transform"), Some("translate(40, 0)"));
        assert_eq!(
            copies[1].attr("transform"),
            Some("translate(40, 0) translate(1,2)")
        );
        assert!(copies.iter().all(|c| c.attr("fill") == Some("#FF0000")));
    }

    #[test]
    fn compose_segment_leaves_source_untouched() {
        let doc = SourceDocument::parse(r#"<svg><path d="M0 0" fill="black"/></svg>"#).unwrap();
        let before = doc.clone();
        let segments = rects(&[50]);
        let ctx = SegmentContext {
            source: &doc,
            segments: &segments,
            vertical_scale: 1.0,
            output_height: 600.0,
        };
        let ids = IdAllocator::new("t").unwrap().next_segment();
        let _ = compose_segment(&ctx, 0, &red(), &ids);
        assert_eq!(doc, before);
    }

    #[test]
    fn hand_built_source_with_offset_origin() {
        let mut attributes = Attributes::new();
        attributes.set("width", 50);
        attributes.set("height", 20);
        let rect = GraphicElement {
            tag: Tag::Shape(ShapeKind::Rect),
            attributes,
            children: Vec::new(),
        };
        let viewport = Viewport {
            x: 100.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        };
        let doc = SourceDocument::from_parts(viewport, vec![rect]);
        let segments = rects(&[30, 70]);
        let ctx = SegmentContext {
            source: &doc,
            segments: &segments,
            vertical_scale: 1.0,
            output_height: 600.0,
        };
        let ids = IdAllocator::new("t").unwrap().next_segment();
        let artwork = compose_segment(&ctx, 1, &red(), &ids);
        let copy = artwork.group.child_elements().next().unwrap();
        assert_eq!(copy.name(), "rect");
        assert_eq!(copy.attr("transform"), Some("translate(40, 0) translate(-100, 0)"));
        assert_eq!(copy.attr("fill"), Some("#FF0000"));
    }

    #[test]
    fn empty_source_yields_empty_clipped_group() {
        let doc = SourceDocument::parse("<svg><defs/></svg>").unwrap();
        let segments = rects(&[40]);
        let ctx = SegmentContext {
            source: &doc,
            segments: &segments,
            vertical_scale: 1.0,
            output_height: 600.0,
        };
        let ids = IdAllocator::new("t").unwrap().next_segment();
        let artwork = compose_segment(&ctx, 0, &red(), &ids);
        assert!(artwork.group.children().is_empty());
        assert!(artwork.group.attr("clip-path").is_some());
    }
}

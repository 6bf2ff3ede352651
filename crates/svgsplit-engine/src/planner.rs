//! Segment planning: split percentages to output-space rectangles.
//!
//! Segments are laid out left to right with a fixed gap between them
//! and a left margin equal to the gap. Each segment is
//! `percentage / 100 × intrinsic_width` wide. Percentages need not sum
//! to 100: every segment samples its own percentage-sized window of the
//! source, starting where the previous segment's window ended.

use crate::types::{SegmentRect, SplitSpec};

/// Compute the placement rectangle of every split, in order.
///
/// `rect[i].x == gap + Σ_{j<i}(rect[j].width + gap)`, so rectangles
/// never overlap and are sorted by ascending `x`.
///
/// # Examples
///
/// ```
/// use svgsplit_engine::SplitSpec;
/// use svgsplit_engine::planner::{plan, total_width};
///
/// let splits = [SplitSpec::new(30).unwrap(), SplitSpec::new(70).unwrap()];
/// let rects = plan(800.0, &splits, 20.0);
/// assert_eq!(rects[1].x, 280.0);
/// assert_eq!(total_width(&rects), 840.0);
/// ```
#[must_use]
pub fn plan(intrinsic_width: f64, splits: &[SplitSpec], gap: f64) -> Vec<SegmentRect> {
    let mut cursor = gap;
    splits
        .iter()
        .map(|split| {
            let width = intrinsic_width * f64::from(split.percentage) / 100.0;
            let rect = SegmentRect {
                x: cursor,
                width,
                percentage: split.percentage,
            };
            cursor += width + gap;
            rect
        })
        .collect()
}

/// Output canvas width: the right edge of the last segment.
///
/// There is no right margin. Returns `0.0` for an empty plan.
#[must_use]
pub fn total_width(rects: &[SegmentRect]) -> f64 {
    rects.last().map_or(0.0, SegmentRect::right)
}

//! Default segment palette.
//!
//! Segments without explicit colors take their fill/stroke pair from
//! this palette by position. The palette cycles past eight segments.

use crate::types::{Color, SegmentColor};

/// Fill/stroke pairs, indexed by segment position.
pub const DEFAULT_PALETTE: [(&str, &str); 8] = [
    ("#FF6B6B", "#C92A2A"), // red
    ("#4ECDC4", "#087F5B"), // teal
    ("#FFD93D", "#F08C00"), // yellow
    ("#A78BFA", "#7C3AED"), // violet
    ("#34D399", "#059669"), // green
    ("#60A5FA", "#2563EB"), // blue
    ("#F472B6", "#DB2777"), // pink
    ("#FB923C", "#EA580C"), // orange
];

/// Default colors for the segment at `index`.
#[must_use]
pub fn default_color(index: usize) -> SegmentColor {
    let (fill, stroke) = DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
    SegmentColor {
        fill: Color(fill.to_owned()),
        stroke: Color(stroke.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_entries_are_valid_colors() {
        for (fill, stroke) in DEFAULT_PALETTE {
            assert!(Color::parse(fill).is_ok(), "bad fill {fill}");
            assert!(Color::parse(stroke).is_ok(), "bad stroke {stroke}");
        }
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(default_color(0), default_color(8));
        assert_eq!(default_color(3), default_color(11));
        assert_eq!(default_color(1).fill.as_str(), "#4ECDC4");
        assert_eq!(default_color(1).stroke.as_str(), "#087F5B");
    }
}

//! svgsplit-engine: Pure SVG split-and-composite engine (sans-IO).
//!
//! Takes a parsed SVG and a list of percentage splits and builds a wider
//! document that tiles clipped, recolored copies of the artwork side by
//! side with bracket-and-label annotations:
//! plan -> clip + recolor -> annotate -> assemble.
//!
//! This crate has **no I/O dependencies** -- it parses in-memory bytes
//! and returns an in-memory document tree. Serialization and
//! rasterization live in `svgsplit-export`.

pub mod annotate;
pub mod clip;
pub mod compose;
pub mod ids;
pub mod palette;
pub mod planner;
pub mod session;
pub mod source;
pub mod splits;
pub mod tree;
pub mod types;
pub mod visit;

pub use compose::{CompositeResult, ResolvedSegment, compose};
pub use session::Session;
pub use source::{SVG_MIME_TYPE, SourceDocument, check_mime};
pub use splits::{add_split, remove_split};
pub use tree::{Element, Node};
pub use types::{
    Color, EngineError, MAX_PERCENTAGE, MAX_SPLITS, MIN_PERCENTAGE, SegmentColor, SegmentRect,
    SplitSpec, StyleParams, UNNAMED_LABEL, Viewport, validate_splits,
};

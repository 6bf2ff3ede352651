//! Document-unique element ids.
//!
//! Ids combine a caller-supplied composition id with a per-composition
//! counter, so two compositions with different ids never produce the
//! same element id even if their documents end up side by side.

use crate::types::EngineError;

/// Ids for the elements generated for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentIds {
    /// `<clipPath>` id.
    pub clip: String,
    /// Artwork group id.
    pub group: String,
    /// Annotation border group id.
    pub border: String,
    /// Annotation text group id.
    pub text: String,
}

impl SegmentIds {
    /// `url(#...)` reference to the clip path.
    #[must_use]
    pub fn clip_url(&self) -> String {
        format!("url(#{})", self.clip)
    }
}

/// Hands out [`SegmentIds`] for one composition, numbered from 1.
#[derive(Debug)]
pub struct IdAllocator {
    composition: String,
    next: usize,
}

impl IdAllocator {
    /// Start a new counter for `composition_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the id is empty or contains
    /// characters other than ASCII alphanumerics, `-` and `_` (it is
    /// embedded in XML ids and `url(#...)` references).
    pub fn new(composition_id: &str) -> Result<Self, EngineError> {
        let valid = !composition_id.is_empty()
            && composition_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EngineError::Validation(format!(
                "composition id {composition_id:?} must be non-empty ASCII alphanumerics, '-' or '_'"
            )));
        }
        Ok(Self {
            composition: composition_id.to_owned(),
            next: 1,
        })
    }

    /// Allocate the ids for the next segment.
    pub fn next_segment(&mut self) -> SegmentIds {
        let n = self.next;
        self.next += 1;
        let comp = &self.composition;
        SegmentIds {
            clip: format!("clip-part-{comp}-{n}"),
            group: format!("part-{comp}-{n}"),
            border: format!("border-part-{comp}-{n}"),
            text: format!("text-part-{comp}-{n}"),
        }
    }
}

//! Caller-owned editing session.
//!
//! Holds the loaded source, the most recent successful composite and the
//! annotation visibility flag. Every failing operation leaves the
//! session exactly as it was.

use tracing::{debug, info, instrument};

use crate::compose::{CompositeResult, compose};
use crate::source::{SourceDocument, check_mime};
use crate::types::{EngineError, SplitSpec, StyleParams};

#[derive(Debug, Clone)]
pub struct Session {
    source: Option<SourceDocument>,
    composite: Option<CompositeResult>,
    generation: u64,
    annotations_visible: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An empty session with annotations visible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: None,
            composite: None,
            generation: 0,
            annotations_visible: true,
        }
    }

    /// Load an uploaded document, replacing any previous one.
    ///
    /// The cached composite is kept; it is only replaced by the next
    /// successful [`preview`](Self::preview).
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidFileType`] if `mime` is not
    /// `image/svg+xml`, [`EngineError::InvalidSvg`] if the bytes do not
    /// parse.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_source(&mut self, bytes: &[u8], mime: &str) -> Result<(), EngineError> {
        check_mime(mime)?;
        let source = SourceDocument::from_bytes(bytes)?;
        info!(
            width = source.viewport().width,
            height = source.viewport().height,
            graphics = source.graphics().len(),
            "source loaded"
        );
        self.source = Some(source);
        Ok(())
    }

    /// Compose a new preview and cache it.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] if no source is loaded or the
    /// parameters are out of range; any error from [`compose`]. The
    /// previously cached composite is kept on failure.
    #[instrument(skip_all)]
    pub fn preview(
        &mut self,
        splits: &[SplitSpec],
        style: &StyleParams,
    ) -> Result<&CompositeResult, EngineError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| EngineError::Validation("no SVG document loaded".to_owned()))?;
        style.validate()?;

        let generation = self.generation + 1;
        let mut result = compose(source, splits, style, &format!("s{generation}"))?;
        result.set_annotations_visible(self.annotations_visible);
        self.generation = generation;
        debug!(generation, "preview cached");
        Ok(self.composite.insert(result))
    }

    /// Flip annotation visibility; returns the new state.
    pub fn toggle_annotations(&mut self) -> bool {
        self.set_annotations_visible(!self.annotations_visible);
        self.annotations_visible
    }

    /// Show or hide annotations on the cached composite and on every
    /// later preview.
    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
        if let Some(composite) = &mut self.composite {
            composite.set_annotations_visible(visible);
        }
    }

    #[must_use]
    pub const fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    #[must_use]
    pub const fn source(&self) -> Option<&SourceDocument> {
        self.source.as_ref()
    }

    /// The most recent successful composite, if any.
    #[must_use]
    pub const fn composite(&self) -> Option<&CompositeResult> {
        self.composite.as_ref()
    }
}

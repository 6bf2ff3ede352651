//! Editing helpers for the split list.

use crate::palette::default_color;
use crate::types::{EngineError, MAX_SPLITS, SegmentColor, SplitSpec};

/// Generated name for the segment at zero-based `index`.
#[must_use]
pub fn default_label(index: usize) -> String {
    format!("第{}部分", index + 1)
}

impl SplitSpec {
    /// The starting layout: 30% and 70% with the first two palette
    /// colors and generated names.
    #[must_use]
    pub fn default_layout() -> Vec<Self> {
        [30, 70]
            .into_iter()
            .enumerate()
            .map(|(index, percentage)| Self {
                percentage,
                label: Some(default_label(index)),
                color: Some(default_color(index)),
            })
            .collect()
    }

    /// The split appended after `existing_count` splits: percentage
    /// `min(50 + 5 × count, 80)`, a generated name and the next palette
    /// color.
    #[must_use]
    pub fn next_default(existing_count: usize) -> Self {
        let step = u8::try_from(existing_count.min(6)).unwrap_or(6);
        Self {
            percentage: (50 + step * 5).min(80),
            label: Some(default_label(existing_count)),
            color: Some(default_color(existing_count)),
        }
    }
}

/// Append [`SplitSpec::next_default`] to `splits` and return a copy of it.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `splits` already holds
/// [`MAX_SPLITS`] entries.
pub fn add_split(splits: &mut Vec<SplitSpec>) -> Result<SplitSpec, EngineError> {
    if splits.len() >= MAX_SPLITS {
        return Err(EngineError::Validation(format!(
            "at most {MAX_SPLITS} split segments are supported"
        )));
    }
    let split = SplitSpec::next_default(splits.len());
    splits.push(split.clone());
    Ok(split)
}

/// Remove the split at `index`.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if `index` is out of range or
/// the split is the only one left.
pub fn remove_split(splits: &mut Vec<SplitSpec>, index: usize) -> Result<SplitSpec, EngineError> {
    if splits.len() <= 1 {
        return Err(EngineError::Validation(
            "at least one split segment must remain".to_owned(),
        ));
    }
    if index >= splits.len() {
        return Err(EngineError::Validation(format!(
            "no split at index {index}, have {}",
            splits.len()
        )));
    }
    Ok(splits.remove(index))
}

/// Colors for every split, taking the palette entry by position where a
/// split has none.
#[must_use]
pub fn resolve_colors(splits: &[SplitSpec]) -> Vec<SegmentColor> {
    splits
        .iter()
        .enumerate()
        .map(|(index, split)| {
            split
                .color
                .clone()
                .unwrap_or_else(|| default_color(index))
        })
        .collect()
}

/// Labels for every split.
///
/// A missing label gets a generated positional name; a blank one becomes
/// [`crate::UNNAMED_LABEL`].
#[must_use]
pub fn resolve_labels(splits: &[SplitSpec]) -> Vec<String> {
    splits
        .iter()
        .enumerate()
        .map(|(index, split)| match split.label.as_deref() {
            None => default_label(index),
            Some(label) if label.trim().is_empty() => crate::UNNAMED_LABEL.to_owned(),
            Some(label) => label.to_owned(),
        })
        .collect()
}

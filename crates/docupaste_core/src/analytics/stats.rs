//! Readability and size statistics for one document body.
//!
//! # Invariants
//! - [`analyze`] is total: every input, including `""`, yields a value.
//! - Reading time is `0` exactly when the word count is `0`.

use serde::{Deserialize, Serialize};

/// Average reading speed used for the reading-time estimate.
pub const WORDS_PER_MINUTE: usize = 225;

/// Derived, non-persisted statistics for a document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub word_count: usize,
    pub char_count: usize,
    pub paragraph_count: usize,
    pub sentence_count: usize,
    pub reading_time_minutes: usize,
}

/// Computes statistics for `content`.
///
/// Sentence detection splits on runs of `.`, `!` and `?`, so abbreviations
/// and decimal numbers count as extra boundaries.
pub fn analyze(content: &str) -> DocumentStats {
    if content.is_empty() {
        return DocumentStats::default();
    }

    let word_count = content.split_whitespace().count();
    let sentence_count = content
        .split(['.', '!', '?'])
        .filter(|sentence| !sentence.trim().is_empty())
        .count();

    DocumentStats {
        word_count,
        char_count: content.chars().count(),
        paragraph_count: paragraphs(content).count(),
        sentence_count,
        reading_time_minutes: reading_time_minutes(word_count),
    }
}

/// Estimated reading time in whole minutes, rounded up.
pub fn reading_time_minutes(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE)
}

/// Non-blank paragraphs of `content`, split on newline runs.
pub(crate) fn paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .filter(|paragraph| !paragraph.trim().is_empty())
}

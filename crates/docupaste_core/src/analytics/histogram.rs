//! Histogram views backing the analytics panel.
//!
//! # Invariants
//! - Word frequency returns at most [`TOP_WORDS_LIMIT`] entries, none shorter
//!   than [`MIN_FREQUENCY_WORD_LEN`] characters.
//! - Paragraph distribution always has one entry per [`ParagraphBucket`].

use super::stats::paragraphs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of words returned by [`word_frequency`].
pub const TOP_WORDS_LIMIT: usize = 10;
/// Words must be strictly longer than this to be counted.
const MAX_IGNORED_WORD_LEN: usize = 3;
/// Shortest word length included in the frequency view.
pub const MIN_FREQUENCY_WORD_LEN: usize = MAX_IGNORED_WORD_LEN + 1;

// ASCII word characters only; everything else that is not whitespace is dropped.
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid non-word regex"));

/// One entry of the word-frequency view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Paragraph length range, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphBucket {
    /// Fewer than 50 characters.
    VeryShort,
    /// 50 to 99 characters.
    Short,
    /// 100 to 199 characters.
    Medium,
    /// 200 to 399 characters.
    Long,
    /// 400 characters or more.
    VeryLong,
}

impl ParagraphBucket {
    /// Every bucket in ascending length order.
    pub const ALL: [ParagraphBucket; 5] = [
        Self::VeryShort,
        Self::Short,
        Self::Medium,
        Self::Long,
        Self::VeryLong,
    ];

    /// Bucket containing a paragraph of `len` characters.
    pub fn for_length(len: usize) -> Self {
        match len {
            0..=49 => Self::VeryShort,
            50..=99 => Self::Short,
            100..=199 => Self::Medium,
            200..=399 => Self::Long,
            _ => Self::VeryLong,
        }
    }

    /// Display label used by the chart axis.
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryShort => "Very Short (< 50)",
            Self::Short => "Short (50-100)",
            Self::Medium => "Medium (100-200)",
            Self::Long => "Long (200-400)",
            Self::VeryLong => "Very Long (> 400)",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::VeryShort => 0,
            Self::Short => 1,
            Self::Medium => 2,
            Self::Long => 3,
            Self::VeryLong => 4,
        }
    }
}

/// Paragraph count for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: ParagraphBucket,
    pub count: usize,
}

/// Top words of `content` by occurrence count.
///
/// Ties keep first-seen order.
pub fn word_frequency(content: &str) -> Vec<WordCount> {
    if content.is_empty() {
        return Vec::new();
    }

    let lowered = content.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for word in stripped
        .split_whitespace()
        .filter(|word| word.chars().count() > MAX_IGNORED_WORD_LEN)
    {
        match positions.get(word) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(word, counts.len());
                counts.push((word, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_WORDS_LIMIT)
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
        })
        .collect()
}

/// Paragraph counts per length bucket, always five entries.
pub fn paragraph_distribution(content: &str) -> Vec<BucketCount> {
    let mut counts = [0usize; 5];
    for paragraph in paragraphs(content) {
        counts[ParagraphBucket::for_length(paragraph.chars().count()).index()] += 1;
    }

    ParagraphBucket::ALL
        .iter()
        .map(|&bucket| BucketCount {
            bucket,
            count: counts[bucket.index()],
        })
        .collect()
}

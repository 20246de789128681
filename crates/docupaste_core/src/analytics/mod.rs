//! Text analytics for document bodies.
//!
//! # Responsibility
//! - Compute size/readability statistics and histogram views from raw text.
//!
//! # Invariants
//! - Every function here is pure and total over `&str`.

pub mod histogram;
pub mod stats;

use histogram::{paragraph_distribution, word_frequency, BucketCount, WordCount};
use serde::{Deserialize, Serialize};
use stats::{analyze, DocumentStats};

/// Everything the analytics view renders for one document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalytics {
    pub stats: DocumentStats,
    pub word_frequency: Vec<WordCount>,
    pub paragraph_distribution: Vec<BucketCount>,
}

impl DocumentAnalytics {
    pub fn compute(content: &str) -> Self {
        Self {
            stats: analyze(content),
            word_frequency: word_frequency(content),
            paragraph_distribution: paragraph_distribution(content),
        }
    }
}

//! Linear substring search over the document sequence.
//!
//! # Responsibility
//! - Match documents by case-insensitive substring on title or content.
//! - Shape result-list projections with snippet and highlight markup.
//!
//! # Invariants
//! - Blank (empty or whitespace-only) queries match nothing.
//! - Results keep the input order; there is no ranking.
//! - The query is matched as given, surrounding whitespace included.

use super::highlight::{highlight, snippet_around};
use crate::model::document::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// Result-list entry for one matching document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub title: String,
    /// Plain-text context window around the first content match.
    pub snippet: String,
    /// `snippet` with every match wrapped in emphasis markup.
    pub highlighted: String,
}

/// Returns the lowercase needle for `query`, or `None` for blank queries.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Whether `document` contains the lowercase `needle` in title or content.
pub fn document_matches(document: &Document, needle: &str) -> bool {
    document.title.to_lowercase().contains(needle)
        || document.content.to_lowercase().contains(needle)
}

/// Filters `documents` down to those matching `query`, in input order.
pub fn search_documents<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };
    documents
        .iter()
        .filter(|document| document_matches(document, &needle))
        .collect()
}

/// Runs [`search_documents`] and projects each match into a [`SearchHit`].
pub fn search_hits(documents: &[Document], query: &str) -> Vec<SearchHit> {
    search_documents(documents, query)
        .into_iter()
        .map(|document| {
            let snippet = snippet_around(&document.content, query);
            SearchHit {
                id: document.id.clone(),
                title: document.title.clone(),
                highlighted: highlight(&snippet, query),
                snippet,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_query, search_documents, search_hits};
    use crate::model::document::Document;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("Groceries", "buy milk and eggs"),
            Document::new("Poem", "The MILKY way"),
            Document::new("Milk notes", "nothing here"),
        ]
    }

    #[test]
    fn blank_queries_are_rejected() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query(" \t\n"), None);
        assert_eq!(normalize_query("Ab").as_deref(), Some("ab"));
    }

    #[test]
    fn matches_title_or_content_in_order() {
        let docs = docs();
        let titles: Vec<_> = search_documents(&docs, "milk")
            .into_iter()
            .map(|doc| doc.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Groceries", "Poem", "Milk notes"]);
    }

    #[test]
    fn query_whitespace_is_significant() {
        let docs = docs();
        assert_eq!(search_documents(&docs, " milk ").len(), 1);
    }

    #[test]
    fn hits_carry_snippet_and_markup() {
        let docs = docs();
        let hits = search_hits(&docs, "eggs");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].snippet, "buy milk and eggs");
        assert!(hits[0].highlighted.contains(">eggs</span>"));
    }
}

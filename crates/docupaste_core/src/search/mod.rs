//! Document search entry points.
//!
//! # Responsibility
//! - Scan the document sequence at query time; no separate index exists.
//! - Keep result shaping (snippets, highlight markup) inside core.

pub mod highlight;
pub mod substring;

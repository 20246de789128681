//! Domain model for the document manager.
//!
//! # Responsibility
//! - Define the persisted `Document` record and its lifecycle helpers.
//!
//! # Invariants
//! - Every document is identified by a stable `DocumentId`.
//! - Deletion is a hard removal from the store sequence.

pub mod document;

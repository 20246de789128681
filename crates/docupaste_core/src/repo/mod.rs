//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract the document store persists through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport failures; they never swallow them.

pub mod kv_repo;

//! Core domain logic for DocuPaste.
//! This crate is the single source of truth for document-store invariants,
//! search semantics and text statistics.

pub mod analytics;
pub mod config;
pub mod db;
pub mod debounce;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use analytics::histogram::{
    paragraph_distribution, word_frequency, BucketCount, ParagraphBucket, WordCount,
};
pub use analytics::stats::{analyze, DocumentStats};
pub use analytics::DocumentAnalytics;
pub use config::{DebounceConfig, StoreConfig};
pub use debounce::{DeferredTask, StatsDebouncer};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, DocumentId, DocumentValidationError};
pub use repo::kv_repo::{
    KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository,
};
pub use search::highlight::{highlight, snippet_around};
pub use search::substring::{search_documents, search_hits, SearchHit};
pub use service::document_store::{
    DocumentStore, LoadSource, StoreError, StoreEvent, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

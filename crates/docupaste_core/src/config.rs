//! Runtime configuration for the store and the stats debouncer.
//!
//! # Invariants
//! - `documents_key` and `current_key` must be distinct; the store checks
//!   this when loading.

use std::time::Duration;

/// Storage key of the serialized document sequence.
pub const DEFAULT_DOCUMENTS_KEY: &str = "docupaste-documents";
/// Storage key of the serialized current-document snapshot.
pub const DEFAULT_CURRENT_KEY: &str = "docupaste-current-document";
/// Idle window before a pending stats recomputation runs.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Storage keys used by [`crate::DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub documents_key: String,
    pub current_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            documents_key: DEFAULT_DOCUMENTS_KEY.to_string(),
            current_key: DEFAULT_CURRENT_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Prefixes both default keys, so several stores can share one backend.
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            documents_key: format!("{namespace}:{DEFAULT_DOCUMENTS_KEY}"),
            current_key: format!("{namespace}:{DEFAULT_CURRENT_KEY}"),
        }
    }
}

/// Timing for [`crate::StatsDebouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub window: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

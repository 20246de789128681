//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level document functions to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every store call runs load → operate → persist under one process-wide
//!   lock, so concurrent callers never overwrite each other's writes.

use docupaste_core::db::open_db;
use docupaste_core::{
    core_version as core_version_inner, highlight, init_logging as init_logging_inner,
    ping as ping_inner, Document, DocumentAnalytics, DocumentStore, SearchHit,
    SqliteKvRepository, StoreConfig,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const STORE_DB_FILE_NAME: &str = "docupaste_store.sqlite3";
const STORE_DB_PATH_ENV: &str = "DOCUPASTE_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the store database path for this process.
///
/// # FFI contract
/// - Must be called before the first document call to take effect.
/// - Returns empty string on success; an error message when the path is
///   blank or a different path is already active.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Document record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// ISO-8601 last-update timestamp.
    pub updated_at: String,
}

/// Full store snapshot for sidebar rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListResponse {
    pub ok: bool,
    pub items: Vec<DocumentItem>,
    pub current_id: Option<String>,
    pub message: String,
}

/// Result envelope for single-document commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentActionResponse {
    pub ok: bool,
    /// Whether the target id existed (always `true` for create).
    pub found: bool,
    /// Affected document after the command, when one exists.
    pub document: Option<DocumentItem>,
    pub message: String,
}

impl DocumentActionResponse {
    fn success(message: impl Into<String>, found: bool, document: Option<DocumentItem>) -> Self {
        Self {
            ok: true,
            found,
            document,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            found: false,
            document: None,
            message: message.into(),
        }
    }
}

/// One search result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    /// Pre-formatted markup; render as HTML, do not escape again.
    pub highlighted_snippet: String,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    pub message: String,
}

/// Word-frequency entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCountItem {
    pub word: String,
    pub count: u32,
}

/// Paragraph-length bucket entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketItem {
    pub label: String,
    pub count: u32,
}

/// Statistics and chart data for the analytics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsResponse {
    pub word_count: u32,
    pub char_count: u32,
    pub paragraph_count: u32,
    pub sentence_count: u32,
    pub reading_time_minutes: u32,
    pub top_words: Vec<WordCountItem>,
    pub paragraph_buckets: Vec<BucketItem>,
}

/// Lists every document plus the current selection.
#[flutter_rust_bridge::frb(sync)]
pub fn document_list() -> DocumentListResponse {
    match with_store(|store| {
        Ok((
            store.list().iter().map(to_document_item).collect::<Vec<_>>(),
            store.current().map(|current| current.id.clone()),
        ))
    }) {
        Ok((items, current_id)) => DocumentListResponse {
            ok: true,
            message: format!("{} document(s).", items.len()),
            items,
            current_id,
        },
        Err(err) => DocumentListResponse {
            ok: false,
            items: Vec::new(),
            current_id: None,
            message: format!("document_list failed: {err}"),
        },
    }
}

/// Returns the current document snapshot, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn document_current() -> DocumentActionResponse {
    match with_store(|store| Ok(store.current().map(to_document_item))) {
        Ok(Some(item)) => DocumentActionResponse::success("Current document.", true, Some(item)),
        Ok(None) => DocumentActionResponse::success("No document selected.", false, None),
        Err(err) => DocumentActionResponse::failure(format!("document_current failed: {err}")),
    }
}

/// Creates a document and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn document_create(title: String, content: String) -> DocumentActionResponse {
    match with_store(|store| store.create(title, content)) {
        Ok(document) => DocumentActionResponse::success(
            "Document created.",
            true,
            Some(to_document_item(&document)),
        ),
        Err(err) => DocumentActionResponse::failure(format!("document_create failed: {err}")),
    }
}

/// Saves title and content of an existing document.
///
/// Unknown ids succeed with `found=false` and change nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn document_update(id: String, title: String, content: String) -> DocumentActionResponse {
    match with_store(|store| {
        let found = store.update(&id, title, content)?;
        Ok((found, store.get(&id).map(to_document_item)))
    }) {
        Ok((true, document)) => DocumentActionResponse::success("Document saved.", true, document),
        Ok((false, _)) => DocumentActionResponse::success("Document not found.", false, None),
        Err(err) => DocumentActionResponse::failure(format!("document_update failed: {err}")),
    }
}

/// Deletes a document; returns the new current document in `document`.
#[flutter_rust_bridge::frb(sync)]
pub fn document_delete(id: String) -> DocumentActionResponse {
    match with_store(|store| {
        let found = store.delete(&id)?;
        Ok((found, store.current().map(to_document_item)))
    }) {
        Ok((true, current)) => DocumentActionResponse::success("Document deleted.", true, current),
        Ok((false, current)) => {
            DocumentActionResponse::success("Document not found.", false, current)
        }
        Err(err) => DocumentActionResponse::failure(format!("document_delete failed: {err}")),
    }
}

/// Selects a stored document by id, or clears the selection for `None`.
///
/// Selecting an unknown id is reported with `found=false` and leaves the
/// selection unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn document_select(id: Option<String>) -> DocumentActionResponse {
    match with_store(|store| match id.as_deref() {
        None => {
            store.set_current(None)?;
            Ok((true, None))
        }
        Some(id) => match store.get(id).cloned() {
            Some(document) => {
                let item = to_document_item(&document);
                store.set_current(Some(document))?;
                Ok((true, Some(item)))
            }
            None => Ok((false, None)),
        },
    }) {
        Ok((true, document)) => {
            DocumentActionResponse::success("Selection updated.", true, document)
        }
        Ok((false, _)) => DocumentActionResponse::success("Document not found.", false, None),
        Err(err) => DocumentActionResponse::failure(format!("document_select failed: {err}")),
    }
}

/// Case-insensitive substring search over titles and contents.
#[flutter_rust_bridge::frb(sync)]
pub fn document_search(query: String) -> SearchResponse {
    match with_store(|store| Ok(store.search_hits(&query))) {
        Ok(hits) => {
            let items = hits.into_iter().map(to_search_item).collect::<Vec<_>>();
            let message = match items.len() {
                0 => "No results.".to_string(),
                1 => "1 match".to_string(),
                count => format!("{count} matches"),
            };
            SearchResponse { items, message }
        }
        Err(err) => SearchResponse {
            items: Vec::new(),
            message: format!("document_search failed: {err}"),
        },
    }
}

/// Computes statistics and chart data for raw editor text.
///
/// # FFI contract
/// - Pure computation; does not touch storage.
#[flutter_rust_bridge::frb(sync)]
pub fn document_analyze(content: String) -> AnalyticsResponse {
    let analytics = DocumentAnalytics::compute(&content);
    AnalyticsResponse {
        word_count: saturating_u32(analytics.stats.word_count),
        char_count: saturating_u32(analytics.stats.char_count),
        paragraph_count: saturating_u32(analytics.stats.paragraph_count),
        sentence_count: saturating_u32(analytics.stats.sentence_count),
        reading_time_minutes: saturating_u32(analytics.stats.reading_time_minutes),
        top_words: analytics
            .word_frequency
            .into_iter()
            .map(|entry| WordCountItem {
                word: entry.word,
                count: saturating_u32(entry.count),
            })
            .collect(),
        paragraph_buckets: analytics
            .paragraph_distribution
            .into_iter()
            .map(|entry| BucketItem {
                label: entry.bucket.label().to_string(),
                count: saturating_u32(entry.count),
            })
            .collect(),
    }
}

/// Wraps matches of `term` in `snippet` with emphasis markup.
#[flutter_rust_bridge::frb(sync)]
pub fn highlight_snippet(snippet: String, term: String) -> String {
    highlight(&snippet, &term)
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(
        &mut DocumentStore<SqliteKvRepository<'_>>,
    ) -> docupaste_core::StoreResult<T>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().map_err(|_| {
        warn!("event=ffi_store module=ffi status=error error_code=lock_poisoned");
        "store lock poisoned".to_string()
    })?;
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let repo = SqliteKvRepository::try_new(&conn)
        .map_err(|err| format!("store repo init failed: {err}"))?;
    let mut store = DocumentStore::load(repo, StoreConfig::default())
        .map_err(|err| format!("store load failed: {err}"))?;
    f(&mut store).map_err(|err| err.to_string())
}

fn to_document_item(document: &Document) -> DocumentItem {
    DocumentItem {
        id: document.id.clone(),
        title: document.title.clone(),
        content: document.content.clone(),
        created_at: document.created_at.to_rfc3339(),
        updated_at: document.updated_at.to_rfc3339(),
    }
}

fn to_search_item(hit: SearchHit) -> SearchItem {
    SearchItem {
        id: hit.id,
        title: hit.title,
        highlighted_snippet: hit.highlighted,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

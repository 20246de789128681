//! Document store use-case service.
//!
//! # Responsibility
//! - Own the ordered document sequence and the current-document snapshot.
//! - Be the only writer of persisted document state.
//! - Notify subscribers after every state change.
//!
//! # Invariants
//! - Document ids are unique within the sequence.
//! - Newly created documents are appended and become current.
//! - Deleting the current document moves current to the first remaining
//!   document, or clears it when none remain.
//! - In-memory state is mutated before persistence; when a write fails the
//!   in-memory state stays authoritative and the error is returned.
//! - Unknown ids on update/delete never mutate anything.
//! - A cleared selection is persisted as JSON `null`; only a missing current
//!   key falls back to the first document on load.

use crate::config::StoreConfig;
use crate::model::document::{Document, DocumentId, DocumentValidationError};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::search::substring::{search_documents, search_hits, SearchHit};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error.
#[derive(Debug)]
pub enum StoreError {
    /// Durable storage rejected a read or write.
    Repo(RepoError),
    /// State could not be encoded for persistence.
    Encode(serde_json::Error),
    /// Both state values were configured under the same key.
    KeyCollision(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document state: {err}"),
            Self::KeyCollision(key) => {
                write!(f, "documents and current snapshot share storage key `{key}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::KeyCollision(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Change notification emitted after each state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created { id: DocumentId },
    Updated { id: DocumentId },
    Deleted { id: DocumentId },
    CurrentChanged { id: Option<DocumentId> },
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Where the initial state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// Nothing was stored yet.
    Bootstrap,
    /// Stored state could not be decoded and was replaced.
    Recovered,
}

impl LoadSource {
    fn label(self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Bootstrap => "bootstrap",
            Self::Recovered => "recovered",
        }
    }
}

/// Authoritative owner of all documents and the current selection.
pub struct DocumentStore<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    documents: Vec<Document>,
    current: Option<Document>,
    listeners: Vec<Listener>,
    load_source: LoadSource,
}

impl<R: KvRepository> DocumentStore<R> {
    /// Loads persisted state from `repo`, or seeds the welcome document.
    ///
    /// # Errors
    /// - `KeyCollision` when both keys in `config` are equal.
    /// - `Repo` when storage cannot be read, or the seeded state cannot be
    ///   written.
    pub fn load(repo: R, config: StoreConfig) -> StoreResult<Self> {
        if config.documents_key == config.current_key {
            return Err(StoreError::KeyCollision(config.documents_key));
        }

        let persisted = repo.get_value(&config.documents_key)?;
        let mut store = Self {
            repo,
            config,
            documents: Vec::new(),
            current: None,
            listeners: Vec::new(),
            load_source: LoadSource::Bootstrap,
        };

        match persisted.as_deref().map(decode_documents) {
            Some(Ok(documents)) => {
                store.documents = documents;
                store.current = store.load_current()?;
                store.load_source = LoadSource::Persisted;
            }
            Some(Err(reason)) => {
                warn!(
                    "event=store_load module=store status=fallback error_code=malformed_state reason={}",
                    reason
                );
                store.load_source = LoadSource::Recovered;
                store.seed_welcome()?;
            }
            None => store.seed_welcome()?,
        }

        info!(
            "event=store_load module=store status=ok source={} documents={} has_current={}",
            store.load_source.label(),
            store.documents.len(),
            store.current.is_some()
        );
        Ok(store)
    }

    /// Appends a new document and makes it current.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Document> {
        let document = Document::new(title, content);
        self.documents.push(document.clone());
        self.current = Some(document.clone());

        self.emit(StoreEvent::Created {
            id: document.id.clone(),
        });
        self.emit(StoreEvent::CurrentChanged {
            id: Some(document.id.clone()),
        });

        self.persist_documents()?;
        self.persist_current()?;
        info!(
            "event=document_create module=store status=ok documents={}",
            self.documents.len()
        );
        Ok(document)
    }

    /// Replaces title and content of document `id`.
    ///
    /// Returns `false` without touching any state when `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<bool> {
        let Some(document) = self.documents.iter_mut().find(|document| document.id == id) else {
            debug!("event=document_update module=store status=not_found");
            return Ok(false);
        };
        document.replace_body(title, content);
        let snapshot = document.clone();

        let current_refreshed = match self.current.as_mut() {
            Some(current) if current.id == id => {
                *current = snapshot;
                true
            }
            _ => false,
        };

        self.emit(StoreEvent::Updated { id: id.to_string() });
        self.persist_documents()?;
        if current_refreshed {
            self.persist_current()?;
        }
        info!(
            "event=document_update module=store status=ok current_refreshed={}",
            current_refreshed
        );
        Ok(true)
    }

    /// Removes document `id`.
    ///
    /// Returns `false` without touching any state when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.documents.iter().position(|document| document.id == id) else {
            debug!("event=document_delete module=store status=not_found");
            return Ok(false);
        };
        self.documents.remove(index);
        self.emit(StoreEvent::Deleted { id: id.to_string() });

        let current_removed = self
            .current
            .as_ref()
            .is_some_and(|current| current.id == id);
        if current_removed {
            self.current = self.documents.first().cloned();
            self.emit(StoreEvent::CurrentChanged {
                id: self.current.as_ref().map(|current| current.id.clone()),
            });
        }

        self.persist_documents()?;
        if current_removed {
            self.persist_current()?;
        }
        info!(
            "event=document_delete module=store status=ok documents={} current_moved={}",
            self.documents.len(),
            current_removed
        );
        Ok(true)
    }

    /// Sets or clears the current snapshot.
    ///
    /// Membership is not checked; callers pass values read from this store.
    pub fn set_current(&mut self, document: Option<Document>) -> StoreResult<()> {
        self.current = document;
        self.emit(StoreEvent::CurrentChanged {
            id: self.current.as_ref().map(|current| current.id.clone()),
        });
        self.persist_current()
    }

    /// Documents whose title or content contains `query`, case-insensitively.
    ///
    /// Blank queries return nothing. Order is sequence order.
    pub fn search(&self, query: &str) -> Vec<Document> {
        search_documents(&self.documents, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Search results projected for the result list.
    pub fn search_hits(&self, query: &str) -> Vec<SearchHit> {
        search_hits(&self.documents, query)
    }

    /// All documents in sequence order.
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read access to the backing repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Registers a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Rewrites the full sequence and the current snapshot.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.persist_documents()?;
        self.persist_current()
    }

    /// Flushes state and hands back the repository.
    pub fn close(mut self) -> StoreResult<R> {
        self.flush()?;
        Ok(self.repo)
    }

    fn seed_welcome(&mut self) -> StoreResult<()> {
        let welcome = Document::welcome();
        self.documents = vec![welcome.clone()];
        self.current = Some(welcome);
        self.persist_documents()?;
        self.persist_current()
    }

    fn load_current(&self) -> StoreResult<Option<Document>> {
        let Some(raw) = self.repo.get_value(&self.config.current_key)? else {
            return Ok(self.documents.first().cloned());
        };
        // A stored `null` is an explicitly cleared selection.
        match serde_json::from_str::<Option<Document>>(&raw) {
            Ok(document) => Ok(document),
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback error_code=malformed_current error={}",
                    err
                );
                Ok(self.documents.first().cloned())
            }
        }
    }

    fn persist_documents(&mut self) -> StoreResult<()> {
        let encoded = serde_json::to_string(&self.documents)?;
        self.repo
            .set_value(&self.config.documents_key, &encoded)
            .map_err(|err| log_write_failure("documents", err))
    }

    fn persist_current(&mut self) -> StoreResult<()> {
        let encoded = serde_json::to_string(&self.current)?;
        self.repo
            .set_value(&self.config.current_key, &encoded)
            .map_err(|err| log_write_failure("current", err))
    }

    fn emit(&mut self, event: StoreEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

fn log_write_failure(target: &str, err: RepoError) -> StoreError {
    warn!(
        "event=store_persist module=store status=error target={} error={}",
        target, err
    );
    StoreError::Repo(err)
}

fn decode_documents(raw: &str) -> Result<Vec<Document>, String> {
    let documents: Vec<Document> = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    let mut seen = HashSet::new();
    for document in &documents {
        document
            .validate()
            .map_err(|err: DocumentValidationError| err.to_string())?;
        if !seen.insert(document.id.as_str()) {
            return Err(format!("duplicate document id `{}`", document.id));
        }
    }
    Ok(documents)
}

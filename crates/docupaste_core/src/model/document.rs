//! Document domain model.
//!
//! # Responsibility
//! - Define the single persisted record managed by the document store.
//! - Own timestamp bookkeeping for create/update lifecycle.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another document.
//! - `updated_at >= created_at` always holds.
//! - Every call to [`Document::replace_body`] strictly advances `updated_at`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque document identifier.
///
/// Generated ids are UUID v4 strings, but persisted state written by older
/// clients may carry arbitrary non-empty strings, so the type stays textual.
pub type DocumentId = String;

/// Id used by the synthesized welcome document.
pub const WELCOME_DOCUMENT_ID: &str = "1";
/// Title of the synthesized welcome document.
pub const WELCOME_DOCUMENT_TITLE: &str = "Welcome to DocuPaste";
/// Body of the synthesized welcome document.
pub const WELCOME_DOCUMENT_CONTENT: &str = "Paste your content here to analyze and search through it. Your documents will be saved automatically.";

/// Validation failures for persisted or caller-provided documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// The id is empty after trimming.
    EmptyId,
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated { id: DocumentId },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "document id cannot be empty"),
            Self::UpdatedBeforeCreated { id } => {
                write!(f, "document `{id}` has updatedAt earlier than createdAt")
            }
        }
    }
}

impl Error for DocumentValidationError {}

/// A titled, timestamped unit of plain-text user content.
///
/// Serialized with camelCase field names and ISO-8601 timestamps, which is
/// the persisted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates a document with a fresh UUID and `created_at == updated_at == now`.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, content, Utc::now())
    }

    /// Creates a document with a caller-provided id and creation instant.
    pub fn with_id(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Builds the single document seeded into an empty or unreadable store.
    pub fn welcome() -> Self {
        Self::with_id(
            WELCOME_DOCUMENT_ID,
            WELCOME_DOCUMENT_TITLE,
            WELCOME_DOCUMENT_CONTENT,
            Utc::now(),
        )
    }

    /// Replaces title and content and advances `updated_at`.
    ///
    /// The new timestamp is the current wall clock when it is later than the
    /// previous value, otherwise the previous value plus one millisecond.
    pub fn replace_body(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.updated_at = next_timestamp(self.updated_at, Utc::now());
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.id.trim().is_empty() {
            return Err(DocumentValidationError::EmptyId);
        }
        if self.updated_at < self.created_at {
            return Err(DocumentValidationError::UpdatedBeforeCreated {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::milliseconds(1)
    }
}

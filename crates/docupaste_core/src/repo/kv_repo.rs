//! Key-value repository contracts and implementations.
//!
//! # Responsibility
//! - Provide the local durable storage contract: text values by fixed key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A successful `set_value` replaces the whole value for that key.
//! - A write is one statement; readers never observe a partial value.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was opened without the required schema.
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Write rejected because the backing store ran out of room.
    QuotaExceeded { key: String, limit_bytes: usize },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage table `{table}` is missing; run migrations first")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "storage column `{table}.{column}` is missing")
            }
            Self::QuotaExceeded { key, limit_bytes } => write!(
                f,
                "storage quota of {limit_bytes} bytes exceeded while writing `{key}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable text storage addressed by key.
pub trait KvRepository {
    /// Reads the value stored under `key`.
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&mut self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key`. Returns whether a value was present.
    fn remove_value(&mut self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key-value repository over the `kv_entries` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   connection was not bootstrapped through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_kv_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_value(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&mut self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Process-local key-value repository.
///
/// Backs ephemeral sessions and tests. An optional byte quota mimics the
/// limits of browser-style local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvRepository {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository rejecting writes once keys plus values exceed
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KvRepository for MemoryKvRepository {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_value(&mut self, key: &str, value: &str) -> RepoResult<()> {
        if let Some(limit_bytes) = self.quota_bytes {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let projected = self.used_bytes() - replaced + key.len() + value.len();
            if projected > limit_bytes {
                return Err(RepoError::QuotaExceeded {
                    key: key.to_string(),
                    limit_bytes,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_value(&mut self, key: &str) -> RepoResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

fn ensure_kv_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "kv_entries")? {
        return Err(RepoError::MissingRequiredTable("kv_entries"));
    }

    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "kv_entries", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_entries",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{KvRepository, MemoryKvRepository, RepoError};

    #[test]
    fn memory_repo_replaces_and_removes_values() {
        let mut repo = MemoryKvRepository::new();
        repo.set_value("k", "one").unwrap();
        repo.set_value("k", "two").unwrap();
        assert_eq!(repo.get_value("k").unwrap().as_deref(), Some("two"));
        assert!(repo.remove_value("k").unwrap());
        assert!(!repo.remove_value("k").unwrap());
        assert_eq!(repo.get_value("k").unwrap(), None);
    }

    #[test]
    fn memory_repo_quota_counts_replaced_value_once() {
        let mut repo = MemoryKvRepository::with_quota(8);
        repo.set_value("k", "1234567").unwrap();
        repo.set_value("k", "abcdefg").unwrap();
        let err = repo.set_value("k", "abcdefgh").unwrap_err();
        assert!(matches!(err, RepoError::QuotaExceeded { limit_bytes: 8, .. }));
        assert_eq!(repo.get_value("k").unwrap().as_deref(), Some("abcdefg"));
    }
}

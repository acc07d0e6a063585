//! # specie-store: Coin Persistence
//!
//! One SQLite table, `records`, keyed by storage key. The contract is
//! deliberately narrow:
//!
//! - [`CoinStore::put`] is an idempotent insert. A second insert under the
//!   same key is a no-op success and the existing row is untouched, which
//!   makes minting safe to retry end to end.
//! - [`CoinStore::get`] returns only rows still marked valid. Unknown and
//!   soft-invalidated keys read as absent, never as errors.
//! - [`CoinStore::invalidate`] flips the `valid` flag. Rows are never
//!   deleted.
//!
//! The schema is created lazily on first touch. Every operation opens and
//! releases its own connection: callers are request-scoped and synchronous,
//! and no connection or transaction spans components. The store value
//! itself is just the database path, cheap to clone and share.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error talking to the backing store. Terminal for the operation; the
/// caller aborts and surfaces it. No automatic retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened or its parent directory created.
    #[error("cannot open store at '{path}': {reason}")]
    Unavailable {
        /// The database path.
        path: String,
        /// Why opening failed.
        reason: String,
    },

    /// A statement failed.
    #[error("store operation failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Creating the database directory failed.
    #[error("cannot create store directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One persisted row, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// The fingerprint the record is keyed by.
    pub storage_key: String,
    /// Country code of the minting jurisdiction.
    pub jurisdiction: String,
    /// The sealed payload, base64.
    pub ciphertext: String,
    /// Day the row was inserted (database clock).
    pub created_at: NaiveDate,
    /// False once soft-invalidated.
    pub valid: bool,
}

/// Handle to the records database.
#[derive(Debug, Clone)]
pub struct CoinStore {
    db_path: PathBuf,
}

impl CoinStore {
    /// A store over the database file at `db_path`. Nothing is touched on
    /// disk until the first operation.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// The database file path.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Insert a record, idempotently.
    ///
    /// Returns `true` if a new row was written, `false` if the key already
    /// existed (which is still success; the stored row is left untouched).
    pub fn put(
        &self,
        storage_key: &str,
        jurisdiction: &str,
        ciphertext: &str,
    ) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO records (storage_key, jurisdiction, ciphertext) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![storage_key, jurisdiction, ciphertext],
        )?;
        debug!(storage_key, jurisdiction, inserted = inserted > 0, "put record");
        Ok(inserted > 0)
    }

    /// The ciphertext stored under `storage_key`, if the key is known and
    /// still valid.
    pub fn get(&self, storage_key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect()?;
        let ciphertext = conn
            .query_row(
                "SELECT ciphertext FROM records WHERE storage_key = ?1 AND valid = 1",
                [storage_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ciphertext)
    }

    /// The full row under `storage_key`, regardless of validity. Intended
    /// for operational inspection, not the read path.
    pub fn record(&self, storage_key: &str) -> Result<Option<EncryptedRecord>, StoreError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                "SELECT storage_key, jurisdiction, ciphertext, created_at, valid \
                 FROM records WHERE storage_key = ?1",
                [storage_key],
                |row| {
                    Ok(EncryptedRecord {
                        storage_key: row.get(0)?,
                        jurisdiction: row.get(1)?,
                        ciphertext: row.get(2)?,
                        created_at: row.get(3)?,
                        valid: row.get::<_, i64>(4)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Soft-invalidate a record. Returns `true` if a valid row was
    /// invalidated, `false` if the key was unknown or already invalid.
    pub fn invalidate(&self, storage_key: &str) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE records SET valid = 0 WHERE storage_key = ?1 AND valid = 1",
            [storage_key],
        )?;
        debug!(storage_key, invalidated = updated > 0, "invalidate record");
        Ok(updated > 0)
    }

    /// Number of rows, valid or not.
    pub fn len(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when the store holds no rows.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Open a connection and make sure the schema exists. One connection
    /// per operation; it is released when dropped, on every exit path.
    fn connect(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.db_path).map_err(|e| StoreError::Unavailable {
            path: self.db_path.display().to_string(),
            reason: e.to_string(),
        })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                storage_key   TEXT PRIMARY KEY,
                jurisdiction  TEXT,
                ciphertext    TEXT,
                created_at    DATE DEFAULT CURRENT_DATE,
                valid         INT  DEFAULT 1
            )",
        )?;

        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CoinStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CoinStore::new(dir.path().join("silo").join("coins.db"));
        (dir, store)
    }

    #[test]
    fn creates_schema_lazily_in_missing_directory() {
        let (_dir, store) = store();
        assert!(!store.db_path().exists());
        assert!(store.is_empty().unwrap());
        assert!(store.db_path().exists());
    }

    #[test]
    fn put_then_get_round_trips() {
        let (_dir, store) = store();
        assert!(store.put("key-1", "KE", "ciphertext-1").unwrap());
        assert_eq!(store.get("key-1").unwrap().as_deref(), Some("ciphertext-1"));
    }

    #[test]
    fn duplicate_put_is_a_noop_success() {
        let (_dir, store) = store();
        assert!(store.put("key-1", "KE", "original").unwrap());
        // Second insert reports no new row and leaves the original intact.
        assert!(!store.put("key-1", "KE", "replacement").unwrap());
        assert_eq!(store.get("key-1").unwrap().as_deref(), Some("original"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn unknown_key_reads_absent() {
        let (_dir, store) = store();
        assert_eq!(store.get("no-such-key").unwrap(), None);
    }

    #[test]
    fn invalidated_key_reads_absent_but_row_remains() {
        let (_dir, store) = store();
        store.put("key-1", "KE", "ciphertext-1").unwrap();
        assert!(store.invalidate("key-1").unwrap());
        assert_eq!(store.get("key-1").unwrap(), None);

        // Soft invalidation: the row is still there.
        let record = store.record("key-1").unwrap().unwrap();
        assert!(!record.valid);
        assert_eq!(record.ciphertext, "ciphertext-1");
    }

    #[test]
    fn invalidate_unknown_key_is_false_not_error() {
        let (_dir, store) = store();
        assert!(!store.invalidate("no-such-key").unwrap());
    }

    #[test]
    fn record_reports_insertion_date() {
        let (_dir, store) = store();
        store.put("key-1", "KE", "ciphertext-1").unwrap();
        let record = store.record("key-1").unwrap().unwrap();
        // CURRENT_DATE is the database clock; just check it parsed.
        assert!(record.created_at >= NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn store_survives_reopening() {
        let (_dir, store) = store();
        store.put("key-1", "KE", "ciphertext-1").unwrap();

        let reopened = CoinStore::new(store.db_path());
        assert_eq!(reopened.get("key-1").unwrap().as_deref(), Some("ciphertext-1"));
    }
}

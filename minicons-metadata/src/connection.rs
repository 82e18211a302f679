// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::error::{Error, Result};
use crate::signature::SignatureMap;

/// File name of the database at an execution root.
pub const DB_FILE_NAME: &str = ".minicons.sqlite3";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS
file_metadata (path TEXT PRIMARY KEY, metadata TEXT)
"#;

/// Handle on the single-file signature database at the execution root.
///
/// Concurrency discipline: many readers, one writer. The connection is kept
/// on the scheduler thread; worker threads never touch it. WAL journalling
/// lets freshness reads proceed while a commit is in flight.
pub struct MetadataDb {
    conn: Connection,
}

impl MetadataDb {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let db = Self { conn };
        db.configure()?;
        debug!("Opened metadata store at {}", path.display());
        Ok(db)
    }

    /// Open or create the store at its conventional location under `root`.
    pub fn open_at_root<P: AsRef<Path>>(root: P) -> Result<Self> {
        let mut path = PathBuf::from(root.as_ref());
        path.push(DB_FILE_NAME);
        Self::open(path)
    }

    /// Create an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure()?;
        debug!("Created in-memory metadata store");
        Ok(db)
    }

    /// Configure journalling and create the schema.
    fn configure(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        self.conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Fetch the stored signature map for a path, if any.
    pub fn get(&self, path: &Path) -> Result<Option<SignatureMap>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT metadata FROM file_metadata WHERE path = ?1",
                params![path_key(path)],
                |row| row.get(0),
            )
            .optional()?;
        match row {
            None => Ok(None),
            Some(text) => {
                let map = serde_json::from_str(&text).map_err(|e| Error::CorruptRecord {
                    path: path.to_owned(),
                    source: e,
                })?;
                Ok(Some(map))
            }
        }
    }

    /// Insert or update the stored signature map for a path.
    pub fn put(&self, path: &Path, signature: &SignatureMap) -> Result<()> {
        let serialized = serde_json::to_string(signature).map_err(|e| Error::Serialize {
            path: path.to_owned(),
            source: e,
        })?;
        self.conn.execute(
            r#"
            INSERT INTO file_metadata (path, metadata) VALUES (?1, ?2)
            ON CONFLICT (path) DO UPDATE SET metadata = excluded.metadata
            "#,
            params![path_key(path), serialized],
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for MetadataDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataDb").finish_non_exhaustive()
    }
}

/// Paths are keyed by their textual form. Keys must be absolute; the build
/// core interns every entry path as absolute before it reaches the store.
fn path_key(path: &Path) -> String {
    path.display().to_string()
}

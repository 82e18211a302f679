// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Error types for the signature store.
//!
//! Every error here is fatal to a build: a corrupt or unreadable store
//! cannot answer freshness questions, so the caller aborts with a
//! diagnostic. Deleting the database file forces a full rebuild.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for signature store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing the signature store.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("metadata store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open the database with context
    #[error("failed to open metadata store at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored signature did not deserialize (corrupt row)
    #[error("corrupt signature record for '{path}': {source}")]
    CorruptRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A signature did not serialize
    #[error("failed to serialize signature for '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

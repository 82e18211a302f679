// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! SQLite-backed artifact signature store.
//!
//! Every successfully built artifact gets one row mapping its absolute path
//! to the serialized signature of the exact dependency closure that produced
//! it. The build core reads these rows during freshness analysis and writes
//! them after each successful builder invocation.
//!
//! The database is a single file at the execution root, configured for
//! write-ahead logging so freshness reads during a build do not block
//! builders committing new signatures.

mod connection;
mod error;
mod signature;

pub use connection::{DB_FILE_NAME, MetadataDb};
pub use error::{Error, Result};
pub use signature::{DirSignature, FileSignature, Signature, SignatureMap};

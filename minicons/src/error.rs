// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Error types for the build core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for build core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type a recipe's `run` may return. Anything boxable works, so
/// recipe bodies can use `?` on I/O and subprocess failures directly.
pub type RecipeError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification of an [`Error`], used by drivers to report what
/// stage of the build went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The recipe program declared an inconsistent graph.
    Configuration,
    /// The declared graph cannot be satisfied (cycles, missing sources,
    /// missing outputs, unknown targets).
    Dependency,
    /// A builder failed while running, or an artifact could not be
    /// removed, prepared or examined.
    Build,
    /// The metadata store failed; always fatal.
    Storage,
}

/// Errors that can occur while declaring or executing a build.
#[derive(Error, Debug)]
pub enum Error {
    /// A path was interned once as a file and again as a directory (or
    /// vice versa).
    #[error("{path} is already registered as a different entry type")]
    EntryTypeMismatch { path: PathBuf },

    /// A node already produced by one builder was declared as the output
    /// of another.
    #[error("{node} is already being built by {builder}")]
    BuilderConflict { node: String, builder: String },

    /// A directory output must be its builder's sole product.
    #[error("builder {builder} cannot output more than one target when outputting a directory")]
    DirectoryNotSole { builder: String },

    /// `depends_file` was handed a builder that does not produce exactly
    /// one file.
    #[error("builder {builder} expected to produce exactly one file")]
    ExpectedSingleFile { builder: String },

    /// `depends_dir` was handed a builder that does not produce exactly
    /// one directory.
    #[error("builder {builder} expected to produce exactly one directory")]
    ExpectedSingleDirectory { builder: String },

    /// A file node was required but something else was given.
    #[error("{node} is not a file")]
    NotAFile { node: String },

    /// A directory node was required but something else was given.
    #[error("{node} is not a directory")]
    NotADirectory { node: String },

    /// A file set node was required but something else was given.
    #[error("{node} is not a file set")]
    NotAFileSet { node: String },

    /// A static filesystem path was requested for a node that has none
    /// (a file set).
    #[error("{node} has no static path")]
    NotAnEntry { node: String },

    /// A recipe touched a node that is not one of its declared outputs.
    #[error("{node} is not an output of builder {builder}")]
    NotAnOutput { node: String, builder: String },

    /// The named target is neither an alias nor a registered entry.
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// The reachable subgraph contains cycles; `edges` lists every
    /// offending `source → target` pair on its own line.
    #[error("dependency graph has cycles:\n{edges}")]
    CyclicGraph { edges: String },

    /// A source entry has no builder and does not exist on disk.
    #[error("{path} required but not present on filesystem and no builder defined")]
    SourceMissing { path: String },

    /// A builder ran to completion without producing a declared output.
    #[error("builder {builder} didn't output {path}")]
    MissingOutput { builder: String, path: String },

    /// The parallel scheduler drained its queues with nodes still blocked.
    #[error("dependency graph was not fully executed; nodes left: {nodes}")]
    DidNotExecute { nodes: String },

    /// A recipe's `run` returned an error.
    #[error("builder {builder} failed: {source}")]
    Build {
        builder: String,
        #[source]
        source: RecipeError,
    },

    /// Filesystem error while removing, preparing or examining an artifact.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata store failure.
    #[error(transparent)]
    Storage(#[from] minicons_metadata::Error),
}

impl Error {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EntryTypeMismatch { .. }
            | Error::BuilderConflict { .. }
            | Error::DirectoryNotSole { .. }
            | Error::ExpectedSingleFile { .. }
            | Error::ExpectedSingleDirectory { .. }
            | Error::NotAFile { .. }
            | Error::NotADirectory { .. }
            | Error::NotAFileSet { .. }
            | Error::NotAnEntry { .. }
            | Error::NotAnOutput { .. } => ErrorKind::Configuration,
            Error::TargetNotFound(_)
            | Error::CyclicGraph { .. }
            | Error::SourceMissing { .. }
            | Error::MissingOutput { .. }
            | Error::DidNotExecute { .. } => ErrorKind::Dependency,
            Error::Build { .. } | Error::Io { .. } => ErrorKind::Build,
            Error::Storage(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

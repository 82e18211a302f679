// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Graph vertices: files, directories and file sets.
//!
//! Nodes live in an arena owned by the [`Execution`](crate::Execution) and
//! are referred to by [`NodeId`] everywhere else — the dependency relation
//! may contain cycles (a configuration error caught at sort time), but
//! ownership never does.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::UNIX_EPOCH;

use minicons_metadata::{DirSignature, FileSignature, Signature};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Handle on a node in the execution's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// Handle on a registered builder in the execution's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuilderId(pub(crate) u32);

/// Public discriminant of a node's kind, exposed for reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    FileSet,
    Dir,
    File,
}

pub(crate) enum NodeKind {
    /// A single regular file with a statically known absolute path.
    File { path: PathBuf },
    /// A directory tree with a statically known absolute path.
    Dir { path: PathBuf },
    /// A collection of files determined only when the producing builder
    /// runs. The contents are the only graph state written during a build,
    /// hence the lock.
    FileSet { files: Mutex<Vec<PathBuf>> },
}

pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    /// Explicit user-declared dependencies of this node.
    pub(crate) depends: Vec<NodeId>,
    /// The builder producing this node, at most one.
    pub(crate) builder: Option<BuilderId>,
}

impl Node {
    pub(crate) fn new_file(path: PathBuf) -> Self {
        Node {
            kind: NodeKind::File { path },
            depends: Vec::new(),
            builder: None,
        }
    }

    pub(crate) fn new_dir(path: PathBuf) -> Self {
        Node {
            kind: NodeKind::Dir { path },
            depends: Vec::new(),
            builder: None,
        }
    }

    pub(crate) fn new_file_set() -> Self {
        Node {
            kind: NodeKind::FileSet {
                files: Mutex::new(Vec::new()),
            },
            depends: Vec::new(),
            builder: None,
        }
    }

    /// The node's absolute path, if it has one.
    pub(crate) fn path(&self) -> Option<&Path> {
        match &self.kind {
            NodeKind::File { path } | NodeKind::Dir { path } => Some(path),
            NodeKind::FileSet { .. } => None,
        }
    }

    /// Whether this node is bound to a static filesystem path.
    pub(crate) fn is_entry(&self) -> bool {
        !matches!(self.kind, NodeKind::FileSet { .. })
    }

    pub(crate) fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::File { .. } => NodeType::File,
            NodeKind::Dir { .. } => NodeType::Dir,
            NodeKind::FileSet { .. } => NodeType::FileSet,
        }
    }

    /// Capture the current on-disk signature of this entry. `Ok(None)`
    /// means the path does not exist; other I/O failures are errors.
    /// File sets have no signature.
    pub(crate) fn current_signature(&self) -> Result<Option<Signature>> {
        match &self.kind {
            NodeKind::File { path } => match file_signature(path)? {
                Some(sig) => Ok(Some(Signature::File(sig))),
                None => Ok(None),
            },
            NodeKind::Dir { path } => {
                let meta = match fs::metadata(path) {
                    Ok(meta) => meta,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                    Err(e) => return Err(Error::io(path, e)),
                };
                let mut files = std::collections::BTreeMap::new();
                for dirent in WalkDir::new(path) {
                    let dirent = dirent.map_err(|e| {
                        let source = std::io::Error::from(e);
                        Error::io(path, source)
                    })?;
                    if !dirent.file_type().is_file() {
                        continue;
                    }
                    if let Some(sig) = file_signature(dirent.path())? {
                        files.insert(dirent.path().display().to_string(), sig);
                    }
                }
                Ok(Some(Signature::Dir(DirSignature {
                    is_dir: meta.is_dir(),
                    files,
                })))
            }
            NodeKind::FileSet { .. } => Ok(None),
        }
    }

    /// Delete the on-disk artifact. Missing is not an error.
    pub(crate) fn remove_artifact(&self) -> Result<()> {
        match &self.kind {
            NodeKind::File { path } => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Error::io(path, e)),
            },
            NodeKind::Dir { path } => {
                if path.is_dir() {
                    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))?;
                }
                Ok(())
            }
            NodeKind::FileSet { .. } => Ok(()),
        }
    }

    /// Make the artifact's parent directory exist, right before its
    /// builder runs.
    pub(crate) fn prepare_artifact(&self) -> Result<()> {
        if let Some(path) = self.path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        Ok(())
    }

    /// Replace a file set's contents. No-op result for entry nodes is the
    /// caller's responsibility to rule out.
    pub(crate) fn set_file_set(&self, new_files: Vec<PathBuf>) -> bool {
        match &self.kind {
            NodeKind::FileSet { files } => {
                *lock_files(files) = new_files;
                true
            }
            _ => false,
        }
    }

    /// Snapshot a file set's contents.
    pub(crate) fn file_set_files(&self) -> Option<Vec<PathBuf>> {
        match &self.kind {
            NodeKind::FileSet { files } => Some(lock_files(files).clone()),
            _ => None,
        }
    }
}

/// A worker that panicked mid-build poisons the lock; the contents are a
/// plain Vec, so recover the guard and carry on.
fn lock_files(files: &Mutex<Vec<PathBuf>>) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
    match files.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn file_signature(path: &Path) -> Result<Option<FileSignature>> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(path, e)),
    };
    let mtime = meta.modified().map_err(|e| Error::io(path, e))?;
    let mtime_ns = mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0);
    Ok(Some(FileSignature {
        mtime_ns,
        is_file: meta.is_file(),
    }))
}

// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Signature model for filesystem artifacts.
//!
//! A signature is a small structured summary of an artifact's on-disk
//! identity. Files record their mtime and whether they are a regular file;
//! directories record the recursive map of regular files beneath them.
//!
//! What the store persists per built artifact is a [`SignatureMap`]: the
//! signature of every entry in the artifact's dependency closure, keyed by
//! the dependency's absolute path. Any change to that map (a changed input,
//! an added or removed input) makes the artifact stale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Signature of a single filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Signature {
    /// A regular file (or something that was expected to be one).
    File(FileSignature),
    /// A directory tree.
    Dir(DirSignature),
}

/// Signature of a file: modification time plus the regular-file bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignature {
    /// Modification time in nanoseconds since the Unix epoch.
    pub mtime_ns: u64,
    /// Whether the path is a regular file.
    pub is_file: bool,
}

/// Signature of a directory: the recursive map of regular files under it,
/// keyed by absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirSignature {
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// Signature of every regular file beneath the directory.
    pub files: BTreeMap<String, FileSignature>,
}

/// The signature of a node's full dependency closure, keyed by each
/// dependency's absolute path. This is what gets stored per built artifact.
pub type SignatureMap = BTreeMap<String, Signature>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_signature_roundtrip() {
        let sig = Signature::File(FileSignature {
            mtime_ns: 1_700_000_000_123_456_789,
            is_file: true,
        });
        let json = serde_json::to_string(&sig).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn dir_signature_roundtrip() {
        let mut files = BTreeMap::new();
        files.insert(
            "/src/a.txt".to_string(),
            FileSignature {
                mtime_ns: 42,
                is_file: true,
            },
        );
        let sig = Signature::Dir(DirSignature {
            is_dir: true,
            files,
        });
        let json = serde_json::to_string(&sig).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }

    /// The untagged representation must keep file and dir records distinct.
    #[test]
    fn untagged_discrimination() {
        let file_json = r#"{"mtime_ns":1,"is_file":true}"#;
        let dir_json = r#"{"is_dir":true,"files":{}}"#;
        assert!(matches!(
            serde_json::from_str::<Signature>(file_json).unwrap(),
            Signature::File(_)
        ));
        assert!(matches!(
            serde_json::from_str::<Signature>(dir_json).unwrap(),
            Signature::Dir(_)
        ));
    }

    /// Map keys serialize in sorted order, so equal maps produce equal text.
    #[test]
    fn signature_map_is_deterministic() {
        let mut a = SignatureMap::new();
        a.insert(
            "/b".into(),
            Signature::File(FileSignature {
                mtime_ns: 2,
                is_file: true,
            }),
        );
        a.insert(
            "/a".into(),
            Signature::File(FileSignature {
                mtime_ns: 1,
                is_file: true,
            }),
        );
        let mut b = SignatureMap::new();
        b.insert(
            "/a".into(),
            Signature::File(FileSignature {
                mtime_ns: 1,
                is_file: true,
            }),
        );
        b.insert(
            "/b".into(),
            Signature::File(FileSignature {
                mtime_ns: 2,
                is_file: true,
            }),
        );
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! The recipe trait and the context handed to running recipes.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::environment::Environment;
use crate::error::{Error, RecipeError, Result};
use crate::graph::Graph;
use crate::node::{BuilderId, NodeId, NodeKind};

/// A build recipe: the value registered with
/// [`Environment::add_builder`](crate::Environment::add_builder).
///
/// A recipe declares its outputs exactly once at registration time and is
/// executed at most once per build. Inputs are attached after registration
/// through the environment's `depends_*` calls and are visible to `run`
/// via [`BuildContext::inputs`].
pub trait Recipe: Send + Sync + 'static {
    /// Short name used in log and error messages.
    fn name(&self) -> &str;

    /// Declare the nodes this recipe produces. Called exactly once, when
    /// the recipe is registered.
    fn targets(&self, env: &mut Environment<'_>) -> Result<Vec<NodeId>>;

    /// Execute the recipe. Every declared entry output must exist on disk
    /// when this returns `Ok`.
    fn run(&self, ctx: &BuildContext<'_>) -> std::result::Result<(), RecipeError>;
}

pub(crate) struct BuilderSlot {
    pub(crate) recipe: Box<dyn Recipe>,
    /// Input nodes, shared by every output of this builder.
    pub(crate) depends: Vec<NodeId>,
    /// Output nodes: the declared targets plus any side effects.
    pub(crate) builds: Vec<NodeId>,
}

/// Read-only view of the graph handed to [`Recipe::run`].
///
/// The graph is frozen while builders run; the only thing a recipe may
/// write through this context is the contents of its own file set outputs.
pub struct BuildContext<'a> {
    pub(crate) graph: &'a Graph,
    pub(crate) builder: BuilderId,
}

impl BuildContext<'_> {
    /// The nodes this builder produces.
    pub fn outputs(&self) -> &[NodeId] {
        &self.graph.builder(self.builder).builds
    }

    /// The builder's input nodes, in registration order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.graph.builder(self.builder).depends
    }

    /// Absolute path of an entry node. Fails for file sets.
    pub fn path(&self, node: NodeId) -> Result<&Path> {
        self.graph.node(node).path().ok_or_else(|| Error::NotAnEntry {
            node: self.graph.display_node(node),
        })
    }

    /// Resolve a node to concrete file paths: a file yields itself, a
    /// directory yields every regular file beneath it, a file set yields
    /// its current contents.
    pub fn files(&self, node: NodeId) -> Result<Vec<PathBuf>> {
        let n = self.graph.node(node);
        match &n.kind {
            NodeKind::File { path } => Ok(vec![path.clone()]),
            NodeKind::Dir { path } => {
                let mut files = Vec::new();
                for dirent in WalkDir::new(path).sort_by_file_name() {
                    let dirent = dirent.map_err(|e| Error::io(path, std::io::Error::from(e)))?;
                    if dirent.file_type().is_file() {
                        files.push(dirent.path().to_path_buf());
                    }
                }
                Ok(files)
            }
            NodeKind::FileSet { .. } => Ok(n.file_set_files().unwrap_or_default()),
        }
    }

    /// Every input, flattened to concrete file paths.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for &input in self.inputs() {
            files.extend(self.files(input)?);
        }
        Ok(files)
    }

    /// Record the contents of a file set produced by this builder.
    pub fn set_file_set(&self, node: NodeId, files: Vec<PathBuf>) -> Result<()> {
        if !self.outputs().contains(&node) {
            return Err(Error::NotAnOutput {
                node: self.graph.display_node(node),
                builder: self.graph.display_builder(self.builder),
            });
        }
        if self.graph.node(node).set_file_set(files) {
            Ok(())
        } else {
            Err(Error::NotAFileSet {
                node: self.graph.display_node(node),
            })
        }
    }
}

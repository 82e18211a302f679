// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! The top-level build container.
//!
//! An [`Execution`] owns the node/builder arena, the alias table, the
//! metadata store and a string key/value map recipes can use to share
//! configuration. A process typically creates one, declares its graph
//! through [`Environment`] views, then calls [`Execution::build_targets`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use minicons_metadata::MetadataDb;

use crate::environment::{Environment, Source};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::node::{NodeId, NodeType};
use crate::prepare::{self, PreparedBuild};
use crate::scheduler;

/// Something buildable from the outside: a node handle, or a name that is
/// either an alias or a root-relative path.
#[derive(Debug, Clone)]
pub enum BuildTarget {
    Node(NodeId),
    Named(String),
}

impl From<NodeId> for BuildTarget {
    fn from(id: NodeId) -> Self {
        BuildTarget::Node(id)
    }
}

impl From<&str> for BuildTarget {
    fn from(name: &str) -> Self {
        BuildTarget::Named(name.to_string())
    }
}

impl From<String> for BuildTarget {
    fn from(name: String) -> Self {
        BuildTarget::Named(name)
    }
}

/// Knobs for a single build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Run every builder in the reachable graph, fresh or not.
    pub always_build: bool,
    /// Log what would build without touching the filesystem or the store.
    pub dry_run: bool,
    /// Worker count: 1 runs serially, 0 uses every core, anything else is
    /// capped at the machine's parallelism.
    pub jobs: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            always_build: false,
            dry_run: false,
            jobs: 1,
        }
    }
}

/// The top-level object controlling a build.
pub struct Execution {
    pub(crate) graph: Graph,
    pub(crate) aliases: HashMap<String, Vec<NodeId>>,
    db: MetadataDb,
    vars: HashMap<String, String>,
}

impl Execution {
    /// Create an execution rooted at `root`, opening (or creating) the
    /// metadata store there.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = fs::canonicalize(root.as_ref())
            .map_err(|e| Error::io(root.as_ref(), e))?;
        let db = MetadataDb::open_at_root(&root)?;
        Ok(Execution {
            graph: Graph::new(root),
            aliases: HashMap::new(),
            db,
            vars: HashMap::new(),
        })
    }

    /// The absolute root all relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.graph.root
    }

    /// An environment with the default build tree root, `<root>/build`.
    pub fn env(&mut self) -> Environment<'_> {
        let build_root = self.graph.root.join("build");
        Environment::new(self, build_root)
    }

    /// An environment with a custom build tree root.
    pub fn env_with_build_root(&mut self, build_root: impl AsRef<Path>) -> Environment<'_> {
        let build_root = self.graph.root.join(build_root);
        Environment::new(self, build_root)
    }

    /// Set a shared configuration variable.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Read a shared configuration variable.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Register a name usable as a build target, standing for the given
    /// nodes (builders stand for their outputs; paths must already be
    /// interned).
    pub fn register_alias<I, S>(&mut self, alias: impl Into<String>, targets: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let mut nodes = Vec::new();
        for target in targets {
            match target.into() {
                Source::Node(node) => nodes.push(node),
                Source::Builder(builder) => {
                    nodes.extend(self.graph.builder(builder).builds.iter().copied());
                }
                Source::Path(path) => {
                    let abs = self.graph.root.join(&path);
                    match self.graph.entries.get(&abs) {
                        Some(&node) => nodes.push(node),
                        None => {
                            return Err(Error::TargetNotFound(path.display().to_string()));
                        }
                    }
                }
            }
        }
        self.aliases.insert(alias.into(), nodes);
        Ok(())
    }

    fn resolve_target(&self, target: &BuildTarget) -> Result<Vec<NodeId>> {
        match target {
            BuildTarget::Node(node) => Ok(vec![*node]),
            BuildTarget::Named(name) => {
                if let Some(nodes) = self.aliases.get(name) {
                    return Ok(nodes.clone());
                }
                let path = self.graph.root.join(name);
                match self.graph.entries.get(&path) {
                    Some(&node) => Ok(vec![node]),
                    None => Err(Error::TargetNotFound(name.clone())),
                }
            }
        }
    }

    /// Resolve targets, traverse, order, and analyze freshness. Fails on
    /// unknown targets, cycles, and missing sources; no builder runs here.
    pub fn prepare_build<I, T>(&self, targets: I) -> Result<PreparedBuild>
    where
        I: IntoIterator<Item = T>,
        T: Into<BuildTarget>,
    {
        let mut nodes = Vec::new();
        for target in targets {
            nodes.extend(self.resolve_target(&target.into())?);
        }
        prepare::prepare(&self.graph, &self.db, nodes)
    }

    /// Prepare and build in one step.
    pub fn build_targets<I, T>(&self, targets: I, options: &BuildOptions) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<BuildTarget>,
    {
        let prepared = self.prepare_build(targets)?;
        self.build_prepared(&prepared, options)
    }

    /// Run the scheduler over a previously prepared build.
    pub fn build_prepared(&self, prepared: &PreparedBuild, options: &BuildOptions) -> Result<()> {
        scheduler::build(&self.graph, &self.db, prepared, options)
    }

    /// Render a node the way messages and reports do: entries as their
    /// root-relative path.
    pub fn node_display(&self, node: NodeId) -> String {
        self.graph.display_node(node)
    }

    /// The node's kind discriminant.
    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.graph.node(node).node_type()
    }

    /// Whether the node is bound to a static filesystem path.
    pub fn node_is_entry(&self, node: NodeId) -> bool {
        self.graph.node(node).is_entry()
    }

    /// Whether a builder produces this node.
    pub fn node_has_builder(&self, node: NodeId) -> bool {
        self.graph.node(node).builder.is_some()
    }
}

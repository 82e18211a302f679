// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Node/builder arena, reachability traversal and topological ordering.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::builder::{BuilderSlot, Recipe};
use crate::error::{Error, Result};
use crate::node::{BuilderId, Node, NodeId};

/// The arena holding every node and builder of an execution, plus the
/// interning map from absolute path to entry node.
pub(crate) struct Graph {
    pub(crate) root: PathBuf,
    nodes: Vec<Node>,
    builders: Vec<BuilderSlot>,
    /// Absolute path → entry node. Every path in here is absolute.
    pub(crate) entries: HashMap<PathBuf, NodeId>,
}

impl Graph {
    pub(crate) fn new(root: PathBuf) -> Self {
        Graph {
            root,
            nodes: Vec::new(),
            builders: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub(crate) fn builder(&self, id: BuilderId) -> &BuilderSlot {
        &self.builders[id.0 as usize]
    }

    pub(crate) fn builder_mut(&mut self, id: BuilderId) -> &mut BuilderSlot {
        &mut self.builders[id.0 as usize]
    }

    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn add_builder(&mut self, recipe: Box<dyn Recipe>) -> BuilderId {
        let id = BuilderId(self.builders.len() as u32);
        self.builders.push(BuilderSlot {
            recipe,
            depends: Vec::new(),
            builds: Vec::new(),
        });
        id
    }

    /// Render a node for messages: entries as their path relative to the
    /// execution root, file sets by their arena id.
    pub(crate) fn display_node(&self, id: NodeId) -> String {
        match self.node(id).path() {
            Some(path) => path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .display()
                .to_string(),
            None => format!("<fileset #{}>", id.0),
        }
    }

    /// Render a builder as `Name(output …)`.
    pub(crate) fn display_builder(&self, id: BuilderId) -> String {
        let slot = self.builder(id);
        let outputs: Vec<String> = slot
            .builds
            .iter()
            .map(|&out| self.display_node(out))
            .collect();
        format!("{}({})", slot.recipe.name(), outputs.join(" "))
    }

    /// The key under which an entry's signature is stored: its absolute
    /// path, as text.
    pub(crate) fn entry_path_key(&self, id: NodeId) -> Option<String> {
        self.node(id).path().map(|p| p.display().to_string())
    }

    /// Depth-first reachability from the targets.
    ///
    /// A node's effective dependencies are its own `depends`, its
    /// builder's `depends`, and the `depends` of every sibling output of
    /// that builder — a sibling's inputs must be ready before the shared
    /// builder can run, no matter which output triggered it. The siblings
    /// themselves are visited too (one invocation produces them all, so
    /// their freshness and signatures are part of this build), but they
    /// add no edges.
    ///
    /// Returns the reachable nodes in discovery order and the dependency
    /// edge map over exactly those nodes.
    pub(crate) fn reachable(
        &self,
        targets: &[NodeId],
    ) -> (Vec<NodeId>, HashMap<NodeId, Vec<NodeId>>) {
        let mut order = Vec::new();
        let mut edges: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut seen: HashSet<NodeId> = targets.iter().copied().collect();
        let mut to_visit: Vec<NodeId> = targets.to_vec();

        while let Some(visiting) = to_visit.pop() {
            order.push(visiting);
            let node = self.node(visiting);

            let mut deps = Vec::new();
            let mut dep_seen = HashSet::new();
            for &d in &node.depends {
                if dep_seen.insert(d) {
                    deps.push(d);
                }
            }
            if let Some(builder) = node.builder {
                let slot = self.builder(builder);
                for &d in &slot.depends {
                    if dep_seen.insert(d) {
                        deps.push(d);
                    }
                }
                for &sibling in &slot.builds {
                    for &d in &self.node(sibling).depends {
                        if dep_seen.insert(d) {
                            deps.push(d);
                        }
                    }
                }
                for &sibling in &slot.builds {
                    if seen.insert(sibling) {
                        to_visit.push(sibling);
                    }
                }
            }

            for &dep in &deps {
                if seen.insert(dep) {
                    to_visit.push(dep);
                }
            }
            edges.insert(visiting, deps);
        }

        (order, edges)
    }

    /// Kahn's algorithm over the dependency edges, leaves first. Any edges
    /// left after the sort form cycles and are reported in full.
    pub(crate) fn toposort(
        &self,
        nodes: &[NodeId],
        edges_orig: &HashMap<NodeId, Vec<NodeId>>,
    ) -> Result<Vec<NodeId>> {
        let mut edges: HashMap<NodeId, HashSet<NodeId>> = nodes
            .iter()
            .map(|&n| {
                let deps = edges_orig
                    .get(&n)
                    .map(|d| d.iter().copied().collect())
                    .unwrap_or_default();
                (n, deps)
            })
            .collect();

        let mut reverse: HashMap<NodeId, HashSet<NodeId>> =
            nodes.iter().map(|&n| (n, HashSet::new())).collect();
        for (&n, deps) in &edges {
            for &d in deps {
                if let Some(r) = reverse.get_mut(&d) {
                    r.insert(n);
                }
            }
        }

        let mut sorted = Vec::with_capacity(nodes.len());
        let mut leaves: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| edges.get(n).is_none_or(HashSet::is_empty))
            .collect();

        while let Some(node) = leaves.pop() {
            sorted.push(node);
            let dependents: Vec<NodeId> = reverse
                .get(&node)
                .map(|r| r.iter().copied().collect())
                .unwrap_or_default();
            for m in dependents {
                if let Some(r) = reverse.get_mut(&node) {
                    r.remove(&m);
                }
                if let Some(e) = edges.get_mut(&m) {
                    e.remove(&node);
                    if e.is_empty() {
                        leaves.push(m);
                    }
                }
            }
        }

        if edges.values().any(|deps| !deps.is_empty()) {
            let mut lines = Vec::new();
            for (&n, deps) in &edges {
                for &d in deps {
                    lines.push(format!("{} → {}", self.display_node(n), self.display_node(d)));
                }
            }
            lines.sort();
            return Err(Error::CyclicGraph {
                edges: lines.join("\n"),
            });
        }

        Ok(sorted)
    }
}

// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Pre-build analysis: freshness and dirty propagation.
//!
//! `prepare` resolves the reachable subgraph, orders it, and decides which
//! entries are out of date by comparing each one's dependency-closure
//! signature against the stored copy. The resulting [`PreparedBuild`] is
//! everything the scheduler and the tree reporter need.

use std::collections::{HashMap, HashSet};

use minicons_metadata::{MetadataDb, Signature, SignatureMap};

use crate::error::{Error, Result};
use crate::execution::Execution;
use crate::graph::Graph;
use crate::node::NodeId;

/// The result of pre-build analysis.
#[derive(Debug)]
pub struct PreparedBuild {
    /// The nodes the caller asked for.
    pub targets: Vec<NodeId>,
    /// Every reachable node, dependencies before dependents.
    pub ordered_nodes: Vec<NodeId>,
    /// Dependency edges over the reachable nodes.
    pub edges: HashMap<NodeId, Vec<NodeId>>,
    /// Entries whose stored signature no longer matches, or which are
    /// missing on disk.
    pub out_of_date: HashSet<NodeId>,
    /// Dependencies whose individual signature entry changed since the
    /// last build; informational, for reporters.
    pub changed: HashSet<NodeId>,
    /// The full set of nodes the scheduler will run, out-of-date entries
    /// plus everything dirtied by propagation.
    pub to_build: HashSet<NodeId>,
    /// Per node, its ancestor closure restricted to entries. This is the
    /// key set of the node's signature map.
    pub(crate) entry_deps: HashMap<NodeId, Vec<NodeId>>,
}

impl PreparedBuild {
    /// Whether nothing needs building.
    pub fn up_to_date(&self) -> bool {
        self.to_build.is_empty()
    }

    /// Force every node that has a builder into the to-build set
    /// (`--always-build`).
    pub fn set_always_build(&mut self, execution: &Execution) {
        self.to_build = self
            .ordered_nodes
            .iter()
            .copied()
            .filter(|&n| execution.graph.node(n).builder.is_some())
            .collect();
    }
}

pub(crate) fn prepare(
    graph: &Graph,
    db: &MetadataDb,
    targets: Vec<NodeId>,
) -> Result<PreparedBuild> {
    let (all_nodes, edges) = graph.reachable(&targets);
    let ordered_nodes = graph.toposort(&all_nodes, &edges)?;

    // Ancestor closure of each node, restricted to entries. Signatures are
    // keyed by filesystem path, so file sets never appear in them.
    let mut entry_deps: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for &node in &all_nodes {
        let mut closure = Vec::new();
        let mut seen: HashSet<NodeId> = edges[&node].iter().copied().collect();
        let mut to_visit: Vec<NodeId> = edges[&node].clone();
        while let Some(visiting) = to_visit.pop() {
            if graph.node(visiting).is_entry() {
                closure.push(visiting);
            }
            for &dep in &edges[&visiting] {
                if seen.insert(dep) {
                    to_visit.push(dep);
                }
            }
        }
        entry_deps.insert(node, closure);
    }

    // Gather on-disk signatures once for the whole analysis. A source with
    // no builder must already exist.
    let mut current: HashMap<NodeId, Option<Signature>> = HashMap::new();
    for &node_id in &ordered_nodes {
        let node = graph.node(node_id);
        if !node.is_entry() {
            continue;
        }
        let signature = node.current_signature()?;
        if node.builder.is_none() && signature.is_none() {
            return Err(Error::SourceMissing {
                path: graph.display_node(node_id),
            });
        }
        current.insert(node_id, signature);
    }

    // Compare each buildable entry's dependency-closure signature with the
    // stored copy. A difference in any individual row also marks that
    // dependency as changed.
    let mut out_of_date = HashSet::new();
    let mut changed = HashSet::new();
    for &node_id in &ordered_nodes {
        let node = graph.node(node_id);
        if !node.is_entry() || node.builder.is_none() {
            continue;
        }
        if current[&node_id].is_none() {
            out_of_date.insert(node_id);
            continue;
        }
        let Some(path) = node.path() else { continue };
        let stored = db.get(path)?;
        let fresh = closure_signature(graph, &entry_deps[&node_id], &current);
        if stored.as_ref() != Some(&fresh) {
            out_of_date.insert(node_id);
            if let Some(stored) = &stored {
                for &dep in &entry_deps[&node_id] {
                    if let Some(key) = graph.entry_path_key(dep) {
                        if stored.get(&key) != fresh.get(&key) {
                            changed.insert(dep);
                        }
                    }
                }
            }
        }
    }

    let to_build = compute_to_build(graph, &ordered_nodes, &edges, &out_of_date);

    Ok(PreparedBuild {
        targets,
        ordered_nodes,
        edges,
        out_of_date,
        changed,
        to_build,
        entry_deps,
    })
}

/// Assemble the signature map of a node's entry closure from gathered
/// signatures. Dependencies not on disk yet (their builder has not run)
/// are simply absent, which keeps the map different from any stored map
/// that listed them.
fn closure_signature(
    graph: &Graph,
    deps: &[NodeId],
    current: &HashMap<NodeId, Option<Signature>>,
) -> SignatureMap {
    let mut map = SignatureMap::new();
    for &dep in deps {
        if let (Some(key), Some(Some(signature))) =
            (graph.entry_path_key(dep), current.get(&dep))
        {
            map.insert(key, signature.clone());
        }
    }
    map
}

/// Expand the out-of-date set into the full set of nodes to run.
///
/// Downward pass first: builders are not assumed pure, so any dirty
/// dependency dirties every dependent. Upward pass second: a to-build
/// node's file set dependencies have no on-disk contents until their
/// builder runs, so they must run too. The upward walk is in reverse
/// topological order so file sets feeding other file sets propagate.
fn compute_to_build(
    graph: &Graph,
    ordered_nodes: &[NodeId],
    edges: &HashMap<NodeId, Vec<NodeId>>,
    out_of_date: &HashSet<NodeId>,
) -> HashSet<NodeId> {
    let mut to_build = out_of_date.clone();
    for &node in ordered_nodes {
        if edges[&node].iter().any(|dep| to_build.contains(dep)) {
            to_build.insert(node);
        }
    }
    for &node in ordered_nodes.iter().rev() {
        if to_build.contains(&node) {
            for &dep in &edges[&node] {
                if !graph.node(dep).is_entry() {
                    to_build.insert(dep);
                }
            }
        }
    }
    to_build
}

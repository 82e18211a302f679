// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Builder execution, serial or on a bounded worker pool.
//!
//! Both modes follow the same invocation protocol per builder: remove the
//! declared outputs, make their parent directories, run the recipe, verify
//! the outputs exist, then commit fresh signatures to the metadata store.
//! In parallel mode recipes run on scoped worker threads; graph bookkeeping
//! and metadata commits stay on the scheduler thread, which is also the
//! only place the store connection is touched.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use minicons_metadata::{MetadataDb, Signature, SignatureMap};

use crate::builder::BuildContext;
use crate::error::{Error, Result};
use crate::execution::BuildOptions;
use crate::graph::Graph;
use crate::node::{BuilderId, NodeId};
use crate::prepare::PreparedBuild;

pub(crate) fn build(
    graph: &Graph,
    db: &MetadataDb,
    prepared: &PreparedBuild,
    options: &BuildOptions,
) -> Result<()> {
    let to_build = if options.always_build {
        prepared
            .ordered_nodes
            .iter()
            .copied()
            .filter(|&n| graph.node(n).builder.is_some())
            .collect()
    } else {
        prepared.to_build.clone()
    };

    if to_build.is_empty() {
        info!("All files up to date");
        return Ok(());
    }

    let jobs = effective_jobs(options.jobs);
    if jobs > 1 && !options.dry_run {
        parallel(graph, db, prepared, &to_build, jobs)
    } else {
        serial(graph, db, prepared, &to_build, options.dry_run)
    }
}

/// The pool is capped at the machine's parallelism; 0 means "all cores".
fn effective_jobs(requested: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if requested == 0 {
        cores
    } else {
        requested.min(cores)
    }
}

fn serial(
    graph: &Graph,
    db: &MetadataDb,
    prepared: &PreparedBuild,
    to_build: &HashSet<NodeId>,
    dry_run: bool,
) -> Result<()> {
    let mut built: HashSet<NodeId> = HashSet::new();
    let mut signature_cache: HashMap<NodeId, Signature> = HashMap::new();

    for &node in &prepared.ordered_nodes {
        if !to_build.contains(&node) || built.contains(&node) {
            continue;
        }
        let Some(builder) = graph.node(node).builder else {
            continue;
        };
        invoke_builder(graph, builder, dry_run)?;
        built.extend(graph.builder(builder).builds.iter().copied());
        if !dry_run {
            commit_builder_metadata(graph, db, prepared, builder, &mut signature_cache)?;
        }
    }
    Ok(())
}

fn parallel(
    graph: &Graph,
    db: &MetadataDb,
    prepared: &PreparedBuild,
    to_build: &HashSet<NodeId>,
    jobs: usize,
) -> Result<()> {
    // Mutable copies of the dependency relation, restricted to the
    // reachable graph.
    let mut edges: HashMap<NodeId, HashSet<NodeId>> = prepared
        .edges
        .iter()
        .map(|(&n, deps)| (n, deps.iter().copied().collect()))
        .collect();
    let mut reverse: HashMap<NodeId, HashSet<NodeId>> =
        edges.keys().map(|&n| (n, HashSet::new())).collect();
    for (&node, deps) in &prepared.edges {
        for &dep in deps {
            if let Some(r) = reverse.get_mut(&dep) {
                r.insert(node);
            }
        }
    }

    // Drop every node that will not run. Propagation guarantees no
    // to-build node sits behind one of these, so plain edge removal keeps
    // the executable graph intact.
    for &node in &prepared.ordered_nodes {
        if to_build.contains(&node) {
            continue;
        }
        let deps: Vec<NodeId> = edges.get(&node).map(set_to_vec).unwrap_or_default();
        for dep in deps {
            if let Some(r) = reverse.get_mut(&dep) {
                r.remove(&node);
            }
        }
        if let Some(e) = edges.get_mut(&node) {
            e.clear();
        }
        let dependents: Vec<NodeId> = reverse.get(&node).map(set_to_vec).unwrap_or_default();
        for dependent in dependents {
            if let Some(e) = edges.get_mut(&dependent) {
                e.remove(&node);
            }
        }
        if let Some(r) = reverse.get_mut(&node) {
            r.clear();
        }
    }

    let mut ready: Vec<NodeId> = to_build
        .iter()
        .copied()
        .filter(|n| edges.get(n).is_none_or(HashSet::is_empty))
        .collect();

    let (tx, rx) = crossbeam_channel::unbounded::<(BuilderId, Result<()>)>();
    let mut in_flight = 0usize;
    let mut failure: Option<Error> = None;
    let mut signature_cache: HashMap<NodeId, Signature> = HashMap::new();

    std::thread::scope(|scope| {
        loop {
            if failure.is_none() && in_flight < jobs {
                if let Some(node) = ready.pop() {
                    match graph.node(node).builder {
                        // A file set whose work is carried by a sibling;
                        // it completes instantly.
                        None => complete_node(node, &mut edges, &mut reverse, &mut ready),
                        Some(builder) => {
                            // Sibling outputs are produced by this same
                            // invocation; drop them from the ready set.
                            let siblings = &graph.builder(builder).builds;
                            ready.retain(|n| !siblings.contains(n));
                            debug!("Submitting builder job: {}", graph.display_builder(builder));
                            let tx = tx.clone();
                            scope.spawn(move || {
                                let result = invoke_builder(graph, builder, false);
                                let _ = tx.send((builder, result));
                            });
                            in_flight += 1;
                        }
                    }
                    continue;
                }
            }

            if in_flight == 0 {
                break;
            }
            let Ok((builder, result)) = rx.recv() else {
                break;
            };
            in_flight -= 1;
            match result {
                Ok(()) => {
                    if let Err(e) =
                        commit_builder_metadata(graph, db, prepared, builder, &mut signature_cache)
                    {
                        failure.get_or_insert(e);
                        continue;
                    }
                    for &output in &graph.builder(builder).builds {
                        complete_node(output, &mut edges, &mut reverse, &mut ready);
                    }
                }
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }
        if failure.is_some() {
            debug!("Build failed; waiting for in-flight builders to finish");
        }
    });

    if let Some(error) = failure {
        return Err(error);
    }

    // Everything submitted and completed; leftovers mean the pruned graph
    // was inconsistent.
    let mut stuck: Vec<String> = edges
        .iter()
        .filter(|(_, deps)| !deps.is_empty())
        .map(|(&n, _)| graph.display_node(n))
        .collect();
    if !stuck.is_empty() {
        stuck.sort();
        return Err(Error::DidNotExecute {
            nodes: stuck.join(", "),
        });
    }
    Ok(())
}

fn set_to_vec(set: &HashSet<NodeId>) -> Vec<NodeId> {
    set.iter().copied().collect()
}

/// Mark a node complete: release its dependents, queueing any that become
/// unblocked.
fn complete_node(
    node: NodeId,
    edges: &mut HashMap<NodeId, HashSet<NodeId>>,
    reverse: &mut HashMap<NodeId, HashSet<NodeId>>,
    ready: &mut Vec<NodeId>,
) {
    let dependents: Vec<NodeId> = reverse.get(&node).map(set_to_vec).unwrap_or_default();
    for dependent in dependents {
        if let Some(e) = edges.get_mut(&dependent) {
            e.remove(&node);
            if e.is_empty() {
                ready.push(dependent);
            }
        }
    }
    if let Some(r) = reverse.get_mut(&node) {
        r.clear();
    }
}

/// Run one builder following the invocation protocol. With `dry_run` only
/// the log line is emitted — seeing what would build is the point.
fn invoke_builder(graph: &Graph, builder: BuilderId, dry_run: bool) -> Result<()> {
    let slot = graph.builder(builder);

    if !dry_run {
        for &output in &slot.builds {
            let node = graph.node(output);
            if node.is_entry() {
                debug!("Removing {}", graph.display_node(output));
                node.remove_artifact()?;
            }
        }
        for &output in &slot.builds {
            graph.node(output).prepare_artifact()?;
        }
    }

    info!("{}", graph.display_builder(builder));

    if !dry_run {
        let ctx = BuildContext { graph, builder };
        slot.recipe.run(&ctx).map_err(|source| Error::Build {
            builder: graph.display_builder(builder),
            source,
        })?;

        for &output in &slot.builds {
            let node = graph.node(output);
            if let Some(path) = node.path() {
                if !path.exists() {
                    return Err(Error::MissingOutput {
                        builder: graph.display_builder(builder),
                        path: graph.display_node(output),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Store the fresh dependency-closure signature of every entry this
/// builder produced. The cache keeps shared dependencies from being
/// re-`stat`ed across commits in one run.
fn commit_builder_metadata(
    graph: &Graph,
    db: &MetadataDb,
    prepared: &PreparedBuild,
    builder: BuilderId,
    signature_cache: &mut HashMap<NodeId, Signature>,
) -> Result<()> {
    for &built in &graph.builder(builder).builds {
        let Some(path) = graph.node(built).path() else {
            continue;
        };
        let deps = prepared
            .entry_deps
            .get(&built)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut map = SignatureMap::new();
        for &dep in deps {
            if !signature_cache.contains_key(&dep) {
                if let Some(signature) = graph.node(dep).current_signature()? {
                    signature_cache.insert(dep, signature);
                }
            }
            if let (Some(key), Some(signature)) =
                (graph.entry_path_key(dep), signature_cache.get(&dep))
            {
                map.insert(key, signature.clone());
            }
        }
        db.put(path, &map)?;
    }
    Ok(())
}

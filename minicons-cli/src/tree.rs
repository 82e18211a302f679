// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Dependency-tree report.
//!
//! Renders the prepared build as an indented tree, one node per line,
//! prefixed with three flag columns: `O` (out of date), `B` (to build),
//! `C` (changed since the last build). Unless every node was requested,
//! file sets are elided and their dependencies reattached to the
//! dependent, so the report shows filesystem entries only.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use minicons::{Execution, NodeId, NodeType, PreparedBuild};

/// Write the tree report for a prepared build.
pub fn print_tree<W: Write>(
    execution: &Execution,
    prepared: &PreparedBuild,
    all_nodes: bool,
    out: &mut W,
) -> io::Result<()> {
    let mut edges: HashMap<NodeId, Vec<NodeId>> = prepared.edges.clone();

    if !all_nodes {
        // Rewrite the graph without non-entry nodes. Dependencies come
        // before dependents in the order, so an elided child's edge list
        // is already entry-only when its parents are rewritten.
        for &node in &prepared.ordered_nodes {
            let children = edges.get(&node).cloned().unwrap_or_default();
            let mut kept = Vec::new();
            let mut reattached = Vec::new();
            for child in children {
                if execution.node_is_entry(child) {
                    kept.push(child);
                } else if let Some(grandchildren) = edges.get(&child) {
                    reattached.extend(grandchildren.iter().copied());
                }
            }
            kept.extend(reattached);
            edges.insert(node, kept);
        }
    }

    writeln!(out, "O = out of date")?;
    writeln!(out, "B = to build")?;
    writeln!(out, "C = changed")?;

    let mut seen: HashSet<NodeId> = HashSet::new();
    // Stack entries: node, the bar pattern leading to it, and whether it
    // is its parent's visually-last child.
    let mut to_visit: Vec<(NodeId, Vec<bool>, bool)> = prepared
        .targets
        .iter()
        .rev()
        .map(|&target| (target, Vec::new(), false))
        .collect();

    while let Some((node, depth_seq, last_child)) = to_visit.pop() {
        let has_children = edges.get(&node).is_some_and(|c| !c.is_empty());
        let skip_children = seen.contains(&node) && has_children;

        if depth_seq.is_empty() {
            writeln!(out)?;
        }

        print_line(
            out,
            Flags {
                out_of_date: prepared.out_of_date.contains(&node),
                to_build: prepared.to_build.contains(&node),
                changed: prepared.changed.contains(&node),
            },
            &depth_seq,
            last_child,
            &execution.node_display(node),
            skip_children,
        )?;

        if skip_children {
            continue;
        }
        seen.insert(node);

        let mut children = edges.get(&node).cloned().unwrap_or_default();
        let mut pending: HashSet<NodeId> = children.iter().copied().collect();
        // File sets first, then directories, then files; names break ties.
        children.sort_by_key(|&child| (type_rank(execution.node_type(child)), execution.node_display(child)));

        let last_index = children.len().saturating_sub(1);
        for (index, &child) in children.iter().enumerate().rev() {
            if !pending.remove(&child) {
                continue;
            }
            let new_depth_seq = if depth_seq.is_empty() {
                vec![false]
            } else {
                let mut seq = depth_seq[..depth_seq.len() - 1].to_vec();
                seq.push(!last_child);
                seq.push(true);
                seq
            };
            to_visit.push((child, new_depth_seq, index == last_index));
        }
    }
    Ok(())
}

struct Flags {
    out_of_date: bool,
    to_build: bool,
    changed: bool,
}

fn type_rank(node_type: NodeType) -> u8 {
    match node_type {
        NodeType::FileSet => 0,
        NodeType::Dir => 1,
        NodeType::File => 2,
    }
}

fn print_line<W: Write>(
    out: &mut W,
    flags: Flags,
    depth_seq: &[bool],
    last_child: bool,
    name: &str,
    omit_children: bool,
) -> io::Result<()> {
    let mut line = String::new();
    line.push(if flags.out_of_date { 'O' } else { ' ' });
    line.push(' ');
    line.push(if flags.to_build { 'B' } else { ' ' });
    line.push(' ');
    line.push(if flags.changed { 'C' } else { ' ' });
    line.push(' ');

    if !depth_seq.is_empty() {
        line.push(' ');
        for &bar in &depth_seq[..depth_seq.len() - 1] {
            line.push_str(if bar { "│  " } else { "   " });
        }
        line.push_str(if last_child { "└─" } else { "├─" });
    }
    line.push_str(name);
    writeln!(out, "{line}")?;

    if omit_children {
        let mut seq = depth_seq.to_vec();
        if let Some(&last) = depth_seq.last() {
            seq.push(last);
        }
        print_line(
            out,
            Flags {
                out_of_date: false,
                to_build: false,
                changed: false,
            },
            &seq,
            true,
            "(child nodes shown above)",
            false,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use minicons::{BuildContext, Environment, Recipe, RecipeError};

    struct Cat {
        out: PathBuf,
    }

    impl Recipe for Cat {
        fn name(&self) -> &str {
            "Cat"
        }

        fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
            Ok(vec![env.file(&self.out)?])
        }

        fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
            let mut data = Vec::new();
            for input in ctx.input_files()? {
                data.extend(fs::read(input)?);
            }
            fs::write(ctx.path(ctx.outputs()[0])?, data)?;
            Ok(())
        }
    }

    struct Generate;

    impl Recipe for Generate {
        fn name(&self) -> &str {
            "Generate"
        }

        fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
            Ok(vec![env.file_set()])
        }

        fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
            ctx.set_file_set(ctx.outputs()[0], Vec::new())?;
            Ok(())
        }
    }

    fn render(execution: &Execution, targets: &[&str], all_nodes: bool) -> String {
        let prepared = execution.prepare_build(targets.iter().copied()).unwrap();
        let mut buffer = Vec::new();
        print_tree(execution, &prepared, all_nodes, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn flags_and_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let mut execution = Execution::new(dir.path()).unwrap();
        let root = execution.root().to_path_buf();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.txt"), "a").unwrap();

        let mut env = execution.env();
        let builder = env
            .add_builder(Cat {
                out: PathBuf::from("build/out.txt"),
            })
            .unwrap();
        env.depends_file(builder, "src/a.txt").unwrap();

        let rendered = render(&execution, &["build/out.txt"], false);
        assert!(rendered.contains("O = out of date"), "{rendered}");
        // Cold build: the target is out of date and will build.
        assert!(rendered.contains("O B   build/out.txt"), "{rendered}");
        assert!(rendered.contains("└─src/a.txt"), "{rendered}");
    }

    #[test]
    fn file_sets_are_elided_unless_requested() {
        let dir = tempfile::tempdir().unwrap();
        let mut execution = Execution::new(dir.path()).unwrap();
        let root = execution.root().to_path_buf();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/words.txt"), "w").unwrap();

        let mut env = execution.env();
        let generate = env.add_builder(Generate).unwrap();
        env.depends_file(generate, "src/words.txt").unwrap();
        let cat = env
            .add_builder(Cat {
                out: PathBuf::from("build/out.txt"),
            })
            .unwrap();
        env.depends_files(cat, [generate]).unwrap();

        let rendered = render(&execution, &["build/out.txt"], false);
        assert!(!rendered.contains("fileset"), "{rendered}");
        // The file set's own dependency is reattached to the target.
        assert!(rendered.contains("src/words.txt"), "{rendered}");

        let rendered = render(&execution, &["build/out.txt"], true);
        assert!(rendered.contains("fileset"), "{rendered}");
    }
}

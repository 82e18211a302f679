// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Recipe-facing factory and dependency-registration layer.
//!
//! An [`Environment`] is a short-lived mutable view over an
//! [`Execution`](crate::Execution) used while the construct program
//! declares its graph: interning file and directory nodes, registering
//! builders, attaching dependencies, and deriving build-tree paths.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::execution::Execution;
use crate::node::{BuilderId, Node, NodeId, NodeType};
use crate::Recipe;

/// Anything that can be resolved to dependency nodes: an existing node, a
/// registered builder (standing for its outputs), or a path to intern.
#[derive(Debug, Clone)]
pub enum Source {
    Node(NodeId),
    Builder(BuilderId),
    Path(PathBuf),
}

impl From<NodeId> for Source {
    fn from(id: NodeId) -> Self {
        Source::Node(id)
    }
}

impl From<BuilderId> for Source {
    fn from(id: BuilderId) -> Self {
        Source::Builder(id)
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

/// Mutable view over an execution during graph declaration.
pub struct Environment<'ex> {
    pub(crate) execution: &'ex mut Execution,
    build_root: PathBuf,
}

impl<'ex> Environment<'ex> {
    pub(crate) fn new(execution: &'ex mut Execution, build_root: PathBuf) -> Self {
        Environment {
            execution,
            build_root,
        }
    }

    /// The execution root all relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.execution.graph.root
    }

    /// The build tree root (`<root>/build` unless overridden).
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        self.execution.graph.root.join(path)
    }

    /// Intern a file node for the given path (relative paths resolve
    /// against the root). Re-interning the same path returns the same
    /// node; asking for a path previously interned as a directory is a
    /// configuration error.
    pub fn file(&mut self, path: impl AsRef<Path>) -> Result<NodeId> {
        self.intern(path, NodeType::File)
    }

    /// Intern a directory node, with the same rules as [`Self::file`].
    pub fn dir(&mut self, path: impl AsRef<Path>) -> Result<NodeId> {
        self.intern(path, NodeType::Dir)
    }

    fn intern(&mut self, path: impl AsRef<Path>, want: NodeType) -> Result<NodeId> {
        let abs = self.absolute(path);
        let graph = &mut self.execution.graph;
        if let Some(&existing) = graph.entries.get(&abs) {
            if graph.node(existing).node_type() != want {
                return Err(Error::EntryTypeMismatch { path: abs });
            }
            return Ok(existing);
        }
        let node = match want {
            NodeType::File => Node::new_file(abs.clone()),
            NodeType::Dir => Node::new_dir(abs.clone()),
            NodeType::FileSet => unreachable!("file sets are not interned"),
        };
        let id = graph.add_node(node);
        graph.entries.insert(abs, id);
        Ok(id)
    }

    /// Create a fresh file set node. File sets have no path and are never
    /// interned; each call creates a new node.
    pub fn file_set(&mut self) -> NodeId {
        self.execution.graph.add_node(Node::new_file_set())
    }

    /// Compute the destination of `src` in the build tree.
    ///
    /// If `src` is already inside the build root, its path relative to the
    /// build subdirectory it was in is appended under `build_subdir`;
    /// otherwise its path relative to the execution root is appended. When
    /// `new_ext` is given the final extension is replaced.
    pub fn get_build_path(
        &self,
        src: impl AsRef<Path>,
        build_subdir: impl AsRef<Path>,
        new_ext: Option<&str>,
    ) -> PathBuf {
        let src = self.absolute(src);
        let rel = self.rel_path(&src);
        let mut full = self.build_root.join(build_subdir).join(rel);
        if let Some(ext) = new_ext {
            full.set_extension(ext.trim_start_matches('.'));
        }
        full
    }

    fn rel_path(&self, src: &Path) -> PathBuf {
        if let Ok(under_build) = src.strip_prefix(&self.build_root) {
            // Drop the build subdirectory component the source was under.
            let mut components = under_build.components();
            let first = components.next();
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                return match first {
                    Some(Component::Normal(name)) => PathBuf::from(name),
                    _ => under_build.to_path_buf(),
                };
            }
            return rest.to_path_buf();
        }
        match src.strip_prefix(&self.execution.graph.root) {
            Ok(rel) => rel.to_path_buf(),
            // Sources outside the root keep only their file name.
            Err(_) => src
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| src.to_path_buf()),
        }
    }

    /// Create an entry of the same kind derived through
    /// [`Self::get_build_path`].
    pub fn derive(
        &mut self,
        node: NodeId,
        build_subdir: impl AsRef<Path>,
        new_ext: Option<&str>,
    ) -> Result<NodeId> {
        let (node_type, path) = {
            let n = self.execution.graph.node(node);
            match n.path() {
                Some(path) => (n.node_type(), path.to_path_buf()),
                None => {
                    return Err(Error::NotAnEntry {
                        node: self.execution.graph.display_node(node),
                    });
                }
            }
        };
        let new_path = self.get_build_path(path, build_subdir, new_ext);
        match node_type {
            NodeType::File => self.file(new_path),
            NodeType::Dir => self.dir(new_path),
            NodeType::FileSet => unreachable!("file sets have no path"),
        }
    }

    /// Register a recipe. Its `targets` hook runs immediately to declare
    /// and bind the output nodes.
    pub fn add_builder<R: Recipe>(&mut self, recipe: R) -> Result<BuilderId> {
        let mut outputs = Vec::new();
        let mut output_seen = std::collections::HashSet::new();
        for output in recipe.targets(self)? {
            if output_seen.insert(output) {
                outputs.push(output);
            }
        }
        let graph = &mut self.execution.graph;

        let dir_outputs = outputs
            .iter()
            .filter(|&&o| graph.node(o).node_type() == NodeType::Dir)
            .count();
        if dir_outputs > 0 && outputs.len() != 1 {
            return Err(Error::DirectoryNotSole {
                builder: recipe.name().to_string(),
            });
        }
        for &output in &outputs {
            if let Some(existing) = graph.node(output).builder {
                return Err(Error::BuilderConflict {
                    node: graph.display_node(output),
                    builder: graph.display_builder(existing),
                });
            }
        }

        let id = graph.add_builder(Box::new(recipe));
        for &output in &outputs {
            graph.node_mut(output).builder = Some(id);
        }
        graph.builder_mut(id).builds = outputs;
        Ok(id)
    }

    /// Attach an additional output to a builder. Recipes use this to
    /// declare artifacts beyond what `targets` returned. Re-attaching a
    /// node already owned by the same builder is a no-op.
    pub fn side_effect(&mut self, builder: BuilderId, node: NodeId) -> Result<()> {
        let graph = &mut self.execution.graph;
        match graph.node(node).builder {
            Some(owner) if owner == builder => return Ok(()),
            Some(owner) => {
                return Err(Error::BuilderConflict {
                    node: graph.display_node(node),
                    builder: graph.display_builder(owner),
                });
            }
            None => {}
        }
        let has_dir_output = graph
            .builder(builder)
            .builds
            .iter()
            .any(|&o| graph.node(o).node_type() == NodeType::Dir);
        let adds_second_output = !graph.builder(builder).builds.is_empty();
        if has_dir_output || (graph.node(node).node_type() == NodeType::Dir && adds_second_output) {
            return Err(Error::DirectoryNotSole {
                builder: graph.builder(builder).recipe.name().to_string(),
            });
        }
        graph.node_mut(node).builder = Some(builder);
        graph.builder_mut(builder).builds.push(node);
        Ok(())
    }

    /// Declare an extra dependency of one node on another.
    pub fn depends(&mut self, node: NodeId, on: NodeId) {
        self.execution.graph.node_mut(node).depends.push(on);
    }

    /// Resolve `source` to a single file and append it to the builder's
    /// inputs. A builder source must produce exactly one file.
    pub fn depends_file(
        &mut self,
        builder: BuilderId,
        source: impl Into<Source>,
    ) -> Result<NodeId> {
        let file = match source.into() {
            Source::Builder(producer) => {
                let graph = &self.execution.graph;
                let files: Vec<NodeId> = graph
                    .builder(producer)
                    .builds
                    .iter()
                    .copied()
                    .filter(|&n| graph.node(n).node_type() == NodeType::File)
                    .collect();
                match files.as_slice() {
                    &[single] => single,
                    _ => {
                        return Err(Error::ExpectedSingleFile {
                            builder: graph.display_builder(producer),
                        });
                    }
                }
            }
            Source::Node(node) => {
                if self.execution.graph.node(node).node_type() != NodeType::File {
                    return Err(Error::NotAFile {
                        node: self.execution.graph.display_node(node),
                    });
                }
                node
            }
            Source::Path(path) => self.file(path)?,
        };
        self.execution.graph.builder_mut(builder).depends.push(file);
        Ok(file)
    }

    /// Resolve heterogeneous sources and append them all to the builder's
    /// inputs. A directory or file set (or a builder producing one)
    /// resolves to itself; everything else resolves to file nodes.
    pub fn depends_files<I, S>(&mut self, builder: BuilderId, sources: I) -> Result<Vec<NodeId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let mut resolved = Vec::new();
        for source in sources {
            resolved.extend(self.resolve_files(source.into())?);
        }
        self.execution
            .graph
            .builder_mut(builder)
            .depends
            .extend(resolved.iter().copied());
        Ok(resolved)
    }

    fn resolve_files(&mut self, source: Source) -> Result<Vec<NodeId>> {
        match source {
            Source::Node(node) => Ok(vec![node]),
            Source::Path(path) => Ok(vec![self.file(path)?]),
            Source::Builder(producer) => {
                let graph = &self.execution.graph;
                let builds = graph.builder(producer).builds.clone();
                if let &[single] = builds.as_slice() {
                    if graph.node(single).node_type() != NodeType::File {
                        return Ok(builds);
                    }
                }
                Ok(builds
                    .into_iter()
                    .filter(|&n| self.execution.graph.node(n).node_type() == NodeType::File)
                    .collect())
            }
        }
    }

    /// Resolve `source` to exactly one directory and append it to the
    /// builder's inputs.
    pub fn depends_dir(&mut self, builder: BuilderId, source: impl Into<Source>) -> Result<NodeId> {
        let dir = match source.into() {
            Source::Builder(producer) => {
                let graph = &self.execution.graph;
                let builds = graph.builder(producer).builds.as_slice();
                match builds {
                    &[single] if graph.node(single).node_type() == NodeType::Dir => single,
                    _ => {
                        return Err(Error::ExpectedSingleDirectory {
                            builder: graph.display_builder(producer),
                        });
                    }
                }
            }
            Source::Node(node) => {
                if self.execution.graph.node(node).node_type() != NodeType::Dir {
                    return Err(Error::NotADirectory {
                        node: self.execution.graph.display_node(node),
                    });
                }
                node
            }
            Source::Path(path) => self.dir(path)?,
        };
        self.execution.graph.builder_mut(builder).depends.push(dir);
        Ok(dir)
    }
}

// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Dead simple dependency tracking and build framework.
//!
//! A construct program declares a graph of build artifacts — files,
//! directories, and dynamically-populated file sets — together with the
//! recipes that produce them. The library decides what is out of date by
//! comparing each artifact's dependency-closure signature against a
//! persistent store, then runs the necessary builders in dependency order,
//! serially or on a bounded worker pool.
//!
//! # Example
//!
//! ```no_run
//! use minicons::{BuildContext, BuildOptions, Environment, Execution, NodeId, Recipe};
//!
//! struct Concat {
//!     out: &'static str,
//! }
//!
//! impl Recipe for Concat {
//!     fn name(&self) -> &str {
//!         "Concat"
//!     }
//!
//!     fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
//!         Ok(vec![env.file(self.out)?])
//!     }
//!
//!     fn run(&self, ctx: &BuildContext<'_>) -> Result<(), minicons::RecipeError> {
//!         let mut data = Vec::new();
//!         for input in ctx.input_files()? {
//!             data.extend(std::fs::read(input)?);
//!         }
//!         std::fs::write(ctx.path(ctx.outputs()[0])?, data)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> minicons::Result<()> {
//!     let mut execution = Execution::new(".")?;
//!     let mut env = execution.env();
//!     let concat = env.add_builder(Concat { out: "build/ab.txt" })?;
//!     env.depends_files(concat, ["src/a.txt", "src/b.txt"])?;
//!     execution.build_targets(["build/ab.txt"], &BuildOptions::default())
//! }
//! ```

mod builder;
mod environment;
mod error;
mod execution;
mod graph;
mod node;
mod prepare;
mod scheduler;

pub use builder::{BuildContext, Recipe};
pub use environment::{Environment, Source};
pub use error::{Error, ErrorKind, RecipeError, Result};
pub use execution::{BuildOptions, BuildTarget, Execution};
pub use node::{BuilderId, NodeId, NodeType};
pub use prepare::PreparedBuild;

// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! Command-line driver layer for minicons construct programs.
//!
//! The core library knows nothing about terminals; this crate supplies the
//! option surface, logger initialization, the dependency-tree report and
//! exit-code handling. A construct program builds its graph and delegates
//! its `main` to [`drive`].

mod tree;

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::debug;
use thiserror::Error;

use minicons::{BuildOptions, ErrorKind, Execution};

pub use tree::print_tree;

/// Scope of the `--tree` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeScope {
    /// Show filesystem entries only; file sets are elided and their edges
    /// reattached to the dependent.
    Entries,
    /// Show every node.
    All,
}

/// Options accepted by a construct program.
#[derive(Debug, Parser)]
#[command(about = "Build declared targets, rebuilding only what is out of date")]
pub struct Options {
    /// Targets to build: alias names or paths relative to the execution root
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Build all targets, regardless of whether they are out of date
    #[arg(short = 'B', long)]
    pub always_build: bool,

    /// Print what would be built without building anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Number of parallel build jobs (0 means one per CPU core)
    #[arg(short = 'j', long, default_value_t = 1, value_name = "N")]
    pub jobs: usize,

    /// Print the dependency tree of the given targets
    #[arg(
        long,
        value_name = "SCOPE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "entries"
    )]
    pub tree: Option<TreeScope>,
}

/// Errors surfaced by the driver.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] minicons::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prepare, optionally report, and build the requested targets.
pub fn run(execution: &Execution, options: &Options) -> Result<(), CliError> {
    let mut prepared = execution.prepare_build(options.targets.iter().map(String::as_str))?;
    debug!(
        "Prepared {} nodes, {} to build",
        prepared.ordered_nodes.len(),
        prepared.to_build.len()
    );

    if options.always_build {
        prepared.set_always_build(execution);
    }

    if let Some(scope) = options.tree {
        let stdout = std::io::stdout();
        print_tree(
            execution,
            &prepared,
            scope == TreeScope::All,
            &mut stdout.lock(),
        )?;
    }

    execution.build_prepared(
        &prepared,
        &BuildOptions {
            always_build: options.always_build,
            dry_run: options.dry_run,
            jobs: options.jobs,
        },
    )?;
    Ok(())
}

/// Full driver entry point: parse arguments from the process environment,
/// initialize logging, run, and map errors to an exit code.
pub fn drive(execution: &Execution) -> ExitCode {
    init_logging();
    let options = Options::parse();
    match run(execution, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG`-controlled logging, defaulting to the build progress lines.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn report_error(error: &CliError) {
    match error {
        CliError::Core(e) => eprintln!("{} error: {e}", kind_word(e.kind())),
        CliError::Io(e) => eprintln!("I/O error: {e}"),
    }
}

fn kind_word(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "configuration",
        ErrorKind::Dependency => "dependency",
        ErrorKind::Build => "build",
        ErrorKind::Storage => "storage",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_flag_forms() {
        let options = Options::parse_from(["prog", "--tree", "out.txt"]);
        assert_eq!(options.tree, Some(TreeScope::Entries));

        let options = Options::parse_from(["prog", "--tree=all", "out.txt"]);
        assert_eq!(options.tree, Some(TreeScope::All));

        let options = Options::parse_from(["prog", "out.txt"]);
        assert_eq!(options.tree, None);
    }

    #[test]
    fn short_flags() {
        let options = Options::parse_from(["prog", "-B", "-d", "-j", "4", "all"]);
        assert!(options.always_build);
        assert!(options.dry_run);
        assert_eq!(options.jobs, 4);
        assert_eq!(options.targets, vec!["all".to_string()]);
    }
}

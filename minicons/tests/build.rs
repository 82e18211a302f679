// SPDX-FileCopyrightText: 2026 The minicons developers
// SPDX-License-Identifier: MIT

//! End-to-end build scenarios against real temporary directories.
//!
//! The recipes here count their invocations so the tests can assert not
//! just the artifact contents but which builders actually ran.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use minicons::{
    BuildContext, BuildOptions, Environment, Execution, NodeId, Recipe, RecipeError,
};

fn setup() -> (tempfile::TempDir, Execution) {
    let dir = tempfile::tempdir().unwrap();
    let execution = Execution::new(dir.path()).unwrap();
    (dir, execution)
}

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Rewrite a file after a short pause so its mtime observably moves.
fn rewrite_file(root: &Path, rel: &str, contents: &str) {
    std::thread::sleep(Duration::from_millis(50));
    write_file(root, rel, contents);
}

fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// Concatenates every input file into the single output file.
struct Concat {
    out: PathBuf,
    runs: Arc<AtomicUsize>,
}

impl Concat {
    fn new(out: impl Into<PathBuf>) -> (Self, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        (
            Concat {
                out: out.into(),
                runs: runs.clone(),
            },
            runs,
        )
    }
}

impl Recipe for Concat {
    fn name(&self) -> &str {
        "Concat"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file(&self.out)?])
    }

    fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut data = Vec::new();
        for input in ctx.input_files()? {
            data.extend(fs::read(input)?);
        }
        fs::write(ctx.path(ctx.outputs()[0])?, data)?;
        Ok(())
    }
}

/// Upper-cases its single input into the output file.
struct Upper {
    out: PathBuf,
    runs: Arc<AtomicUsize>,
}

impl Upper {
    fn new(out: impl Into<PathBuf>) -> (Self, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        (
            Upper {
                out: out.into(),
                runs: runs.clone(),
            },
            runs,
        )
    }
}

impl Recipe for Upper {
    fn name(&self) -> &str {
        "Upper"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file(&self.out)?])
    }

    fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let inputs = ctx.input_files()?;
        let text = fs::read_to_string(&inputs[0])?;
        fs::write(ctx.path(ctx.outputs()[0])?, text.to_uppercase())?;
        Ok(())
    }
}

/// Scenario 1: cold build of `build/ab.txt ← concat(src/a.txt, src/b.txt)`.
#[test]
fn cold_build() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/ab.txt"), "AB");
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// Scenario 2: an immediate second build runs nothing.
#[test]
fn noop_rebuild() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();
    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let prepared = execution.prepare_build(["build/ab.txt"]).unwrap();
    assert!(prepared.up_to_date());
}

/// Scenario 3: changing one input re-runs the builder and reports the
/// changed dependency.
#[test]
fn input_change_rebuilds() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    let inputs = env
        .depends_files(builder, ["src/a.txt", "src/b.txt"])
        .unwrap();
    let a_node = inputs[0];

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();

    rewrite_file(&root, "src/a.txt", "X");

    let prepared = execution.prepare_build(["build/ab.txt"]).unwrap();
    assert!(prepared.changed.contains(&a_node));
    execution
        .build_prepared(&prepared, &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/ab.txt"), "XB");
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

fn chained_graph(
    execution: &mut Execution,
) -> (Arc<AtomicUsize>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let (upper_a, runs_a) = Upper::new("build/A.up");
    let (upper_b, runs_b) = Upper::new("build/B.up");
    let (concat, runs_all) = Concat::new("build/all.txt");

    let mut env = execution.env();
    let builder_a = env.add_builder(upper_a).unwrap();
    env.depends_file(builder_a, "src/a.txt").unwrap();
    let builder_b = env.add_builder(upper_b).unwrap();
    env.depends_file(builder_b, "src/b.txt").unwrap();
    let builder_all = env.add_builder(concat).unwrap();
    env.depends_file(builder_all, builder_a).unwrap();
    env.depends_file(builder_all, builder_b).unwrap();

    (runs_a, runs_b, runs_all)
}

/// Scenario 4: chained graph; both uppers run before the concat.
#[test]
fn chained_cold_build() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "a");
    write_file(&root, "src/b.txt", "b");

    let (runs_a, runs_b, runs_all) = chained_graph(&mut execution);

    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/all.txt"), "AB");
    assert_eq!(runs_a.load(Ordering::SeqCst), 1);
    assert_eq!(runs_b.load(Ordering::SeqCst), 1);
    assert_eq!(runs_all.load(Ordering::SeqCst), 1);
}

/// Touch propagation: touching one leaf re-runs exactly the builders on
/// the path from that leaf to the target.
#[test]
fn touch_propagation() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "a");
    write_file(&root, "src/b.txt", "b");

    let (runs_a, runs_b, runs_all) = chained_graph(&mut execution);

    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();
    rewrite_file(&root, "src/a.txt", "x");
    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/all.txt"), "XB");
    assert_eq!(runs_a.load(Ordering::SeqCst), 2);
    assert_eq!(runs_b.load(Ordering::SeqCst), 1);
    assert_eq!(runs_all.load(Ordering::SeqCst), 2);
}

/// Scenario 5: a dependency cycle fails preparation with every offending
/// edge listed, and no builder runs.
#[test]
fn cycle_detection() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "x", "");
    write_file(&root, "y", "");

    let mut env = execution.env();
    let x = env.file("x").unwrap();
    let y = env.file("y").unwrap();
    env.depends(x, y);
    env.depends(y, x);

    let err = execution.prepare_build([x]).unwrap_err();
    assert_eq!(err.kind(), minicons::ErrorKind::Dependency);
    let message = err.to_string();
    assert!(message.contains("x → y"), "{message}");
    assert!(message.contains("y → x"), "{message}");
}

/// Upper-cases its input while recording how many copies of itself run at
/// the same time.
struct TrackedUpper {
    out: PathBuf,
    concurrent: Arc<AtomicUsize>,
    max_concurrent: Arc<AtomicUsize>,
}

impl Recipe for TrackedUpper {
    fn name(&self) -> &str {
        "TrackedUpper"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file(&self.out)?])
    }

    fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        let current = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(current, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));

        let inputs = ctx.input_files()?;
        let text = fs::read_to_string(&inputs[0])?;
        fs::write(ctx.path(ctx.outputs()[0])?, text.to_uppercase())?;

        self.concurrent.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scenario 6: the chained graph with two workers produces the same
/// artifacts; the concat starts only after both uppers complete.
#[test]
fn parallel_build() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "a");
    write_file(&root, "src/b.txt", "b");

    let concurrent = Arc::new(AtomicUsize::new(0));
    let max_concurrent = Arc::new(AtomicUsize::new(0));
    let (concat, concat_runs) = Concat::new("build/all.txt");

    let mut env = execution.env();
    let builder_a = env
        .add_builder(TrackedUpper {
            out: PathBuf::from("build/A.up"),
            concurrent: concurrent.clone(),
            max_concurrent: max_concurrent.clone(),
        })
        .unwrap();
    env.depends_file(builder_a, "src/a.txt").unwrap();
    let builder_b = env
        .add_builder(TrackedUpper {
            out: PathBuf::from("build/B.up"),
            concurrent: concurrent.clone(),
            max_concurrent: max_concurrent.clone(),
        })
        .unwrap();
    env.depends_file(builder_b, "src/b.txt").unwrap();
    let builder_all = env.add_builder(concat).unwrap();
    env.depends_file(builder_all, builder_a).unwrap();
    env.depends_file(builder_all, builder_b).unwrap();

    let options = BuildOptions {
        jobs: 2,
        ..BuildOptions::default()
    };
    execution.build_targets(["build/all.txt"], &options).unwrap();

    // The concat read both uppercased files, so it ran strictly after
    // both uppers completed.
    assert_eq!(read_file(&root, "build/all.txt"), "AB");
    assert_eq!(concat_runs.load(Ordering::SeqCst), 1);
    assert!(
        max_concurrent.load(Ordering::SeqCst) <= 2,
        "pool exceeded two workers: {}",
        max_concurrent.load(Ordering::SeqCst)
    );
}

/// Building an alias is equivalent to building each of its nodes.
#[test]
fn alias_transparency() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "a");
    write_file(&root, "src/b.txt", "b");

    let (upper_a, runs_a) = Upper::new("build/A.up");
    let (upper_b, runs_b) = Upper::new("build/B.up");
    let mut env = execution.env();
    let builder_a = env.add_builder(upper_a).unwrap();
    env.depends_file(builder_a, "src/a.txt").unwrap();
    let builder_b = env.add_builder(upper_b).unwrap();
    env.depends_file(builder_b, "src/b.txt").unwrap();
    drop(env);
    execution
        .register_alias("everything", [builder_a, builder_b])
        .unwrap();

    execution
        .build_targets(["everything"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/A.up"), "A");
    assert_eq!(read_file(&root, "build/B.up"), "B");
    assert_eq!(runs_a.load(Ordering::SeqCst), 1);
    assert_eq!(runs_b.load(Ordering::SeqCst), 1);
}

/// Deleting a built artifact forces its builder to run again.
#[test]
fn removal_forces_rebuild() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();
    fs::remove_file(root.join("build/ab.txt")).unwrap();
    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/ab.txt"), "AB");
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// An artifact present on disk without a stored signature (e.g. a build
/// interrupted between builder completion and metadata commit) is treated
/// as out of date.
#[test]
fn artifact_without_stored_signature_rebuilds() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");
    write_file(&root, "build/ab.txt", "stale");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();

    assert_eq!(read_file(&root, "build/ab.txt"), "AB");
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// A source with no builder that is missing on disk is a dependency
/// error, raised before anything runs.
#[test]
fn missing_source_is_an_error() {
    let (_dir, mut execution) = setup();

    let (concat, runs) = Concat::new("build/out.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_file(builder, "src/missing.txt").unwrap();

    let err = execution.prepare_build(["build/out.txt"]).unwrap_err();
    assert_eq!(err.kind(), minicons::ErrorKind::Dependency);
    assert!(err.to_string().contains("src/missing.txt"), "{err}");
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

/// Unknown targets are rejected.
#[test]
fn unknown_target_is_an_error() {
    let (_dir, execution) = setup();
    let err = execution.prepare_build(["no/such/thing"]).unwrap_err();
    assert!(matches!(err, minicons::Error::TargetNotFound(_)));
}

/// Writes nothing, despite declaring an output.
struct Hollow {
    out: PathBuf,
}

impl Recipe for Hollow {
    fn name(&self) -> &str {
        "Hollow"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file(&self.out)?])
    }

    fn run(&self, _ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        Ok(())
    }
}

/// A builder that completes without producing its declared output fails
/// the build.
#[test]
fn undelivered_output_is_an_error() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");

    let mut env = execution.env();
    let builder = env
        .add_builder(Hollow {
            out: PathBuf::from("build/out.txt"),
        })
        .unwrap();
    env.depends_file(builder, "src/a.txt").unwrap();

    let err = execution
        .build_targets(["build/out.txt"], &BuildOptions::default())
        .unwrap_err();
    assert!(matches!(err, minicons::Error::MissingOutput { .. }));
}

/// Always fails.
struct Explode {
    out: PathBuf,
}

impl Recipe for Explode {
    fn name(&self) -> &str {
        "Explode"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file(&self.out)?])
    }

    fn run(&self, _ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        Err("recipe exploded".into())
    }
}

/// Recipe failures surface as build errors and leave no committed
/// signature, so the next run tries again.
#[test]
fn recipe_failure_aborts_and_retries() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");

    let mut env = execution.env();
    let builder = env
        .add_builder(Explode {
            out: PathBuf::from("build/out.txt"),
        })
        .unwrap();
    env.depends_file(builder, "src/a.txt").unwrap();

    let err = execution
        .build_targets(["build/out.txt"], &BuildOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), minicons::ErrorKind::Build);
    assert!(err.to_string().contains("recipe exploded"), "{err}");

    // Still dirty: the failed run committed nothing.
    let prepared = execution.prepare_build(["build/out.txt"]).unwrap();
    assert!(!prepared.up_to_date());
}

/// Dry runs leave the filesystem and the store untouched.
#[test]
fn dry_run_builds_nothing() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    let options = BuildOptions {
        dry_run: true,
        ..BuildOptions::default()
    };
    execution.build_targets(["build/ab.txt"], &options).unwrap();

    assert!(!root.join("build/ab.txt").exists());
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // A real build afterwards still sees everything as dirty.
    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/ab.txt"), "AB");
}

/// `always_build` re-runs builders that are up to date.
#[test]
fn always_build_ignores_freshness() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/a.txt", "A");
    write_file(&root, "src/b.txt", "B");

    let (concat, runs) = Concat::new("build/ab.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_files(builder, ["src/a.txt", "src/b.txt"]).unwrap();

    execution
        .build_targets(["build/ab.txt"], &BuildOptions::default())
        .unwrap();
    let options = BuildOptions {
        always_build: true,
        ..BuildOptions::default()
    };
    execution.build_targets(["build/ab.txt"], &options).unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Splits its input into one generated file per line, under a directory
/// of its choosing, and publishes the list as a file set.
struct SplitLines {
    gen_dir: PathBuf,
    runs: Arc<AtomicUsize>,
}

impl Recipe for SplitLines {
    fn name(&self) -> &str {
        "SplitLines"
    }

    fn targets(&self, env: &mut Environment<'_>) -> minicons::Result<Vec<NodeId>> {
        Ok(vec![env.file_set()])
    }

    fn run(&self, ctx: &BuildContext<'_>) -> Result<(), RecipeError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let inputs = ctx.input_files()?;
        let text = fs::read_to_string(&inputs[0])?;

        fs::create_dir_all(&self.gen_dir)?;
        let mut generated = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let path = self.gen_dir.join(format!("part{index}.txt"));
            fs::write(&path, line)?;
            generated.push(path);
        }
        ctx.set_file_set(ctx.outputs()[0], generated)?;
        Ok(())
    }
}

/// A file set's contents exist only after its builder runs; dependents
/// see them, and an up-to-date graph skips both builders.
#[test]
fn file_set_flows_downstream() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "src/words.txt", "alpha\nbeta");

    let runs_split = Arc::new(AtomicUsize::new(0));
    let (concat, runs_concat) = Concat::new("build/joined.txt");

    let mut env = execution.env();
    let split = env
        .add_builder(SplitLines {
            gen_dir: root.join("build/gen"),
            runs: runs_split.clone(),
        })
        .unwrap();
    env.depends_file(split, "src/words.txt").unwrap();
    let join = env.add_builder(concat).unwrap();
    env.depends_files(join, [split]).unwrap();

    execution
        .build_targets(["build/joined.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/joined.txt"), "alphabeta");
    assert_eq!(runs_split.load(Ordering::SeqCst), 1);
    assert_eq!(runs_concat.load(Ordering::SeqCst), 1);

    // Nothing changed: neither builder runs again.
    execution
        .build_targets(["build/joined.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(runs_split.load(Ordering::SeqCst), 1);
    assert_eq!(runs_concat.load(Ordering::SeqCst), 1);

    // Touching the source re-runs the whole chain, file set included.
    rewrite_file(&root, "src/words.txt", "gamma\ndelta");
    execution
        .build_targets(["build/joined.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/joined.txt"), "gammadelta");
    assert_eq!(runs_split.load(Ordering::SeqCst), 2);
    assert_eq!(runs_concat.load(Ordering::SeqCst), 2);
}

/// Depending on a directory tracks every file under it, recursively.
#[test]
fn directory_dependency_tracks_contents() {
    let (_dir, mut execution) = setup();
    let root = execution.root().to_path_buf();
    write_file(&root, "srcdir/one.txt", "1");
    write_file(&root, "srcdir/sub/two.txt", "2");

    let (concat, runs) = Concat::new("build/all.txt");
    let mut env = execution.env();
    let builder = env.add_builder(concat).unwrap();
    env.depends_dir(builder, "srcdir").unwrap();

    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/all.txt"), "12");
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // Touch a nested file: the directory's signature changes.
    rewrite_file(&root, "srcdir/sub/two.txt", "3");
    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/all.txt"), "13");
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    // Adding a file changes it too.
    rewrite_file(&root, "srcdir/zzz.txt", "4");
    execution
        .build_targets(["build/all.txt"], &BuildOptions::default())
        .unwrap();
    assert_eq!(read_file(&root, "build/all.txt"), "134");
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

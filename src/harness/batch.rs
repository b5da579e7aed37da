//! Batch runs: discover every fixture under a path and run them in order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use super::reporter::FixtureReporter;
use super::{ExecutionResult, FixtureRunner};
use crate::fixture::{self, Fixture};
use crate::host::HostContext;

/// Extension of fixture files.
pub const FIXTURE_EXTENSION: &str = "js";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("error reading directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Every `*.js` file under `path`, sorted. A file path is returned as-is whatever its extension.
///
/// Hidden directories, `target` and `node_modules` are not descended into. Unreadable subdirectories are
/// logged and skipped; an unreadable root is an error.
pub fn discover_fixtures(path: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(DiscoveryError::NotFound { path: path.to_path_buf() });
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(path).map_err(|source| DiscoveryError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let entry_path = entry.path();
        let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if entry_path.is_dir() {
            if name.starts_with('.') || name == "target" || name == "node_modules" {
                continue;
            }
            match discover_fixtures(&entry_path) {
                Ok(nested) => files.extend(nested),
                Err(err) => tracing::warn!(error = %err, "skipping directory"),
            }
        } else if entry_path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION) {
            files.push(entry_path);
        }
    }

    files.sort();
    Ok(files)
}

/// Options for [`run_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Only run fixtures whose report name contains this substring.
    pub filter: Option<String>,
    /// Stop after the first fixture that does not pass.
    pub stop_on_fail: bool,
    /// Run `@onlyStrict` fixtures instead of skipping them. Strict mode is not modelled, so they are judged as
    /// sloppy code.
    pub include_strict: bool,
}

/// What happened to one fixture of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureStatus {
    Ran { result: ExecutionResult, duration: Duration },
    Skipped { reason: String },
}

/// Totals for a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Execution faults plus fixtures that could not be loaded.
    pub errored: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl BatchSummary {
    /// `true` when nothing failed or errored.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    fn record(&mut self, status: &FixtureStatus) {
        match status {
            FixtureStatus::Ran { result, .. } => match result {
                ExecutionResult::Pass => self.passed += 1,
                ExecutionResult::Fail(_) => self.failed += 1,
                ExecutionResult::Error(_) => self.errored += 1,
            },
            FixtureStatus::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Discover and run every fixture under `root`, reporting as it goes.
#[tracing::instrument(skip_all, fields(root = %root.display(), host = runner.host().name()))]
pub fn run_batch<H: HostContext>(
    runner: &FixtureRunner<H>,
    root: &Path,
    options: &BatchOptions,
    reporter: &mut dyn FixtureReporter,
) -> Result<BatchSummary, DiscoveryError> {
    let start = Instant::now();
    reporter.on_discovery_start(root);

    let mut fixtures = Vec::new();
    let mut summary = BatchSummary::default();
    for path in discover_fixtures(root)? {
        match fixture::load(&path) {
            Ok(fixture) => {
                let selected = options
                    .filter
                    .as_deref()
                    .is_none_or(|keyword| fixture.display_name().contains(keyword));
                if selected {
                    reporter.on_fixture_discovered(&fixture);
                    fixtures.push(fixture);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load fixture");
                reporter.on_load_error(&err);
                summary.total += 1;
                summary.errored += 1;
            }
        }
    }
    reporter.on_collection_complete(fixtures.len());

    for fixture in &fixtures {
        let status = run_one(runner, fixture, options);
        summary.total += 1;
        summary.record(&status);
        reporter.on_fixture_complete(fixture, &status);

        let stop = matches!(&status, FixtureStatus::Ran { result, .. } if !result.is_pass());
        if options.stop_on_fail && stop {
            tracing::info!(fixture = %fixture.display_name(), "stopping after first failure");
            break;
        }
    }

    summary.duration = start.elapsed();
    tracing::debug!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        skipped = summary.skipped,
        "batch finished"
    );
    reporter.on_run_complete(&summary);
    Ok(summary)
}

fn run_one<H: HostContext>(runner: &FixtureRunner<H>, fixture: &Fixture, options: &BatchOptions) -> FixtureStatus {
    if fixture.metadata().flags.only_strict && !options.include_strict {
        return FixtureStatus::Skipped {
            reason: "onlyStrict".to_string(),
        };
    }
    let start = Instant::now();
    let result = runner.run(fixture);
    FixtureStatus::Ran {
        result,
        duration: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::reporter::tests::RecordingReporter;

    struct TempTree(PathBuf);

    impl TempTree {
        fn new(name: &str, files: &[(&str, &str)]) -> Self {
            let root = std::env::temp_dir().join(format!("t262-batch-{name}-{}", std::process::id()));
            let _ = fs::remove_dir_all(&root);
            for (rel, contents) in files {
                let path = root.join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, contents).unwrap();
            }
            Self(root)
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    const PASSING: &str = "runTestCase(function () { return true; });";
    const FAILING: &str = "$ERROR('nope');";

    #[test]
    fn test_discovery_is_sorted_and_skips_hidden_dirs() {
        let tree = TempTree::new(
            "discover",
            &[
                ("b.js", PASSING),
                ("a/z.js", PASSING),
                ("a/notes.txt", ""),
                (".hidden/x.js", PASSING),
                ("node_modules/y.js", PASSING),
            ],
        );
        let found = discover_fixtures(&tree.0).unwrap();
        assert_eq!(found, vec![tree.0.join("a/z.js"), tree.0.join("b.js")]);
    }

    #[test]
    fn test_discovery_of_missing_path() {
        let err = discover_fixtures(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound { .. }));
    }

    #[test]
    fn test_batch_counts_and_filter() {
        let tree = TempTree::new(
            "counts",
            &[
                ("pass.js", PASSING),
                ("fail.js", FAILING),
                ("error.js", "nothing();"),
                ("strict.js", "/* @onlyStrict */\nvar x;"),
            ],
        );
        let runner = FixtureRunner::default();
        let mut reporter = RecordingReporter::default();
        let summary = run_batch(&runner, &tree.0, &BatchOptions::default(), &mut reporter).unwrap();
        assert_eq!((summary.total, summary.passed, summary.failed), (4, 1, 1));
        assert_eq!((summary.errored, summary.skipped), (1, 1));
        assert!(!summary.is_success());
        assert_eq!(reporter.collected, Some(4));

        let options = BatchOptions {
            filter: Some("pass".into()),
            ..Default::default()
        };
        let summary = run_batch(&runner, &tree.0, &options, &mut RecordingReporter::default()).unwrap();
        assert_eq!((summary.total, summary.passed), (1, 1));
        assert!(summary.is_success());
    }

    #[test]
    fn test_stop_on_fail() {
        let tree = TempTree::new("stop", &[("a.js", FAILING), ("b.js", PASSING)]);
        let options = BatchOptions {
            stop_on_fail: true,
            ..Default::default()
        };
        let mut reporter = RecordingReporter::default();
        let summary = run_batch(&FixtureRunner::default(), &tree.0, &options, &mut reporter).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(reporter.completed, vec!["fail".to_string()]);
    }
}

//! Batch reporters.
//!
//! [`FixtureReporter`] separates reporting from execution so a batch can be rendered for people
//! ([`ConsoleReporter`], pytest style) or for tools ([`JsonReporter`], one JSON object per line).

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use super::batch::{BatchSummary, FixtureStatus};
use super::ExecutionResult;
use crate::fixture::{Fixture, LoadError};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Receives batch progress from [`run_batch`](super::run_batch).
pub trait FixtureReporter {
    /// Called before discovery walks `root`.
    fn on_discovery_start(&mut self, _root: &Path) {}

    /// Called for each loaded fixture that passed the filter.
    fn on_fixture_discovered(&mut self, _fixture: &Fixture) {}

    /// Called for a discovered file that could not be loaded.
    fn on_load_error(&mut self, _error: &LoadError) {}

    /// Called when discovery is complete.
    fn on_collection_complete(&mut self, fixture_count: usize);

    /// Called after each fixture has run or been skipped.
    fn on_fixture_complete(&mut self, fixture: &Fixture, status: &FixtureStatus);

    /// Called once all fixtures have completed.
    fn on_run_complete(&mut self, summary: &BatchSummary);
}

/// Human-readable progress output.
///
/// Quiet mode prints one character per fixture; verbose mode prints one line per fixture with its timing. Failure
/// details follow every failing fixture in both modes.
pub struct ConsoleReporter<W> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<io::Stderr> {
    pub fn stderr(verbose: bool) -> Self {
        Self::new(io::stderr(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
        }
    }

    /// Disable ANSI colour codes.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    // Console output is best effort: a closed stderr must not abort the batch.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> FixtureReporter for ConsoleReporter<W> {
    fn on_load_error(&mut self, error: &LoadError) {
        let line = format!("\n{}\n", self.paint(RED, &error.to_string()));
        self.emit(&line);
    }

    fn on_collection_complete(&mut self, fixture_count: usize) {
        let header = self.paint(BOLD, "=================== fixture session starts ===================");
        let text = if fixture_count == 0 {
            format!("{header}\nno fixtures collected\n")
        } else {
            format!("{header}\ncollected {fixture_count} item(s)\n\n")
        };
        self.emit(&text);
    }

    fn on_fixture_complete(&mut self, fixture: &Fixture, status: &FixtureStatus) {
        let name = fixture.display_name();
        let mut text = match status {
            FixtureStatus::Ran { result, duration } => {
                let (code, long, short) = match result {
                    ExecutionResult::Pass => (GREEN, "PASSED", "."),
                    ExecutionResult::Fail(_) => (RED, "FAILED", "F"),
                    ExecutionResult::Error(_) => (RED, "ERROR", "E"),
                };
                if self.verbose {
                    format!("{name} {} ({}ms)\n", self.paint(code, long), duration.as_millis())
                } else {
                    self.paint(code, short)
                }
            }
            FixtureStatus::Skipped { reason } => {
                if self.verbose {
                    format!("{name} {} ({reason})\n", self.paint(YELLOW, "SKIPPED"))
                } else {
                    self.paint(YELLOW, "s")
                }
            }
        };

        if let FixtureStatus::Ran { result, .. } = status {
            if let Some(detail) = result.detail() {
                text.push_str(&format!("\n{}\n    {detail}\n", self.paint(RED, &name)));
            }
        }
        self.emit(&text);
    }

    fn on_run_complete(&mut self, summary: &BatchSummary) {
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(self.paint(GREEN, &format!("{} passed", summary.passed)));
        }
        if summary.failed > 0 {
            parts.push(self.paint(RED, &format!("{} failed", summary.failed)));
        }
        if summary.errored > 0 {
            parts.push(self.paint(RED, &format!("{} errors", summary.errored)));
        }
        if summary.skipped > 0 {
            parts.push(self.paint(YELLOW, &format!("{} skipped", summary.skipped)));
        }
        if parts.is_empty() {
            parts.push("nothing ran".to_string());
        }

        let lead = if self.verbose { "\n" } else { "\n\n" };
        let text = format!(
            "{lead}====== {} in {:.2}s ======\n",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        self.emit(&text);
    }
}

/// One serialized line of a JSON report.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum ReportEvent<'a> {
    Fixture {
        name: String,
        file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<&'a str>,
        outcome: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        duration_ms: u64,
    },
    LoadError {
        file: String,
        message: String,
    },
    Summary {
        total: usize,
        passed: usize,
        failed: usize,
        errored: usize,
        skipped: usize,
        duration_ms: u64,
    },
}

impl<'a> ReportEvent<'a> {
    pub(crate) fn fixture(fixture: &'a Fixture, status: &FixtureStatus) -> Self {
        let (outcome, reason, message, duration) = match status {
            FixtureStatus::Ran { result, duration } => {
                let reason = match result {
                    ExecutionResult::Pass => None,
                    ExecutionResult::Fail(reason) => Some(reason.kind()),
                    ExecutionResult::Error(fault) => Some(fault.kind.as_str()),
                };
                let message = match result {
                    ExecutionResult::Pass => None,
                    ExecutionResult::Fail(reason) => Some(reason.to_string()),
                    ExecutionResult::Error(fault) => Some(fault.message.clone()),
                };
                (result.label(), reason, message, duration.as_millis() as u64)
            }
            FixtureStatus::Skipped { reason } => ("skip", None, Some(reason.clone()), 0),
        };
        ReportEvent::Fixture {
            name: fixture.display_name(),
            file: fixture.path().display().to_string(),
            description: fixture.description(),
            outcome,
            reason,
            message,
            duration_ms: duration,
        }
    }

    pub(crate) fn summary(summary: &BatchSummary) -> Self {
        ReportEvent::Summary {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            errored: summary.errored,
            skipped: summary.skipped,
            duration_ms: summary.duration.as_millis() as u64,
        }
    }
}

/// Machine-readable output: one JSON object per line (JSON Lines), ending with a summary object.
pub struct JsonReporter<W> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &ReportEvent<'_>) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(err) = written {
            tracing::warn!(error = %err, "could not write JSON report line");
        }
    }
}

impl<W: Write> FixtureReporter for JsonReporter<W> {
    fn on_load_error(&mut self, error: &LoadError) {
        self.emit(&ReportEvent::LoadError {
            file: error.path().display().to_string(),
            message: error.to_string(),
        });
    }

    fn on_collection_complete(&mut self, _fixture_count: usize) {}

    fn on_fixture_complete(&mut self, fixture: &Fixture, status: &FixtureStatus) {
        self.emit(&ReportEvent::fixture(fixture, status));
    }

    fn on_run_complete(&mut self, summary: &BatchSummary) {
        self.emit(&ReportEvent::summary(summary));
        let _ = self.out.flush();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::harness::{FailReason, Fault, FaultKind};
    use std::time::Duration;

    /// Captures the callbacks a batch makes.
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        pub collected: Option<usize>,
        pub completed: Vec<String>,
        pub summary: Option<BatchSummary>,
    }

    impl FixtureReporter for RecordingReporter {
        fn on_collection_complete(&mut self, fixture_count: usize) {
            self.collected = Some(fixture_count);
        }

        fn on_fixture_complete(&mut self, _fixture: &Fixture, status: &FixtureStatus) {
            let label = match status {
                FixtureStatus::Ran { result, .. } => result.label(),
                FixtureStatus::Skipped { .. } => "skip",
            };
            self.completed.push(label.to_string());
        }

        fn on_run_complete(&mut self, summary: &BatchSummary) {
            self.summary = Some(summary.clone());
        }
    }

    fn ran(result: ExecutionResult, ms: u64) -> FixtureStatus {
        FixtureStatus::Ran {
            result,
            duration: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_json_lines() {
        let fixture = Fixture::from_source(
            "suite/S15.1.2.4.js",
            "/**\n * @path ch15/15.1/S15.1.2.4.js\n * @description escape is not enumerable\n */",
        );
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_fixture_complete(
            &fixture,
            &ran(
                ExecutionResult::Fail(FailReason::ReturnedNonTrue {
                    returned: "false".into(),
                }),
                3,
            ),
        );
        reporter.on_run_complete(&BatchSummary {
            total: 1,
            failed: 1,
            duration: Duration::from_millis(7),
            ..Default::default()
        });
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        insta::assert_snapshot!(output, @r#"
        {"event":"fixture","name":"ch15/15.1/S15.1.2.4.js","file":"suite/S15.1.2.4.js","description":"escape is not enumerable","outcome":"fail","reason":"returned_non_true","message":"Test case returned non-true value! (returned false)","duration_ms":3}
        {"event":"summary","total":1,"passed":0,"failed":1,"errored":0,"skipped":0,"duration_ms":7}
        "#);
    }

    #[test]
    fn test_json_error_and_skip_records() {
        let fixture = Fixture::from_source("a.js", "");
        let error = ReportEvent::fixture(
            &fixture,
            &ran(ExecutionResult::Error(Fault::new(FaultKind::Timeout, "timed out after 5 ms")), 5),
        );
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["outcome"], "error");
        assert_eq!(value["reason"], "timeout");
        assert_eq!(value["message"], "timed out after 5 ms");
        assert!(value.get("description").is_none());

        let skipped = ReportEvent::fixture(
            &fixture,
            &FixtureStatus::Skipped {
                reason: "onlyStrict".into(),
            },
        );
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["outcome"], "skip");
        assert_eq!(value["message"], "onlyStrict");
    }

    #[test]
    fn test_console_quiet_output() {
        let pass = Fixture::from_source("pass.js", "");
        let fail = Fixture::from_source("fail.js", "");
        let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
        reporter.on_collection_complete(2);
        reporter.on_fixture_complete(&pass, &ran(ExecutionResult::Pass, 1));
        reporter.on_fixture_complete(
            &fail,
            &ran(
                ExecutionResult::Fail(FailReason::Assertion {
                    message: "Test262Error: #1".into(),
                }),
                1,
            ),
        );
        reporter.on_run_complete(&BatchSummary {
            total: 2,
            passed: 1,
            failed: 1,
            duration: Duration::from_millis(1500),
            ..Default::default()
        });
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        insta::assert_snapshot!(output, @r"
        =================== fixture session starts ===================
        collected 2 item(s)

        .F
        fail.js
            Test262Error: #1


        ====== 1 passed, 1 failed in 1.50s ======
        ");
    }

    #[test]
    fn test_console_verbose_marks_skips() {
        let fixture = Fixture::from_source("strict.js", "");
        let mut reporter = ConsoleReporter::new(Vec::new(), true).with_color(false);
        reporter.on_fixture_complete(
            &fixture,
            &FixtureStatus::Skipped {
                reason: "onlyStrict".into(),
            },
        );
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "strict.js SKIPPED (onlyStrict)\n");
    }
}

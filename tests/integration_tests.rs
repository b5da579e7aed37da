//! Integration tests for the fixture runner
//!
//! Each test loads fixture files from `tests/fixtures/` and runs them through the public API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use t262::harness::{BatchOptions, FixtureReporter, FixtureStatus, JsonReporter, run_batch};
use t262::host::{AttributeOverride, HostValue};
use t262::{
    ConformantHost, DescriptorSource, ExecutionResult, FailReason, Fault, FaultKind, Fixture, FixtureRunner,
    LoadError, OverrideHost, RunnerConfig, load,
};

fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(rel)
}

fn load_fixture(rel: &str) -> Fixture {
    load(fixture_path(rel)).unwrap_or_else(|e| panic!("failed to load {rel}: {e}"))
}

fn enumerable_escape_host() -> OverrideHost<ConformantHost> {
    OverrideHost::new(ConformantHost).with_global_attributes(
        "escape",
        AttributeOverride {
            enumerable: Some(true),
            ..Default::default()
        },
    )
}

// ============================================================================
// The escape descriptor fixture
// ============================================================================

#[test]
fn test_escape_descriptor_passes_on_conformant_host() {
    let fixture = load_fixture("ch15/15.2.3.3-4-12.js");
    assert_eq!(fixture.display_name(), "ch15/15.2/15.2.3/15.2.3.3/15.2.3.3-4-12.js");
    assert_eq!(
        fixture.description(),
        Some("Object.getOwnPropertyDescriptor returns data desc for functions on built-ins (Global.escape)")
    );
    assert_eq!(t262::run(&fixture), ExecutionResult::Pass);
}

#[test]
fn test_escape_descriptor_as_seen_through_the_realm() {
    let mut realm = t262::runtime::Realm::new();
    t262::HostContext::install_globals(&ConformantHost, &mut realm);
    let desc = realm.own_property_descriptor(realm.global(), "escape").unwrap();
    assert!(desc.writable);
    assert!(!desc.enumerable);
    assert!(desc.configurable);
}

#[test]
fn test_escape_descriptor_fails_when_escape_is_enumerable() {
    let fixture = load_fixture("ch15/15.2.3.3-4-12.js");
    let result = FixtureRunner::new(enumerable_escape_host()).run(&fixture);
    assert_eq!(
        result,
        ExecutionResult::Fail(FailReason::ReturnedNonTrue {
            returned: "undefined".into()
        })
    );
}

#[test]
fn test_override_is_scoped_to_the_named_global() {
    let fixture = load_fixture("ch15/15.2.3.3-4-13.js");
    assert!(FixtureRunner::new(enumerable_escape_host()).run(&fixture).is_pass());
}

#[test]
fn test_missing_global_is_a_runtime_error() {
    let fixture = load_fixture("ch15/15.2.3.3-4-12.js");
    let host = OverrideHost::new(ConformantHost).without_global("escape");
    let result = FixtureRunner::new(host).run(&fixture);
    assert_eq!(
        result,
        ExecutionResult::Error(Fault::new(
            FaultKind::Runtime,
            "TypeError: Cannot read property 'value' of undefined"
        ))
    );
}

#[test]
fn test_host_defined_value_is_visible() {
    let host = OverrideHost::new(ConformantHost).with_global_value("hostName", HostValue::String("demo".into()));
    let fixture = Fixture::from_source("host.js", "runTestCase(function () { return hostName === 'demo'; });");
    assert!(FixtureRunner::new(host).run(&fixture).is_pass());
}

// ============================================================================
// Outcome mapping
// ============================================================================

#[test]
fn test_legacy_fixture_without_run_test_case() {
    assert!(t262::run(&load_fixture("ch15/S15.1.1.1_A2_T1.js")).is_pass());
}

#[test]
fn test_caught_type_error_passes() {
    assert!(t262::run(&load_fixture("ch15/15.2.3.6-4-1.js")).is_pass());
}

#[test]
fn test_returns_false_fails() {
    assert_eq!(
        t262::run(&load_fixture("harness/returns_false.js")),
        ExecutionResult::Fail(FailReason::ReturnedNonTrue {
            returned: "false".into()
        })
    );
}

#[test]
fn test_assertion_fails() {
    assert_eq!(
        t262::run(&load_fixture("harness/assertion.js")),
        ExecutionResult::Fail(FailReason::Assertion {
            message: "Test262Error: #1: 1 + 1 === 3. Actual: 2".into()
        })
    );
}

#[test]
fn test_negative_fixtures() {
    assert!(t262::run(&load_fixture("harness/negative_type_error.js")).is_pass());
    assert_eq!(
        t262::run(&load_fixture("harness/negative_not_thrown.js")),
        ExecutionResult::Fail(FailReason::NegativeNotThrown {
            expected: Some("ReferenceError".into())
        })
    );
}

#[test]
fn test_throwing_entry_point_is_an_error_and_runner_stays_usable() {
    let runner = FixtureRunner::default();
    let result = runner.run(&load_fixture("faults/throws_type_error.js"));
    assert_eq!(
        result,
        ExecutionResult::Error(Fault::new(
            FaultKind::Runtime,
            "TypeError: Cannot read property 'missing' of null"
        ))
    );
    assert!(runner.run(&load_fixture("ch15/15.2.3.3-4-12.js")).is_pass());
}

#[test]
fn test_syntax_error_is_an_error() {
    let result = t262::run(&load_fixture("faults/syntax_error.js"));
    assert!(matches!(result, ExecutionResult::Error(Fault { kind: FaultKind::Syntax, .. })), "{result}");
}

#[test]
fn test_infinite_loop_times_out() {
    let config = RunnerConfig::default()
        .with_max_steps(10_000)
        .with_timeout(Some(Duration::from_secs(30)));
    let result = FixtureRunner::default()
        .with_config(config)
        .run(&load_fixture("faults/infinite_loop.js"));
    assert_eq!(
        result,
        ExecutionResult::Error(Fault::new(FaultKind::Timeout, "step budget of 10000 exhausted"))
    );
}

#[test]
fn test_same_fixture_same_result() {
    let runner = FixtureRunner::default();
    for rel in [
        "ch15/15.2.3.3-4-12.js",
        "harness/returns_false.js",
        "harness/assertion.js",
        "faults/throws_type_error.js",
        "faults/syntax_error.js",
    ] {
        let fixture = load_fixture(rel);
        assert_eq!(runner.run(&fixture), runner.run(&fixture), "{rel}");
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_loading_missing_path_is_not_found() {
    let err = load(fixture_path("does/not/exist.js")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }), "{err}");
}

#[test]
fn test_loading_a_directory_is_an_io_error() {
    let err = load(fixture_path("ch15")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}

// ============================================================================
// Batch runs
// ============================================================================

#[derive(Default)]
struct Tally {
    statuses: Vec<(String, String)>,
}

impl FixtureReporter for Tally {
    fn on_collection_complete(&mut self, _fixture_count: usize) {}

    fn on_fixture_complete(&mut self, fixture: &Fixture, status: &FixtureStatus) {
        let label = match status {
            FixtureStatus::Ran { result, .. } => result.label(),
            FixtureStatus::Skipped { .. } => "skip",
        };
        let name = fixture.path().file_name().unwrap().to_string_lossy().to_string();
        self.statuses.push((name, label.to_string()));
    }

    fn on_run_complete(&mut self, _summary: &t262::harness::BatchSummary) {}
}

#[test]
fn test_batch_over_fixture_tree() {
    let config = RunnerConfig::default().with_max_steps(10_000);
    let runner = FixtureRunner::default().with_config(config);
    let mut tally = Tally::default();
    let summary = run_batch(&runner, &fixture_path(""), &BatchOptions::default(), &mut tally).unwrap();

    assert_eq!(summary.total, 12);
    assert_eq!(summary.passed, 5);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.errored, 3);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.is_success());

    let skipped: Vec<_> = tally.statuses.iter().filter(|(_, label)| label == "skip").collect();
    assert_eq!(skipped, vec![&("strict_only.js".to_string(), "skip".to_string())]);
}

#[test]
fn test_batch_json_report_ends_with_summary() {
    let runner = FixtureRunner::default();
    let options = BatchOptions {
        filter: Some("15.2.3.3".into()),
        ..Default::default()
    };
    let mut reporter = JsonReporter::new(Vec::new());
    let summary = run_batch(&runner, &fixture_path("ch15"), &options, &mut reporter).unwrap();
    assert!(summary.is_success());

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[..2].iter().all(|l| l["event"] == "fixture" && l["outcome"] == "pass"));
    assert_eq!(lines[2]["event"], "summary");
    assert_eq!(lines[2]["passed"], 2);
}

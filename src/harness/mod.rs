//! The fixture runner.
//!
//! [`FixtureRunner::run`] parses a fixture, builds a fresh realm through the configured [`HostContext`], injects the
//! harness bindings and evaluates the program under the configured limits. Every run produces exactly one
//! [`ExecutionResult`]; nothing escapes as a Rust error or panic.
//!
//! ## Structure
//! - `outcome.rs`: result types and the rules mapping a finished run onto them
//! - `bindings.rs`: `runTestCase`, `fnGlobalObject`, `$ERROR` and friends
//! - `batch.rs`: directory discovery and batch runs
//! - `reporter.rs`: console and JSON reporters for batch runs

mod batch;
mod bindings;
mod outcome;
mod reporter;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use t262_core::errors::{ErrorKind, ScriptError};
use t262_core::lang::errors as error_names;
use t262_syntax::diagnostics::line_col;
use t262_syntax::parser::parse_source;

use crate::config::RunnerConfig;
use crate::fixture::Fixture;
use crate::host::{ConformantHost, HostContext};
use crate::runtime::object::ObjectKind;
use crate::runtime::{Abrupt, HaltReason, Interpreter, Realm, Value};

pub use batch::{BatchOptions, BatchSummary, DiscoveryError, FIXTURE_EXTENSION, FixtureStatus, discover_fixtures, run_batch};
pub use outcome::{ExecutionResult, FailReason, Fault, FaultKind};
pub use reporter::{ConsoleReporter, FixtureReporter, JsonReporter};

use bindings::Recorder;
use outcome::{RawOutcome, classify};

/// Runs fixtures against realms populated by `H`.
///
/// ## Examples
/// ```rust
/// use t262::fixture::Fixture;
/// use t262::harness::FixtureRunner;
///
/// let fixture = Fixture::from_source("inline.js", "runTestCase(function () { return 1 + 1 === 2; });");
/// assert!(FixtureRunner::default().run(&fixture).is_pass());
/// ```
#[derive(Debug, Clone)]
pub struct FixtureRunner<H = ConformantHost> {
    host: H,
    config: RunnerConfig,
}

impl Default for FixtureRunner<ConformantHost> {
    fn default() -> Self {
        Self::new(ConformantHost)
    }
}

impl<H: HostContext> FixtureRunner<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: RunnerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `fixture` in a fresh realm and judge the outcome.
    ///
    /// Evaluation happens on a dedicated thread that starts with [`RunnerConfig::stack_size`] of stack and grows it
    /// on demand, so deep but bounded script recursion cannot overflow the caller's stack.
    #[tracing::instrument(skip_all, fields(fixture = %fixture.display_name(), host = self.host.name()))]
    pub fn run(&self, fixture: &Fixture) -> ExecutionResult {
        let start = Instant::now();
        let result = thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("t262-fixture".into())
                .stack_size(self.config.stack_size)
                .spawn_scoped(scope, || self.execute(fixture, start));
            match spawned {
                Ok(handle) => handle.join().unwrap_or_else(panicked),
                Err(err) => {
                    tracing::warn!(error = %err, "could not spawn fixture thread, running inline");
                    self.execute_inline(fixture, start)
                }
            }
        });
        tracing::debug!(outcome = result.label(), elapsed_ms = start.elapsed().as_millis() as u64, "fixture finished");
        result
    }

    /// [`Self::execute`] on the caller's thread, with panics caught the way a join would report them.
    fn execute_inline(&self, fixture: &Fixture, start: Instant) -> ExecutionResult {
        panic::catch_unwind(AssertUnwindSafe(|| self.execute(fixture, start))).unwrap_or_else(panicked)
    }

    fn execute(&self, fixture: &Fixture, start: Instant) -> ExecutionResult {
        let negative = fixture.metadata().negative.as_ref();
        let program = match parse_source(fixture.source()) {
            Ok(program) => program,
            Err(errors) => {
                let message = match errors.first() {
                    Some(first) => {
                        let (line, col) = line_col(fixture.source(), first.span.start);
                        format!("{line}:{col}: {}", first.message)
                    }
                    None => "source rejected".to_string(),
                };
                tracing::debug!(errors = errors.len(), "fixture failed to parse");
                return classify(RawOutcome::Rejected(message), &[], negative);
            }
        };

        let mut realm = Realm::new();
        self.host.install_globals(&mut realm);
        let recorder = Recorder::default();
        bindings::install(&mut realm, &recorder);

        let mut interp = Interpreter::new(realm, self.config.limits(start));
        let raw = match interp.run_program(&program) {
            Ok(()) => RawOutcome::Completed,
            Err(Abrupt::Throw(value)) => {
                let (rendered, assertion) = render_thrown(interp.realm(), &value);
                RawOutcome::Threw { rendered, assertion }
            }
            Err(Abrupt::Halt(reason)) => RawOutcome::Halted(self.halt_message(reason)),
        };
        tracing::trace!(steps = interp.steps(), "evaluation finished");
        classify(raw, &recorder.take(), negative)
    }

    fn halt_message(&self, reason: HaltReason) -> String {
        match reason {
            HaltReason::StepBudget => format!("step budget of {} exhausted", self.config.max_steps),
            HaltReason::Deadline => {
                let ms = self.config.timeout.map_or(0, |timeout| timeout.as_millis());
                format!("timed out after {ms} ms")
            }
        }
    }
}

/// `Name: message` for an escaped exception, plus whether it is a harness assertion.
fn render_thrown(realm: &Realm, value: &Value) -> (String, bool) {
    let Value::Object(id) = value else {
        let text = value.primitive_to_string().map(|s| s.to_string()).unwrap_or_default();
        return (text, false);
    };
    let id = *id;
    let is_error = matches!(realm.object(id).kind, ObjectKind::Error) || realm.is_error_of(id, ErrorKind::Error);
    if !is_error {
        return (format!("[object {}]", realm.class_name(id)), false);
    }

    let assertion = realm.is_error_of(id, ErrorKind::Test262Error);
    let name = realm.get(id, "name").primitive_to_string();
    let rendered = match name.as_deref().and_then(error_names::from_str) {
        Some(kind) => {
            let message = realm
                .get(id, "message")
                .primitive_to_string()
                .map(|s| s.to_string())
                .unwrap_or_default();
            ScriptError::new(kind, message).to_string()
        }
        None => realm.describe_error(id),
    };
    (rendered, assertion)
}

fn panicked(payload: Box<dyn Any + Send>) -> ExecutionResult {
    ExecutionResult::Error(Fault::new(
        FaultKind::Runtime,
        format!("runner panicked: {}", panic_message(payload.as_ref())),
    ))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{AttributeOverride, OverrideHost};
    use std::time::Duration;

    fn run(source: &str) -> ExecutionResult {
        FixtureRunner::default().run(&Fixture::from_source("inline.js", source))
    }

    struct PanickingHost;

    impl HostContext for PanickingHost {
        fn name(&self) -> &str {
            "panicking"
        }

        fn install_globals(&self, _realm: &mut Realm) {
            panic!("host exploded");
        }
    }

    #[test]
    fn test_host_panic_becomes_a_runtime_fault() {
        let fixture = Fixture::from_source("inline.js", "1;");
        let expected = ExecutionResult::Error(Fault::new(FaultKind::Runtime, "runner panicked: host exploded"));
        let runner = FixtureRunner::new(PanickingHost);
        assert_eq!(runner.run(&fixture), expected);
        // Same mapping when the fixture thread could not be spawned.
        assert_eq!(runner.execute_inline(&fixture, Instant::now()), expected);
    }

    #[test]
    fn test_long_operator_chain_is_a_syntax_fault() {
        let source = format!("var x = 1{};", "+1".repeat(400_000));
        let ExecutionResult::Error(fault) = run(&source) else {
            panic!("expected a syntax fault");
        };
        assert_eq!(fault.kind, FaultKind::Syntax);
        assert!(fault.message.contains("Nesting too deep"), "{}", fault.message);
    }

    #[test]
    fn test_unbounded_recursion_is_caught_at_the_clamped_depth() {
        let runner = FixtureRunner::default().with_config(RunnerConfig::default().with_max_call_depth(usize::MAX));
        let source = "var caught; function f() { f(); } try { f(); } catch (e) { caught = e instanceof RangeError; }\n\
                      runTestCase(function () { return caught; });";
        assert!(runner.run(&Fixture::from_source("recurse.js", source)).is_pass());
    }

    #[test]
    fn test_doubling_string_throws_range_error() {
        let source = "var s = 'x', caught = false;\n\
                      try { for (var i = 0; i < 40; i++) { s += s; } } catch (e) { caught = e instanceof RangeError && e.message === 'Invalid string length'; }\n\
                      runTestCase(function () { return caught; });";
        assert!(run(source).is_pass());
    }

    #[test]
    fn test_pass_fail_error() {
        assert!(run("runTestCase(function () { return true; });").is_pass());
        assert!(run("runTestCase(function () { return 'true'; });").is_fail());
        assert!(run("undefinedThing();").is_error());
    }

    #[test]
    fn test_uncaught_type_error_is_rendered() {
        assert_eq!(
            run("null.x;"),
            ExecutionResult::Error(Fault::new(
                FaultKind::Runtime,
                "TypeError: Cannot read property 'x' of null"
            ))
        );
    }

    #[test]
    fn test_assertion_is_a_fail() {
        assert_eq!(
            run("$ERROR('#1: wrong');"),
            ExecutionResult::Fail(FailReason::Assertion {
                message: "Test262Error: #1: wrong".into()
            })
        );
    }

    #[test]
    fn test_thrown_primitives_and_objects() {
        assert_eq!(run("throw 'oops';"), ExecutionResult::Error(Fault::new(FaultKind::Runtime, "oops")));
        assert_eq!(
            run("throw {};"),
            ExecutionResult::Error(Fault::new(FaultKind::Runtime, "[object Object]"))
        );
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let ExecutionResult::Error(fault) = run("var = 1;") else {
            panic!("expected a syntax fault");
        };
        assert_eq!(fault.kind, FaultKind::Syntax);
        assert!(fault.message.starts_with("1:"), "{}", fault.message);
    }

    #[test]
    fn test_step_budget_halts() {
        let runner = FixtureRunner::default().with_config(RunnerConfig::default().with_max_steps(500));
        let result = runner.run(&Fixture::from_source("loop.js", "try { while (true) {} } catch (e) {}"));
        assert_eq!(
            result,
            ExecutionResult::Error(Fault::new(FaultKind::Timeout, "step budget of 500 exhausted"))
        );
    }

    #[test]
    fn test_deadline_halts() {
        let config = RunnerConfig::default()
            .with_max_steps(u64::MAX)
            .with_timeout(Some(Duration::from_millis(20)));
        let runner = FixtureRunner::default().with_config(config);
        let result = runner.run(&Fixture::from_source("loop.js", "for (;;) {}"));
        assert_eq!(result, ExecutionResult::Error(Fault::new(FaultKind::Timeout, "timed out after 20 ms")));
    }

    #[test]
    fn test_host_is_consulted_for_each_run() {
        let source = "runTestCase(function () { return !fnGlobalObject().propertyIsEnumerable('escape'); });";
        let fixture = Fixture::from_source("escape.js", source);
        assert!(FixtureRunner::default().run(&fixture).is_pass());

        let host = OverrideHost::new(ConformantHost).with_global_attributes(
            "escape",
            AttributeOverride {
                enumerable: Some(true),
                ..Default::default()
            },
        );
        assert!(FixtureRunner::new(host).run(&fixture).is_fail());
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let runner = FixtureRunner::default();
        let first = Fixture::from_source("a.js", "var leaked = 1; Object.prototype.polluted = true;");
        let second = Fixture::from_source(
            "b.js",
            "runTestCase(function () { return typeof leaked === 'undefined' && !({}).polluted; });",
        );
        assert!(runner.run(&first).is_pass());
        assert!(runner.run(&second).is_pass());
    }
}

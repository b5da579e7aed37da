//! Property-based tests for the fixture runner
//!
//! These tests use proptest to check that every run terminates with exactly one outcome and that outcomes do
//! not depend on anything but the fixture text.

use proptest::prelude::*;
use t262::{ExecutionResult, Fixture, FixtureRunner, RunnerConfig};

fn runner() -> FixtureRunner {
    FixtureRunner::default().with_config(RunnerConfig::default().with_max_steps(20_000))
}

/// Small statements over a handful of names, including ones that throw, loop or do not parse.
fn statement() -> impl Strategy<Value = String> {
    let name = prop_oneof![Just("a"), Just("b"), Just("o"), Just("escape"), Just("missing")];
    let literal = prop_oneof![
        Just("0".to_string()),
        Just("1".to_string()),
        Just("'s'".to_string()),
        Just("null".to_string()),
        Just("{}".to_string()),
        Just("[1, 2]".to_string()),
        (-5i32..5).prop_map(|n| n.to_string()),
    ];
    prop_oneof![
        (name.clone(), literal.clone()).prop_map(|(n, l)| format!("var {n} = {l};")),
        (name.clone(), name.clone()).prop_map(|(a, b)| format!("{a} = {b} + 1;")),
        name.clone().prop_map(|n| format!("{n}.x = {n};")),
        name.clone().prop_map(|n| format!("delete {n};")),
        name.clone().prop_map(|n| format!("{n}();")),
        literal.clone().prop_map(|l| format!("throw {l};")),
        Just("while (true) {}".to_string()),
        Just("for (var k in this) { a = k; }".to_string()),
        Just("$ERROR('x');".to_string()),
        Just("runTestCase(function () { return true; });".to_string()),
        Just("runTestCase(function () { return a; });".to_string()),
        Just("function f() { return f(); } f();".to_string()),
        Just("var = ;".to_string()),
    ]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(statement(), 0..8).prop_map(|stmts| stmts.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every run terminates and yields a result; a second run of the same text yields the same one.
    #[test]
    fn prop_run_is_total_and_deterministic(source in program()) {
        let fixture = Fixture::from_source("generated.js", source);
        let runner = runner();
        let first = runner.run(&fixture);
        let second = runner.run(&fixture);
        prop_assert!(matches!(first, ExecutionResult::Pass | ExecutionResult::Fail(_) | ExecutionResult::Error(_)));
        prop_assert_eq!(first, second);
    }

    /// A fixture whose only call returns `true` passes, whatever inert declarations precede it.
    #[test]
    fn prop_true_entry_point_passes(names in prop::collection::vec("[a-z]{1,6}", 0..5)) {
        let decls: String = names.iter().map(|n| format!("var {n}_v = 1;\n")).collect();
        let source = format!("{decls}function testcase() {{ return true; }}\nrunTestCase(testcase);");
        prop_assert_eq!(runner().run(&Fixture::from_source("t.js", source)), ExecutionResult::Pass);
    }

    /// Header parsing never fails and round-trips a description.
    #[test]
    fn prop_description_is_read(words in prop::collection::vec("[A-Za-z0-9]{1,8}", 1..6)) {
        let description = words.join(" ");
        let source = format!("/**\n * @description {description}\n */\nvar x;");
        let fixture = Fixture::from_source("d.js", source);
        prop_assert_eq!(fixture.description(), Some(description.as_str()));
    }
}

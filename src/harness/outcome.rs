//! Fixture outcomes and how a finished run maps onto them.

use std::fmt;

use t262_core::errors::NON_TRUE_RESULT_MSG;
use t262_syntax::frontmatter::Negative;

/// Outcome of running one fixture. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Pass,
    Fail(FailReason),
    Error(Fault),
}

impl ExecutionResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ExecutionResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, ExecutionResult::Fail(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExecutionResult::Error(_))
    }

    /// `"pass"`, `"fail"` or `"error"`.
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionResult::Pass => "pass",
            ExecutionResult::Fail(_) => "fail",
            ExecutionResult::Error(_) => "error",
        }
    }

    /// Human-readable explanation for anything but a pass.
    pub fn detail(&self) -> Option<String> {
        match self {
            ExecutionResult::Pass => None,
            ExecutionResult::Fail(reason) => Some(reason.to_string()),
            ExecutionResult::Error(fault) => Some(fault.to_string()),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {detail}", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

/// Why a fixture failed (as opposed to erroring).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// `runTestCase` received something other than `true`.
    ReturnedNonTrue { returned: String },
    /// `$ERROR`/`$FAIL` threw a `Test262Error` that nothing caught.
    Assertion { message: String },
    /// A `@negative` fixture completed normally.
    NegativeNotThrown { expected: Option<String> },
    /// A `@negative` fixture threw, but not what the header asked for.
    NegativeMismatch { expected: String, actual: String },
}

impl FailReason {
    pub fn kind(&self) -> &'static str {
        match self {
            FailReason::ReturnedNonTrue { .. } => "returned_non_true",
            FailReason::Assertion { .. } => "assertion",
            FailReason::NegativeNotThrown { .. } => "negative_not_thrown",
            FailReason::NegativeMismatch { .. } => "negative_mismatch",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::ReturnedNonTrue { returned } => write!(f, "{NON_TRUE_RESULT_MSG} (returned {returned})"),
            FailReason::Assertion { message } => f.write_str(message),
            FailReason::NegativeNotThrown { expected: Some(expected) } => {
                write!(f, "expected an uncaught {expected}, but the fixture completed normally")
            }
            FailReason::NegativeNotThrown { expected: None } => {
                f.write_str("expected an uncaught error, but the fixture completed normally")
            }
            FailReason::NegativeMismatch { expected, actual } => {
                write!(f, "expected an uncaught error matching '{expected}', got {actual}")
            }
        }
    }
}

/// An execution fault: the fixture could not be judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.describe(), self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The source did not lex or parse.
    Syntax,
    /// An exception other than `Test262Error` escaped the fixture.
    Runtime,
    /// The step budget or the deadline ran out.
    Timeout,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::Syntax => "syntax",
            FaultKind::Runtime => "runtime",
            FaultKind::Timeout => "timeout",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FaultKind::Syntax => "syntax error",
            FaultKind::Runtime => "uncaught exception",
            FaultKind::Timeout => "timeout",
        }
    }
}

/// How evaluation ended, before the fixture's expectations are applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawOutcome {
    Completed,
    /// The source was rejected; carries the first diagnostic.
    Rejected(String),
    /// An exception escaped; `rendered` is its `Name: message` form.
    Threw { rendered: String, assertion: bool },
    Halted(String),
}

/// Apply the outcome rules: syntax and runtime faults are errors, assertions and non-`true` results are
/// failures, and `@negative` fixtures invert the sense of an uncaught error.
pub(crate) fn classify(raw: RawOutcome, returned: &[Option<String>], negative: Option<&Negative>) -> ExecutionResult {
    match (raw, negative) {
        // A halted run says nothing about the fixture, negative or not.
        (RawOutcome::Halted(message), _) => ExecutionResult::Error(Fault::new(FaultKind::Timeout, message)),
        (RawOutcome::Completed, Some(negative)) => ExecutionResult::Fail(FailReason::NegativeNotThrown {
            expected: negative.pattern.clone(),
        }),
        (RawOutcome::Rejected(message), Some(negative)) => expect_negative(negative, format!("SyntaxError: {message}")),
        (RawOutcome::Threw { rendered, .. }, Some(negative)) => expect_negative(negative, rendered),
        (RawOutcome::Rejected(message), None) => ExecutionResult::Error(Fault::new(FaultKind::Syntax, message)),
        (
            RawOutcome::Threw {
                rendered,
                assertion: true,
            },
            None,
        ) => ExecutionResult::Fail(FailReason::Assertion { message: rendered }),
        (RawOutcome::Threw { rendered, .. }, None) => ExecutionResult::Error(Fault::new(FaultKind::Runtime, rendered)),
        (RawOutcome::Completed, None) => match returned.iter().flatten().next() {
            Some(value) => ExecutionResult::Fail(FailReason::ReturnedNonTrue {
                returned: value.clone(),
            }),
            None => ExecutionResult::Pass,
        },
    }
}

/// A `@negative` fixture threw `actual`; pass unless the header names an error it does not contain.
fn expect_negative(negative: &Negative, actual: String) -> ExecutionResult {
    match &negative.pattern {
        Some(expected) if !actual.contains(expected.as_str()) => ExecutionResult::Fail(FailReason::NegativeMismatch {
            expected: expected.clone(),
            actual,
        }),
        _ => ExecutionResult::Pass,
    }
}

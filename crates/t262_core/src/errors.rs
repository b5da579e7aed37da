//! Canonical error taxonomy shared by the runtime and the harness.
//!
//! Script-level errors are identified by [`ErrorKind`]; their constructor names and descriptions live in the
//! [`crate::lang::errors`] registry. [`ScriptError`] is the `Name: message` rendering used in reports, so that a
//! thrown `TypeError` reads the same whether it came from a builtin or from fixture code.

use std::fmt;

/// Builtin error constructors known to the runtime and harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    ReferenceError,
    SyntaxError,
    RangeError,
    /// Raised by `$ERROR` / `$FAIL`: an assertion failure, not an engine fault.
    Test262Error,
}

impl ErrorKind {
    /// Constructor name, e.g. `"TypeError"`.
    pub fn name(self) -> &'static str {
        crate::lang::errors::as_str(self)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error value rendered the way `Error.prototype.toString` renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ScriptError {}

/// Message thrown (as a `RangeError`) when the call-depth limit is reached.
pub const CALL_STACK_EXCEEDED_MSG: &str = "Maximum call stack size exceeded";

/// Message thrown (as a `RangeError`) when a string would exceed [`crate::strings::MAX_STRING_LENGTH`].
pub const INVALID_STRING_LENGTH_MSG: &str = "Invalid string length";

/// Message recorded when `runTestCase` receives a non-`true` result.
pub const NON_TRUE_RESULT_MSG: &str = "Test case returned non-true value!";

//! Builtin error constructor vocabulary.
//!
//! This registry exists so the runtime, the harness and diagnostics agree on constructor names (and so docs can
//! list them alongside keywords and operators).

use crate::errors::ErrorKind;

use super::registry::{Edition, Example, LangItemInfo, Stability};

/// Metadata for a builtin error kind.
pub type ErrorKindInfo = LangItemInfo<ErrorKind>;

const fn info(
    id: ErrorKind,
    canonical: &'static str,
    description: &'static str,
    introduced_in: Edition,
    examples: &'static [Example],
) -> ErrorKindInfo {
    LangItemInfo {
        id,
        canonical,
        description,
        introduced_in,
        stability: Stability::Stable,
        examples,
    }
}

/// Registry of builtin error kinds, in [`ErrorKind`] order.
pub const ERROR_KINDS: &[ErrorKindInfo] = &[
    info(
        ErrorKind::Error,
        "Error",
        "Base constructor for every builtin error.",
        Edition::Es1,
        &[],
    ),
    info(
        ErrorKind::TypeError,
        "TypeError",
        "Raised when an operand or argument has an inappropriate type.",
        Edition::Es3,
        &[Example {
            code: "var x = 1; x();",
            note: Some("Throws `TypeError: x is not a function`."),
        }],
    ),
    info(
        ErrorKind::ReferenceError,
        "ReferenceError",
        "Raised when reading an unresolvable identifier.",
        Edition::Es3,
        &[Example {
            code: "missing + 1;",
            note: Some("Throws `ReferenceError: missing is not defined`."),
        }],
    ),
    info(
        ErrorKind::SyntaxError,
        "SyntaxError",
        "Raised when fixture source text cannot be parsed.",
        Edition::Es3,
        &[],
    ),
    info(
        ErrorKind::RangeError,
        "RangeError",
        "Raised when a value is outside the allowed range, including exhausted call depth.",
        Edition::Es3,
        &[],
    ),
    info(
        ErrorKind::Test262Error,
        "Test262Error",
        "Raised by `$ERROR` and `$FAIL` to report an assertion failure.",
        Edition::Harness,
        &[Example {
            code: "if (1 !== 1) { $ERROR('math is broken'); }",
            note: None,
        }],
    ),
];

/// Metadata for `kind`.
pub fn info_for(kind: ErrorKind) -> &'static ErrorKindInfo {
    &ERROR_KINDS[kind as usize]
}

/// Constructor name of `kind`.
pub fn as_str(kind: ErrorKind) -> &'static str {
    info_for(kind).canonical
}

/// Lookup by constructor name.
pub fn from_str(s: &str) -> Option<ErrorKind> {
    ERROR_KINDS.iter().find(|e| e.canonical == s).map(|e| e.id)
}

//! Harness vocabulary: names the runner injects into a fixture's global scope, the fixture entry point, and the
//! header tags a fixture may carry.
//!
//! ## Examples
//! ```rust
//! use t262_core::lang::harness::{self, HarnessBindingId, FixtureTagId};
//!
//! assert_eq!(harness::binding_name(HarnessBindingId::RunTestCase), "runTestCase");
//! assert_eq!(harness::tag_from_str("description"), Some(FixtureTagId::Description));
//! assert_eq!(harness::ENTRY_POINT, "testcase");
//! ```

use super::registry::{Edition, LangItemInfo, Stability};

/// Name of the function whose return value decides a fixture's outcome.
pub const ENTRY_POINT: &str = "testcase";

/// Stable identifier for every injected harness binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarnessBindingId {
    /// `fnGlobalObject()`: returns the realm's global object.
    FnGlobalObject,
    /// `runTestCase(fn)`: calls `fn` and records whether it returned `true`.
    RunTestCase,
    /// `$ERROR(message)`: throws a `Test262Error`.
    Error,
    /// `$FAIL(message)`: throws a `Test262Error`.
    Fail,
    /// `$PRINT(message)`: diagnostic output.
    Print,
    /// `fnExists(...)`: `true` if every argument is a function.
    FnExists,
    /// `Test262Error(message)`: the assertion error constructor.
    Test262Error,
}

/// Metadata for a harness binding.
pub type HarnessBindingInfo = LangItemInfo<HarnessBindingId>;

const fn binding(id: HarnessBindingId, canonical: &'static str, description: &'static str) -> HarnessBindingInfo {
    LangItemInfo {
        id,
        canonical,
        description,
        introduced_in: Edition::Harness,
        stability: Stability::Stable,
        examples: &[],
    }
}

/// Registry of injected bindings, in [`HarnessBindingId`] order.
pub const BINDINGS: &[HarnessBindingInfo] = &[
    binding(
        HarnessBindingId::FnGlobalObject,
        "fnGlobalObject",
        "Return the global object of the realm the fixture runs in.",
    ),
    binding(
        HarnessBindingId::RunTestCase,
        "runTestCase",
        "Invoke the entry point and record whether it returned exactly `true`.",
    ),
    binding(HarnessBindingId::Error, "$ERROR", "Throw a Test262Error with the given message."),
    binding(HarnessBindingId::Fail, "$FAIL", "Throw a Test262Error with the given message."),
    binding(HarnessBindingId::Print, "$PRINT", "Write a diagnostic message to the runner log."),
    binding(
        HarnessBindingId::FnExists,
        "fnExists",
        "Return `true` when every argument is callable.",
    ),
    binding(
        HarnessBindingId::Test262Error,
        "Test262Error",
        "Constructor for assertion failures raised by the harness.",
    ),
];

/// Global name of `id`.
pub fn binding_name(id: HarnessBindingId) -> &'static str {
    BINDINGS[id as usize].canonical
}

/// Lookup a binding by global name.
pub fn binding_from_str(s: &str) -> Option<HarnessBindingId> {
    BINDINGS.iter().find(|b| b.canonical == s).map(|b| b.id)
}

/// Stable identifier for fixture header tags (`@path`, `@description`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureTagId {
    Path,
    Description,
    /// The fixture is expected to end with an uncaught error, optionally naming it.
    Negative,
    OnlyStrict,
    NoStrict,
}

/// Metadata for a fixture header tag.
#[derive(Debug, Clone, Copy)]
pub struct FixtureTagInfo {
    pub id: FixtureTagId,
    /// Tag spelling without the leading `@`.
    pub canonical: &'static str,
    /// Whether the tag carries text after its name.
    pub takes_value: bool,
    pub stability: Stability,
}

/// Registry of header tags, in [`FixtureTagId`] order.
pub const TAGS: &[FixtureTagInfo] = &[
    FixtureTagInfo {
        id: FixtureTagId::Path,
        canonical: "path",
        takes_value: true,
        stability: Stability::Stable,
    },
    FixtureTagInfo {
        id: FixtureTagId::Description,
        canonical: "description",
        takes_value: true,
        stability: Stability::Stable,
    },
    FixtureTagInfo {
        id: FixtureTagId::Negative,
        canonical: "negative",
        takes_value: true,
        stability: Stability::Stable,
    },
    FixtureTagInfo {
        id: FixtureTagId::OnlyStrict,
        canonical: "onlyStrict",
        takes_value: false,
        stability: Stability::Legacy,
    },
    FixtureTagInfo {
        id: FixtureTagId::NoStrict,
        canonical: "noStrict",
        takes_value: false,
        stability: Stability::Legacy,
    },
];

/// Spelling of `id` without the leading `@`.
pub fn tag_name(id: FixtureTagId) -> &'static str {
    TAGS[id as usize].canonical
}

/// Lookup a tag by spelling (without the leading `@`).
pub fn tag_from_str(s: &str) -> Option<FixtureTagId> {
    TAGS.iter().find(|t| t.canonical == s).map(|t| t.id)
}

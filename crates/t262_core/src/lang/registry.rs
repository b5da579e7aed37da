//! Shareable metadata for `t262_core::lang` registries.
//!
//! Every vocabulary in `t262_core::lang` (keywords, operators, punctuation, error kinds, harness bindings) is a
//! `const` table of small `Copy` records. This submodule provides the metadata types those tables share.
//!
//! ## Notes
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules lives in the lexer/parser.
//! - Registries keep their entries in the same order as their id enum, so `TABLE[id as usize]` is the entry for
//!   `id`. The guardrail tests in `tests/lang_registry_guardrails.rs` pin that ordering.

/// Identify the language edition that introduced a vocabulary item.
///
/// ## Examples
/// ```rust
/// use t262_core::lang::registry::Edition;
///
/// assert_eq!(Edition::Es5.as_str(), "ES5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edition {
    Es1,
    Es3,
    Es5,
    /// Not part of the language: provided by the conformance harness.
    Harness,
}

impl Edition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Edition::Es1 => "ES1",
            Edition::Es3 => "ES3",
            Edition::Es5 => "ES5",
            Edition::Harness => "harness",
        }
    }
}

/// Describe the lifecycle status of a vocabulary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    /// Present for compatibility with older fixtures; new fixtures should not rely on it.
    Legacy,
}

/// A small example snippet for documentation.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

/// Shared metadata shape for registry-first vocabulary items.
///
/// Registries that need extra per-item data (operator precedence, keyword category) wrap their own info type
/// instead.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub description: &'static str,
    pub introduced_in: Edition,
    pub stability: Stability,
    pub examples: &'static [Example],
}

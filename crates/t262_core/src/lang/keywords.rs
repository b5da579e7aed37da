//! Define the reserved keyword vocabulary of the fixture script subset.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) recording spellings, categories and the edition that introduced them.
//!
//! ## Notes
//! - Lookup via [`from_str`] is case-sensitive.
//! - `undefined`, `NaN` and `Infinity` are *not* keywords: they are properties of the global object.
//! - Some reserved words are also operators (`typeof`, `in`, `instanceof`). For precedence use
//!   [`crate::lang::operators`].
//!
//! ## Examples
//! ```rust
//! use t262_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("function"), Some(KeywordId::Function));
//! assert_eq!(keywords::as_str(KeywordId::Typeof), "typeof");
//! assert_eq!(keywords::from_str("undefined"), None);
//! ```

use super::registry::{Edition, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Var,
    Function,

    // Control flow
    Return,
    If,
    Else,
    While,
    Do,
    For,
    In,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Finally,

    // Operators spelled as words
    New,
    Delete,
    Typeof,
    Void,
    Instanceof,

    // Literals / receivers
    This,
    True,
    False,
    Null,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    ControlFlow,
    Operator,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub introduced_in: Edition,
    pub stability: Stability,
}

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, introduced_in: Edition) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        introduced_in,
        stability: Stability::Stable,
    }
}

/// Registry of all keywords, in [`KeywordId`] order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Var, "var", KeywordCategory::Declaration, Edition::Es1),
    info(KeywordId::Function, "function", KeywordCategory::Declaration, Edition::Es1),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow, Edition::Es3),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::In, "in", KeywordCategory::Operator, Edition::Es1),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, Edition::Es1),
    info(KeywordId::Throw, "throw", KeywordCategory::ControlFlow, Edition::Es3),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow, Edition::Es3),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow, Edition::Es3),
    info(KeywordId::Finally, "finally", KeywordCategory::ControlFlow, Edition::Es3),
    info(KeywordId::New, "new", KeywordCategory::Operator, Edition::Es1),
    info(KeywordId::Delete, "delete", KeywordCategory::Operator, Edition::Es1),
    info(KeywordId::Typeof, "typeof", KeywordCategory::Operator, Edition::Es1),
    info(KeywordId::Void, "void", KeywordCategory::Operator, Edition::Es1),
    info(KeywordId::Instanceof, "instanceof", KeywordCategory::Operator, Edition::Es3),
    info(KeywordId::This, "this", KeywordCategory::Literal, Edition::Es1),
    info(KeywordId::True, "true", KeywordCategory::Literal, Edition::Es1),
    info(KeywordId::False, "false", KeywordCategory::Literal, Edition::Es1),
    info(KeywordId::Null, "null", KeywordCategory::Literal, Edition::Es1),
];

/// Metadata for `id`.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Canonical spelling of `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if `s` is a reserved word of the subset.
/// - `None` otherwise (including identifiers that merely look special, like `undefined`).
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_operators_are_keywords() {
        for spelling in ["typeof", "in", "instanceof", "delete", "void", "new"] {
            let id = from_str(spelling).unwrap();
            assert_eq!(info_for(id).category, KeywordCategory::Operator, "{spelling}");
        }
    }

    #[test]
    fn test_global_value_names_are_not_reserved() {
        assert_eq!(from_str("undefined"), None);
        assert_eq!(from_str("NaN"), None);
        assert_eq!(from_str("Infinity"), None);
    }
}

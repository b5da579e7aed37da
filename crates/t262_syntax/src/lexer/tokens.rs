//! Token types for the fixture lexer.
//!
//! The lexer uses registry-backed IDs for vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for symbol operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Every token records whether a line terminator preceded it. The parser needs this for automatic semicolon
//!   insertion and for the restricted productions (`return`, `throw`, postfix `++`/`--`).

use crate::ast::Span;
use t262_core::lang::keywords::{self, KeywordId};
use t262_core::lang::operators::OperatorId;
use t262_core::lang::punctuation::PunctuationId;

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    Ident(String),
    Number(f64),
    String(String),

    Eof,
}

/// A token with its kind, source span and line-break flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator (or a comment containing one) appeared between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            newline_before: false,
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

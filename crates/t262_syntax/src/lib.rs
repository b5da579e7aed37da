//! Syntax frontend for t262 fixtures: lexer, parser, AST, fixture headers and diagnostics.
//!
//! This crate is dependency-light and syntax-only: it does not resolve names or evaluate anything. The runtime in
//! the `t262` crate walks the [`ast::Program`] produced here.
//!
//! ## Notes
//! - Vocabulary identity (keywords/operators/punctuation) comes from `t262_core::lang` registries.
//! - Fixture header parsing ([`frontmatter`]) works on raw source text and never fails; a fixture without a header
//!   simply has empty metadata.
//!
//! ## Examples
//! ```rust
//! use t262_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("function testcase() { return true; }\nrunTestCase(testcase);").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.body.len(), 2);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod frontmatter;
pub mod lexer;
pub mod parser;
pub mod token_helpers;

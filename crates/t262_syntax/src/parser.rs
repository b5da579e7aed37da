//! Parser for the fixture script subset
//!
//! Converts a token stream into an AST. Statements end with `;` or by automatic semicolon insertion at a line break,
//! a closing `}`, or the end of input.
//!
//! ## Examples
//!
//! ```rust
//! use t262_syntax::{lexer, parser};
//!
//! let source = "var x = 1\nx += 2";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.body.len(), 2);
//! ```

use std::rc::Rc;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use t262_core::lang::keywords::KeywordId;
use t262_core::lang::operators::{self, Fixity, OperatorId};
use t262_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");

//! Shared, pure vocabulary and value semantics for the t262 fixture runner.
//!
//! This crate is intentionally small and dependency-free. Both the syntax frontend (`t262_syntax`) and the
//! runtime/harness (`t262`) resolve spellings through it, so a keyword, an error constructor name or a harness
//! binding is spelled in exactly one place.
//!
//! ## Notes
//! - No IO, no global state, no AST or runtime types.
//! - [`numbers`] and [`strings`] hold the value conversions that must agree between the parser and the runtime.

pub mod errors;
pub mod lang;
pub mod numbers;
pub mod strings;

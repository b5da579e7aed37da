//! Fixture-language vocabulary registries.
//!
//! This module is the front door for vocabulary shared by the lexer, parser, runtime and harness: reserved
//! keywords, operators, punctuation, builtin error names and injected harness bindings.
//!
//! Callers work with stable IDs (`KeywordId`, `OperatorId`, `HarnessBindingId`) and look up spellings through the
//! registry tables instead of scattering string literals.
//!
//! ## Notes
//! - Registries are pure: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata.

pub mod errors;
pub mod harness;
pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;

#![forbid(unsafe_code)]
//! t262: a conformance fixture runner for test262-style script fixtures
//!
//! A fixture is a small script with a structured header comment. The runner loads it, builds a fresh realm through
//! an injectable [`HostContext`](host::HostContext), injects the harness bindings (`fnGlobalObject`,
//! `runTestCase`, `$ERROR`, ...) and evaluates it with a bounded tree-walking interpreter. Every run yields exactly
//! one [`ExecutionResult`](harness::ExecutionResult).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Script faults**: Anything a fixture can do wrong surfaces as a script exception or an `Error` outcome, never
//!   as a Rust panic.
//!
//! ## Examples
//! ```rust
//! use t262::{ConformantHost, Fixture, FixtureRunner};
//!
//! let source = r#"
//! /**
//!  * @path ch15/15.1/15.1.2/S15.1.2.4.js
//!  * @description escape is writable, non-enumerable and configurable
//!  */
//! function testcase() {
//!     var desc = Object.getOwnPropertyDescriptor(fnGlobalObject(), "escape");
//!     return desc.writable === true && desc.enumerable === false && desc.configurable === true;
//! }
//! runTestCase(testcase);
//! "#;
//! let fixture = Fixture::from_source("S15.1.2.4.js", source);
//! assert!(FixtureRunner::new(ConformantHost).run(&fixture).is_pass());
//! ```

pub mod cli;
pub mod config;
pub mod fixture;
pub mod harness;
pub mod host;
pub mod runtime;

pub use config::RunnerConfig;
pub use fixture::{Fixture, LoadError, load};
pub use harness::{ExecutionResult, FailReason, Fault, FaultKind, FixtureRunner};
pub use host::{ConformantHost, HostContext, OverrideHost};
pub use runtime::{DescriptorSource, PropertyDescriptor};

/// Run `fixture` against the conformant host with default limits.
pub fn run(fixture: &Fixture) -> ExecutionResult {
    FixtureRunner::new(ConformantHost).run(fixture)
}

//! CLI module for the t262 fixture runner
//!
//! ## Commands
//!
//! - `run <file>` - Run one fixture and print its outcome
//! - `test [path]` - Run every fixture under a path (pytest-style or JSON Lines output)
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS, DEFAULT_TIMEOUT, MAX_CALL_DEPTH, RunnerConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Conformance fixture runner for test262-style script fixtures
#[derive(Parser, Debug)]
#[command(name = "t262")]
#[command(version = VERSION)]
#[command(about = "Run test262-style conformance fixtures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE")]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE")]
    pub parse_file: Option<PathBuf>,

    /// Print the fixture header metadata (debug)
    #[arg(long = "meta", value_name = "FILE")]
    pub meta_file: Option<PathBuf>,
}

/// Execution limits shared by `run` and `test`.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitArgs {
    /// Wall-clock budget per fixture in milliseconds (0 disables)
    #[arg(long = "timeout-ms", value_name = "MS", default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,
    /// Statements and calls a fixture may execute
    #[arg(long = "max-steps", value_name = "N", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: u64,
    /// Nested calls allowed before a RangeError is thrown (1 to 10000)
    #[arg(
        long = "max-call-depth",
        value_name = "N",
        default_value_t = DEFAULT_MAX_CALL_DEPTH as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_CALL_DEPTH as u64)
    )]
    pub max_call_depth: u64,
}

impl LimitArgs {
    pub fn config(&self) -> RunnerConfig {
        let timeout = (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms));
        RunnerConfig::default()
            .with_timeout(timeout)
            .with_max_steps(self.max_steps)
            .with_max_call_depth(usize::try_from(self.max_call_depth).unwrap_or(MAX_CALL_DEPTH))
    }
}

/// Batch report format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// pytest-style progress on stderr
    #[default]
    Console,
    /// One JSON object per line on stdout
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single fixture
    Run {
        /// Fixture file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Run every fixture under a path (pytest-style)
    Test {
        /// Fixture file or directory
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Only run fixtures whose name contains EXPR
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
        /// Run @onlyStrict fixtures instead of skipping them
        #[arg(long)]
        include_strict: bool,
        #[command(flatten)]
        limits: LimitArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file);
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file);
    }
    if let Some(file) = cli.meta_file {
        return commands::show_metadata(&file);
    }

    match cli.command {
        Some(Command::Run { file, limits }) => commands::run_fixture(&file, limits.config()),
        Some(Command::Test {
            path,
            verbose,
            stop_on_fail,
            filter,
            format,
            include_strict,
            limits,
        }) => {
            let options = crate::harness::BatchOptions {
                filter,
                stop_on_fail,
                include_strict,
            };
            commands::run_fixtures(&path, &options, format, verbose, limits.config())
        }
        // No command - nothing to do
        None => Err(CliError::failure("no command given; try `t262 --help`")),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use t262_syntax::{diagnostics, lexer, parser};

use crate::config::RunnerConfig;
use crate::fixture::{self, Fixture};
use crate::harness::{BatchOptions, ConsoleReporter, FixtureReporter, FixtureRunner, JsonReporter, run_batch};
use crate::host::ConformantHost;

use super::{CliError, CliResult, ExitCode, ReportFormat};

/// Load a fixture, turning load errors into CLI failures.
fn load_fixture(path: &Path) -> CliResult<Fixture> {
    fixture::load(path).map_err(|e| CliError::failure(format!("Error: {e}")))
}

/// Render syntax errors with labelled source excerpts.
fn syntax_failure(fixture: &Fixture, errors: &[diagnostics::CompileError]) -> CliError {
    let name = fixture.path().display().to_string();
    CliError::failure(diagnostics::render(&name, fixture.source(), errors).trim_end())
}

/// Tokenize and display tokens.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let fixture = load_fixture(path)?;
    let tokens = lexer::lex(fixture.source()).map_err(|errs| syntax_failure(&fixture, &errs))?;
    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display AST.
pub fn parse_file(path: &Path) -> CliResult<ExitCode> {
    let fixture = load_fixture(path)?;
    let ast = parser::parse_source(fixture.source()).map_err(|errs| syntax_failure(&fixture, &errs))?;
    println!("{:#?}", ast);
    Ok(ExitCode::SUCCESS)
}

/// Display the header metadata of a fixture.
pub fn show_metadata(path: &Path) -> CliResult<ExitCode> {
    let fixture = load_fixture(path)?;
    let meta = fixture.metadata();
    println!("file:        {}", fixture.path().display());
    println!("path:        {}", meta.path.as_deref().unwrap_or("-"));
    println!("description: {}", meta.description.as_deref().unwrap_or("-"));
    match &meta.negative {
        Some(negative) => println!("negative:    {}", negative.pattern.as_deref().unwrap_or("(any error)")),
        None => println!("negative:    -"),
    }
    println!("onlyStrict:  {}", meta.flags.only_strict);
    println!("noStrict:    {}", meta.flags.no_strict);
    if !meta.unknown_tags.is_empty() {
        println!("unknown:     {}", meta.unknown_tags.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

/// Run one fixture against the conformant host.
///
/// Prints `PASS`/`FAIL`/`ERROR` with the fixture name; anything but a pass exits with 1.
pub fn run_fixture(path: &Path, config: RunnerConfig) -> CliResult<ExitCode> {
    let fixture = load_fixture(path)?;
    let runner = FixtureRunner::new(ConformantHost).with_config(config);
    let result = runner.run(&fixture);

    println!("{} {}", result.label().to_uppercase(), fixture.display_name());
    if let Some(description) = fixture.description() {
        println!("    {description}");
    }
    match result.detail() {
        None => Ok(ExitCode::SUCCESS),
        Some(detail) => {
            // Outcome already printed - exit with failure and no extra message
            println!("    {detail}");
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}

/// Run every fixture under `path`.
pub fn run_fixtures(
    path: &Path,
    options: &BatchOptions,
    format: ReportFormat,
    verbose: bool,
    config: RunnerConfig,
) -> CliResult<ExitCode> {
    let runner = FixtureRunner::new(ConformantHost).with_config(config);
    let mut console;
    let mut json;
    let reporter: &mut dyn FixtureReporter = match format {
        ReportFormat::Console => {
            console = ConsoleReporter::stderr(verbose);
            &mut console
        }
        ReportFormat::Json => {
            json = JsonReporter::stdout();
            &mut json
        }
    };

    let summary = run_batch(&runner, path, options, reporter).map_err(|e| CliError::failure(format!("Error: {e}")))?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Fixtures failed - summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fixture_is_a_cli_failure() {
        let err = run_fixture(Path::new("no/such/fixture.js"), RunnerConfig::default()).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("fixture not found"), "{}", err.message);
    }

    #[test]
    fn test_missing_batch_root_is_a_cli_failure() {
        let err = run_fixtures(
            Path::new("no/such/dir"),
            &BatchOptions::default(),
            ReportFormat::Json,
            false,
            RunnerConfig::default(),
        )
        .unwrap_err();
        assert!(err.message.contains("path not found"), "{}", err.message);
    }
}

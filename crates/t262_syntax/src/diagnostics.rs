//! Diagnostics and error reporting for fixture source text.
//!
//! [`CompileError`] is the plain data the lexer and parser produce. [`SyntaxReport`] wraps one error together with
//! its source text as a `miette` diagnostic so the CLI can render it with a labelled source excerpt.

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};

use crate::ast::Span;

/// A lexical or syntax error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub hints: Vec<String>,
}

impl CompileError {
    /// An error raised while tokenizing.
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Lexical,
            hints: Vec::new(),
        }
    }

    /// An error raised while parsing the token stream.
    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Syntax,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Attach `source` so the error can be rendered as a `miette` diagnostic.
    pub fn to_report(&self, file_name: &str, source: &str) -> SyntaxReport {
        // Clamp so a span at EOF still points inside the source.
        let start = self.span.start.min(source.len());
        let len = self.span.len().min(source.len() - start);
        SyntaxReport {
            kind: self.kind,
            message: self.message.clone(),
            src: NamedSource::new(file_name, source.to_string()),
            span: SourceSpan::from((start, len)),
            help: if self.hints.is_empty() {
                None
            } else {
                Some(self.hints.join("\n"))
            },
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A [`CompileError`] bundled with its source, renderable through `miette`.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{kind}: {message}")]
#[diagnostic(code(t262::syntax))]
pub struct SyntaxReport {
    kind: ErrorKind,
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
}

/// Render every error in `errors` against `source` as plain (uncoloured) text.
///
/// Used by the CLI and by fault messages, which end up in logs and JSON reports where ANSI codes are noise.
pub fn render(file_name: &str, source: &str, errors: &[CompileError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors {
        let report = error.to_report(file_name, source);
        if handler.render_report(&mut out, &report).is_err() {
            // Rendering only fails on a broken fmt::Write; fall back to the one-line form.
            out.push_str(&error.to_string());
            out.push('\n');
        }
    }
    out
}

/// One line per error: `file:line:col: kind: message`.
pub fn summarize(file_name: &str, source: &str, errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(|e| {
            let (line, col) = line_col(source, e.span.start);
            format!("{file_name}:{line}:{col}: {e}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 1-based line and column of byte offset `pos`.
pub fn line_col(source: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(source.len());
    let before = &source[..pos];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(pos, |nl| pos - nl - 1) + 1;
    (line, col)
}

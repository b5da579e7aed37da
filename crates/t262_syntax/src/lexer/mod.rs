//! Lexer for the fixture script subset
//!
//! Handles tokenization including:
//! - Keywords and identifiers (`$` and `_` allowed)
//! - Numeric literals (decimal, fraction, exponent, hex)
//! - String literals with escapes
//! - Operators and punctuation (longest match)
//! - `//` and `/* */` comments, tracked for line breaks
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String literal scanning and escapes
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use t262_core::lang::keywords::KeywordId;
use t262_core::lang::operators::OperatorId;
use t262_core::lang::punctuation::PunctuationId;

/// Lexer for fixture source code.
///
/// Converts source text into a stream of tokens. Errors are collected rather than aborting, so a single pass
/// reports every bad character.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// A line terminator was seen since the last emitted token.
    pending_newline: bool,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            pending_newline: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        let mut eof = Token::new(TokenKind::Eof, Span::new(self.current_pos, self.current_pos));
        eof.newline_before = self.pending_newline;
        self.tokens.push(eof);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(CompileError::new(message.into(), Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => self.pending_newline = true,
            c if c.is_whitespace() || c == '\u{feff}' => {}

            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else if self.match_char('*') {
                    self.skip_block_comment(start);
                } else if self.regex_allowed() {
                    self.skip_regex_body();
                    self.error("Regular expression literals are not supported", start);
                } else {
                    self.operator(start, OperatorId::Slash, &[('=', OperatorId::SlashAssign)]);
                }
            }

            // Operators
            '+' => {
                if self.match_char('+') {
                    self.add_op(OperatorId::PlusPlus, start);
                } else {
                    self.operator(start, OperatorId::Plus, &[('=', OperatorId::PlusAssign)]);
                }
            }
            '-' => {
                if self.match_char('-') {
                    self.add_op(OperatorId::MinusMinus, start);
                } else {
                    self.operator(start, OperatorId::Minus, &[('=', OperatorId::MinusAssign)]);
                }
            }
            '*' => self.operator(start, OperatorId::Star, &[('=', OperatorId::StarAssign)]),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentAssign)]),
            '=' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        self.add_op(OperatorId::StrictEq, start);
                    } else {
                        self.add_op(OperatorId::Eq, start);
                    }
                } else {
                    self.add_op(OperatorId::Assign, start);
                }
            }
            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        self.add_op(OperatorId::StrictNotEq, start);
                    } else {
                        self.add_op(OperatorId::NotEq, start);
                    }
                } else {
                    self.add_op(OperatorId::Bang, start);
                }
            }
            '<' => self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]),
            '>' => self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]),
            '&' => {
                if self.match_char('&') {
                    self.add_op(OperatorId::AndAnd, start);
                } else {
                    self.error("Bitwise operators are not supported", start);
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.add_op(OperatorId::OrOr, start);
                } else {
                    self.error("Bitwise operators are not supported", start);
                }
            }

            // Punctuation
            ',' => self.add_punct(PunctuationId::Comma, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            '?' => self.add_punct(PunctuationId::Question, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),
            '.' => {
                if self.peek().is_some_and(|d| d.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }

            // Strings
            '"' | '\'' => self.scan_string(start, c),

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(format!("Unexpected character '{}'", c), start),
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let mut token = Token::new(kind, Span::new(start, self.current_pos));
        token.newline_before = std::mem::take(&mut self.pending_newline);
        self.tokens.push(token);
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(c) if is_line_terminator(c) => self.pending_newline = true,
                Some(_) => {}
                None => {
                    self.error("Unterminated block comment", start);
                    return;
                }
            }
        }
    }

    /// A `/` starts a regular expression when the previous token cannot end an expression.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last().map(|t| &t.kind) {
            None => true,
            Some(TokenKind::Ident(_) | TokenKind::Number(_) | TokenKind::String(_)) => false,
            Some(TokenKind::Punctuation(p)) => {
                !matches!(p, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)
            }
            Some(TokenKind::Operator(op)) => !matches!(op, OperatorId::PlusPlus | OperatorId::MinusMinus),
            Some(TokenKind::Keyword(k)) => {
                !matches!(k, KeywordId::This | KeywordId::True | KeywordId::False | KeywordId::Null)
            }
            Some(TokenKind::Eof) => true,
        }
    }

    /// Skip to the end of a regular expression literal so the error is reported once.
    fn skip_regex_body(&mut self) {
        let mut in_class = false;
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                return;
            }
            self.advance();
            match c {
                '\\' => {
                    self.advance();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        use t262_core::lang::keywords;

        for k in keywords::KEYWORDS {
            let tokens = lex(k.canonical).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", k.canonical, errs));
            assert_eq!(tokens.len(), 2, "expected token + EOF for keyword {:?}", k.id);
            assert!(tokens[0].kind.is_keyword(k.id));
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        use t262_core::lang::operators;

        for o in operators::OPERATORS {
            // `a` on the left keeps `/` and `/=` from being read as a regular expression.
            let source = format!("a {} b", o.canonical);
            let tokens = lex(&source).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", source, errs));
            assert_eq!(tokens.len(), 4, "expected a, op, b, EOF for {:?}: {:?}", o.canonical, tokens);
            assert!(tokens[1].kind.is_operator(o.id), "{:?} lexed as {:?}", o.canonical, tokens[1].kind);
        }
    }

    #[test]
    fn test_punctuation_registry_parity() {
        use t262_core::lang::punctuation;

        for p in punctuation::PUNCTUATION {
            let tokens = lex(p.canonical).unwrap();
            assert!(tokens[0].kind.is_punctuation(p.id), "{:?}", p.canonical);
        }
    }

    #[test]
    fn test_longest_match_equality() {
        assert_eq!(
            kinds("a === b !== c == d != e"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::StrictEq),
                TokenKind::Ident("b".into()),
                TokenKind::Operator(OperatorId::StrictNotEq),
                TokenKind::Ident("c".into()),
                TokenKind::Operator(OperatorId::Eq),
                TokenKind::Ident("d".into()),
                TokenKind::Operator(OperatorId::NotEq),
                TokenKind::Ident("e".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped_and_mark_newlines() {
        let tokens = lex("a /* one\ntwo */ b // tail\nc").unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before, "block comment spanning a line counts as a line break");
        assert!(tokens[2].newline_before);
    }

    #[test]
    fn test_dollar_identifiers() {
        assert_eq!(kinds("$ERROR")[0], TokenKind::Ident("$ERROR".into()));
    }

    #[test]
    fn test_regex_literal_rejected_once() {
        let errs = lex("var r = /ab+c/gi;").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Regular expression"));
    }

    #[test]
    fn test_division_after_identifier_is_operator() {
        let tokens = lex("a / b").unwrap();
        assert!(tokens[1].kind.is_operator(OperatorId::Slash));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let errs = lex("a /* never closed").unwrap_err();
        assert!(errs[0].message.contains("Unterminated block comment"));
    }

    #[test]
    fn test_unexpected_character_reported() {
        let errs = lex("a # b").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].span, Span::new(2, 3));
    }
}

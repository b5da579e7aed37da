/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Automatic semicolon insertion (`consume_semicolon`)
/// - Nesting limits and error recovery (`nested`, `synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Return the most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(format!("{}, found {}", msg, self.peek().kind.describe()), self.peek().span)
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_ident(&mut self, msg: &str) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(msg)),
        }
    }

    /// End a statement: an explicit `;`, or an inserted one before `}`, end of input, or a line break.
    fn consume_semicolon(&mut self) -> Result<(), CompileError> {
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(());
        }
        if self.check_punct(PunctuationId::RBrace) || self.is_at_end() || self.peek().newline_before {
            return Ok(());
        }
        Err(self.unexpected("Expected ';'"))
    }

    /// Run `f` one nesting level deeper, failing once [`MAX_NESTING_DEPTH`] is exceeded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CompileError::syntax(
                "Nesting too deep".to_string(),
                self.peek().span,
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Count one more link of a left-deep chain (`a + b + c`, `a.b.c`, `f()()`) against [`MAX_NESTING_DEPTH`].
    ///
    /// Each link nests the finished node one level deeper, the same as a parenthesis would. The caller restores
    /// `depth` once the chain ends.
    fn chain_link(&mut self) -> Result<(), CompileError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CompileError::syntax(
                "Nesting too deep".to_string(),
                self.peek().span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Skip tokens until a plausible statement start.
    fn synchronize(&mut self) {
        // Nesting bookkeeping is meaningless after an error unwound the recursion.
        self.depth = 0;
        self.no_in = false;
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind.is_punctuation(PunctuationId::Semicolon)
                || self.previous().kind.is_punctuation(PunctuationId::RBrace)
            {
                return;
            }
            if self.peek().newline_before {
                return;
            }
            if matches!(
                self.peek().kind.keyword_id(),
                Some(
                    KeywordId::Var
                        | KeywordId::Function
                        | KeywordId::If
                        | KeywordId::For
                        | KeywordId::While
                        | KeywordId::Return
                        | KeywordId::Try
                        | KeywordId::Throw
                )
            ) {
                return;
            }
            self.advance();
        }
    }

    /// Span from byte offset `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous().span.end.max(start))
    }
}

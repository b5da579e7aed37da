/// Statement parsing.
///
/// This chunk parses statements and blocks, including `var` lists, function declarations, loops (`while`,
/// `do`/`while`, `for`, `for`-`in`) and `try`/`catch`/`finally`.
///
/// ## Notes
/// - Labels are not supported; `break`/`continue` always target the innermost loop.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        self.nested(|p| p.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_span().start;

        let node = match self.peek().kind.keyword_id() {
            Some(KeywordId::Var) => {
                self.advance();
                let decls = self.var_declarators()?;
                self.consume_semicolon()?;
                Statement::Var(decls)
            }
            Some(KeywordId::Function) => {
                let decl = self.function(true)?;
                Statement::Function(Rc::new(decl))
            }
            Some(KeywordId::If) => self.if_statement()?,
            Some(KeywordId::While) => {
                self.advance();
                let condition = self.paren_condition("while")?;
                let body = Box::new(self.statement()?);
                Statement::While(LoopStmt { condition, body })
            }
            Some(KeywordId::Do) => self.do_while_statement()?,
            Some(KeywordId::For) => self.for_statement()?,
            Some(KeywordId::Return) => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.consume_semicolon()?;
                Statement::Return(value)
            }
            Some(KeywordId::Break) => {
                self.advance();
                self.reject_label("break")?;
                self.consume_semicolon()?;
                Statement::Break
            }
            Some(KeywordId::Continue) => {
                self.advance();
                self.reject_label("continue")?;
                self.consume_semicolon()?;
                Statement::Continue
            }
            Some(KeywordId::Throw) => {
                self.advance();
                if self.peek().newline_before {
                    return Err(CompileError::syntax(
                        "Illegal newline after throw".to_string(),
                        self.previous().span,
                    ));
                }
                let value = self.expression()?;
                self.consume_semicolon()?;
                Statement::Throw(value)
            }
            Some(KeywordId::Try) => self.try_statement()?,
            _ if self.check_punct(PunctuationId::LBrace) => Statement::Block(self.block()?),
            _ if self.match_punct(PunctuationId::Semicolon) => Statement::Empty,
            _ => {
                if matches!(self.peek().kind, TokenKind::Ident(_))
                    && self.peek_next().kind.is_punctuation(PunctuationId::Colon)
                {
                    return Err(self.unexpected("Labelled statements are not supported"));
                }
                let expr = self.expression()?;
                self.consume_semicolon()?;
                Statement::Expr(expr)
            }
        };

        Ok(Spanned::new(node, self.span_from(start)))
    }

    /// `{ statements }`
    fn block(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{'")?;
        let mut body = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}'")?;
        Ok(body)
    }

    fn var_declarators(&mut self) -> Result<Vec<VarDeclarator>, CompileError> {
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident("Expected variable name")?;
            let init = if self.peek().kind.is_operator(OperatorId::Assign) {
                self.advance();
                Some(self.assignment()?)
            } else {
                None
            };
            decls.push(VarDeclarator { name, init });
            if !self.match_punct(PunctuationId::Comma) {
                return Ok(decls);
            }
        }
    }

    /// Parse `function name? (params) { body }`. Declarations require a name.
    fn function(&mut self, is_declaration: bool) -> Result<FunctionDecl, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::Function, "Expected 'function'")?;

        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ if is_declaration => return Err(self.unexpected("Expected function name")),
            _ => None,
        };

        self.expect_punct(PunctuationId::LParen, "Expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                params.push(self.expect_ident("Expected parameter name")?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;

        // A function body resets the `for (... in` restriction.
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let body = self.block();
        self.no_in = saved_no_in;

        Ok(FunctionDecl {
            name,
            params,
            body: body?,
            span: self.span_from(start),
        })
    }

    fn if_statement(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let condition = self.paren_condition("if")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_keyword(KeywordId::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Statement::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn do_while_statement(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let body = Box::new(self.statement()?);
        self.expect_keyword(KeywordId::While, "Expected 'while' after do body")?;
        let condition = self.paren_condition("while")?;
        // A semicolon is always inserted after `do ... while (...)`.
        self.match_punct(PunctuationId::Semicolon);
        Ok(Statement::DoWhile(LoopStmt { condition, body }))
    }

    fn for_statement(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::LParen, "Expected '(' after 'for'")?;

        let init = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else if self.match_keyword(KeywordId::Var) {
            self.no_in = true;
            let decls = self.var_declarators();
            self.no_in = false;
            let decls = decls?;
            if self.match_keyword(KeywordId::In) {
                return match <[VarDeclarator; 1]>::try_from(decls) {
                    Ok([VarDeclarator { name, init: None }]) => self.for_in_rest(true, name),
                    _ => Err(CompileError::syntax(
                        "for-in declares exactly one variable without an initializer".to_string(),
                        self.previous().span,
                    )),
                };
            }
            Some(ForInit::Var(decls))
        } else {
            self.no_in = true;
            let expr = self.expression();
            self.no_in = false;
            let expr = expr?;
            if self.match_keyword(KeywordId::In) {
                return match expr.node {
                    Expr::Ident(name) => self.for_in_rest(false, name),
                    _ => Err(CompileError::syntax(
                        "Only a plain name may be the target of for-in".to_string(),
                        expr.span,
                    )),
                };
            }
            Some(ForInit::Expr(expr))
        };

        self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for initializer")?;
        let condition = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for condition")?;
        let update = if self.check_punct(PunctuationId::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::RParen, "Expected ')' after for clauses")?;
        let body = Box::new(self.statement()?);

        Ok(Statement::For(ForStmt {
            init,
            condition,
            update,
            body,
        }))
    }

    /// The part of `for (x in obj) body` after `in`.
    fn for_in_rest(&mut self, declares: bool, name: Ident) -> Result<Statement, CompileError> {
        let object = self.expression()?;
        self.expect_punct(PunctuationId::RParen, "Expected ')' after for-in object")?;
        let body = Box::new(self.statement()?);
        Ok(Statement::ForIn(ForInStmt {
            declares,
            name,
            object,
            body,
        }))
    }

    fn try_statement(&mut self) -> Result<Statement, CompileError> {
        let try_span = self.advance().span;
        let block = self.block()?;

        let handler = if self.match_keyword(KeywordId::Catch) {
            self.expect_punct(PunctuationId::LParen, "Expected '(' after 'catch'")?;
            let param = self.expect_ident("Expected catch parameter name")?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after catch parameter")?;
            Some(CatchClause {
                param,
                body: self.block()?,
            })
        } else {
            None
        };

        let finalizer = if self.match_keyword(KeywordId::Finally) {
            Some(self.block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(CompileError::syntax(
                "Missing catch or finally after try".to_string(),
                try_span,
            ));
        }

        Ok(Statement::Try(TryStmt {
            block,
            handler,
            finalizer,
        }))
    }

    /// `( expression )` after `if` / `while`.
    fn paren_condition(&mut self, keyword: &str) -> Result<Spanned<Expr>, CompileError> {
        self.expect_punct(PunctuationId::LParen, &format!("Expected '(' after '{keyword}'"))?;
        let condition = self.expression()?;
        self.expect_punct(PunctuationId::RParen, "Expected ')' after condition")?;
        Ok(condition)
    }

    /// `return` takes no value when followed by `;`, `}`, end of input, or a line break.
    fn at_statement_end(&self) -> bool {
        self.check_punct(PunctuationId::Semicolon)
            || self.check_punct(PunctuationId::RBrace)
            || self.is_at_end()
            || self.peek().newline_before
    }

    fn reject_label(&self, keyword: &str) -> Result<(), CompileError> {
        if matches!(self.peek().kind, TokenKind::Ident(_)) && !self.peek().newline_before {
            return Err(CompileError::syntax(
                format!("Labelled '{keyword}' is not supported"),
                self.peek().span,
            ));
        }
        Ok(())
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }
}

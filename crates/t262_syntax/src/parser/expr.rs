/// Expression parsing.
///
/// Binary operators are parsed by precedence climbing over the operator registry, so the precedence table lives in
/// one place (`t262_core::lang::operators`). `in` and `instanceof` are keywords and share the relational level.
///
/// ## Notes
/// - `no_in` suppresses `in` as a binary operator inside a `for (...` head.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Full expression, including the comma operator.
    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let first = self.assignment()?;
        if !self.check_punct(PunctuationId::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.assignment()?);
        }
        Ok(Spanned::new(Expr::Sequence(items), self.span_from(start)))
    }

    fn assignment(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(|p| p.assignment_inner())
    }

    fn assignment_inner(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let target = self.conditional()?;

        let Some(op_id) = self.peek().kind.operator_id().filter(|id| operators::is_assignment(*id)) else {
            return Ok(target);
        };
        if !target.node.is_assignment_target() {
            return Err(CompileError::syntax(
                "Invalid left-hand side in assignment".to_string(),
                target.span,
            ));
        }
        self.advance();

        let op = match operators::compound_base(op_id).and_then(binary_op_for) {
            Some(base) => AssignOp::Compound(base),
            None => AssignOp::Assign,
        };
        let value = self.assignment()?;
        Ok(Spanned::new(
            Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            self.span_from(start),
        ))
    }

    fn conditional(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let condition = self.binary(0)?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(condition);
        }
        // `in` is allowed again between `?` and `:`.
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let then_expr = self.assignment();
        self.no_in = saved_no_in;
        let then_expr = then_expr?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' in conditional expression")?;
        let else_expr = self.assignment()?;
        Ok(Spanned::new(
            Expr::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            self.span_from(start),
        ))
    }

    /// The binary operator at the current token with its precedence, if any.
    fn peek_binary(&self) -> Option<(BinaryKind, u8)> {
        let relational = operators::info_for(OperatorId::Lt).precedence;
        match &self.peek().kind {
            TokenKind::Operator(id) => {
                let info = operators::info_for(*id);
                if info.fixity != Fixity::Infix || operators::is_assignment(*id) {
                    return None;
                }
                let kind = match id {
                    OperatorId::OrOr => BinaryKind::Logical(LogicalOp::Or),
                    OperatorId::AndAnd => BinaryKind::Logical(LogicalOp::And),
                    other => BinaryKind::Binary(binary_op_for(*other)?),
                };
                Some((kind, info.precedence))
            }
            TokenKind::Keyword(KeywordId::In) if !self.no_in => Some((BinaryKind::Binary(BinaryOp::In), relational)),
            TokenKind::Keyword(KeywordId::Instanceof) => Some((BinaryKind::Binary(BinaryOp::Instanceof), relational)),
            _ => None,
        }
    }

    /// Precedence climbing: parse operators binding at least as tightly as `min_prec`.
    fn binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>, CompileError> {
        let base_depth = self.depth;
        let result = self.binary_chain(min_prec);
        self.depth = base_depth;
        result
    }

    fn binary_chain(&mut self, min_prec: u8) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let mut left = self.unary()?;

        while let Some((kind, prec)) = self.peek_binary() {
            if prec < min_prec {
                break;
            }
            self.chain_link()?;
            self.advance();
            // All binary operators here are left-associative.
            let right = self.nested(|p| p.binary(prec + 1))?;
            let node = match kind {
                BinaryKind::Binary(op) => Expr::Binary(Box::new(left), op, Box::new(right)),
                BinaryKind::Logical(op) => Expr::Logical(Box::new(left), op, Box::new(right)),
            };
            left = Spanned::new(node, self.span_from(start));
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;

        let unary_op = match &self.peek().kind {
            TokenKind::Operator(OperatorId::Bang) => Some(UnaryOp::Not),
            TokenKind::Operator(OperatorId::Minus) => Some(UnaryOp::Neg),
            TokenKind::Operator(OperatorId::Plus) => Some(UnaryOp::Plus),
            TokenKind::Keyword(KeywordId::Typeof) => Some(UnaryOp::Typeof),
            TokenKind::Keyword(KeywordId::Void) => Some(UnaryOp::Void),
            TokenKind::Keyword(KeywordId::Delete) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = unary_op {
            self.advance();
            let operand = self.nested(|p| p.unary())?;
            return Ok(Spanned::new(Expr::Unary(op, Box::new(operand)), self.span_from(start)));
        }

        let update_op = match &self.peek().kind {
            TokenKind::Operator(OperatorId::PlusPlus) => Some(UpdateOp::Increment),
            TokenKind::Operator(OperatorId::MinusMinus) => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update_op {
            self.advance();
            let target = self.nested(|p| p.unary())?;
            if !target.node.is_assignment_target() {
                return Err(CompileError::syntax(
                    "Invalid operand for prefix update".to_string(),
                    target.span,
                ));
            }
            return Ok(Spanned::new(
                Expr::Update {
                    op,
                    prefix: true,
                    target: Box::new(target),
                },
                self.span_from(start),
            ));
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let expr = self.call_member()?;

        // Restricted production: a line break before `++`/`--` ends the expression.
        if self.peek().newline_before {
            return Ok(expr);
        }
        let op = match &self.peek().kind {
            TokenKind::Operator(OperatorId::PlusPlus) => UpdateOp::Increment,
            TokenKind::Operator(OperatorId::MinusMinus) => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        if !expr.node.is_assignment_target() {
            return Err(CompileError::syntax(
                "Invalid operand for postfix update".to_string(),
                expr.span,
            ));
        }
        self.advance();
        Ok(Spanned::new(
            Expr::Update {
                op,
                prefix: false,
                target: Box::new(expr),
            },
            self.span_from(start),
        ))
    }

    /// Member accesses and calls: `a.b`, `a[b]`, `a(b)`, `new A(b)`.
    fn call_member(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let base_depth = self.depth;
        let result = self.call_member_chain();
        self.depth = base_depth;
        result
    }

    fn call_member_chain(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let mut expr = if self.check_keyword(KeywordId::New) {
            self.new_expression()?
        } else {
            self.primary()?
        };

        loop {
            if self.check_punct(PunctuationId::LParen) {
                self.chain_link()?;
                let args = self.arguments()?;
                expr = Spanned::new(Expr::Call(Box::new(expr), args), self.span_from(start));
            } else if self.member_suffix(start, &mut expr)? {
                self.chain_link()?;
            } else {
                return Ok(expr);
            }
        }
    }

    /// `new callee args?`. The callee is a member expression without calls.
    fn new_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(|p| {
            let start = p.current_span().start;
            p.advance();
            let mut callee = if p.check_keyword(KeywordId::New) {
                p.new_expression()?
            } else {
                p.primary()?
            };
            let base_depth = p.depth;
            let mut links = Ok(());
            while links.is_ok() && p.member_suffix(start, &mut callee)? {
                links = p.chain_link();
            }
            p.depth = base_depth;
            links?;
            let args = if p.check_punct(PunctuationId::LParen) {
                p.arguments()?
            } else {
                Vec::new()
            };
            Ok(Spanned::new(Expr::New(Box::new(callee), args), p.span_from(start)))
        })
    }

    /// Apply one `.name` or `[expr]` suffix to `expr`. Returns `false` if there was none.
    fn member_suffix(&mut self, start: usize, expr: &mut Spanned<Expr>) -> Result<bool, CompileError> {
        if self.match_punct(PunctuationId::Dot) {
            // Reserved words are valid property names after `.`.
            let name = match &self.peek().kind {
                TokenKind::Ident(name) => name.clone(),
                TokenKind::Keyword(id) => t262_core::lang::keywords::as_str(*id).to_string(),
                _ => return Err(self.unexpected("Expected property name after '.'")),
            };
            self.advance();
            let object = std::mem::replace(expr, Spanned::new(Expr::This, Span::default()));
            *expr = Spanned::new(Expr::Member(Box::new(object), name), self.span_from(start));
            Ok(true)
        } else if self.match_punct(PunctuationId::LBracket) {
            let saved_no_in = std::mem::replace(&mut self.no_in, false);
            let index = self.expression();
            self.no_in = saved_no_in;
            let index = index?;
            self.expect_punct(PunctuationId::RBracket, "Expected ']'")?;
            let object = std::mem::replace(expr, Spanned::new(Expr::This, Span::default()));
            *expr = Spanned::new(Expr::Index(Box::new(object), Box::new(index)), self.span_from(start));
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn arguments(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let args = self.comma_list(PunctuationId::RParen, "Expected ')' after arguments");
        self.no_in = saved_no_in;
        args
    }

    /// Comma-separated assignment expressions up to `close` (consumed). A trailing comma is not allowed.
    fn comma_list(&mut self, close: PunctuationId, msg: &str) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let mut items = Vec::new();
        if !self.check_punct(close) {
            loop {
                items.push(self.assignment()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(close, msg)?;
        Ok(items)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let token = self.peek().clone();

        let node = match token.kind {
            TokenKind::Number(n) => {
                self.advance();
                Expr::Literal(Literal::Number(n))
            }
            TokenKind::String(s) => {
                self.advance();
                Expr::Literal(Literal::String(s))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Expr::Ident(name)
            }
            TokenKind::Keyword(KeywordId::This) => {
                self.advance();
                Expr::This
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Expr::Literal(Literal::Bool(true))
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Expr::Literal(Literal::Bool(false))
            }
            TokenKind::Keyword(KeywordId::Null) => {
                self.advance();
                Expr::Literal(Literal::Null)
            }
            TokenKind::Keyword(KeywordId::Function) => Expr::Function(Rc::new(self.function(false)?)),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let saved_no_in = std::mem::replace(&mut self.no_in, false);
                let inner = self.expression();
                self.no_in = saved_no_in;
                let inner = inner?;
                self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
                // Keep the inner node; parentheses only affect grouping.
                return Ok(Spanned::new(inner.node, self.span_from(start)));
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                Expr::Array(self.array_elements()?)
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => {
                self.advance();
                Expr::Object(self.object_properties()?)
            }
            _ => return Err(self.unexpected("Expected expression")),
        };

        Ok(Spanned::new(node, self.span_from(start)))
    }

    /// Array literal elements after `[`. One trailing comma is allowed; holes are not.
    fn array_elements(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let mut items = Vec::new();
        let result = loop {
            if self.match_punct(PunctuationId::RBracket) {
                break Ok(items);
            }
            if self.check_punct(PunctuationId::Comma) {
                break Err(self.unexpected("Array holes are not supported"));
            }
            match self.assignment() {
                Ok(item) => items.push(item),
                Err(e) => break Err(e),
            }
            if !self.match_punct(PunctuationId::Comma) {
                break self
                    .expect_punct(PunctuationId::RBracket, "Expected ',' or ']' in array literal")
                    .map(|_| items);
            }
        };
        self.no_in = saved_no_in;
        result
    }

    /// Object literal properties after `{`. Keys are identifiers, reserved words, strings or numbers.
    fn object_properties(&mut self) -> Result<Vec<ObjectProperty>, CompileError> {
        let saved_no_in = std::mem::replace(&mut self.no_in, false);
        let result = self.object_properties_inner();
        self.no_in = saved_no_in;
        result
    }

    fn object_properties_inner(&mut self) -> Result<Vec<ObjectProperty>, CompileError> {
        let mut props = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                return Ok(props);
            }
            let key = match &self.peek().kind {
                TokenKind::Ident(name) => name.clone(),
                TokenKind::Keyword(id) => t262_core::lang::keywords::as_str(*id).to_string(),
                TokenKind::String(s) => s.clone(),
                TokenKind::Number(n) => t262_core::numbers::number_to_string(*n),
                _ => return Err(self.unexpected("Expected property name")),
            };
            let key_token = self.advance().clone();

            if matches!(key.as_str(), "get" | "set")
                && matches!(key_token.kind, TokenKind::Ident(_))
                && !self.check_punct(PunctuationId::Colon)
            {
                return Err(CompileError::syntax(
                    "Accessor properties are not supported".to_string(),
                    key_token.span,
                ));
            }

            self.expect_punct(PunctuationId::Colon, "Expected ':' after property name")?;
            let value = self.assignment()?;
            props.push(ObjectProperty { key, value });

            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBrace, "Expected ',' or '}' in object literal")?;
                return Ok(props);
            }
        }
    }
}

/// Binary or short-circuiting operator, as found by [`Parser::peek_binary`].
#[derive(Clone, Copy)]
enum BinaryKind {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// The AST operator for a non-logical infix registry operator.
fn binary_op_for(id: OperatorId) -> Option<BinaryOp> {
    Some(match id {
        OperatorId::Plus => BinaryOp::Add,
        OperatorId::Minus => BinaryOp::Sub,
        OperatorId::Star => BinaryOp::Mul,
        OperatorId::Slash => BinaryOp::Div,
        OperatorId::Percent => BinaryOp::Mod,
        OperatorId::Eq => BinaryOp::Eq,
        OperatorId::NotEq => BinaryOp::NotEq,
        OperatorId::StrictEq => BinaryOp::StrictEq,
        OperatorId::StrictNotEq => BinaryOp::StrictNotEq,
        OperatorId::Lt => BinaryOp::Lt,
        OperatorId::Gt => BinaryOp::Gt,
        OperatorId::LtEq => BinaryOp::LtEq,
        OperatorId::GtEq => BinaryOp::GtEq,
        _ => return None,
    })
}

//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 8. `or`
//! 7. `and`
//! 6. `==`, `!=`
//! 5. `<`, `<=`, `>`, `>=`
//! 4. `+`, `-`
//! 3. `*`, `/`
//! 2. unary `!`, `-`
//! 1. `fn` literal, then `()` (call) and `.` (member access) postfix

use glam_lexer::token::TokenKind;
use glam_types::ast::*;
use glam_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        if !self.enter_nesting() {
            return None;
        }
        let result = self.parse_or();
        self.exit_nesting();
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_and, |kind| match kind {
            TokenKind::Or => Some(LogicalOp::Or),
            _ => None,
        }, logical)
    }

    /// `AndExpr = EqualityExpr { "and" EqualityExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_equality, |kind| match kind {
            TokenKind::And => Some(LogicalOp::And),
            _ => None,
        }, logical)
    }

    /// `EqualityExpr = CompExpr { ("==" | "!=") CompExpr }`
    fn parse_equality(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_comparison, |kind| match kind {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            _ => None,
        }, binary)
    }

    /// `CompExpr = TermExpr { ("<" | "<=" | ">" | ">=") TermExpr }`
    fn parse_comparison(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_term, |kind| match kind {
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }, binary)
    }

    /// `TermExpr = FactorExpr { ("+" | "-") FactorExpr }`
    fn parse_term(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_factor, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        }, binary)
    }

    /// `FactorExpr = UnaryExpr { ("*" | "/") UnaryExpr }`
    fn parse_factor(&mut self) -> Option<Expr> {
        self.parse_left_assoc(Self::parse_unary, |kind| match kind {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            _ => None,
        }, binary)
    }

    /// One left-associative precedence level: `operand { op operand }`.
    ///
    /// Every operator deepens the resulting tree by one, so each counts
    /// against the nesting limit just like a parenthesized group.
    fn parse_left_assoc<O>(
        &mut self,
        operand: fn(&mut Self) -> Option<Expr>,
        operator: fn(&TokenKind) -> Option<O>,
        build: fn(Expr, O, Expr) -> Expr,
    ) -> Option<Expr> {
        let mut left = operand(self)?;
        let mut levels = 0;
        let result = loop {
            let Some(op) = operator(self.peek_kind()) else {
                break Some(left);
            };
            if !self.enter_nesting() {
                break None;
            }
            levels += 1;
            self.advance();
            let Some(right) = operand(self) else {
                break None;
            };
            left = build(left, op, right);
        };
        for _ in 0..levels {
            self.exit_nesting();
        }
        result
    }

    /// `UnaryExpr = ( "!" | "-" ) UnaryExpr | FunctionExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_function(),
        };
        self.advance();
        if !self.enter_nesting() {
            return None;
        }
        let operand = self.parse_unary();
        self.exit_nesting();
        let operand = operand?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Function Literal
    // ══════════════════════════════════════════════════════════════════════════

    /// `FunctionExpr = "fn" "(" [ Param { "," Param } ] ")" ":" Type "=>" Statement
    ///               | CallExpr`
    fn parse_function(&mut self) -> Option<Expr> {
        if !self.check(&TokenKind::Fn) {
            return self.parse_call();
        }
        let start = self.current_span();
        self.advance(); // eat `fn`
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            let param_start = self.current_span();
            let name = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let type_ann = self.parse_type_annotation()?;
            params.push(Param {
                name,
                type_ann,
                span: param_start.merge(self.previous_span()),
            });
            if !self.eat_comma() {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Colon)?;
        let ret = self.parse_type_annotation()?;
        self.expect(&TokenKind::FatArrow)?;
        let body = self.parse_statement()?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Function(Box::new(FunctionExpr {
                params,
                ret,
                body,
                span,
            })),
            span,
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Postfix
    // ══════════════════════════════════════════════════════════════════════════

    /// `CallExpr = PrimaryExpr { "(" ArgList ")" | "." Identifier }`
    ///
    /// Like binary operators, each postfix step counts against the nesting limit.
    fn parse_call(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        let mut levels = 0;
        let result = loop {
            if !matches!(self.peek_kind(), TokenKind::LParen | TokenKind::Dot) {
                break Some(expr);
            }
            if !self.enter_nesting() {
                break None;
            }
            levels += 1;
            match self.parse_postfix(expr) {
                Some(next) => expr = next,
                None => break None,
            }
        };
        for _ in 0..levels {
            self.exit_nesting();
        }
        result
    }

    /// Apply one `(args)` or `.name` suffix to `expr`.
    fn parse_postfix(&mut self, expr: Expr) -> Option<Expr> {
        if self.eat(&TokenKind::Dot) {
            let field = self.expect_identifier()?;
            let span = expr.span.merge(field.span);
            return Some(Expr::new(
                ExprKind::Get {
                    object: Box::new(expr),
                    field,
                },
                span,
            ));
        }
        self.expect(&TokenKind::LParen)?;
        let args = self.parse_arg_list()?;
        self.expect(&TokenKind::RParen)?;
        let span = expr.span.merge(self.previous_span());
        Some(Expr::new(
            ExprKind::Call {
                callee: Box::new(expr),
                args,
            },
            span,
        ))
    }

    /// Parse a comma-separated argument list (inside parens).
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            args.push(self.parse_expression()?);
            if !self.eat_comma() {
                break;
            }
        }
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let literal = match self.peek_kind().clone() {
            TokenKind::IntLit(n) => Literal::Int(n),
            TokenKind::FloatLit(n) => Literal::Float(n),
            TokenKind::StringLit(s) => Literal::String(s),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                return Some(Expr::new(ExprKind::Group(Box::new(inner)), span));
            }

            // ── Variable or record instantiation ────────────────────────
            TokenKind::Identifier(_) => {
                if self.at_record_init() {
                    return self.parse_record_init();
                }
                let ident = self.expect_identifier()?;
                return Some(Expr::new(ExprKind::Variable(ident.name), ident.span));
            }

            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                return None;
            }
        };
        self.advance();
        Some(Expr::new(ExprKind::Literal(literal), start))
    }

    /// An identifier followed by `{` starts a record instantiation when the
    /// brace opens `field:` or, for PascalCase names, is immediately closed.
    /// Anything else leaves the `{` to the enclosing statement (`while x { ... }`).
    fn at_record_init(&self) -> bool {
        if *self.look_ahead(1) != TokenKind::LBrace {
            return false;
        }
        match (self.look_ahead(2), self.look_ahead(3)) {
            (TokenKind::Identifier(_), TokenKind::Colon) => true,
            (TokenKind::RBrace, _) => matches!(
                self.peek_kind(),
                TokenKind::Identifier(name) if name.starts_with(|c: char| c.is_ascii_uppercase())
            ),
            _ => false,
        }
    }

    /// Parse `Name { field: expr, ... }`
    fn parse_record_init(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let field = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression()?;
            fields.push(FieldInit { name: field, value });
            if !self.eat_comma() {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::RecordInit { name, fields }, span))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Node Builders
// ══════════════════════════════════════════════════════════════════════════════

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn logical(left: Expr, op: LogicalOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

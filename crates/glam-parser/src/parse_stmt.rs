//! Statement parsing.

use glam_lexer::token::TokenKind;
use glam_types::ast::*;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        if !self.enter_nesting() {
            return None;
        }
        let stmt = match self.peek_kind() {
            TokenKind::Let => self.parse_let_stmt().map(Stmt::Let),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            TokenKind::If => self.parse_if_stmt().map(Stmt::If),
            TokenKind::While => self.parse_while_stmt().map(Stmt::While),
            TokenKind::Struct => self.parse_record_decl().map(Stmt::Record),
            TokenKind::Return => self.parse_return_stmt().map(Stmt::Return),
            _ => self.parse_expression().map(|expr| {
                let span = expr.span;
                Stmt::Expr(ExprStmt { expr, span })
            }),
        };
        self.exit_nesting();
        stmt
    }

    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.position();
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(before),
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    /// `let name: Type [= value]`
    fn parse_let_stmt(&mut self) -> Option<LetStmt> {
        let start = self.current_span();
        self.advance(); // eat `let`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;
        let type_ann = self.parse_type_annotation()?;
        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Some(LetStmt {
            name,
            type_ann,
            value,
            span,
        })
    }

    /// `if condition stmt [else stmt]`
    fn parse_if_stmt(&mut self) -> Option<IfStmt> {
        let start = self.current_span();
        self.advance(); // eat `if`
        let condition = self.parse_expression()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Some(IfStmt {
            condition,
            then_branch,
            else_branch,
            span,
        })
    }

    /// `while condition stmt`
    fn parse_while_stmt(&mut self) -> Option<WhileStmt> {
        let start = self.current_span();
        self.advance(); // eat `while`
        let condition = self.parse_expression()?;
        let body = Box::new(self.parse_statement()?);
        let span = start.merge(self.previous_span());
        Some(WhileStmt {
            condition,
            body,
            span,
        })
    }

    /// `struct Name { field: Type, ... }`
    fn parse_record_decl(&mut self) -> Option<RecordDecl> {
        let start = self.current_span();
        self.advance(); // eat `struct`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let field_start = self.current_span();
            let field_name = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let type_ann = self.parse_type_annotation()?;
            fields.push(FieldDecl {
                name: field_name,
                type_ann,
                span: field_start.merge(self.previous_span()),
            });
            if !self.eat_comma() {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(RecordDecl { name, fields, span })
    }

    /// `return [value]`
    ///
    /// The value is omitted when the next token closes the block or starts
    /// another statement. A bare `return` parses; the checker rejects it.
    fn parse_return_stmt(&mut self) -> Option<ReturnStmt> {
        let start = self.advance().span; // eat `return`
        let next = self.peek_kind();
        let value = if next.starts_statement() || matches!(next, TokenKind::RBrace | TokenKind::Eof) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = start.merge(self.previous_span());
        Some(ReturnStmt { value, span })
    }
}

//! Core parser infrastructure: token cursor, error reporting, helpers.

use glam_lexer::token::{Token, TokenKind};
use glam_types::ast::{Ident, Program};
use glam_types::{CompileErrors, ErrorCode, GlamError, SourceFile, Span};
use tracing::debug;

/// Deepest expression nesting accepted before the parser bails out.
pub(crate) const MAX_NESTING: u32 = 64;

/// The glam parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Collects errors and resynchronizes at statement boundaries.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    errors: CompileErrors,
    /// Current expression/statement nesting depth.
    pub(crate) depth: u32,
}

/// Result of parsing.
pub struct ParseResult {
    /// `None` only when no statement could be recovered at all.
    pub program: Option<Program>,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(mut tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1) {
            Some(idx) => self.tokens[idx].span,
            None => Span::point(1, 1),
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            kind if kind.is_keyword() => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got reserved word '{kind}'"),
                );
                None
            }
            kind => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{kind}'"),
                );
                None
            }
        }
    }

    /// Eat an optional separating comma.
    pub(crate) fn eat_comma(&mut self) -> bool {
        self.eat(&TokenKind::Comma)
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Enter one level of nesting. Returns `false` (and reports) past the limit.
    pub(crate) fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("maximum nesting depth is {MAX_NESTING}"),
            );
            self.depth -= 1;
            return false;
        }
        true
    }

    pub(crate) fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let error = GlamError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(error);
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until we reach a synchronization point.
    /// Used after an error to resume at a known-good position.
    ///
    /// Always consumes at least one token when `start` is the current
    /// position, so a statement that fails on its first token cannot loop.
    pub(crate) fn synchronize(&mut self, start: usize) {
        if self.pos == start && !self.at_end() {
            self.advance();
        }
        while !self.at_end() {
            let kind = self.peek_kind();
            if kind.starts_statement() || *kind == TokenKind::RBrace {
                return;
            }
            self.advance();
        }
    }

    /// Current cursor position, for use with [`Parser::synchronize`].
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a `Program` AST.
    pub fn parse(mut self) -> ParseResult {
        let start = self.current_span();
        let mut stmts = Vec::new();
        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            let before = self.position();
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(before),
            }
        }
        let span = start.merge(self.previous_span());
        debug!(
            file = %self.source_file.name,
            statements = stmts.len(),
            errors = self.errors.total_errors,
            "parsed"
        );
        let program = if stmts.is_empty() && self.errors.has_errors() {
            None
        } else {
            Some(Program { stmts, span })
        };
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}

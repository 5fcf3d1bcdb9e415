use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before the lexer and parser give up.
pub const MAX_ERRORS: usize = 20;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
    Return,
    Scope,
}

/// Numeric error code (E100–E599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_DELIMITER: Self = Self(101);
    pub const INVALID_LITERAL: Self = Self(102);
    pub const NESTING_TOO_DEEP: Self = Self(103);

    // ── Type errors (E200–E299) ──
    pub const UNKNOWN_TYPE: Self = Self(200);
    pub const TYPE_MISMATCH: Self = Self(201);
    pub const WRONG_ARG_COUNT: Self = Self(202);
    pub const INVALID_OPERATOR: Self = Self(203);
    pub const NOT_CALLABLE: Self = Self(204);
    pub const UNKNOWN_FIELD: Self = Self(205);
    pub const NOT_A_RECORD: Self = Self(206);

    // ── Return-path errors (E300–E399) ──
    pub const MISSING_RETURN: Self = Self(300);
    pub const RETURN_TYPE_MISMATCH: Self = Self(301);
    pub const RETURN_WITHOUT_VALUE: Self = Self(302);

    // ── Scope errors (E500–E599) ──
    pub const VARIABLE_ALREADY_DECLARED: Self = Self(500);
    pub const UNDEFINED_VARIABLE: Self = Self(501);
    pub const TYPE_ALREADY_DECLARED: Self = Self(502);
    pub const DUPLICATE_FIELD: Self = Self(503);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Type,
            300..=399 => ErrorCategory::Return,
            500..=599 => ErrorCategory::Scope,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Return => write!(f, "return"),
            Self::Scope => write!(f, "scope"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeError
// ══════════════════════════════════════════════════════════════════════════════

/// The single failure the type checker reports.
///
/// Checking stops at the first `TypeError`; `message` is a plain sentence
/// and `line` is the 1-based source line of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[type] line {line}, {message}")]
pub struct TypeError {
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
    pub span: Span,
}

impl TypeError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            line: span.line(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Structured diagnostics
// ══════════════════════════════════════════════════════════════════════════════

/// A structured diagnostic, as emitted by the lexer, the parser, and the
/// pipeline (which converts a [`TypeError`] into one of these).
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct GlamError {
    /// Source file name.
    pub file: String,
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
}

impl GlamError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
        }
    }
}

/// The structured JSON output for a front-end run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<GlamError>,
    pub total_errors: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once [`MAX_ERRORS`] errors have been recorded.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: GlamError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Move every error of `other` into `self`.
    pub fn extend(&mut self, other: CompileErrors) {
        let dropped = other.total_errors.saturating_sub(other.errors.len());
        for error in other.errors {
            self.push_error(error);
        }
        self.total_errors += dropped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.category(), ErrorCategory::Syntax);
        assert_eq!(ErrorCode::TYPE_MISMATCH.category(), ErrorCategory::Type);
        assert_eq!(ErrorCode::MISSING_RETURN.category(), ErrorCategory::Return);
        assert_eq!(
            ErrorCode::VARIABLE_ALREADY_DECLARED.category(),
            ErrorCategory::Scope
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::TYPE_MISMATCH.to_string(), "E201");
        assert_eq!(ErrorCode::UNEXPECTED_TOKEN.to_string(), "E100");
    }

    #[test]
    fn test_type_error_display() {
        let err = TypeError::new(
            ErrorCode::UNDEFINED_VARIABLE,
            "Can't find variable 'x'.",
            Span::new(7, 3, 7, 4),
        );
        assert_eq!(err.line, 7);
        assert_eq!(err.to_string(), "[type] line 7, Can't find variable 'x'.");
    }

    #[test]
    fn test_glam_error_creation() {
        let err = GlamError::new(
            "test.glam",
            ErrorCode::TYPE_MISMATCH,
            "Expected int, got bool.",
            Span::new(12, 5, 12, 22),
            "let x: int = true",
        );
        assert_eq!(err.category, ErrorCategory::Type);
        assert_eq!(err.to_string(), "12:5: E201 [type] Expected int, got bool.");
    }

    #[test]
    fn test_glam_error_json_serialization() {
        let err = GlamError::new(
            "shapes.glam",
            ErrorCode::UNKNOWN_FIELD,
            "Member variable 'z' does not exist on type 'Point'.",
            Span::new(3, 1, 3, 9),
            "p.z",
        );

        let json = serde_json::to_string_pretty(&err).unwrap();
        assert!(json.contains("\"code\""));
        assert!(json.contains("\"line\""));
        assert!(json.contains("\"end_column\""));
        assert!(json.contains("\"source_line\": \"p.z\""));
        assert!(json.contains("\"category\": \"type\""));

        let back: GlamError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, err.code);
        assert_eq!(back.span, err.span);
    }

    #[test]
    fn test_compile_errors_max_limit() {
        let mut errs = CompileErrors::empty();
        for i in 0..25 {
            errs.push_error(GlamError::new(
                "test.glam",
                ErrorCode::UNEXPECTED_TOKEN,
                format!("Error {i}"),
                Span::point(i as u32 + 1, 1),
                "",
            ));
        }
        assert_eq!(errs.errors.len(), MAX_ERRORS);
        assert_eq!(errs.total_errors, 25);
        assert!(errs.is_full());
    }

    #[test]
    fn test_compile_errors_extend_keeps_totals() {
        let mut first = CompileErrors::empty();
        first.push_error(GlamError::new("a.glam", ErrorCode::UNEXPECTED_TOKEN, "one", Span::point(1, 1), ""));
        let mut second = CompileErrors::empty();
        for _ in 0..22 {
            second.push_error(GlamError::new("a.glam", ErrorCode::UNEXPECTED_TOKEN, "many", Span::point(2, 1), ""));
        }
        first.extend(second);
        assert_eq!(first.total_errors, 23);
        assert_eq!(first.errors.len(), MAX_ERRORS);
    }

    #[test]
    fn test_compile_errors_json_output() {
        let mut errs = CompileErrors::empty();
        assert!(!errs.has_errors());
        errs.push_error(GlamError::new(
            "test.glam",
            ErrorCode::TYPE_MISMATCH,
            "Type mismatch",
            Span::new(1, 1, 1, 10),
            "let x: int = true",
        ));
        let json = serde_json::to_string(&errs).unwrap();
        assert!(json.contains("\"total_errors\":1"));
        assert!(!json.contains("warnings"));
    }
}

//! glam compiler front end: type checking and the check pipeline.
//!
//! ```text
//! glam source → Lexer → Parser → Type Checker (+ return-path analysis)
//! ```
//!
//! Lexing and parsing recover from errors and report as many as they can.
//! The type checker only runs on a tree without syntax errors and reports at
//! most one error: the first one it finds.

pub mod checker;
pub mod env;
pub mod returns;
pub mod rules;
pub mod ty;

pub use checker::{TypeChecker, TypeResult};
pub use env::Environment;

use glam_lexer::Lexer;
use glam_parser::Parser;
use glam_types::ast::Program;
use glam_types::{CompileErrors, GlamError, SourceFile, TypeError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info_span};

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed (and, when syntax allowed, type-checked) program.
#[derive(Debug)]
pub struct Analysis {
    /// `None` when the parser could not recover any statement.
    pub program: Option<Program>,
    /// Syntax errors, or the single type error.
    pub errors: CompileErrors,
    /// `true` if the type checker ran to completion without an error.
    pub type_checked: bool,
}

/// Lex, parse, and type-check `source`, keeping the annotated tree.
pub fn analyze(source: &str, file_name: &str) -> Analysis {
    let _span = info_span!("analyze", file = file_name).entered();
    let source_file = SourceFile::new(file_name, source);

    let lex = Lexer::new(&source_file).lex();
    let mut errors = lex.errors;

    let parsed = Parser::new(lex.tokens, &source_file).parse();
    errors.extend(parsed.errors);

    let program = parsed.program;
    let mut type_checked = false;
    match &program {
        Some(program) if !errors.has_errors() => {
            match TypeChecker::new().check_program(program) {
                Ok(()) => type_checked = true,
                Err(err) => errors.push_error(type_error_to_diagnostic(&err, &source_file)),
            }
        }
        _ => debug!(errors = errors.total_errors, "skipping type check"),
    }

    Analysis {
        program,
        errors,
        type_checked,
    }
}

/// Lex, parse, and type-check `source`, returning every diagnostic.
pub fn type_check(source: &str, file_name: &str) -> CompileErrors {
    analyze(source, file_name).errors
}

/// Convert a checker error into a structured diagnostic for `source_file`.
pub fn type_error_to_diagnostic(err: &TypeError, source_file: &SourceFile) -> GlamError {
    let source_line = source_file.line(err.line).unwrap_or("");
    GlamError::new(
        &source_file.name,
        err.code,
        &err.message,
        err.span,
        source_line,
    )
}

// ══════════════════════════════════════════════════════════════════════════════
// CheckResult
// ══════════════════════════════════════════════════════════════════════════════

/// Serializable summary of a check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// `true` if the program has no errors.
    pub success: bool,
    pub errors: CompileErrors,
    /// SHA-256 hex digest of the source text.
    pub source_hash: String,
}

impl CheckResult {
    /// Summarize `errors` for `source`.
    pub fn new(source: &str, errors: CompileErrors) -> Self {
        Self {
            success: !errors.has_errors(),
            errors,
            source_hash: source_hash(source),
        }
    }

    /// Pretty-printed JSON form of this result.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Check `source` and summarize the outcome.
pub fn check_source(source: &str, file_name: &str) -> CheckResult {
    CheckResult::new(source, type_check(source, file_name))
}

/// SHA-256 hex digest of `source`.
pub fn source_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

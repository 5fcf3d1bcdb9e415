//! Shared types for the glam front end.
//!
//! This crate defines the AST node types, the semantic [`Type`], source
//! spans, error types, and other shared data structures used across the
//! lexer, parser, and type checker.

mod error;
mod span;
pub mod ast;
pub mod ty;

pub use error::{
    CompileErrors, ErrorCategory, ErrorCode, GlamError, TypeError, MAX_ERRORS,
};
pub use span::{SourceFile, Span};
pub use ty::Type;

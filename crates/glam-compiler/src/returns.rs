//! Return-path analysis for function bodies.
//!
//! Runs after the body has been checked, so every returned expression already
//! carries its type. The analysis is positional:
//!
//! 1. An expression body is the returned value.
//! 2. A block body must end in a `return`. A trailing `if` or `while` does not
//!    count, even when every branch returns.
//! 3. Every `return` nested in `if` branches, `while` bodies, and inner blocks
//!    must agree with the declared type. Returns inside nested function
//!    literals belong to that literal and are skipped.

use glam_types::ast::{ReturnStmt, Stmt};
use glam_types::{ErrorCode, Span, Type, TypeError};

use crate::checker::TypeResult;
use crate::env::Environment;

/// Check a function body against its declared return type.
pub fn check_function_body(env: &Environment, body: &Stmt, expected: &Type) -> TypeResult<()> {
    match body {
        Stmt::Expr(s) => check_returned(env, s.expr.ty(), expected, s.span),
        Stmt::Return(ret) => check_return(env, ret, expected),
        Stmt::Block(block) => {
            let Some(last) = block.stmts.last() else {
                return Err(TypeError::new(
                    ErrorCode::MISSING_RETURN,
                    "Body does not have a return statement.",
                    block.span,
                ));
            };
            if !matches!(last, Stmt::Return(_)) {
                return Err(TypeError::new(
                    ErrorCode::MISSING_RETURN,
                    "The last statement of a function body must be a return statement.",
                    last.span(),
                ));
            }
            check_nested_returns(env, &block.stmts, expected)
        }
        other => Err(TypeError::new(
            ErrorCode::MISSING_RETURN,
            "The last statement of a function body must be a return statement.",
            other.span(),
        )),
    }
}

/// Check every `return` reachable through statements, in source order.
fn check_nested_returns(env: &Environment, stmts: &[Stmt], expected: &Type) -> TypeResult<()> {
    for stmt in stmts {
        match stmt {
            Stmt::Return(ret) => check_return(env, ret, expected)?,
            Stmt::Block(block) => check_nested_returns(env, &block.stmts, expected)?,
            Stmt::If(s) => {
                check_nested_returns(env, std::slice::from_ref(&*s.then_branch), expected)?;
                if let Some(else_branch) = &s.else_branch {
                    check_nested_returns(env, std::slice::from_ref(&**else_branch), expected)?;
                }
            }
            Stmt::While(s) => {
                check_nested_returns(env, std::slice::from_ref(&*s.body), expected)?
            }
            Stmt::Expr(_) | Stmt::Let(_) | Stmt::Record(_) => {}
        }
    }
    Ok(())
}

fn check_return(env: &Environment, ret: &ReturnStmt, expected: &Type) -> TypeResult<()> {
    check_returned(env, ret.ty(), expected, ret.span)
}

fn check_returned(
    env: &Environment,
    actual: Option<&Type>,
    expected: &Type,
    span: Span,
) -> TypeResult<()> {
    match actual {
        Some(actual) if env.types_equal(expected, actual) => Ok(()),
        Some(actual) => Err(TypeError::new(
            ErrorCode::RETURN_TYPE_MISMATCH,
            format!(
                "Expected function to return value of type {expected}, but instead returned {actual}."
            ),
            span,
        )),
        None => Err(TypeError::new(
            ErrorCode::RETURN_WITHOUT_VALUE,
            "A return statement must return a value.",
            span,
        )),
    }
}

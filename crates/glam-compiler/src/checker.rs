//! glam type checker: walks a parsed AST, assigns a type to every
//! expression, and stops at the first error.
//!
//! Entry point: [`TypeChecker::check_program`].
//!
//! Error codes emitted:
//! - E200: unknown type in an annotation
//! - E201: type mismatch
//! - E202: wrong argument count
//! - E203: operator not applicable to type
//! - E204: calling a non-function
//! - E205: unknown record field
//! - E206: member access on a non-record
//! - E300/E301/E302: return-path errors (see [`crate::returns`])
//! - E500: variable or parameter already declared
//! - E501: undefined variable
//! - E502: record type already declared
//! - E503: duplicate record field

use std::collections::HashSet;

use glam_types::ast::*;
use glam_types::ty::is_builtin;
use glam_types::{ErrorCode, Span, Type, TypeError};
use tracing::{debug, trace};

use crate::env::Environment;
use crate::returns;
use crate::rules;
use crate::ty::{is_bool, literal_type};

/// Result of checking a single node.
pub type TypeResult<T> = Result<T, TypeError>;

// ══════════════════════════════════════════════════════════════════════════════
// TypeChecker
// ══════════════════════════════════════════════════════════════════════════════

/// Walks a parsed [`Program`] and validates all types.
///
/// Every checked expression is annotated in place; see [`Expr::ty`].
#[derive(Debug, Default)]
pub struct TypeChecker {
    env: Environment,
}

impl TypeChecker {
    /// Create a new type checker with an empty root scope.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// The environment, as left by the last check.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Type-check a complete program in the root scope.
    pub fn check_program(&mut self, program: &Program) -> TypeResult<()> {
        for stmt in &program.stmts {
            if let Err(err) = self.check_stmt(stmt) {
                debug!(code = %err.code, line = err.line, message = %err.message, "type error");
                return Err(err);
            }
        }
        debug!(statements = program.stmts.len(), "program type-checked");
        Ok(())
    }

    /// Run `f` inside a fresh child scope. The scope is left on every path,
    /// including when `f` fails.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> TypeResult<T>) -> TypeResult<T> {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Check a single statement.
    pub fn check_stmt(&mut self, stmt: &Stmt) -> TypeResult<()> {
        trace!(line = stmt.span().line(), kind = stmt_kind(stmt), "check statement");
        match stmt {
            Stmt::Expr(s) => self.check_expr(&s.expr).map(drop),
            Stmt::Let(s) => self.check_let(s),
            Stmt::Block(b) => self.scoped(|c| {
                b.stmts.iter().try_for_each(|stmt| c.check_stmt(stmt))
            }),
            Stmt::If(s) => {
                self.check_condition(&s.condition, "if")?;
                self.check_stmt(&s.then_branch)?;
                if let Some(else_branch) = &s.else_branch {
                    self.check_stmt(else_branch)?;
                }
                Ok(())
            }
            Stmt::While(s) => {
                self.check_condition(&s.condition, "while")?;
                self.check_stmt(&s.body)
            }
            Stmt::Record(decl) => self.check_record_decl(decl),
            Stmt::Return(s) => match &s.value {
                Some(value) => self.check_expr(value).map(drop),
                None => Err(TypeError::new(
                    ErrorCode::RETURN_WITHOUT_VALUE,
                    "A return statement must return a value.",
                    s.span,
                )),
            },
        }
    }

    /// The name is bound before the initializer is checked, so an
    /// initializer that mentions the name sees the declared type.
    fn check_let(&mut self, s: &LetStmt) -> TypeResult<()> {
        let declared = self.annotation_type(&s.type_ann)?;
        if !self.env.add_variable(&s.name.name, declared.clone()) {
            return Err(TypeError::new(
                ErrorCode::VARIABLE_ALREADY_DECLARED,
                format!("Variable '{}' is already declared in this scope.", s.name.name),
                s.name.span,
            ));
        }
        let Some(value) = &s.value else {
            return Ok(());
        };
        let actual = self.check_expr(value)?;
        if !self.env.types_equal(&declared, &actual) {
            return Err(TypeError::new(
                ErrorCode::TYPE_MISMATCH,
                format!(
                    "Invalid type in variable declaration. Expected {declared} but got {actual}."
                ),
                s.span,
            ));
        }
        Ok(())
    }

    fn check_condition(&mut self, condition: &Expr, keyword: &str) -> TypeResult<()> {
        let ty = self.check_expr(condition)?;
        if !is_bool(&ty) {
            return Err(TypeError::new(
                ErrorCode::TYPE_MISMATCH,
                format!("Expected condition in '{keyword}' statement to be bool, got {ty}."),
                condition.span,
            ));
        }
        Ok(())
    }

    fn check_record_decl(&mut self, decl: &RecordDecl) -> TypeResult<()> {
        let name = &decl.name.name;
        if self.env.find_type(name).is_some() {
            return Err(TypeError::new(
                ErrorCode::TYPE_ALREADY_DECLARED,
                format!("Record '{name}' is already declared."),
                decl.name.span,
            ));
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            if !seen.insert(field.name.name.as_str()) {
                return Err(TypeError::new(
                    ErrorCode::DUPLICATE_FIELD,
                    format!(
                        "Field '{}' is declared more than once in record '{name}'.",
                        field.name.name
                    ),
                    field.span,
                ));
            }
            fields.push((field.name.name.clone(), self.annotation_type(&field.type_ann)?));
        }

        self.env.add_type(name, Type::record(fields));
        debug!(record = %name, fields = decl.fields.len(), "record declared");
        Ok(())
    }

    /// Convert an annotation to a [`Type`], rejecting names that are neither
    /// built-in nor a declared record.
    fn annotation_type(&self, ann: &TypeAnnotation) -> TypeResult<Type> {
        self.verify_annotation(ann)?;
        Ok(Type::from_annotation(ann))
    }

    fn verify_annotation(&self, ann: &TypeAnnotation) -> TypeResult<()> {
        match &ann.kind {
            TypeKind::Named { name, .. } => {
                if is_builtin(name) || self.env.find_type(name).is_some() {
                    Ok(())
                } else {
                    Err(TypeError::new(
                        ErrorCode::UNKNOWN_TYPE,
                        format!("Unknown type '{name}'."),
                        ann.span,
                    ))
                }
            }
            TypeKind::Function { params, ret } => {
                for param in params {
                    self.verify_annotation(param)?;
                }
                self.verify_annotation(ret)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Check an expression, annotate it, and return its type.
    pub fn check_expr(&mut self, expr: &Expr) -> TypeResult<Type> {
        let ty = self.infer_expr(expr)?;
        let fresh = expr.annotate(ty.clone());
        debug_assert!(fresh, "expression checked twice");
        Ok(ty)
    }

    fn infer_expr(&mut self, expr: &Expr) -> TypeResult<Type> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_type(lit)),

            ExprKind::Variable(name) => self.env.find_variable(name).cloned().ok_or_else(|| {
                TypeError::new(
                    ErrorCode::UNDEFINED_VARIABLE,
                    format!("Can't find variable '{name}'."),
                    expr.span,
                )
            }),

            ExprKind::Group(inner) => self.check_expr(inner),

            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand)?;
                if !rules::unary_applies(*op, &ty) {
                    return Err(invalid_operator(op.symbol(), &ty, expr.span));
                }
                Ok(ty)
            }

            ExprKind::Binary { left, op, right } => {
                let left_ty = self.check_expr(left)?;
                let right_ty = self.check_expr(right)?;
                if !self.env.types_equal(&left_ty, &right_ty) {
                    return Err(TypeError::new(
                        ErrorCode::TYPE_MISMATCH,
                        format!(
                            "Types do not match in binary expression. Left type is {left_ty} while the right type is {right_ty}."
                        ),
                        expr.span,
                    ));
                }
                if !rules::binary_applies(*op, left_ty.base_name()) {
                    return Err(invalid_operator(op.symbol(), &left_ty, expr.span));
                }
                if op.is_comparison() {
                    Ok(Type::bool())
                } else {
                    Ok(left_ty)
                }
            }

            ExprKind::Logical { left, op, right } => {
                for operand in [left, right] {
                    let ty = self.check_expr(operand)?;
                    if !is_bool(&ty) {
                        return Err(TypeError::new(
                            ErrorCode::TYPE_MISMATCH,
                            format!(
                                "Expected operands of '{}' to be bool, got {ty}.",
                                op.symbol()
                            ),
                            operand.span,
                        ));
                    }
                }
                Ok(Type::bool())
            }

            ExprKind::Function(func) => self.check_function(func),

            ExprKind::Call { callee, args } => self.check_call(callee, args, expr.span),

            ExprKind::Get { object, field } => self.check_get(object, field),

            ExprKind::RecordInit { fields, .. } => {
                let mut seen = HashSet::new();
                let mut typed = Vec::with_capacity(fields.len());
                for field in fields {
                    if !seen.insert(field.name.name.as_str()) {
                        return Err(TypeError::new(
                            ErrorCode::DUPLICATE_FIELD,
                            format!("Field '{}' is initialized more than once.", field.name.name),
                            field.name.span,
                        ));
                    }
                    typed.push((field.name.name.clone(), self.check_expr(&field.value)?));
                }
                Ok(Type::record(typed))
            }
        }
    }

    fn check_function(&mut self, func: &FunctionExpr) -> TypeResult<Type> {
        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            params.push(self.annotation_type(&param.type_ann)?);
        }
        let ret = self.annotation_type(&func.ret)?;

        self.scoped(|c| {
            for (param, ty) in func.params.iter().zip(&params) {
                if !c.env.add_variable(&param.name.name, ty.clone()) {
                    return Err(TypeError::new(
                        ErrorCode::VARIABLE_ALREADY_DECLARED,
                        format!("Parameter '{}' is declared more than once.", param.name.name),
                        param.span,
                    ));
                }
            }
            c.check_stmt(&func.body)?;
            returns::check_function_body(&c.env, &func.body, &ret)
        })?;

        Ok(Type::function(params, ret))
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> TypeResult<Type> {
        let callee_ty = self.check_expr(callee)?;
        let Type::Function { params, ret } = &callee_ty else {
            return Err(TypeError::new(
                ErrorCode::NOT_CALLABLE,
                format!("Cannot call a value of type {callee_ty} as a function."),
                callee.span,
            ));
        };
        if params.len() != args.len() {
            return Err(TypeError::new(
                ErrorCode::WRONG_ARG_COUNT,
                format!(
                    "Expected {} argument{} but got {}.",
                    params.len(),
                    if params.len() == 1 { "" } else { "s" },
                    args.len()
                ),
                span,
            ));
        }
        for (i, (arg, expected)) in args.iter().zip(params).enumerate() {
            let actual = self.check_expr(arg)?;
            if !self.env.types_equal(expected, &actual) {
                return Err(TypeError::new(
                    ErrorCode::TYPE_MISMATCH,
                    format!(
                        "Expected {} argument to be of type {expected}, got {actual}.",
                        rules::ordinal(i + 1)
                    ),
                    arg.span,
                ));
            }
        }
        Ok((**ret).clone())
    }

    fn check_get(&mut self, object: &Expr, field: &Ident) -> TypeResult<Type> {
        let object_ty = self.check_expr(object)?;
        let fields = match &object_ty {
            Type::Record { fields } => fields,
            Type::Function { .. } => {
                return Err(TypeError::new(
                    ErrorCode::NOT_A_RECORD,
                    "Cannot access a member variable of a function type.",
                    field.span,
                ));
            }
            Type::Primitive { name, optional } => match self.env.find_type(name) {
                Some(_) if *optional => {
                    return Err(TypeError::new(
                        ErrorCode::NOT_A_RECORD,
                        format!(
                            "Cannot access member '{}' of optional type {object_ty}.",
                            field.name
                        ),
                        field.span,
                    ));
                }
                Some(Type::Record { fields }) => fields,
                _ => {
                    return Err(TypeError::new(
                        ErrorCode::NOT_A_RECORD,
                        format!("Type {object_ty} is not a record."),
                        field.span,
                    ));
                }
            },
        };
        fields.get(&field.name).cloned().ok_or_else(|| {
            TypeError::new(
                ErrorCode::UNKNOWN_FIELD,
                format!(
                    "Member variable '{}' does not exist on type '{object_ty}'.",
                    field.name
                ),
                field.span,
            )
        })
    }
}

fn invalid_operator(symbol: &str, ty: &Type, span: Span) -> TypeError {
    TypeError::new(
        ErrorCode::INVALID_OPERATOR,
        format!("Operator '{symbol}' cannot be applied to type {ty}."),
        span,
    )
}

fn stmt_kind(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Expr(_) => "expr",
        Stmt::Let(_) => "let",
        Stmt::Block(_) => "block",
        Stmt::If(_) => "if",
        Stmt::While(_) => "while",
        Stmt::Record(_) => "struct",
        Stmt::Return(_) => "return",
    }
}

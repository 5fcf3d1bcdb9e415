//! AST node types for glam.
//!
//! Every node carries a [`Span`]; its start line is the line diagnostics
//! report. Expression nodes also carry a write-once slot for the [`Type`]
//! the checker assigns to them, so later stages never re-run inference.

use std::cell::OnceCell;

use crate::{Span, Type};

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete glam program: a sequence of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Type Annotations
// ══════════════════════════════════════════════════════════════════════════════

/// A type as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `int`, `string?`, `Point`
    Named { name: String, optional: bool },
    /// `(int, int) -> int`
    Function {
        params: Vec<TypeAnnotation>,
        ret: Box<TypeAnnotation>,
    },
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprStmt),
    Let(LetStmt),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    Record(RecordDecl),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::Let(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Record(s) => s.span,
            Stmt::Return(s) => s.span,
        }
    }
}

/// An expression evaluated for its effect (or as an arrow-function body).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `let name: Type [= value]`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Ident,
    pub type_ann: TypeAnnotation,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `{ stmts... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `if condition stmt [else stmt]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// `while condition stmt`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `struct Name { field: Type, ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: Ident,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// A single `name: Type` entry of a record declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Ident,
    pub type_ann: TypeAnnotation,
    pub span: Span,
}

/// `return [value]`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

impl ReturnStmt {
    /// The checked type of the returned value.
    pub fn ty(&self) -> Option<&Type> {
        self.value.as_ref()?.ty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node with its span and checked type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    ty: OnceCell<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: OnceCell::new(),
        }
    }

    /// The type assigned by the checker, if this node has been checked.
    pub fn ty(&self) -> Option<&Type> {
        self.ty.get()
    }

    /// Record the checked type. The first write wins; returns `false` if a
    /// type was already recorded.
    pub fn annotate(&self, ty: Type) -> bool {
        self.ty.set(ty).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A variable reference: `count`
    Variable(String),
    /// `( expr )`
    Group(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `and` / `or`; both sides must be `bool`.
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Function(Box<FunctionExpr>),
    /// `callee(args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.field`
    Get {
        object: Box<Expr>,
        field: Ident,
    },
    /// `Name { field: expr, ... }`
    RecordInit {
        name: Ident,
        fields: Vec<FieldInit>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl BinOp {
    /// Returns `true` for the operators that always produce `bool`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq
                | BinOp::NotEq
                | BinOp::Less
                | BinOp::LessEq
                | BinOp::Greater
                | BinOp::GreaterEq
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// `fn(params): ret => body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<Param>,
    pub ret: TypeAnnotation,
    /// Either a block or a single expression statement.
    pub body: Stmt,
    pub span: Span,
}

/// A function parameter: `name: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub type_ann: TypeAnnotation,
    pub span: Span,
}

/// A single `name: value` entry of a record instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_is_write_once() {
        let expr = Expr::new(ExprKind::Literal(Literal::Int(1)), Span::point(1, 1));
        assert!(expr.ty().is_none());
        assert!(expr.annotate(Type::int()));
        assert!(!expr.annotate(Type::bool()));
        assert_eq!(expr.ty(), Some(&Type::int()));
    }

    #[test]
    fn return_type_comes_from_value() {
        let value = Expr::new(ExprKind::Literal(Literal::Bool(true)), Span::point(2, 8));
        value.annotate(Type::bool());
        let ret = ReturnStmt {
            value: Some(value),
            span: Span::new(2, 1, 2, 11),
        };
        assert_eq!(ret.ty(), Some(&Type::bool()));
        let bare = ReturnStmt {
            value: None,
            span: Span::point(3, 1),
        };
        assert_eq!(bare.ty(), None);
    }

    #[test]
    fn comparison_operators() {
        assert!(BinOp::LessEq.is_comparison());
        assert!(BinOp::NotEq.is_comparison());
        assert!(!BinOp::Add.is_comparison());
        assert_eq!(BinOp::GreaterEq.symbol(), ">=");
        assert_eq!(UnaryOp::Not.symbol(), "!");
    }
}

//! Semantic type representation.
//!
//! [`Type`] is the type the checker assigns to expressions. It is distinct
//! from [`crate::ast::TypeAnnotation`], the syntactic form written in source.
//!
//! The language relation between two types is [`Type::equals`]. The derived
//! `PartialEq` is exact structural identity and is not what the checker uses.

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{TypeAnnotation, TypeKind};

/// Names of the built-in primitive types.
pub const BUILTIN_PRIMITIVES: &[&str] = &["int", "float", "string", "bool", "null"];

/// Returns `true` if `name` is one of [`BUILTIN_PRIMITIVES`].
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_PRIMITIVES.contains(&name)
}

// ══════════════════════════════════════════════════════════════════════════════
// Type
// ══════════════════════════════════════════════════════════════════════════════

/// A semantic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A built-in primitive (`int`, `float`, `string`, `bool`, `null`) or a
    /// reference to a user-declared record by name.
    Primitive { name: String, optional: bool },
    /// `(T1, T2, ...) -> R`
    Function { params: Vec<Type>, ret: Box<Type> },
    /// `{ field: Type, ... }`, with field order irrelevant.
    Record { fields: BTreeMap<String, Type> },
}

impl Type {
    // ── Constructors ──

    pub fn int() -> Self {
        Self::named("int")
    }

    pub fn float() -> Self {
        Self::named("float")
    }

    pub fn bool() -> Self {
        Self::named("bool")
    }

    pub fn string() -> Self {
        Self::named("string")
    }

    pub fn null() -> Self {
        Self::named("null")
    }

    /// A non-optional primitive or user type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Type::Primitive {
            name: name.into(),
            optional: false,
        }
    }

    /// The optional form of a primitive (`int` → `int?`).
    ///
    /// Functions and records have no optional form and are returned unchanged.
    pub fn optional(self) -> Self {
        match self {
            Type::Primitive { name, .. } => Type::Primitive {
                name,
                optional: true,
            },
            other => other,
        }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Type)>) -> Self {
        Type::Record {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Convert an AST `TypeAnnotation` into a semantic `Type`.
    ///
    /// Named types are kept by name; resolving them to their record schema
    /// needs the environment.
    pub fn from_annotation(ann: &TypeAnnotation) -> Self {
        match &ann.kind {
            TypeKind::Named { name, optional } => Type::Primitive {
                name: name.clone(),
                optional: *optional,
            },
            TypeKind::Function { params, ret } => Type::function(
                params.iter().map(Type::from_annotation).collect(),
                Type::from_annotation(ret),
            ),
        }
    }

    // ── Queries ──

    /// The primitive name, if this is a `Primitive`.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Type::Primitive { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if this is a primitive named `name` (optional or not).
    pub fn is_named(&self, name: &str) -> bool {
        self.base_name() == Some(name)
    }

    /// Returns `true` for a non-optional, non-builtin primitive, i.e. a
    /// reference to a record type that can be resolved by name.
    pub fn is_user_reference(&self) -> bool {
        matches!(self, Type::Primitive { name, optional: false } if !is_builtin(name))
    }

    // ── Equality ──

    /// Structural compatibility between `self` (the expected type) and
    /// `other` (the actual type).
    ///
    /// - primitives: same name and same optionality;
    /// - functions: same arity, pairwise-equal parameters, equal returns;
    /// - records: every field of `self` exists in `other` with an equal
    ///   type. Extra fields on `other` are accepted, so this direction matters.
    ///
    /// Named types are compared by name here. Callers that want record
    /// references expanded resolve both sides first.
    pub fn equals(&self, other: &Type) -> bool {
        match (self, other) {
            (
                Type::Primitive {
                    name: a,
                    optional: a_opt,
                },
                Type::Primitive {
                    name: b,
                    optional: b_opt,
                },
            ) => a == b && a_opt == b_opt,
            (
                Type::Function {
                    params: a_params,
                    ret: a_ret,
                },
                Type::Function {
                    params: b_params,
                    ret: b_ret,
                },
            ) => {
                a_params.len() == b_params.len()
                    && a_params.iter().zip(b_params).all(|(a, b)| a.equals(b))
                    && a_ret.equals(b_ret)
            }
            (Type::Record { fields: a }, Type::Record { fields: b }) => a
                .iter()
                .all(|(name, ty)| b.get(name).is_some_and(|other| ty.equals(other))),
            _ => false,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive { name, optional } => {
                write!(f, "{name}")?;
                if *optional {
                    write!(f, "?")?;
                }
                Ok(())
            }
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Record { fields } if fields.is_empty() => write!(f, "{{}}"),
            Type::Record { fields } => {
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_equality_respects_optionality() {
        assert!(Type::int().equals(&Type::int()));
        assert!(!Type::int().equals(&Type::int().optional()));
        assert!(!Type::int().optional().equals(&Type::int()));
        assert!(Type::string().optional().equals(&Type::string().optional()));
        assert!(!Type::int().equals(&Type::float()));
    }

    #[test]
    fn primitive_never_equals_function_or_record() {
        let f = Type::function(vec![], Type::int());
        let r = Type::record([("a", Type::int())]);
        assert!(!Type::int().equals(&f));
        assert!(!Type::int().equals(&r));
        assert!(!f.equals(&Type::int()));
        assert!(!r.equals(&Type::int()));
        assert!(!f.equals(&r));
    }

    #[test]
    fn function_equality_is_positional() {
        let a = Type::function(vec![Type::int(), Type::float()], Type::int());
        let b = Type::function(vec![Type::int(), Type::float()], Type::int());
        let swapped = Type::function(vec![Type::float(), Type::int()], Type::int());
        let other_ret = Type::function(vec![Type::int(), Type::float()], Type::bool());
        let shorter = Type::function(vec![Type::int()], Type::int());
        assert!(a.equals(&b));
        assert!(!a.equals(&swapped));
        assert!(!a.equals(&other_ret));
        assert!(!a.equals(&shorter));
    }

    #[test]
    fn record_matches_is_one_directional() {
        let narrow = Type::record([("a", Type::int())]);
        let wide = Type::record([("a", Type::int()), ("b", Type::bool())]);
        assert!(narrow.equals(&wide));
        assert!(!wide.equals(&narrow));
    }

    #[test]
    fn record_field_types_must_agree() {
        let a = Type::record([("a", Type::int())]);
        let b = Type::record([("a", Type::int().optional())]);
        assert!(!a.equals(&b));
    }

    #[test]
    fn empty_record_matches_any_record() {
        let empty = Type::record(Vec::<(String, Type)>::new());
        assert!(empty.equals(&Type::record([("x", Type::float())])));
    }

    #[test]
    fn named_types_compare_by_name_only() {
        assert!(Type::named("Point").equals(&Type::named("Point")));
        assert!(!Type::named("Point").equals(&Type::named("Vec2")));
        assert!(!Type::named("Point").equals(&Type::named("Point").optional()));
    }

    #[test]
    fn optional_on_function_is_identity() {
        let f = Type::function(vec![Type::int()], Type::int());
        assert_eq!(f.clone().optional(), f);
    }

    #[test]
    fn user_reference_detection() {
        assert!(Type::named("Point").is_user_reference());
        assert!(!Type::named("Point").optional().is_user_reference());
        assert!(!Type::int().is_user_reference());
        assert!(!Type::function(vec![], Type::int()).is_user_reference());
    }

    #[test]
    fn display_canonical_forms() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::string().optional().to_string(), "string?");
        assert_eq!(
            Type::function(vec![Type::int(), Type::int()], Type::int()).to_string(),
            "(int, int) -> int"
        );
        assert_eq!(Type::function(vec![], Type::bool()).to_string(), "() -> bool");
        assert_eq!(
            Type::record([("b", Type::bool()), ("a", Type::int())]).to_string(),
            "{ a: int, b: bool }"
        );
        assert_eq!(Type::record(Vec::<(String, Type)>::new()).to_string(), "{}");
    }
}

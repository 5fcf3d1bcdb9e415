//! Type environment with lexically scoped bindings.
//!
//! [`Environment`] is an arena of scopes addressed by index. Each scope holds
//! its variable bindings, the record types declared in it, and the index of
//! its parent. Scopes nest strictly, so the current scope is always the last
//! one in the arena and leaving it truncates the arena.

use std::collections::HashMap;

use glam_types::Type;
use tracing::trace;

// ══════════════════════════════════════════════════════════════════════════════
// Scope
// ══════════════════════════════════════════════════════════════════════════════

/// A single scope level.
#[derive(Debug, Default)]
struct Scope {
    parent: Option<usize>,
    values: HashMap<String, Type>,
    /// Declared record name → its `Type::Record` schema.
    types: HashMap<String, Type>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Environment
// ══════════════════════════════════════════════════════════════════════════════

/// A chain of scopes for name and record-type resolution.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: usize,
}

impl Environment {
    /// Create a new environment holding only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }

    /// Number of scopes between the current scope and the root (root is 0).
    pub fn depth(&self) -> usize {
        self.chain().count() - 1
    }

    /// Walk from the current scope outward to the root.
    fn chain(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(&self.scopes[self.current]), |scope| {
            scope.parent.map(|idx| &self.scopes[idx])
        })
    }

    // ── Scope lifecycle ───────────────────────────────────────────────────────

    /// Push a fresh child of the current scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope {
            parent: Some(self.current),
            ..Scope::default()
        });
        self.current = self.scopes.len() - 1;
        trace!(depth = self.depth(), "enter scope");
    }

    /// Discard the current scope and return to its parent.
    /// Leaving the root scope does nothing.
    pub fn exit_scope(&mut self) {
        let Some(parent) = self.scopes[self.current].parent else {
            return;
        };
        self.scopes.truncate(self.current);
        self.current = parent;
        trace!(depth = self.depth(), "exit scope");
    }

    // ── Variables ─────────────────────────────────────────────────────────────

    /// Look up a variable, searching from the innermost scope outward.
    pub fn find_variable(&self, name: &str) -> Option<&Type> {
        self.chain().find_map(|scope| scope.values.get(name))
    }

    /// Bind a variable in the current scope.
    ///
    /// Returns `false` if the name is already bound in the current scope.
    /// Bindings in outer scopes may be shadowed.
    pub fn add_variable(&mut self, name: &str, ty: Type) -> bool {
        let scope = &mut self.scopes[self.current];
        if scope.values.contains_key(name) {
            return false;
        }
        scope.values.insert(name.to_string(), ty);
        true
    }

    // ── Record types ──────────────────────────────────────────────────────────

    /// Look up a declared record type anywhere in the visible chain.
    pub fn find_type(&self, name: &str) -> Option<&Type> {
        self.chain().find_map(|scope| scope.types.get(name))
    }

    /// Register a record type in the current scope.
    ///
    /// Returns `false` if a record with that name is visible from here, so a
    /// record name can never be shadowed.
    pub fn add_type(&mut self, name: &str, record: Type) -> bool {
        if self.find_type(name).is_some() {
            return false;
        }
        self.scopes[self.current]
            .types
            .insert(name.to_string(), record);
        true
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    /// Expand named record references into their schemas, recursively.
    ///
    /// Only non-optional references are expanded; `Point?` keeps comparing by
    /// name and optionality. Names that are not declared are left untouched.
    pub fn resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Primitive { name, .. } if ty.is_user_reference() => match self.find_type(name) {
                Some(record) => self.resolve(record),
                None => ty.clone(),
            },
            Type::Primitive { .. } => ty.clone(),
            Type::Function { params, ret } => Type::function(
                params.iter().map(|p| self.resolve(p)).collect(),
                self.resolve(ret),
            ),
            Type::Record { fields } => Type::Record {
                fields: fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.resolve(field)))
                    .collect(),
            },
        }
    }

    /// `expected.equals(actual)` after resolving both sides.
    pub fn types_equal(&self, expected: &Type, actual: &Type) -> bool {
        self.resolve(expected).equals(&self.resolve(actual))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let mut env = Environment::new();
        assert!(env.add_variable("x", Type::int()));
        env.enter_scope();
        env.enter_scope();
        assert_eq!(env.find_variable("x"), Some(&Type::int()));
        assert_eq!(env.find_variable("y"), None);
        assert_eq!(env.depth(), 2);
    }

    #[test]
    fn shadowing_allowed_across_scopes_only() {
        let mut env = Environment::new();
        assert!(env.add_variable("x", Type::int()));
        assert!(!env.add_variable("x", Type::bool()));
        env.enter_scope();
        assert!(env.add_variable("x", Type::bool()));
        assert_eq!(env.find_variable("x"), Some(&Type::bool()));
        env.exit_scope();
        assert_eq!(env.find_variable("x"), Some(&Type::int()));
    }

    #[test]
    fn exit_discards_bindings() {
        let mut env = Environment::new();
        env.enter_scope();
        env.add_variable("inner", Type::string());
        env.exit_scope();
        assert_eq!(env.find_variable("inner"), None);
        env.enter_scope();
        assert_eq!(env.find_variable("inner"), None);
    }

    #[test]
    fn exit_at_root_is_noop() {
        let mut env = Environment::new();
        env.add_variable("g", Type::float());
        env.exit_scope();
        env.exit_scope();
        assert_eq!(env.depth(), 0);
        assert_eq!(env.find_variable("g"), Some(&Type::float()));
    }

    #[test]
    fn types_are_unique_across_chain() {
        let mut env = Environment::new();
        let point = Type::record([("x", Type::int())]);
        assert!(env.add_type("Point", point.clone()));
        env.enter_scope();
        assert!(!env.add_type("Point", point.clone()));
        assert_eq!(env.find_type("Point"), Some(&point));
        assert!(env.add_type("Local", Type::record([("y", Type::int())])));
        env.exit_scope();
        assert_eq!(env.find_type("Local"), None);
    }

    #[test]
    fn resolve_expands_nested_references() {
        let mut env = Environment::new();
        env.add_type("Point", Type::record([("x", Type::int()), ("y", Type::int())]));
        env.add_type("Line", Type::record([("from", Type::named("Point"))]));
        let resolved = env.resolve(&Type::named("Line"));
        assert_eq!(
            resolved,
            Type::record([(
                "from",
                Type::record([("x", Type::int()), ("y", Type::int())])
            )])
        );
    }

    #[test]
    fn resolve_keeps_optional_and_unknown_names() {
        let mut env = Environment::new();
        env.add_type("Point", Type::record([("x", Type::int())]));
        let opt = Type::named("Point").optional();
        assert_eq!(env.resolve(&opt), opt);
        assert_eq!(env.resolve(&Type::named("Ghost")), Type::named("Ghost"));
    }

    #[test]
    fn types_equal_matches_named_against_literal_record() {
        let mut env = Environment::new();
        env.add_type("Point", Type::record([("x", Type::int()), ("y", Type::int())]));
        let literal = Type::record([("x", Type::int()), ("y", Type::int()), ("z", Type::int())]);
        assert!(env.types_equal(&Type::named("Point"), &literal));
        assert!(!env.types_equal(&literal, &Type::named("Point")));
    }
}

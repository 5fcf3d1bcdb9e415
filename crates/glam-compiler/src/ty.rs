//! Type helpers shared by the checker and the return-path analysis.

use glam_types::ast::Literal;
use glam_types::Type;

/// The type of a literal, from its lexical category alone.
pub fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::int(),
        Literal::Float(_) => Type::float(),
        Literal::Bool(_) => Type::bool(),
        Literal::String(_) => Type::string(),
        Literal::Null => Type::null(),
    }
}

/// Returns `true` only for the non-optional `bool`.
pub fn is_bool(ty: &Type) -> bool {
    ty.equals(&Type::bool())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_categories() {
        assert_eq!(literal_type(&Literal::Int(3)), Type::int());
        assert_eq!(literal_type(&Literal::Float(0.5)), Type::float());
        assert_eq!(literal_type(&Literal::Bool(false)), Type::bool());
        assert_eq!(literal_type(&Literal::String("s".into())), Type::string());
        assert_eq!(literal_type(&Literal::Null), Type::null());
    }

    #[test]
    fn optional_bool_is_not_bool() {
        assert!(is_bool(&Type::bool()));
        assert!(!is_bool(&Type::bool().optional()));
        assert!(!is_bool(&Type::int()));
    }
}

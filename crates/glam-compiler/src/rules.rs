//! Operator applicability tables.
//!
//! Lookups are by base type name only, so `int?` is treated like `int`.
//! `==` and `!=` apply to every type and never consult a table. The one
//! exception is `!`, which needs an exact, non-optional `bool`.

use glam_types::ast::{BinOp, UnaryOp};
use glam_types::Type;

use crate::ty::is_bool;

const NUMERIC: &[&str] = &["int", "float"];
const ADDABLE: &[&str] = &["int", "float", "string"];

/// Base type names a binary operator accepts, or `None` if it accepts any.
fn binary_table(op: BinOp) -> Option<&'static [&'static str]> {
    match op {
        BinOp::Add => Some(ADDABLE),
        BinOp::Sub | BinOp::Mul | BinOp::Div => Some(NUMERIC),
        BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => Some(NUMERIC),
        BinOp::Eq | BinOp::NotEq => None,
    }
}

/// Returns `true` if `op` may be applied to an operand of type `ty`.
pub fn unary_applies(op: UnaryOp, ty: &Type) -> bool {
    match op {
        UnaryOp::Neg => ty.base_name().is_some_and(|n| NUMERIC.contains(&n)),
        UnaryOp::Not => is_bool(ty),
    }
}

/// Returns `true` if `op` may be applied to operands of base type `name`.
///
/// `name` is `None` for function and record operands, which only the
/// equality operators accept.
pub fn binary_applies(op: BinOp, name: Option<&str>) -> bool {
    match binary_table(op) {
        None => true,
        Some(table) => name.is_some_and(|n| table.contains(&n)),
    }
}

/// English ordinal for a 1-based position: `1st`, `2nd`, `3rd`, `11th`, `22nd`.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_accepts_strings_not_bools() {
        assert!(binary_applies(BinOp::Add, Some("int")));
        assert!(binary_applies(BinOp::Add, Some("float")));
        assert!(binary_applies(BinOp::Add, Some("string")));
        assert!(!binary_applies(BinOp::Add, Some("bool")));
        assert!(!binary_applies(BinOp::Add, None));
    }

    #[test]
    fn arithmetic_and_relational_are_numeric_only() {
        for op in [BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Less, BinOp::GreaterEq] {
            assert!(binary_applies(op, Some("int")), "{}", op.symbol());
            assert!(binary_applies(op, Some("float")), "{}", op.symbol());
            assert!(!binary_applies(op, Some("string")), "{}", op.symbol());
            assert!(!binary_applies(op, Some("Point")), "{}", op.symbol());
        }
    }

    #[test]
    fn equality_accepts_everything() {
        assert!(binary_applies(BinOp::Eq, Some("bool")));
        assert!(binary_applies(BinOp::NotEq, Some("Point")));
        assert!(binary_applies(BinOp::Eq, None));
    }

    #[test]
    fn unary_rules() {
        assert!(unary_applies(UnaryOp::Neg, &Type::int()));
        assert!(unary_applies(UnaryOp::Neg, &Type::float()));
        assert!(unary_applies(UnaryOp::Neg, &Type::int().optional()));
        assert!(!unary_applies(UnaryOp::Neg, &Type::bool()));
        assert!(unary_applies(UnaryOp::Not, &Type::bool()));
        assert!(!unary_applies(UnaryOp::Not, &Type::bool().optional()));
        assert!(!unary_applies(UnaryOp::Not, &Type::int()));
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
    }
}

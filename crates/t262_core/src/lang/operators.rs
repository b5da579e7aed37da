//! Operator vocabulary.
//!
//! Canonical symbol operators of the fixture script subset with precedence, associativity and fixity metadata.
//! Word operators (`typeof`, `in`, `instanceof`, ...) are keywords; see [`crate::lang::keywords`].
//!
//! ## Notes
//! - Precedence follows the usual ECMAScript table: larger numbers bind tighter.
//! - `+` and `-` are registered once (as infix); the parser also accepts them in prefix position.
//!
//! ## Examples
//! ```rust
//! use t262_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("==="), Some(OperatorId::StrictEq));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::Edition;

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define where an operator sits relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    /// `++` / `--`: prefix or postfix.
    Update,
}

/// Stable identifier for every symbol operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Assignment
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,

    // Logical
    OrOr,
    AndAnd,

    // Equality
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,

    // Relational
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Unary
    Bang,
    PlusPlus,
    MinusMinus,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub canonical: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub introduced_in: Edition,
}

const fn info(
    id: OperatorId,
    canonical: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
    introduced_in: Edition,
) -> OperatorInfo {
    OperatorInfo {
        id,
        canonical,
        precedence,
        associativity,
        fixity,
        introduced_in,
    }
}

use Associativity::{Left, Right};
use Edition::{Es1, Es3};
use Fixity::{Infix, Prefix, Update};

/// Registry of all operators, in [`OperatorId`] order.
pub const OPERATORS: &[OperatorInfo] = &[
    info(OperatorId::Assign, "=", 2, Right, Infix, Es1),
    info(OperatorId::PlusAssign, "+=", 2, Right, Infix, Es1),
    info(OperatorId::MinusAssign, "-=", 2, Right, Infix, Es1),
    info(OperatorId::StarAssign, "*=", 2, Right, Infix, Es1),
    info(OperatorId::SlashAssign, "/=", 2, Right, Infix, Es1),
    info(OperatorId::PercentAssign, "%=", 2, Right, Infix, Es1),
    info(OperatorId::OrOr, "||", 4, Left, Infix, Es1),
    info(OperatorId::AndAnd, "&&", 5, Left, Infix, Es1),
    info(OperatorId::Eq, "==", 9, Left, Infix, Es1),
    info(OperatorId::NotEq, "!=", 9, Left, Infix, Es1),
    info(OperatorId::StrictEq, "===", 9, Left, Infix, Es3),
    info(OperatorId::StrictNotEq, "!==", 9, Left, Infix, Es3),
    info(OperatorId::Lt, "<", 10, Left, Infix, Es1),
    info(OperatorId::Gt, ">", 10, Left, Infix, Es1),
    info(OperatorId::LtEq, "<=", 10, Left, Infix, Es1),
    info(OperatorId::GtEq, ">=", 10, Left, Infix, Es1),
    info(OperatorId::Plus, "+", 12, Left, Infix, Es1),
    info(OperatorId::Minus, "-", 12, Left, Infix, Es1),
    info(OperatorId::Star, "*", 13, Left, Infix, Es1),
    info(OperatorId::Slash, "/", 13, Left, Infix, Es1),
    info(OperatorId::Percent, "%", 13, Left, Infix, Es1),
    info(OperatorId::Bang, "!", 15, Right, Prefix, Es1),
    info(OperatorId::PlusPlus, "++", 16, Right, Update, Es1),
    info(OperatorId::MinusMinus, "--", 16, Right, Update, Es1),
];

/// Metadata for `id`.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Canonical spelling of `id`.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).canonical
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.canonical == s).map(|o| o.id)
}

/// Return `true` if `id` is one of the assignment operators.
pub fn is_assignment(id: OperatorId) -> bool {
    matches!(
        id,
        OperatorId::Assign
            | OperatorId::PlusAssign
            | OperatorId::MinusAssign
            | OperatorId::StarAssign
            | OperatorId::SlashAssign
            | OperatorId::PercentAssign
    )
}

/// For a compound assignment, the arithmetic operator it applies.
///
/// ## Returns
/// - `Some(OperatorId::Plus)` for `+=` and so on.
/// - `None` for plain `=` and every non-assignment operator.
pub fn compound_base(id: OperatorId) -> Option<OperatorId> {
    match id {
        OperatorId::PlusAssign => Some(OperatorId::Plus),
        OperatorId::MinusAssign => Some(OperatorId::Minus),
        OperatorId::StarAssign => Some(OperatorId::Star),
        OperatorId::SlashAssign => Some(OperatorId::Slash),
        OperatorId::PercentAssign => Some(OperatorId::Percent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_base_only_for_compound_assignments() {
        for op in OPERATORS {
            let base = compound_base(op.id);
            if is_assignment(op.id) && op.id != OperatorId::Assign {
                let base = base.unwrap();
                assert_eq!(format!("{}=", as_str(base)), op.canonical);
            } else {
                assert!(base.is_none(), "{:?} should have no compound base", op.id);
            }
        }
    }

    #[test]
    fn test_equality_binds_looser_than_relational() {
        assert!(info_for(OperatorId::StrictEq).precedence < info_for(OperatorId::Lt).precedence);
        assert!(info_for(OperatorId::AndAnd).precedence < info_for(OperatorId::StrictEq).precedence);
        assert!(info_for(OperatorId::OrOr).precedence < info_for(OperatorId::AndAnd).precedence);
    }
}

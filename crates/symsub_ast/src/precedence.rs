//! Operator precedence for binary and unary operators.
//!
//! Shared by the parser, which climbs precedence levels, and the printer,
//! which uses the same table to decide where parentheses are required.

use crate::node::Expression;
use crate::syntax_kind::SyntaxKind;

/// Operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Comma = 0,
    Assignment = 3,
    Conditional = 4,
    NullishCoalescing = 5,
    LogicalOr = 6,
    LogicalAnd = 7,
    BitwiseOr = 8,
    BitwiseXor = 9,
    BitwiseAnd = 10,
    Equality = 11,
    Relational = 12,
    Shift = 13,
    Additive = 14,
    Multiplicative = 15,
    Exponentiation = 16,
    Unary = 17,
    LeftHandSide = 19,
    Primary = 21,
    Invalid = 255,
}

/// Get the binary operator precedence for a given token kind.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::QuestionQuestionToken => OperatorPrecedence::NullishCoalescing,
        SyntaxKind::BarBarToken => OperatorPrecedence::LogicalOr,
        SyntaxKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken => OperatorPrecedence::Relational,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            OperatorPrecedence::Multiplicative
        }
        SyntaxKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
        _ => OperatorPrecedence::Invalid,
    }
}

/// Whether a binary operator groups right-to-left.
pub fn is_right_associative(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::AsteriskAsteriskToken
}

/// The precedence an expression has when it appears as an operand.
///
/// Parentheses are transparent: the printer re-derives them.
pub fn get_expression_precedence(expr: &Expression<'_>) -> OperatorPrecedence {
    match expr {
        Expression::Parenthesized(paren) => get_expression_precedence(paren.expression),
        Expression::Assignment(_) => OperatorPrecedence::Assignment,
        Expression::Binary(binary) => get_binary_operator_precedence(binary.operator_token.kind()),
        Expression::PrefixUnary(_) => OperatorPrecedence::Unary,
        Expression::Call(_) => OperatorPrecedence::LeftHandSide,
        Expression::Identifier(_)
        | Expression::NumericLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::NullKeyword(_)
        | Expression::TrueKeyword(_)
        | Expression::FalseKeyword(_) => OperatorPrecedence::Primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let mul = get_binary_operator_precedence(SyntaxKind::AsteriskToken);
        let add = get_binary_operator_precedence(SyntaxKind::PlusToken);
        assert!(mul > add);
        assert!(add > get_binary_operator_precedence(SyntaxKind::LessThanToken));
    }

    #[test]
    fn test_non_operators_are_invalid() {
        assert_eq!(get_binary_operator_precedence(SyntaxKind::EqualsToken), OperatorPrecedence::Invalid);
        assert_eq!(get_binary_operator_precedence(SyntaxKind::CommaToken), OperatorPrecedence::Invalid);
    }

    #[test]
    fn test_exponent_is_right_associative() {
        assert!(is_right_associative(SyntaxKind::AsteriskAsteriskToken));
        assert!(!is_right_associative(SyntaxKind::MinusToken));
    }
}

//! Binding powers of Mufiz operators, lowest first.

use mufiz_syntax::SyntaxKind::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    Assignment = 1,
    LogicalOr = 2,
    LogicalAnd = 3,
    Equality = 4,
    Comparison = 5,
    Additive = 6,
    Multiplicative = 7,
    Unary = 8,
    Call = 9,
    Member = 10,
    Index = 11,
}

impl Precedence {
    /// Level at which `a+bi` is recognized. The literal is matched by
    /// lookahead before any operator is consumed, so it always wins over an
    /// additive expression.
    pub const COMPLEX: Self = Self::LogicalOr;

    pub const fn power(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// What an infix or postfix token builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Assignment,
    Binary(SyntaxKind),
    Call,
    Member,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub precedence: Precedence,
    pub associativity: Associativity,
    pub operator: Operator,
}

impl Binding {
    const fn left(precedence: Precedence, operator: Operator) -> Self {
        Self { precedence, associativity: Associativity::Left, operator }
    }

    /// Minimum binding power for the right-hand operand.
    pub const fn right_power(self) -> u8 {
        match self.associativity {
            Associativity::Left => self.precedence.power() + 1,
            Associativity::Right => self.precedence.power(),
        }
    }
}

/// Binding of a token that continues an expression, if any.
pub const fn infix(kind: SyntaxKind) -> Option<Binding> {
    use Precedence as P;

    let binding = match kind {
        EQ => Binding {
            precedence: P::Assignment,
            associativity: Associativity::Right,
            operator: Operator::Assignment,
        },
        OR_KW => Binding::left(P::LogicalOr, Operator::Binary(LOGICAL_OR_EXPRESSION)),
        AND_KW => Binding::left(P::LogicalAnd, Operator::Binary(LOGICAL_AND_EXPRESSION)),
        EQ2 | BANG_EQ => Binding::left(P::Equality, Operator::Binary(EQUALITY_EXPRESSION)),
        LT | LT_EQ | GT | GT_EQ => {
            Binding::left(P::Comparison, Operator::Binary(COMPARISON_EXPRESSION))
        }
        PLUS | MINUS => Binding::left(P::Additive, Operator::Binary(ADDITION_EXPRESSION)),
        STAR | SLASH | PERCENT => {
            Binding::left(P::Multiplicative, Operator::Binary(MULTIPLICATION_EXPRESSION))
        }
        LEFT_PAREN => Binding::left(P::Call, Operator::Call),
        DOT => Binding::left(P::Member, Operator::Member),
        LEFT_BRACKET => Binding::left(P::Index, Operator::Index),
        _ => return None,
    };

    Some(binding)
}

/// Binding power of a prefix operator's operand.
pub const fn prefix(kind: SyntaxKind) -> Option<Precedence> {
    match kind {
        BANG | MINUS | PLUS => Some(Precedence::Unary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        let levels = [
            Precedence::Assignment,
            Precedence::LogicalOr,
            Precedence::LogicalAnd,
            Precedence::Equality,
            Precedence::Comparison,
            Precedence::Additive,
            Precedence::Multiplicative,
            Precedence::Unary,
            Precedence::Call,
            Precedence::Member,
            Precedence::Index,
        ];
        assert!(levels.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(levels[0].power(), 1);
        assert_eq!(levels[10].power(), 11);
    }

    #[test]
    fn assignment_is_right_associative() {
        let binding = infix(EQ).unwrap();
        assert_eq!(binding.associativity, Associativity::Right);
        assert_eq!(binding.right_power(), 1);
    }

    #[test]
    fn binary_operators_are_left_associative() {
        for kind in [OR_KW, AND_KW, EQ2, BANG_EQ, LT, GT_EQ, PLUS, MINUS, STAR, SLASH, PERCENT] {
            let binding = infix(kind).unwrap();
            assert_eq!(binding.associativity, Associativity::Left, "{kind:?}");
            assert_eq!(binding.right_power(), binding.precedence.power() + 1);
        }
    }

    #[test]
    fn operator_node_kinds() {
        assert_eq!(infix(PLUS).unwrap().operator, Operator::Binary(ADDITION_EXPRESSION));
        assert_eq!(infix(PERCENT).unwrap().operator, Operator::Binary(MULTIPLICATION_EXPRESSION));
        assert_eq!(infix(LT_EQ).unwrap().operator, Operator::Binary(COMPARISON_EXPRESSION));
        assert_eq!(infix(LEFT_BRACKET).unwrap().operator, Operator::Index);
        assert_eq!(infix(SEMICOLON), None);
        assert_eq!(infix(COLON), None);
    }

    #[test]
    fn prefix_operators() {
        assert_eq!(prefix(BANG), Some(Precedence::Unary));
        assert_eq!(prefix(MINUS), Some(Precedence::Unary));
        assert_eq!(prefix(STAR), None);
        assert!(Precedence::COMPLEX < Precedence::Additive);
    }
}

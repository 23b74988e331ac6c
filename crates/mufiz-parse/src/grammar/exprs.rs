use mufiz_syntax::SyntaxKind::{self, *};
use mufiz_syntax::{Field, SyntaxSet};

use super::{delimited, name};
use crate::parser::{CompletedMarker, Parser};
use crate::precedence::{self, Binding, Operator, Precedence};

/// Tokens that can start an expression.
pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    QUOTED_STRING,
    TRUE_KW,
    FALSE_KW,
    NIL_KW,
    SELF_KW,
    SUPER_KW,
    LEFT_PAREN,
    LEFT_BRACE,
    TABLE_KW,
    LIST_KW,
    BANG,
    MINUS,
    PLUS,
]);

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    expr_bp(p, Precedence::Assignment.power())
}

/// Parses an expression whose operators all bind at least as tightly as
/// `min_power`.
fn expr_bp(p: &mut Parser<'_>, min_power: u8) -> Option<CompletedMarker> {
    p.nested(|p| {
        let mut lhs = prefix_expr(p)?;

        while let Some(binding) = precedence::infix(p.peek_kind()) {
            if binding.precedence.power() < min_power {
                break;
            }

            lhs = match binding.operator {
                Operator::Assignment => assignment(p, lhs, binding),
                Operator::Binary(kind) => binary(p, lhs, binding, kind),
                Operator::Call => call(p, lhs),
                Operator::Member => member(p, lhs),
                Operator::Index => index(p, lhs),
            };
        }

        Some(lhs)
    })
}

fn prefix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let Some(precedence) = precedence::prefix(p.peek_kind()) else {
        return primary_expr(p);
    };

    let m = p.start();
    p.advance_with_field(Field::Operator);
    if let Some(operand) = expr_bp(p, precedence.power()) {
        operand.with_field(p, Field::Operand);
    }
    Some(m.complete(p, UNARY_EXPRESSION))
}

fn assignment(p: &mut Parser<'_>, lhs: CompletedMarker, binding: Binding) -> CompletedMarker {
    let valid = matches!(lhs.kind(), IDENTIFIER | MEMBER_EXPRESSION | INDEX_EXPRESSION);
    let lhs = if valid {
        lhs.with_field(p, Field::Left)
    } else {
        let range = p.range_of(&lhs);
        p.error_at(range, "invalid assignment target");
        lhs
    };

    let m = lhs.precede(p);
    if !valid {
        p.advance();
        expr_bp(p, binding.right_power());
        return m.complete(p, ERROR);
    }

    p.advance_with_field(Field::Operator);
    if let Some(rhs) = expr_bp(p, binding.right_power()) {
        rhs.with_field(p, Field::Right);
    }
    m.complete(p, ASSIGNMENT_EXPRESSION)
}

fn binary(
    p: &mut Parser<'_>,
    lhs: CompletedMarker,
    binding: Binding,
    kind: SyntaxKind,
) -> CompletedMarker {
    let m = lhs.with_field(p, Field::Left).precede(p);
    p.advance_with_field(Field::Operator);
    if let Some(rhs) = expr_bp(p, binding.right_power()) {
        rhs.with_field(p, Field::Right);
    }
    m.complete(p, kind)
}

fn call(p: &mut Parser<'_>, callee: CompletedMarker) -> CompletedMarker {
    let m = callee.with_field(p, Field::Function).precede(p);
    p.advance();

    if !p.at(RIGHT_PAREN) {
        let arguments = p.start();
        loop {
            expr(p);
            if !p.eat(COMMA) {
                break;
            }
        }
        arguments.complete(p, ARGUMENT_LIST).with_field(p, Field::Arguments);
    }

    p.expect(RIGHT_PAREN);
    m.complete(p, CALL_EXPRESSION)
}

fn member(p: &mut Parser<'_>, object: CompletedMarker) -> CompletedMarker {
    let m = object.with_field(p, Field::Object).precede(p);
    p.advance();
    name(p, Some(Field::Property));
    m.complete(p, MEMBER_EXPRESSION)
}

fn index(p: &mut Parser<'_>, object: CompletedMarker) -> CompletedMarker {
    let m = object.with_field(p, Field::Object).precede(p);
    p.advance();
    if let Some(index) = expr(p) {
        index.with_field(p, Field::Index);
    }
    p.expect(RIGHT_BRACKET);
    m.complete(p, INDEX_EXPRESSION)
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = match p.peek_kind() {
        NAME => leaf(p, IDENTIFIER),
        INT_NUMBER | FLOAT_NUMBER if at_complex_number(p) => complex_number(p),
        INT_NUMBER | FLOAT_NUMBER => leaf(p, NUMBER),
        QUOTED_STRING => leaf(p, STRING),
        TRUE_KW | FALSE_KW => leaf(p, BOOLEAN),
        NIL_KW => leaf(p, NIL),
        SELF_KW => leaf(p, SELF),
        SUPER_KW => leaf(p, SUPER),
        LEFT_PAREN => {
            let m = p.start();
            p.advance();
            expr(p);
            p.expect(RIGHT_PAREN);
            m.complete(p, PARENTHESIZED_EXPRESSION)
        }
        LEFT_BRACE => collection(p, VECTOR_LITERAL, element),
        LIST_KW => collection(p, LINKED_LIST_LITERAL, element),
        TABLE_KW => collection(p, HASH_TABLE_LITERAL, hash_pair),
        _ => {
            p.error_recover("expected expression");
            return None;
        }
    };

    Some(m)
}

fn leaf(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.advance();
    m.complete(p, kind)
}

/// `number ('+' | '-') number i`, with trivia allowed between the parts.
fn at_complex_number(p: &Parser<'_>) -> bool {
    matches!(p.nth(1), PLUS | MINUS)
        && matches!(p.nth(2), INT_NUMBER | FLOAT_NUMBER)
        && p.nth(3) == NAME
        && p.nth_text(3) == "i"
}

fn complex_number(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    leaf(p, NUMBER).with_field(p, Field::Real);
    p.advance();
    leaf(p, NUMBER).with_field(p, Field::Imaginary);
    p.advance();
    m.complete(p, COMPLEX_NUMBER)
}

/// `{ ... }` in expression position, optionally introduced by `list` or
/// `table`.
fn collection(
    p: &mut Parser<'_>,
    kind: SyntaxKind,
    parser: fn(&mut Parser<'_>) -> bool,
) -> CompletedMarker {
    let m = p.start();
    if !p.at(LEFT_BRACE) {
        p.advance();
    }

    if p.at(LEFT_BRACE) {
        delimited(p, LEFT_BRACE, RIGHT_BRACE, COMMA, &EXPR_FIRST, parser);
    } else {
        p.error_recover("expected '{'");
    }
    m.complete(p, kind)
}

fn element(p: &mut Parser<'_>) -> bool {
    if !p.at_ts(&EXPR_FIRST) {
        return false;
    }
    expr(p);
    true
}

fn hash_pair(p: &mut Parser<'_>) -> bool {
    if !p.at_ts(&EXPR_FIRST) {
        return false;
    }

    let m = p.start();
    if let Some(key) = expr(p) {
        key.with_field(p, Field::Key);
    }
    p.expect(COLON);
    if let Some(value) = expr(p) {
        value.with_field(p, Field::Value);
    }
    m.complete(p, HASH_PAIR);
    true
}

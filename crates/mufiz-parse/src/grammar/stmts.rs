use mufiz_syntax::Field;
use mufiz_syntax::SyntaxKind::{self, *};

use super::exprs::{EXPR_FIRST, expr};
use super::name;
use crate::parser::{CompletedMarker, Parser};

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        p.reset_recovery();

        if p.at(RIGHT_BRACE) {
            let m = p.start();
            p.error("unexpected '}'");
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        stmt(p);
    }

    m.complete(p, SOURCE_FILE);
}

pub(crate) fn stmt(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    p.nested(|p| {
        let m = match p.peek_kind() {
            VAR_KW => variable_declaration(p),
            PRINT_KW => keyword_stmt(p, PRINT_STATEMENT),
            RETURN_KW => keyword_stmt(p, RETURN_STATEMENT),
            IF_KW => if_stmt(p),
            WHILE_KW => while_stmt(p),
            FOR_KW => for_stmt(p),
            FOREACH_KW => foreach_stmt(p),
            FUN_KW => function_declaration(p),
            CLASS_KW => class_declaration(p),
            LEFT_BRACE => block(p),
            _ if p.at_ts(&EXPR_FIRST) => {
                let m = expr(p)?.precede(p);
                p.expect(SEMICOLON);
                m.complete(p, EXPRESSION_STATEMENT)
            }
            _ => {
                p.error_bump_recover("expected statement");
                return None;
            }
        };

        Some(m)
    })
}

fn block(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert_eq!(p.peek_kind(), LEFT_BRACE);

    let m = p.start();
    p.advance();

    p.statement_list(|p| {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            p.reset_recovery();
            stmt(p);
        }
    });

    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK_STATEMENT)
}

fn variable_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();

    if name(p, Some(Field::Name)) && p.eat(EQ) {
        if let Some(value) = expr(p) {
            value.with_field(p, Field::Value);
        }
    }

    p.expect(SEMICOLON);
    m.complete(p, VARIABLE_DECLARATION)
}

/// `print expr ;` and `return expr? ;`.
fn keyword_stmt(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.advance();

    if kind == PRINT_STATEMENT || !p.at(SEMICOLON) {
        if let Some(value) = expr(p) {
            value.with_field(p, Field::Value);
        }
    }

    p.expect(SEMICOLON);
    m.complete(p, kind)
}

fn condition(p: &mut Parser<'_>) {
    p.expect(LEFT_PAREN);
    if let Some(condition) = expr(p) {
        condition.with_field(p, Field::Condition);
    }
    p.expect(RIGHT_PAREN);
}

fn body(p: &mut Parser<'_>, field: Field) {
    if let Some(body) = stmt(p) {
        body.with_field(p, field);
    }
}

fn if_stmt(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    condition(p);
    body(p, Field::Then);

    if p.eat(ELSE_KW) {
        body(p, Field::Else);
    }

    m.complete(p, IF_STATEMENT)
}

fn while_stmt(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    condition(p);
    body(p, Field::Body);
    m.complete(p, WHILE_STATEMENT)
}

/// Without a declaration the header may hold one or two semicolons:
/// `(init; condition; update)` or `(condition; update)`.
fn for_stmt(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    p.expect(LEFT_PAREN);

    if p.at(VAR_KW) {
        variable_declaration(p).with_field(p, Field::Init);
        optional_expr(p, Field::Condition, SEMICOLON);
        p.expect(SEMICOLON);
        optional_expr(p, Field::Update, RIGHT_PAREN);
    } else {
        let first = if p.at(SEMICOLON) { None } else { expr(p) };
        p.expect(SEMICOLON);
        let second = if p.at(SEMICOLON) || p.at(RIGHT_PAREN) { None } else { expr(p) };

        let (first_field, second_field) = if p.eat(SEMICOLON) {
            optional_expr(p, Field::Update, RIGHT_PAREN);
            (Field::Init, Field::Condition)
        } else {
            (Field::Condition, Field::Update)
        };

        if let Some(first) = first {
            first.with_field(p, first_field);
        }
        if let Some(second) = second {
            second.with_field(p, second_field);
        }
    }

    p.expect(RIGHT_PAREN);
    body(p, Field::Body);
    m.complete(p, FOR_STATEMENT)
}

fn optional_expr(p: &mut Parser<'_>, field: Field, terminator: SyntaxKind) {
    if p.at(terminator) {
        return;
    }
    if let Some(expr) = expr(p) {
        expr.with_field(p, field);
    }
}

fn foreach_stmt(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    p.expect(LEFT_PAREN);
    name(p, Some(Field::Variable));
    p.expect(IN_KW);
    if let Some(iterable) = expr(p) {
        iterable.with_field(p, Field::Iterable);
    }
    p.expect(RIGHT_PAREN);
    body(p, Field::Body);
    m.complete(p, FOREACH_STATEMENT)
}

fn function_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, Some(Field::Name));
    function_signature_and_body(p);
    m.complete(p, FUNCTION_DECLARATION)
}

fn method_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    name(p, Some(Field::Name));
    function_signature_and_body(p);
    m.complete(p, METHOD_DECLARATION)
}

fn function_signature_and_body(p: &mut Parser<'_>) {
    p.expect(LEFT_PAREN);

    if p.at(NAME) {
        let parameters = p.start();
        name(p, None);
        while p.eat(COMMA) {
            name(p, None);
        }
        parameters.complete(p, PARAMETER_LIST).with_field(p, Field::Parameters);
    } else if !p.at(RIGHT_PAREN) {
        p.error_recover("expected parameter name");
    }

    p.expect(RIGHT_PAREN);

    if p.at(LEFT_BRACE) {
        block(p).with_field(p, Field::Body);
    } else {
        p.error_recover("expected function body");
    }
}

fn class_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    name(p, Some(Field::Name));

    if p.eat(LT) {
        name(p, Some(Field::Superclass));
    }

    if p.at(LEFT_BRACE) {
        class_body(p).with_field(p, Field::Body);
    } else {
        p.error_recover("expected class body");
    }

    m.complete(p, CLASS_DECLARATION)
}

fn class_body(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();

    p.statement_list(|p| {
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            p.reset_recovery();
            match p.peek_kind() {
                FUN_KW => _ = function_declaration(p),
                NAME => _ = method_declaration(p),
                _ => p.error_bump_recover("expected method declaration"),
            }
        }
    });

    p.expect(RIGHT_BRACE);
    m.complete(p, CLASS_BODY)
}

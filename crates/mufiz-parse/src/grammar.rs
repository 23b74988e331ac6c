use mufiz_syntax::SyntaxKind::{self, *};
use mufiz_syntax::{Field, SyntaxSet};

use crate::parser::{Parser, expected};

pub(crate) mod exprs;
pub(crate) mod stmts;

/// Parses a name into an `IDENTIFIER` node.
pub(crate) fn name(p: &mut Parser<'_>, field: Option<Field>) -> bool {
    if !p.at(NAME) {
        p.error_recover("expected identifier");
        return false;
    }

    let m = p.start();
    p.advance();
    let name = m.complete(p, IDENTIFIER);
    if let Some(field) = field {
        name.with_field(p, field);
    }
    true
}

/// Parses `bra element (delim element)* delim? ket`.
///
/// `parser` returns `false` when the current token cannot start an element.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.error(&format!("unexpected '{}'", delim.text().unwrap_or_default()));
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.error_missing(&expected(delim));
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

use drop_bomb::DropBomb;
use mufiz_errors::Diagnostic;
use mufiz_syntax::SyntaxKind::{self, *};
use mufiz_syntax::{Builder, Field, SyntaxSet, SyntaxTree};
use mufiz_tokenizer::{Token, Tokenizer};
use text_size::{TextRange, TextSize};

/// Tokens where error recovery stops without consuming them.
const RECOVERY_STOP: SyntaxSet = SyntaxSet::new([
    LEFT_BRACE,
    RIGHT_BRACE,
    EOF,
    VAR_KW,
    PRINT_KW,
    IF_KW,
    WHILE_KW,
    FOR_KW,
    FOREACH_KW,
    FUN_KW,
    CLASS_KW,
    RETURN_KW,
]);

/// Statements and expressions nested deeper than this are not parsed.
const MAX_NESTING: u32 = 256;

pub(crate) struct Parser<'a> {
    text: &'a str,
    /// Non-trivia tokens, always terminated by `EOF`.
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    recovering: bool,
    nesting: u32,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut tokenizer = Tokenizer::new(text);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind.is_trivia() {
                continue;
            }
            tokens.push(token);
            if token.kind == EOF {
                break;
            }
        }

        Self {
            text,
            tokens,
            pos: 0,
            events: Vec::new(),
            diagnostics: tokenizer.finish(),
            recovering: false,
            nesting: 0,
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens.get(self.pos + n).map_or(EOF, |token| token.kind)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'a str {
        let text = self.text;
        self.tokens.get(self.pos + n).map_or("", |token| &text[token.range])
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_ts(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn advance(&mut self) {
        self.advance_inner(None);
    }

    /// Consumes the current token and records it under `field`.
    pub(crate) fn advance_with_field(&mut self, field: Field) {
        self.advance_inner(Some(field));
    }

    fn advance_inner(&mut self, field: Option<Field>) {
        if self.at(EOF) {
            return;
        }

        let Token { kind, range } = self.tokens[self.pos];
        self.pos += 1;
        self.events.push(Event::Token { kind, range, field });
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind`, or reports it missing and resynchronizes.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }

        self.error_recover(&expected(kind));
        false
    }

    /// Leaves the recovery state entered by the first error of a statement.
    pub(crate) fn reset_recovery(&mut self) {
        self.recovering = false;
    }

    /// Runs `f` over a nested statement list.
    ///
    /// Errors inside the list never change whether the enclosing statement
    /// is recovering.
    pub(crate) fn statement_list(&mut self, f: impl FnOnce(&mut Self)) {
        let recovering = std::mem::take(&mut self.recovering);
        f(self);
        self.recovering = recovering;
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// Past [`MAX_NESTING`] levels the rest of the statement is wrapped in an
    /// `ERROR` node instead and `None` is returned.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.nesting >= MAX_NESTING {
            if self.at(RIGHT_BRACE) || self.at(EOF) {
                self.error_missing("nesting too deep");
            } else {
                self.error("nesting too deep");
                self.skip_balanced();
            }
            return None;
        }

        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos, self.pos as u32)
    }

    /// Reports `message` at the current token.
    ///
    /// Only the first error of a statement is reported; the rest are noise
    /// caused by it. Unknown characters were already reported by the tokenizer.
    pub(crate) fn error(&mut self, message: &str) {
        if self.at(UNKNOWN) {
            self.recovering = true;
            return;
        }
        let range = self.tokens[self.pos].range;
        self.error_at(range, message);
    }

    pub(crate) fn error_at(&mut self, range: TextRange, message: &str) {
        if std::mem::replace(&mut self.recovering, true) {
            return;
        }
        self.diagnostics.push(Diagnostic::syntax(message, range));
    }

    /// Reports `message` and wraps everything up to the next `;` (inclusive)
    /// or the next brace, statement keyword or end of input (exclusive) into
    /// an `ERROR` node.
    pub(crate) fn error_recover(&mut self, message: &str) {
        if self.recovering {
            return;
        }

        if self.at_ts(&RECOVERY_STOP) {
            self.error_missing(message);
        } else {
            self.error(message);
            self.skip_to_sync();
        }
    }

    /// Like [`Parser::error_recover`], but always consumes the offending token
    /// unless it closes a block or ends the input.
    pub(crate) fn error_bump_recover(&mut self, message: &str) {
        if self.at(RIGHT_BRACE) || self.at(EOF) {
            self.error_missing(message);
        } else {
            self.error(message);
            self.skip_to_sync();
        }
    }

    /// Reports `message` right after the previous token and marks the spot
    /// with an empty `ERROR` node.
    pub(crate) fn error_missing(&mut self, message: &str) {
        if self.recovering {
            return;
        }

        let offset = match self.pos.checked_sub(1) {
            Some(previous) => self.tokens[previous].range.end(),
            None => TextSize::new(0),
        };
        self.error_at(TextRange::empty(offset), message);
        let m = self.start();
        m.complete(self, ERROR);
    }

    fn skip_to_sync(&mut self) {
        let m = self.start();
        loop {
            let kind = self.peek_kind();
            self.advance();
            if kind == SEMICOLON || self.at_ts(&RECOVERY_STOP) {
                break;
            }
        }
        m.complete(self, ERROR);
    }

    /// Wraps tokens up to the end of the current statement into an `ERROR`
    /// node, skipping over nested braces.
    ///
    /// Stops after a `;` or before a `}` that is not closed inside the
    /// skipped region.
    fn skip_balanced(&mut self) {
        let m = self.start();
        let mut depth = 0u32;
        loop {
            match self.peek_kind() {
                EOF => break,
                RIGHT_BRACE if depth == 0 => break,
                RIGHT_BRACE => depth -= 1,
                LEFT_BRACE => depth += 1,
                SEMICOLON if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }
        m.complete(self, ERROR);
    }

    /// Source range covered by the tokens of a completed node.
    pub(crate) fn range_of(&self, marker: &CompletedMarker) -> TextRange {
        let start = marker.start_token as usize;
        let end = marker.end_token as usize;
        if start == end {
            return TextRange::empty(self.tokens[start].range.start());
        }
        TextRange::new(self.tokens[start].range.start(), self.tokens[end - 1].range.end())
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, mut events, mut diagnostics, .. } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, field, forward_parent } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push((kind, field));
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, field, forward_parent } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push((kind, field));
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for (kind, field) in forward_parents.drain(..).rev() {
                        builder.start_node(kind, field);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token { kind, range, field } => {
                    builder.token(kind, range, field);
                }
            }
        }

        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
        (builder.finish(), diagnostics)
    }
}

pub(crate) fn expected(kind: SyntaxKind) -> String {
    match kind.text() {
        Some(text) => format!("expected '{text}'"),
        None => format!("expected {kind:?}"),
    }
}

enum Event {
    Start { kind: SyntaxKind, field: Option<Field>, forward_parent: Option<u32> },
    Token { kind: SyntaxKind, range: TextRange, field: Option<Field> },
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: TOMBSTONE, field: None, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    start_token: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32, start_token: u32) -> Self {
        Self {
            position: pos,
            start_token,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker {
            pos: self.position,
            kind,
            start_token: self.start_token,
            end_token: p.pos as u32,
        }
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
    kind: SyntaxKind,
    start_token: u32,
    end_token: u32,
}

impl CompletedMarker {
    pub(crate) fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Records the role this node plays in the node that will contain it.
    pub(crate) fn with_field(self, p: &mut Parser<'_>, field: Field) -> Self {
        match &mut p.events[self.pos as usize] {
            Event::Start { field: slot, .. } => {
                *slot = Some(field);
            }
            _ => unreachable!(),
        }
        self
    }

    /// Starts a new node that will wrap this one.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        Marker { start_token: self.start_token, ..new_pos }
    }
}

mod cursor;

use cursor::Cursor;
use mufiz_errors::Diagnostic;
pub use mufiz_syntax::SyntaxKind;
use mufiz_syntax::SyntaxKind::*;
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

/// Splits source text into tokens, trivia included.
///
/// After the end of input every call to [`Tokenizer::next_token`] returns an
/// empty `EOF` token.
pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    start: TextSize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), start: TextSize::new(0), diagnostics: Vec::new() }
    }

    /// Lexical errors found so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn range(&self) -> TextRange {
        TextRange::new(self.start, self.cursor.offset())
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.diagnostics.push(Diagnostic::lexical(message, range));
    }

    pub fn next_token(&mut self) -> Token {
        self.start = self.cursor.offset();
        let kind = self.syntax_kind();
        Token { kind, range: self.range() }
    }

    fn syntax_kind(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ',' => COMMA,
            ';' => SEMICOLON,
            ':' => COLON,
            '.' => DOT,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '%' => PERCENT,
            '=' => self.with_eq(EQ, EQ2),
            '!' => self.with_eq(BANG, BANG_EQ),
            '<' => self.with_eq(LT, LT_EQ),
            '>' => self.with_eq(GT, GT_EQ),
            '/' => match self.cursor.peek() {
                '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    LINE_COMMENT
                }
                '*' => self.block_comment(),
                _ => SLASH,
            },
            '0'..='9' => self.number(),
            '"' => self.string('"'),
            '\'' => self.string('\''),
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                SyntaxKind::from_keyword(self.text()).unwrap_or(NAME)
            }
            c if c.is_whitespace() => {
                self.cursor.advance_while(char::is_whitespace);
                WHITESPACE
            }
            c => {
                self.error(format!("unrecognized character `{c}`"), self.range());
                UNKNOWN
            }
        }
    }

    fn with_eq(&mut self, single: SyntaxKind, double: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat('=') { double } else { single }
    }

    fn block_comment(&mut self) -> SyntaxKind {
        self.cursor.advance();

        loop {
            if self.cursor.is_eof() {
                self.error("unterminated block comment", self.range());
                break;
            }
            if self.cursor.advance() == '*' && self.cursor.eat('/') {
                break;
            }
        }

        BLOCK_COMMENT
    }

    /// `\d+\.\d+` wins over `\d+`; a dot not followed by a digit is left alone.
    fn number(&mut self) -> SyntaxKind {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            return FLOAT_NUMBER;
        }

        INT_NUMBER
    }

    fn string(&mut self, quote: char) -> SyntaxKind {
        loop {
            if self.cursor.is_eof() {
                self.error("unterminated string literal", self.range());
                break;
            }

            match self.cursor.peek() {
                c if c == quote => {
                    self.cursor.advance();
                    break;
                }
                '\n' | '\r' => {
                    self.error("unterminated string literal", self.range());
                    break;
                }
                '\\' => self.escape(),
                _ => {
                    self.cursor.advance();
                }
            }
        }

        QUOTED_STRING
    }

    fn escape(&mut self) {
        let start = self.cursor.offset();
        self.cursor.advance();

        match self.cursor.peek() {
            '\\' | '\'' | '"' | 'n' | 'r' | 't' | 'b' | 'f' => {
                self.cursor.advance();
            }
            'u' => {
                self.cursor.advance();
                self.hex_digits(start, 4, "invalid unicode escape, expected 4 hex digits");
            }
            'x' => {
                self.cursor.advance();
                self.hex_digits(start, 2, "invalid hex escape, expected 2 hex digits");
            }
            '0'..='7' => {
                for _ in 0..3 {
                    if !matches!(self.cursor.peek(), '0'..='7') || self.cursor.is_eof() {
                        break;
                    }
                    self.cursor.advance();
                }
            }
            c => {
                if !self.cursor.is_eof() && c != '\n' && c != '\r' {
                    self.cursor.advance();
                }
                let range = TextRange::new(start, self.cursor.offset());
                self.error("invalid escape sequence", range);
            }
        }
    }

    fn hex_digits(&mut self, start: TextSize, count: usize, message: &str) {
        for _ in 0..count {
            if self.cursor.is_eof() || !self.cursor.peek().is_ascii_hexdigit() {
                let range = TextRange::new(start, self.cursor.offset());
                self.error(message, range);
                return;
            }
            self.cursor.advance();
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != EOF).then_some(token)
    }
}

/// Tokenizes `text` completely, trivia included and the final `EOF` excluded.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokenizer = Tokenizer::new(text);
    let tokens = tokenizer.by_ref().collect();
    (tokens, tokenizer.finish())
}

use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

/// Stage that produced a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed token: unterminated string, bad escape, unknown character.
    Lexical,
    /// Unexpected token where a specific construct was required.
    Syntax,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical error",
            Self::Syntax => "syntax error",
        })
    }
}

/// A recoverable problem found while parsing one source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    range: TextRange,
}

impl Diagnostic {
    pub fn lexical(message: impl Into<String>, range: TextRange) -> Self {
        Self { kind: DiagnosticKind::Lexical, message: message.into(), range }
    }

    pub fn syntax(message: impl Into<String>, range: TextRange) -> Self {
        Self { kind: DiagnosticKind::Syntax, message: message.into(), range }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label(self.label()))
                .fold(true),
        );
        renderer.render(message)
    }

    fn label(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::Lexical => "malformed token",
            DiagnosticKind::Syntax => "here",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}: {}", self.kind, self.range, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn display_names_stage_and_range() {
        let diagnostic = Diagnostic::syntax("expected ';'", range(4, 5));
        assert_eq!(diagnostic.to_string(), "syntax error at 4..5: expected ';'");
        assert_eq!(diagnostic.kind(), DiagnosticKind::Syntax);
    }

    #[test]
    fn render_points_into_the_source() {
        let text = "print \"oops;\n";
        let diagnostic = Diagnostic::lexical("unterminated string literal", range(6, 12));
        let renderer = Renderer::plain();
        let rendered = diagnostic.render(&renderer, "main.mufiz", text).to_string();

        assert!(rendered.contains("unterminated string literal"));
        assert!(rendered.contains("main.mufiz"));
        assert!(rendered.contains("malformed token"));
    }
}

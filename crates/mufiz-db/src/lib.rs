//! Query layer over the parser.
//!
//! A [`File`] is a `salsa` input; its parse and line index are memoized and
//! recomputed only when the text changes.

use camino::Utf8PathBuf;
pub use line_index::{LineCol, LineIndex};
pub use mufiz_errors::{Diagnostic, TextRange};
pub use mufiz_parse::Parse;

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn parse(self, db: &dyn salsa::Database) -> Parse {
        let _span = tracing::debug_span!("parse", path = %self.path(db)).entered();

        let text = self.text(db);
        tracing::debug!(len = text.len(), "parsing");
        let parse = mufiz_parse::parse(text);
        tracing::debug!(
            tokens = parse.tree().tokens().count(),
            nodes = parse.tree().node_count(),
            diagnostics = parse.diagnostics().len(),
            "parsed"
        );
        parse
    }

    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        tracing::trace!(path = %self.path(db), "building line index");
        LineIndex::new(self.text(db))
    }
}

impl File {
    /// Zero-based line and column where `range` starts.
    pub fn line_col(self, db: &dyn salsa::Database, range: TextRange) -> LineCol {
        self.line_index(db).line_col(range.start())
    }
}

/// Every diagnostic of `file`, ordered by position.
#[salsa::tracked(returns(ref), no_eq)]
pub fn check_file(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    file.parse(db).diagnostics().to_vec()
}

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

//! Parser for the Mufiz scripting language.
//!
//! [`parse`] never fails: malformed input produces `ERROR` nodes in the tree
//! and diagnostics next to it.

use mufiz_errors::Diagnostic;
use mufiz_syntax::ast::{self, AstNode};
use mufiz_syntax::{SyntaxNode, SyntaxTree};

mod grammar;
mod parser;
pub mod precedence;

/// Result of parsing one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn source_file(&self) -> ast::SourceFile<'_> {
        ast::SourceFile::cast(self.tree.root()).expect("root is always a source file")
    }

    /// Lexical and syntax diagnostics, ordered by position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn into_parts(self) -> (SyntaxTree, Vec<Diagnostic>) {
        (self.tree, self.diagnostics)
    }

    /// Tree dump followed by one line per diagnostic.
    pub fn debug_dump(&self) -> String {
        let mut out = self.tree.root().debug_dump();
        out.push_str("Errors:\n");
        for diagnostic in &self.diagnostics {
            out.push_str(&format!("  {diagnostic}\n"));
        }
        out
    }
}

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::stmts::source_file(&mut parser);
    let (tree, diagnostics) = parser.build_tree();
    Parse { tree, diagnostics }
}

//! Immutable concrete syntax tree for the Mufiz language.
//!
//! The tree is built once by the parser and then navigated through
//! lifetime-bound handles without allocation or refcounting.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod field;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Role names for children.
pub use field::Field;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    Children, ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement,
    SyntaxNode, SyntaxToken, SyntaxTree, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
pub use text_size::{TextRange, TextSize};

//! Flat storage behind [`crate::SyntaxTree`].
//!
//! Nodes are stored in preorder, so the subtree of node `n` occupies the index
//! range `n..nodes[n].subtree_end`. Tokens are stored in source order and the
//! children of every node form one contiguous run of `children`.

use std::ops::Range;

use text_size::TextRange;

use crate::{Field, SyntaxKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) field: Option<Field>,
    pub(crate) parent: Option<u32>,
    pub(crate) range: TextRange,
    pub(crate) children: Range<u32>,
    pub(crate) tokens: Range<u32>,
    pub(crate) subtree_end: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) field: Option<Field>,
    pub(crate) parent: u32,
    pub(crate) range: TextRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Child {
    Node(u32),
    Token(u32),
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    pub(crate) nodes: Box<[NodeData]>,
    pub(crate) tokens: Box<[TokenData]>,
    pub(crate) children: Box<[Child]>,
}

impl TreeInner {
    #[inline]
    pub(crate) fn node(&self, id: u32) -> &NodeData {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn token(&self, id: u32) -> &TokenData {
        &self.tokens[id as usize]
    }

    #[inline]
    pub(crate) fn children_of(&self, id: u32) -> &[Child] {
        let Range { start, end } = self.node(id).children;
        &self.children[start as usize..end as usize]
    }

    pub(crate) fn child_field(&self, child: Child) -> Option<Field> {
        match child {
            Child::Node(id) => self.node(id).field,
            Child::Token(id) => self.token(id).field,
        }
    }
}

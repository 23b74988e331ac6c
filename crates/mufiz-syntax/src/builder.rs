//! Incremental builder for the immutable syntax tree.

use text_size::{TextRange, TextSize};

use crate::nodes::{Child, NodeData, TokenData, TreeInner};
use crate::{Field, SyntaxKind, SyntaxTree};

const DEFAULT_TREE_DEPTH: usize = 64;
const DEFAULT_TREE_SIZE: usize = 256;
const DEFAULT_CHILDREN_LEN: usize = 8;

/// Builds a [`SyntaxTree`] from a stream of start/token/finish calls.
///
/// Tokens must be pushed in source order.
pub struct Builder {
    text: Box<str>,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    children: Vec<Child>,

    opened: Vec<(u32, Vec<Child>)>,
    children_pool: Vec<Vec<Child>>,
    last_end: TextSize,
}

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE),
            tokens: Vec::with_capacity(DEFAULT_TREE_SIZE),
            children: Vec::with_capacity(DEFAULT_TREE_SIZE),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            last_end: TextSize::new(0),
        }
    }

    fn current(&mut self) -> &mut (u32, Vec<Child>) {
        self.opened.last_mut().expect("no opened nodes?")
    }

    /// Opens a node of `kind`, held by its parent under `field`.
    pub fn start_node(&mut self, kind: SyntaxKind, field: Option<Field>) {
        let id = self.nodes.len() as u32;
        let parent = self.opened.last().map(|&(parent, _)| parent);
        if !self.opened.is_empty() {
            self.current().1.push(Child::Node(id));
        }

        let token_start = self.tokens.len() as u32;
        self.nodes.push(NodeData {
            kind,
            field,
            parent,
            range: TextRange::empty(self.last_end),
            children: 0..0,
            tokens: token_start..token_start,
            subtree_end: id + 1,
        });

        let children = self
            .children_pool
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN));
        self.opened.push((id, children));
    }

    /// Appends a token to the innermost open node.
    pub fn token(&mut self, kind: SyntaxKind, range: TextRange, field: Option<Field>) {
        debug_assert!(range.start() >= self.last_end, "tokens must be pushed in source order");

        let id = self.tokens.len() as u32;
        let (parent, children) = self.current();
        let parent = *parent;
        children.push(Child::Token(id));

        self.tokens.push(TokenData { kind, field, parent, range });
        self.last_end = range.end();
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) {
        let (id, mut children) = self.opened.pop().expect("no opened nodes?");

        let range = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => {
                TextRange::new(self.child_range(first).start(), self.child_range(last).end())
            }
            _ => TextRange::empty(self.last_end),
        };

        let start = self.children.len() as u32;
        self.children.extend(children.drain(..));
        let end = self.children.len() as u32;
        self.children_pool.push(children);

        let subtree_end = self.nodes.len() as u32;
        let token_end = self.tokens.len() as u32;
        let node = &mut self.nodes[id as usize];
        node.range = range;
        node.children = start..end;
        node.tokens.end = token_end;
        node.subtree_end = subtree_end;
    }

    fn child_range(&self, child: Child) -> TextRange {
        match child {
            Child::Node(id) => self.nodes[id as usize].range,
            Child::Token(id) => self.tokens[id as usize].range,
        }
    }

    /// Consumes the builder and returns the finished tree.
    #[track_caller]
    pub fn finish(self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "you should close every node before `Builder::finish()`");
        assert!(!self.nodes.is_empty(), "a syntax tree needs a root node");

        SyntaxTree {
            inner: TreeInner {
                text: self.text,
                nodes: self.nodes.into_boxed_slice(),
                tokens: self.tokens.into_boxed_slice(),
                children: self.children.into_boxed_slice(),
            },
        }
    }
}

//! Public syntax tree API built on immutable, parent-linked nodes.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use text_size::TextRange;

use crate::nodes::{Child, TreeInner};
use crate::{Field, SyntaxKind};

/// Owned syntax tree for a single source text.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub(crate) inner: TreeInner,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: &self.inner, id: 0 }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.inner.text
    }

    /// Number of nodes in the tree, the root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    /// Iterates all tokens in source order.
    pub fn tokens(&self) -> impl DoubleEndedIterator<Item = SyntaxToken<'_>> + '_ {
        (0..self.inner.tokens.len() as u32).map(|id| SyntaxToken { tree: &self.inner, id })
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("nodes", &self.node_count())
            .finish_non_exhaustive()
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    id: u32,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.token(self.id).kind
    }

    /// Returns the role this token plays in its parent, if any.
    #[inline]
    pub fn field(self) -> Option<Field> {
        self.tree.token(self.id).field
    }

    /// Returns the token text range.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.token(self.id).range
    }

    /// Returns the token text.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, id: self.tree.token(self.id).parent }
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    id: u32,
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.node(self.id).kind
    }

    /// Returns the role this node plays in its parent, if any.
    #[inline]
    pub fn field(self) -> Option<Field> {
        self.tree.node(self.id).field
    }

    /// Returns the text range covered by this node.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.node(self.id).range
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(Self { tree: self.tree, id: self.tree.node(self.id).parent? })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Returns the first token spanned by this node.
    #[inline]
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        let tokens = &self.tree.node(self.id).tokens;
        (!tokens.is_empty()).then_some(SyntaxToken { tree: self.tree, id: tokens.start })
    }

    /// Returns the last token spanned by this node.
    #[inline]
    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        let tokens = &self.tree.node(self.id).tokens;
        (!tokens.is_empty()).then_some(SyntaxToken { tree: self.tree, id: tokens.end - 1 })
    }

    /// Iterates children including tokens.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.children_of(self.id).iter() }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> Children<'a> {
        Children { inner: self.children_with_tokens() }
    }

    /// Returns the first child held under `field`.
    pub fn child_by_field(self, field: Field) -> Option<SyntaxElement<'a>> {
        self.children_by_field(field).next()
    }

    /// Iterates every child held under `field`, in source order.
    pub fn children_by_field(self, field: Field) -> impl Iterator<Item = SyntaxElement<'a>> + 'a {
        let tree = self.tree;
        tree.children_of(self.id)
            .iter()
            .filter(move |&&child| tree.child_field(child) == Some(field))
            .map(move |&child| element(tree, child))
    }

    /// Looks up a child by its grammar field name, e.g. `"condition"`.
    pub fn child_by_field_name(self, name: &str) -> Option<SyntaxElement<'a>> {
        self.child_by_field(Field::from_name(name)?)
    }

    /// Returns the child node held under `field`.
    pub fn node_by_field(self, field: Field) -> Option<SyntaxNode<'a>> {
        self.child_by_field(field)?.into_node()
    }

    /// Returns the child token held under `field`.
    pub fn token_by_field(self, field: Field) -> Option<SyntaxToken<'a>> {
        self.child_by_field(field)?.into_token()
    }

    /// Returns the first direct child token of `kind`.
    pub fn token_of_kind(self, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens().filter_map(SyntaxElement::into_token).find(|t| t.kind() == kind)
    }

    /// Iterates this node and every node below it in source order.
    #[inline]
    pub fn descendants(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + 'a {
        let tree = self.tree;
        (self.id..tree.node(self.id).subtree_end).map(move |id| SyntaxNode { tree, id })
    }

    /// Iterates every token below this node in source order.
    #[inline]
    pub fn descendant_tokens(self) -> impl DoubleEndedIterator<Item = SyntaxToken<'a>> + 'a {
        let tree = self.tree;
        tree.node(self.id).tokens.clone().map(move |id| SyntaxToken { tree, id })
    }

    /// Returns the smallest element that fully covers `range`.
    pub fn covering_element(self, range: TextRange) -> SyntaxElement<'a> {
        let mut node = self;
        'descend: loop {
            for child in node.children_with_tokens() {
                if child.text_range().contains_range(range) {
                    match child {
                        NodeOrToken::Node(it) => {
                            node = it;
                            continue 'descend;
                        }
                        NodeOrToken::Token(it) => return NodeOrToken::Token(it),
                    }
                }
            }
            return NodeOrToken::Node(node);
        }
    }

    /// Renders the subtree as an indented listing, one element per line.
    pub fn debug_dump(self) -> String {
        let mut buf = String::new();
        let mut indent = 0;

        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    write_field(&mut buf, indent, node.field());
                    _ = writeln!(buf, "{:?}@{:?}", node.kind(), node.text_range());
                    indent += 1;
                }
                WalkEventWithTokens::Token(token) => {
                    write_field(&mut buf, indent, token.field());
                    _ = writeln!(buf, "{token:?}");
                }
                WalkEventWithTokens::LeaveNode(_) => indent -= 1,
            }
        }

        buf
    }
}

fn write_field(buf: &mut String, indent: usize, field: Option<Field>) {
    buf.extend(std::iter::repeat_n("  ", indent));
    if let Some(field) = field {
        _ = write!(buf, "{field}: ");
    }
}

#[inline]
fn element(tree: &TreeInner, child: Child) -> SyntaxElement<'_> {
    match child {
        Child::Node(id) => NodeOrToken::Node(SyntaxNode { tree, id }),
        Child::Token(id) => NodeOrToken::Token(SyntaxToken { tree, id }),
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    /// Returns the element's kind.
    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(it) => it.kind(),
            NodeOrToken::Token(it) => it.kind(),
        }
    }

    /// Returns the element's text range.
    pub fn text_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(it) => it.text_range(),
            NodeOrToken::Token(it) => it.text_range(),
        }
    }

    /// Returns the element's text.
    pub fn text(self) -> &'a str {
        match self {
            NodeOrToken::Node(it) => it.text(),
            NodeOrToken::Token(it) => it.text(),
        }
    }
}

/// Iterator over children including tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a TreeInner,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&child| element(self.tree, child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.children.next_back().map(|&child| element(self.tree, child))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {}

/// Iterator over child nodes only.
#[derive(Clone)]
pub struct Children<'a> {
    inner: ChildrenWithTokens<'a>,
}

impl<'a> Iterator for Children<'a> {
    type Item = SyntaxNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(SyntaxElement::into_node)
    }
}

impl DoubleEndedIterator for Children<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().find_map(SyntaxElement::into_node)
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Preorder<'a> {
        Preorder { inner: PreorderWithTokens::new(start) }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> PreorderWithTokens<'a> {
        PreorderWithTokens { stack: Vec::with_capacity(32), root: Some(start) }
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

impl<'a> SyntaxNode<'a> {
    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builder;
    use crate::SyntaxKind::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    /// `print (a + b);`
    fn print_sum() -> SyntaxTree {
        let mut builder = Builder::new("print (a + b);");
        builder.start_node(SOURCE_FILE, None);
        builder.start_node(PRINT_STATEMENT, None);
        builder.token(PRINT_KW, range(0, 5), None);
        builder.start_node(PARENTHESIZED_EXPRESSION, Some(Field::Value));
        builder.token(LEFT_PAREN, range(6, 7), None);
        builder.start_node(ADDITION_EXPRESSION, None);
        builder.start_node(IDENTIFIER, Some(Field::Left));
        builder.token(NAME, range(7, 8), None);
        builder.finish_node();
        builder.token(PLUS, range(9, 10), Some(Field::Operator));
        builder.start_node(IDENTIFIER, Some(Field::Right));
        builder.token(NAME, range(11, 12), None);
        builder.finish_node();
        builder.finish_node();
        builder.token(RIGHT_PAREN, range(12, 13), None);
        builder.finish_node();
        builder.token(SEMICOLON, range(13, 14), None);
        builder.finish_node();
        builder.finish_node();
        builder.finish()
    }

    fn addition(tree: &SyntaxTree) -> SyntaxNode<'_> {
        tree.root().descendants().find(|node| node.kind() == ADDITION_EXPRESSION).unwrap()
    }

    #[test]
    fn preorder_balances_enter_and_leave() {
        let tree = print_sum();
        let events: Vec<_> = tree.root().preorder().collect();

        assert_eq!(events.first(), Some(&WalkEvent::Enter(tree.root())));
        assert_eq!(events.last(), Some(&WalkEvent::Leave(tree.root())));

        let mut depth = 0usize;
        let mut entered = Vec::new();
        for event in &events {
            match event {
                WalkEvent::Enter(node) => {
                    depth += 1;
                    entered.push(node.kind());
                }
                WalkEvent::Leave(_) => depth -= 1,
            }
        }
        assert_eq!(depth, 0);
        assert_eq!(entered.len(), tree.node_count());
        assert_eq!(
            entered,
            [
                SOURCE_FILE,
                PRINT_STATEMENT,
                PARENTHESIZED_EXPRESSION,
                ADDITION_EXPRESSION,
                IDENTIFIER,
                IDENTIFIER
            ]
        );
    }

    #[test]
    fn covering_element_finds_smallest_cover() {
        let tree = print_sum();
        let root = tree.root();

        let sum = root.covering_element(range(7, 12));
        assert_eq!(sum.kind(), ADDITION_EXPRESSION);
        assert_eq!(sum.text(), "a + b");

        let plus = root.covering_element(range(9, 10));
        assert_eq!(plus.into_token().map(SyntaxToken::kind), Some(PLUS));

        let statement = root.covering_element(range(6, 14));
        assert_eq!(statement.kind(), PRINT_STATEMENT);
    }

    #[test]
    fn first_and_last_token() {
        let tree = print_sum();
        let sum = addition(&tree);
        assert_eq!(sum.first_token().map(SyntaxToken::text), Some("a"));
        assert_eq!(sum.last_token().map(SyntaxToken::text), Some("b"));

        let parens = sum.parent().unwrap();
        assert_eq!(parens.first_token().map(SyntaxToken::kind), Some(LEFT_PAREN));
        assert_eq!(parens.last_token().map(SyntaxToken::kind), Some(RIGHT_PAREN));

        let mut builder = Builder::new("x");
        builder.start_node(SOURCE_FILE, None);
        builder.token(NAME, range(0, 1), None);
        builder.start_node(ERROR, None);
        builder.finish_node();
        builder.finish_node();
        let tree = builder.finish();
        let error = tree.root().children().next().unwrap();
        assert_eq!(error.first_token(), None);
        assert_eq!(error.last_token(), None);
    }

    #[test]
    fn ancestors_walk_up_to_root() {
        let tree = print_sum();
        let right = addition(&tree).node_by_field(Field::Right).unwrap();
        let kinds: Vec<_> = right.ancestors().map(SyntaxNode::kind).collect();
        assert_eq!(
            kinds,
            [IDENTIFIER, ADDITION_EXPRESSION, PARENTHESIZED_EXPRESSION, PRINT_STATEMENT, SOURCE_FILE]
        );
    }

    #[test]
    fn debug_dump_shows_fields() {
        let tree = print_sum();
        let dump = addition(&tree).debug_dump();
        assert_eq!(
            dump,
            "ADDITION_EXPRESSION@7..12\n  \
             left: IDENTIFIER@7..8\n    \
             NAME@7..8 \"a\"\n  \
             operator: PLUS@9..10 \"+\"\n  \
             right: IDENTIFIER@11..12\n    \
             NAME@11..12 \"b\"\n"
        );
    }
}

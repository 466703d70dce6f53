//! Syntax tree consumed by the verifier
//!
//! Trees are produced by an external front end (in-process through
//! [`TreeBuilder`], or serialized as [`RawNode`] documents) and are read-only
//! during verification. Nodes live in an arena; [`Node`] is a cheap borrowed
//! handle that knows its parent, children and siblings.

mod builder;
mod kind;
mod raw;

pub use builder::TreeBuilder;
pub use kind::NodeKind;
pub use raw::RawNode;

use thiserror::Error;

/// Error constructing or validating a syntax tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("token `{expected}` not found at line {line}, column {column}")]
    TokenNotFound {
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("{kind} is a token and needs text and a position")]
    IncompleteToken { kind: NodeKind },

    #[error("{kind} is a construct and cannot carry text")]
    TextOnConstruct { kind: NodeKind },

    #[error("line numbers are 1-based, got 0 for {kind}")]
    ZeroLine { kind: NodeKind },

    #[error("root node must be a construct, got {kind}")]
    TokenRoot { kind: NodeKind },

    #[error("unbalanced tree: {0}")]
    Unbalanced(String),
}

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    text: Option<String>,
    line: usize,
    column: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position within the parent's children
    slot: usize,
}

/// An immutable syntax tree
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl SyntaxTree {
    /// Root node (usually a compilation unit)
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    /// Handle for a node id
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document order (parents before children)
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// Arena construction used by the builder and the raw loader.
    ///
    /// Nodes must be pushed parent-first; children are linked on push.
    fn push(
        &mut self,
        kind: NodeKind,
        text: Option<String>,
        line: usize,
        column: usize,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let slot = match parent {
            Some(p) => {
                let siblings = &mut self.nodes[p.index()].children;
                siblings.push(id);
                siblings.len() - 1
            }
            None => 0,
        };
        self.nodes.push(NodeData {
            kind,
            text,
            line,
            column,
            parent,
            children: Vec::new(),
            slot,
        });
        id
    }

    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Give every composite node the position of its first child.
    ///
    /// Children always have larger ids than their parents, so a reverse
    /// sweep sees each child settled before its parent.
    fn settle_positions(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            if let Some(&first) = self.nodes[i].children.first() {
                let (line, column) = {
                    let child = &self.nodes[first.index()];
                    (child.line, child.column)
                };
                self.nodes[i].line = line;
                self.nodes[i].column = column;
            }
        }
    }
}

/// Depth-first, document-order iterator
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let data = self.tree.data(id);
        self.stack.extend(data.children.iter().rev().copied());
        Some(self.tree.node(id))
    }
}

/// Borrowed handle to one node of a [`SyntaxTree`]
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}({}:{} {:?})",
            self.kind(),
            self.line(),
            self.column(),
            self.text()
        )
    }
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Literal token text; empty for constructs
    pub fn text(&self) -> &'t str {
        self.data().text.as_deref().unwrap_or("")
    }

    /// 1-based line
    pub fn line(&self) -> usize {
        self.data().line
    }

    /// 0-based raw column (characters, tabs unexpanded)
    pub fn column(&self) -> usize {
        self.data().column
    }

    pub fn is_token(&self) -> bool {
        self.kind().is_token()
    }

    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.data()
            .children
            .get(index)
            .map(|&id| self.tree.node(id))
    }

    pub fn first_child(&self) -> Option<Node<'t>> {
        self.child(0)
    }

    pub fn last_child(&self) -> Option<Node<'t>> {
        self.data()
            .children
            .last()
            .map(|&id| self.tree.node(id))
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let slot = self.data().slot;
        self.parent()?.child(slot + 1)
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let slot = self.data().slot;
        if slot == 0 {
            return None;
        }
        self.parent()?.child(slot - 1)
    }

    /// First token of this subtree (the node itself for tokens)
    pub fn leftmost(&self) -> Node<'t> {
        let mut node = *self;
        while let Some(first) = node.first_child() {
            node = first;
        }
        node
    }

    /// Last token of this subtree
    pub fn rightmost(&self) -> Node<'t> {
        let mut node = *self;
        while let Some(last) = node.last_child() {
            node = last;
        }
        node
    }

    /// How the node is named in diagnostics: token text, or the kind name
    /// for constructs without tokens.
    pub fn describe(&self) -> String {
        let token = self.leftmost();
        if token.is_token() && !token.text().is_empty() {
            token.text().to_string()
        } else {
            self.kind().display_name().to_string()
        }
    }

    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }
}

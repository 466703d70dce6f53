//! Locating tree builder
//!
//! Front ends that already know token positions use [`TreeBuilder::token_at`].
//! Everything else can let the builder find each token in the source: tokens
//! are added in document order and must appear at the cursor once whitespace
//! is skipped.

use super::{NodeId, NodeKind, SyntaxTree, TreeError};

/// Builds a [`SyntaxTree`] against its source text
pub struct TreeBuilder<'s> {
    source: &'s str,
    /// Byte offset of the cursor
    offset: usize,
    line: usize,
    column: usize,
    tree: SyntaxTree,
    stack: Vec<NodeId>,
    has_root: bool,
    error: Option<TreeError>,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 0,
            tree: SyntaxTree::empty(),
            stack: Vec::new(),
            has_root: false,
            error: None,
        }
    }

    /// Start a construct; it extends until the matching [`close`](Self::close)
    pub fn open(&mut self, kind: NodeKind) -> &mut Self {
        if kind.is_token() {
            self.fail(TreeError::IncompleteToken { kind });
            return self;
        }
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);
        if let Some(id) = self.attach(kind, None, line, column) {
            self.stack.push(id);
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if self.stack.pop().is_none() {
            self.fail(TreeError::Unbalanced("close without open".to_string()));
        }
        self
    }

    /// Open `kind`, run `body` to add its children, then close it
    pub fn node(&mut self, kind: NodeKind, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.open(kind);
        body(self);
        self.close()
    }

    /// Add a token found at the cursor
    pub fn token(&mut self, kind: NodeKind, text: &str) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        self.skip_whitespace();
        if text.is_empty() || !self.source[self.offset..].starts_with(text) {
            let expected = text.to_string();
            let (line, column) = (self.line, self.column);
            self.fail(TreeError::TokenNotFound {
                expected,
                line,
                column,
            });
            return self;
        }
        let (line, column) = (self.line, self.column);
        self.push_token(kind, text, line, column);
        self.advance(text.len());
        self
    }

    /// Add a token with an explicit position; the cursor does not move
    pub fn token_at(&mut self, kind: NodeKind, text: &str, line: usize, column: usize) -> &mut Self {
        if line == 0 {
            self.fail(TreeError::ZeroLine { kind });
            return self;
        }
        self.push_token(kind, text, line, column);
        self
    }

    pub fn finish(mut self) -> Result<SyntaxTree, TreeError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(TreeError::Unbalanced(format!(
                "{} construct(s) left open",
                self.stack.len()
            )));
        }
        if !self.has_root {
            return Err(TreeError::Unbalanced("empty tree".to_string()));
        }
        let root = self.tree.root();
        if root.is_token() {
            return Err(TreeError::TokenRoot { kind: root.kind() });
        }
        self.tree.settle_positions();
        Ok(self.tree)
    }

    fn push_token(&mut self, kind: NodeKind, text: &str, line: usize, column: usize) {
        if !kind.is_token() {
            self.fail(TreeError::TextOnConstruct { kind });
            return;
        }
        self.attach(kind, Some(text.to_string()), line, column);
    }

    fn attach(
        &mut self,
        kind: NodeKind,
        text: Option<String>,
        line: usize,
        column: usize,
    ) -> Option<NodeId> {
        let parent = self.stack.last().copied();
        if parent.is_none() {
            if self.has_root {
                self.fail(TreeError::Unbalanced(format!(
                    "second root {} outside the first",
                    kind
                )));
                return None;
            }
            self.has_root = true;
        }
        Some(self.tree.push(kind, text, line, column, parent))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.offset..];
        let skipped = rest.len() - rest.trim_start_matches([' ', '\t', '\r', '\n']).len();
        self.advance(skipped);
    }

    fn advance(&mut self, bytes: usize) {
        for ch in self.source[self.offset..self.offset + bytes].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.offset += bytes;
    }

    fn fail(&mut self, error: TreeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locates_tokens_across_lines_and_tabs() {
        let mut b = TreeBuilder::new("{\n\tx;\n}");
        b.node(NodeKind::Block, |b| {
            b.token(NodeKind::LBrace, "{");
            b.node(NodeKind::ExprStatement, |b| {
                b.token(NodeKind::Identifier, "x");
                b.token(NodeKind::Semi, ";");
            });
            b.token(NodeKind::RBrace, "}");
        });
        let tree = b.finish().unwrap();
        let stmt = tree.root().child(1).unwrap();
        assert_eq!((stmt.line(), stmt.column()), (2, 1));
        let close = tree.root().child(2).unwrap();
        assert_eq!((close.line(), close.column()), (3, 0));
    }

    #[test]
    fn test_missing_token_is_reported() {
        let mut b = TreeBuilder::new("a + b");
        b.node(NodeKind::BinaryExpr, |b| {
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::Operator, "-");
        });
        assert_eq!(
            b.finish().unwrap_err(),
            TreeError::TokenNotFound {
                expected: "-".to_string(),
                line: 1,
                column: 2
            }
        );
    }

    #[test]
    fn test_unbalanced_and_invalid_shapes() {
        let mut b = TreeBuilder::new("x");
        b.open(NodeKind::Block);
        assert!(matches!(b.finish(), Err(TreeError::Unbalanced(_))));

        let mut b = TreeBuilder::new("x");
        b.open(NodeKind::Identifier);
        assert_eq!(
            b.finish().unwrap_err(),
            TreeError::IncompleteToken {
                kind: NodeKind::Identifier
            }
        );

        let mut b = TreeBuilder::new("x");
        b.token(NodeKind::Identifier, "x");
        assert_eq!(
            b.finish().unwrap_err(),
            TreeError::TokenRoot {
                kind: NodeKind::Identifier
            }
        );
    }

    #[test]
    fn test_explicit_positions() {
        let mut b = TreeBuilder::new("");
        b.node(NodeKind::ExprStatement, |b| {
            b.token_at(NodeKind::Identifier, "x", 3, 8);
            b.token_at(NodeKind::Semi, ";", 3, 9);
        });
        let tree = b.finish().unwrap();
        assert_eq!((tree.root().line(), tree.root().column()), (3, 8));
    }
}

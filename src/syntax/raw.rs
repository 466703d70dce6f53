//! Serialized tree form exchanged with external front ends

use super::{NodeId, NodeKind, SyntaxTree, TreeError};
use serde::{Deserialize, Serialize};

/// One node of a serialized syntax tree.
///
/// Tokens carry `text`, `line` and `column`; constructs carry `children`
/// and take their position from their first token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Validate and convert into an arena tree
    pub fn into_tree(self) -> Result<SyntaxTree, TreeError> {
        if self.kind.is_token() {
            return Err(TreeError::TokenRoot { kind: self.kind });
        }
        let mut tree = SyntaxTree::empty();
        let mut pending: Vec<(RawNode, Option<NodeId>)> = vec![(self, None)];
        while let Some((raw, parent)) = pending.pop() {
            let RawNode {
                kind,
                text,
                line,
                column,
                children,
            } = raw;
            let id = if kind.is_token() {
                if !children.is_empty() {
                    return Err(TreeError::Unbalanced(format!(
                        "token {} has children",
                        kind
                    )));
                }
                let (Some(text), Some(line), Some(column)) = (text, line, column) else {
                    return Err(TreeError::IncompleteToken { kind });
                };
                if line == 0 {
                    return Err(TreeError::ZeroLine { kind });
                }
                tree.push(kind, Some(text), line, column, parent)
            } else {
                if text.is_some() {
                    return Err(TreeError::TextOnConstruct { kind });
                }
                if line == Some(0) {
                    return Err(TreeError::ZeroLine { kind });
                }
                tree.push(kind, None, line.unwrap_or(1), column.unwrap_or(0), parent)
            };
            // Reverse so children are pushed, and therefore linked, in order.
            pending.extend(children.into_iter().rev().map(|c| (c, Some(id))));
        }
        tree.settle_positions();
        Ok(tree)
    }
}

impl SyntaxTree {
    /// Serialized form of this tree
    pub fn to_raw(&self) -> RawNode {
        fn convert(node: super::Node<'_>) -> RawNode {
            if node.is_token() {
                RawNode {
                    kind: node.kind(),
                    text: Some(node.text().to_string()),
                    line: Some(node.line()),
                    column: Some(node.column()),
                    children: Vec::new(),
                }
            } else {
                RawNode {
                    kind: node.kind(),
                    text: None,
                    line: None,
                    column: None,
                    children: node.children().map(convert).collect(),
                }
            }
        }
        convert(self.root())
    }
}

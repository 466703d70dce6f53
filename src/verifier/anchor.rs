//! Indentation parent resolution
//!
//! The indentation of a node's children is measured from the line of its
//! indentation parent, which is often not the node itself.

use crate::syntax::{Node, NodeKind};

/// Node whose first line supplies the indentation baseline for `node`'s children
pub fn indentation_parent(node: Node<'_>) -> Node<'_> {
    match node.kind() {
        // The call or declaration name, not the list
        NodeKind::Arguments | NodeKind::Parameters => node
            .prev_sibling()
            .map(|name| name.rightmost())
            .or_else(|| node.parent())
            .unwrap_or(node),
        NodeKind::FieldAccess => node.leftmost(),
        NodeKind::Block | NodeKind::ClassBody => match node.parent() {
            Some(owner) => body_owner(owner).unwrap_or(node),
            None => node,
        },
        _ => node,
    }
}

/// The construct a body belongs to, if it is the body of one
fn body_owner(owner: Node<'_>) -> Option<Node<'_>> {
    match owner.kind() {
        // Two levels up: the try statement the clause belongs to
        NodeKind::CatchClause | NodeKind::FinallyClause => owner.parent(),
        NodeKind::IfStatement => Some(if_chain_root(owner)),
        NodeKind::ForStatement
        | NodeKind::ForEachStatement
        | NodeKind::WhileStatement
        | NodeKind::DoStatement
        | NodeKind::TryStatement
        | NodeKind::SynchronizedStatement
        | NodeKind::SwitchCase
        | NodeKind::MethodDecl
        | NodeKind::ConstructorDecl
        | NodeKind::ClassDecl
        | NodeKind::InterfaceDecl
        | NodeKind::NewExpr => Some(owner),
        _ => None,
    }
}

/// Outermost `if` of an `else if` chain
fn if_chain_root(mut stmt: Node<'_>) -> Node<'_> {
    while let Some(parent) = stmt.parent() {
        let is_else_arm = parent.kind() == NodeKind::IfStatement
            && stmt
                .prev_sibling()
                .is_some_and(|s| s.kind() == NodeKind::KwElse);
        if !is_else_arm {
            break;
        }
        stmt = parent;
    }
    stmt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TreeBuilder;

    fn empty_block(b: &mut TreeBuilder<'_>) {
        b.node(NodeKind::Block, |b| {
            b.token(NodeKind::LBrace, "{");
            b.token(NodeKind::RBrace, "}");
        });
    }

    #[test]
    fn test_argument_list_anchors_on_callee() {
        let mut b = TreeBuilder::new("x = obj.call(a);");
        b.node(NodeKind::ExprStatement, |b| {
            b.node(NodeKind::BinaryExpr, |b| {
                b.token(NodeKind::Identifier, "x");
                b.token(NodeKind::Operator, "=");
                b.node(NodeKind::CallExpr, |b| {
                    b.node(NodeKind::FieldAccess, |b| {
                        b.token(NodeKind::Identifier, "obj");
                        b.token(NodeKind::Dot, ".");
                        b.token(NodeKind::Identifier, "call");
                    });
                    b.node(NodeKind::Arguments, |b| {
                        b.token(NodeKind::LParen, "(");
                        b.token(NodeKind::Identifier, "a");
                        b.token(NodeKind::RParen, ")");
                    });
                });
            });
            b.token(NodeKind::Semi, ";");
        });
        let tree = b.finish().unwrap();
        let args = tree
            .preorder()
            .find(|n| n.kind() == NodeKind::Arguments)
            .unwrap();
        assert_eq!(indentation_parent(args).text(), "call");

        let access = tree
            .preorder()
            .find(|n| n.kind() == NodeKind::FieldAccess)
            .unwrap();
        assert_eq!(indentation_parent(access).text(), "obj");
    }

    #[test]
    fn test_catch_block_anchors_on_try() {
        let src = "try {\n} catch (E e) {\n}";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::TryStatement, |b| {
            b.token(NodeKind::KwTry, "try");
            b.node(NodeKind::Block, |b| {
                b.token(NodeKind::LBrace, "{");
                b.token(NodeKind::RBrace, "}");
            });
            b.node(NodeKind::CatchClause, |b| {
                b.token(NodeKind::KwCatch, "catch");
                b.token(NodeKind::LParen, "(");
                b.node(NodeKind::Parameter, |b| {
                    b.token(NodeKind::Identifier, "E");
                    b.token(NodeKind::Identifier, "e");
                });
                b.token(NodeKind::RParen, ")");
                b.node(NodeKind::Block, |b| {
                    b.token(NodeKind::LBrace, "{");
                    b.token(NodeKind::RBrace, "}");
                });
            });
        });
        let tree = b.finish().unwrap();
        let catch_block = tree
            .preorder()
            .filter(|n| n.kind() == NodeKind::Block)
            .nth(1)
            .unwrap();
        assert_eq!(indentation_parent(catch_block), tree.root());
    }

    #[test]
    fn test_else_if_block_anchors_on_chain_root() {
        let src = "if (a) {\n} else if (b) {\n}";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::IfStatement, |b| {
            b.token(NodeKind::KwIf, "if");
            b.token(NodeKind::LParen, "(");
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::RParen, ")");
            empty_block(b);
            b.token(NodeKind::KwElse, "else");
            b.node(NodeKind::IfStatement, |b| {
                b.token(NodeKind::KwIf, "if");
                b.token(NodeKind::LParen, "(");
                b.token(NodeKind::Identifier, "b");
                b.token(NodeKind::RParen, ")");
                empty_block(b);
            });
        });
        let tree = b.finish().unwrap();
        let inner_block = tree
            .preorder()
            .filter(|n| n.kind() == NodeKind::Block)
            .nth(1)
            .unwrap();
        assert_eq!(indentation_parent(inner_block), tree.root());
    }

    #[test]
    fn test_plain_block_is_its_own_anchor() {
        let mut b = TreeBuilder::new("{ { } }");
        b.node(NodeKind::Block, |b| {
            b.token(NodeKind::LBrace, "{");
            b.node(NodeKind::Block, |b| {
                b.token(NodeKind::LBrace, "{");
                b.token(NodeKind::RBrace, "}");
            });
            b.token(NodeKind::RBrace, "}");
        });
        let tree = b.finish().unwrap();
        let inner = tree.root().child(1).unwrap();
        assert_eq!(indentation_parent(inner), inner);
    }
}

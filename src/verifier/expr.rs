//! Expression checker
//!
//! Expressions nest arbitrarily and carry their own wrap policies, so they
//! are walked here instead of through construct programs. Argument lists,
//! array initializers and anonymous class bodies inside an expression still
//! have programs; the tree walk reaches them on its own.

use super::layout::{same_line, Context};
use crate::config::WrapPolicy;
use crate::diagnostic::Message;
use crate::syntax::{Node, NodeKind};

/// Policies in effect for one invocation
#[derive(Debug, Clone, Copy)]
struct Policies {
    before_operator: WrapPolicy,
    after_operator: WrapPolicy,
    ternary: WrapPolicy,
    selector: WrapPolicy,
    left_brace: WrapPolicy,
    inline: bool,
}

impl Policies {
    fn new(cx: &Context<'_>, inline: bool) -> Self {
        let wrap = &cx.layout.wrap;
        let pick = |policy: WrapPolicy| if inline { WrapPolicy::No } else { policy };
        Self {
            before_operator: pick(wrap.before_operator),
            after_operator: pick(wrap.after_operator),
            ternary: pick(wrap.ternary),
            selector: pick(wrap.selector),
            left_brace: pick(wrap.left_brace),
            inline,
        }
    }

    /// Policy for the boundary after `?` and `:`
    fn after_separator(&self) -> WrapPolicy {
        if self.inline {
            WrapPolicy::No
        } else {
            WrapPolicy::May
        }
    }
}

/// Check `node` and its operands. `base` is the indentation continuation
/// lines are measured from; `inline` forbids wrapping anywhere inside.
pub fn check(cx: &mut Context<'_>, node: Node<'_>, base: usize, inline: bool) {
    let policies = Policies::new(cx, inline);
    visit(cx, node, base, &policies);
}

fn visit(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    match node.kind() {
        NodeKind::BinaryExpr => binary(cx, node, base, p),
        NodeKind::UnaryExpr => {
            for child in node.children() {
                operand(cx, child, base, p);
            }
        }
        NodeKind::TernaryExpr => ternary(cx, node, base, p),
        NodeKind::IndexExpr => index(cx, node, base, p),
        NodeKind::CallExpr => call(cx, node, base, p),
        NodeKind::FieldAccess => selector(cx, node, p),
        NodeKind::ParenExpr => parens(cx, node, base, p),
        NodeKind::NewExpr => creation(cx, node, base, p),
        // Leaves, and initializers with a program of their own
        _ => {}
    }
}

/// Recurse into composite expression operands
fn operand(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    if node.kind().is_expression() && node.has_children() {
        visit(cx, node, base, p);
    }
}

/// `prev` to `next` under `policy`; continuation lines sit at `column`
fn boundary(cx: &mut Context<'_>, prev: Node<'_>, next: Node<'_>, policy: WrapPolicy, column: usize) {
    match policy {
        WrapPolicy::No => cx.no_wrap(prev, next),
        WrapPolicy::May => cx.may_wrap(prev, next, column),
        WrapPolicy::Must => cx.must_wrap(prev, next, column),
    }
}

/// Report a structural mismatch inside an expression; false stops the node
fn expect_child<'t>(
    cx: &mut Context<'_>,
    node: Node<'t>,
    index: usize,
    accepts: impl Fn(NodeKind) -> bool,
    expected: &str,
) -> Option<Node<'t>> {
    match node.child(index) {
        Some(child) if accepts(child.kind()) => Some(child),
        Some(child) => {
            cx.report(
                child,
                Message::UnexpectedToken {
                    expected: expected.to_string(),
                    actual: child.describe(),
                },
                None,
            );
            None
        }
        None => {
            let (at, prev) = match index.checked_sub(1).and_then(|i| node.child(i)) {
                Some(last) => (last, super::layout::describe_last(last)),
                None => (node, node.kind().display_name().to_string()),
            };
            cx.report(at, Message::MissingToken { prev }, None);
            None
        }
    }
}

fn is_operator(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Operator | NodeKind::Assign)
}

fn is_expression(kind: NodeKind) -> bool {
    kind.is_expression()
}

/// `operand (operator operand)+`
fn binary(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let continuation = base + cx.offset();
    let Some(mut left) = expect_child(cx, node, 0, is_expression, "expression") else {
        return;
    };
    operand(cx, left, base, p);
    let mut at = 1;
    loop {
        let Some(op) = expect_child(cx, node, at, is_operator, "operator") else {
            return;
        };
        let Some(right) = expect_child(cx, node, at + 1, is_expression, "expression") else {
            return;
        };
        boundary(cx, left.rightmost(), op, p.before_operator, continuation);
        boundary(cx, op, right, p.after_operator, continuation);
        operand(cx, right, base, p);
        left = right;
        at += 2;
        if node.child(at).is_none() {
            return;
        }
    }
}

/// `condition ? then : else`
fn ternary(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let continuation = base + cx.offset();
    let shape: [(fn(NodeKind) -> bool, &str); 5] = [
        (is_expression, "expression"),
        (|k| k == NodeKind::Question, "?"),
        (is_expression, "expression"),
        (|k| k == NodeKind::Colon, ":"),
        (is_expression, "expression"),
    ];
    let mut parts = Vec::with_capacity(5);
    for (index, (accepts, expected)) in shape.iter().enumerate() {
        match expect_child(cx, node, index, accepts, expected) {
            Some(child) => parts.push(child),
            None => return,
        }
    }
    if let Some(extra) = node.child(5) {
        cx.report(extra, Message::ExtraToken { token: extra.describe() }, None);
        return;
    }
    for pair in parts.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let policy = if next.is_token() { p.ternary } else { p.after_separator() };
        boundary(cx, prev.rightmost(), next, policy, continuation);
    }
    for part in parts.iter().step_by(2) {
        operand(cx, *part, base, p);
    }
}

/// `target [ index ]`
fn index(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let shape: [(fn(NodeKind) -> bool, &str); 4] = [
        (is_expression, "expression"),
        (|k| k == NodeKind::LBracket, "["),
        (is_expression, "expression"),
        (|k| k == NodeKind::RBracket, "]"),
    ];
    let mut parts = Vec::with_capacity(4);
    for (at, (accepts, expected)) in shape.iter().enumerate() {
        match expect_child(cx, node, at, accepts, expected) {
            Some(child) => parts.push(child),
            None => return,
        }
    }
    for pair in parts.windows(2) {
        cx.no_wrap(pair[0].rightmost(), pair[1]);
    }
    operand(cx, parts[0], base, p);
    operand(cx, parts[2], base, p);
}

/// `callee arguments`; the argument list runs its own program
fn call(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let Some(callee) = expect_child(cx, node, 0, is_expression, "expression") else {
        return;
    };
    let Some(args) = expect_child(cx, node, 1, |k| k == NodeKind::Arguments, "(") else {
        return;
    };
    operand(cx, callee, base, p);
    cx.no_wrap(callee.rightmost(), args);
}

/// `target . name`, measured from the line the chain starts on
fn selector(cx: &mut Context<'_>, node: Node<'_>, p: &Policies) {
    let chain_base = cx.base_of(super::anchor::indentation_parent(node));
    let Some(target) = expect_child(cx, node, 0, is_expression, "expression") else {
        return;
    };
    let Some(dot) = expect_child(cx, node, 1, |k| k == NodeKind::Dot, ".") else {
        return;
    };
    let Some(name) = expect_child(cx, node, 2, |k| k == NodeKind::Identifier, "identifier") else {
        return;
    };
    operand(cx, target, chain_base, p);
    boundary(cx, target.rightmost(), dot, p.selector, chain_base + cx.offset());
    cx.no_wrap(dot, name);
}

/// Nested parentheses are peeled level by level; each level opens a run
/// like an indent step and closes it like an unindent.
fn parens(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let continuation = base + cx.offset();
    let mut levels = Vec::new();
    let mut inner = node;
    while inner.kind() == NodeKind::ParenExpr {
        let Some(open) = expect_child(cx, inner, 0, |k| k == NodeKind::LParen, "(") else {
            return;
        };
        let Some(body) = expect_child(cx, inner, 1, is_expression, "expression") else {
            return;
        };
        let Some(close) = expect_child(cx, inner, 2, |k| k == NodeKind::RParen, ")") else {
            return;
        };
        let wrapped = !same_line(open, body);
        if wrapped {
            if p.inline {
                cx.same_line_violation(open, body);
            } else {
                cx.expect_column(body, continuation);
            }
        }
        levels.push((close, wrapped));
        inner = body;
    }

    operand(cx, inner, base, p);

    let mut prev = inner.rightmost();
    for (close, wrapped) in levels.into_iter().rev() {
        if wrapped && !p.inline {
            cx.must_wrap(prev, close, base);
        } else {
            cx.no_wrap(prev, close);
        }
        prev = close;
    }
}

/// `new type (arguments | initializer) [class-body]`
fn creation(cx: &mut Context<'_>, node: Node<'_>, base: usize, p: &Policies) {
    let Some(keyword) = expect_child(cx, node, 0, |k| k == NodeKind::KwNew, "new") else {
        return;
    };
    let Some(ty) = expect_child(cx, node, 1, |k| !k.is_token() || k == NodeKind::Identifier, "type")
    else {
        return;
    };
    cx.no_wrap(keyword, ty);
    operand(cx, ty, base, p);

    let mut prev = ty;
    for child in node.children().skip(2) {
        match child.kind() {
            NodeKind::ClassBody => boundary(cx, prev.rightmost(), child, p.left_brace, base),
            NodeKind::Arguments | NodeKind::ArrayInitializer | NodeKind::ArrayType => {
                cx.no_wrap(prev.rightmost(), child)
            }
            _ => {
                cx.report(
                    child,
                    Message::UnexpectedToken {
                        expected: "(".to_string(),
                        actual: child.describe(),
                    },
                    None,
                );
                return;
            }
        }
        prev = child;
    }
}

/// Whether `expr` must render without wrapping because of where it sits:
/// one of several list elements, or the whole of a control-statement body
/// kept on the header's line.
pub fn is_inline(expr: Node<'_>) -> bool {
    let Some(parent) = expr.parent() else {
        return false;
    };
    match parent.kind() {
        NodeKind::Arguments | NodeKind::ArrayInitializer => {
            parent.children().filter(|c| c.kind().is_expression()).count() > 1
        }
        NodeKind::ExprStatement
        | NodeKind::ReturnStatement
        | NodeKind::ThrowStatement
        | NodeKind::LocalVarDecl => {
            let Some(owner) = parent.parent() else {
                return false;
            };
            let controls = matches!(
                owner.kind(),
                NodeKind::IfStatement
                    | NodeKind::ForStatement
                    | NodeKind::ForEachStatement
                    | NodeKind::WhileStatement
                    | NodeKind::DoStatement
            );
            controls
                && parent
                    .prev_sibling()
                    .is_some_and(|header| same_line(header, parent))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::SourceText;
    use crate::config::LayoutSettings;
    use crate::diagnostic::Finding;
    use crate::syntax::{SyntaxTree, TreeBuilder};
    use pretty_assertions::assert_eq;

    fn run_check(tree: &SyntaxTree, src: &str, inline: bool) -> Vec<String> {
        run_with(tree, src, inline, LayoutSettings::default())
    }

    fn run_with(tree: &SyntaxTree, src: &str, inline: bool, layout: LayoutSettings) -> Vec<String> {
        let source = SourceText::new(src, 4);
        let mut findings: Vec<Finding> = Vec::new();
        let mut sink = |f: Finding| findings.push(f);
        let mut cx = Context::new(&source, &layout, &mut sink);
        check(&mut cx, tree.root(), 0, inline);
        findings.iter().map(|f| f.to_string()).collect()
    }

    fn sum(src: &str) -> SyntaxTree {
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::BinaryExpr, |b| {
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::Operator, "+");
            b.token(NodeKind::Identifier, "b");
        });
        b.finish().unwrap()
    }

    #[test]
    fn test_binary_wrap_before_operator() {
        let src = "a\n    + b";
        assert!(run_check(&sum(src), src, false).is_empty());

        let src = "a\n  + b";
        assert_eq!(
            run_check(&sum(src), src, false),
            vec!["2:3: `+` must appear in column 5, not 3"]
        );
    }

    #[test]
    fn test_binary_after_operator_defaults_to_no_wrap() {
        let src = "a +\n    b";
        assert_eq!(
            run_check(&sum(src), src, false),
            vec!["2:5: `+` must appear on same line as `b`"]
        );

        let mut layout = LayoutSettings::default();
        layout.wrap.after_operator = WrapPolicy::May;
        assert!(run_with(&sum(src), src, false, layout).is_empty());
    }

    #[test]
    fn test_must_wrap_before_operator() {
        let mut layout = LayoutSettings::default();
        layout.wrap.before_operator = WrapPolicy::Must;
        let src = "a + b";
        assert_eq!(
            run_with(&sum(src), src, false, layout),
            vec!["1:3: must wrap line before `+`"]
        );
    }

    #[test]
    fn test_inline_forbids_wrapping() {
        let src = "a\n    + b";
        assert_eq!(
            run_check(&sum(src), src, true),
            vec!["2:5: `a` must appear on same line as `+`"]
        );
    }

    #[test]
    fn test_nary_binary_checks_every_boundary() {
        let src = "a\n    + b\n   + c";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::BinaryExpr, |b| {
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::Operator, "+");
            b.token(NodeKind::Identifier, "b");
            b.token(NodeKind::Operator, "+");
            b.token(NodeKind::Identifier, "c");
        });
        let tree = b.finish().unwrap();
        assert_eq!(
            run_check(&tree, src, false),
            vec!["3:4: `+` must appear in column 5, not 4"]
        );
    }

    #[test]
    fn test_binary_shape_errors() {
        let src = "a b";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::BinaryExpr, |b| {
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::Identifier, "b");
        });
        let tree = b.finish().unwrap();
        assert_eq!(
            run_check(&tree, src, false),
            vec!["1:3: expected `operator` instead of `b`"]
        );

        let src = "a +";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::BinaryExpr, |b| {
            b.token(NodeKind::Identifier, "a");
            b.token(NodeKind::Operator, "+");
        });
        let tree = b.finish().unwrap();
        assert_eq!(run_check(&tree, src, false), vec!["1:3: token missing after `+`"]);
    }

    #[test]
    fn test_ternary_separators() {
        let build = |src: &str| {
            let mut b = TreeBuilder::new(src);
            b.node(NodeKind::TernaryExpr, |b| {
                b.token(NodeKind::Identifier, "c");
                b.token(NodeKind::Question, "?");
                b.token(NodeKind::Identifier, "x");
                b.token(NodeKind::Colon, ":");
                b.token(NodeKind::Identifier, "y");
            });
            b.finish().unwrap()
        };
        let src = "c\n    ? x\n    : y";
        assert!(run_check(&build(src), src, false).is_empty());

        let src = "c ? x\n  : y";
        assert_eq!(
            run_check(&build(src), src, false),
            vec!["2:3: `:` must appear in column 5, not 3"]
        );
    }

    #[test]
    fn test_call_keeps_arguments_on_callee_line() {
        let src = "f\n(a)";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::CallExpr, |b| {
            b.token(NodeKind::Identifier, "f");
            b.node(NodeKind::Arguments, |b| {
                b.token(NodeKind::LParen, "(");
                b.token(NodeKind::Identifier, "a");
                b.token(NodeKind::RParen, ")");
            });
        });
        let tree = b.finish().unwrap();
        assert_eq!(
            run_check(&tree, src, false),
            vec!["2:1: `f` must appear on same line as `(`"]
        );
    }

    #[test]
    fn test_selector_wraps_from_chain_start() {
        let build = |src: &str| {
            let mut b = TreeBuilder::new(src);
            b.node(NodeKind::FieldAccess, |b| {
                b.token(NodeKind::Identifier, "builder");
                b.token(NodeKind::Dot, ".");
                b.token(NodeKind::Identifier, "name");
            });
            b.finish().unwrap()
        };
        let src = "builder\n    .name";
        assert!(run_check(&build(src), src, false).is_empty());

        let src = "builder.\n    name";
        assert_eq!(
            run_check(&build(src), src, false),
            vec!["2:5: `.` must appear on same line as `name`"]
        );
    }

    #[test]
    fn test_parenthesized_levels() {
        let build = |src: &str| {
            let mut b = TreeBuilder::new(src);
            b.node(NodeKind::ParenExpr, |b| {
                b.token(NodeKind::LParen, "(");
                b.node(NodeKind::ParenExpr, |b| {
                    b.token(NodeKind::LParen, "(");
                    b.token(NodeKind::Identifier, "a");
                    b.token(NodeKind::RParen, ")");
                });
                b.token(NodeKind::RParen, ")");
            });
            b.finish().unwrap()
        };
        let src = "((a))";
        assert!(run_check(&build(src), src, false).is_empty());

        let src = "(\n    (a)\n)";
        assert!(run_check(&build(src), src, false).is_empty());

        let src = "((a)\n)";
        assert_eq!(
            run_check(&build(src), src, false),
            vec!["2:1: `)` must appear on same line as `)`"]
        );

        let src = "(\n    (a))";
        assert_eq!(
            run_check(&build(src), src, false),
            vec!["2:8: must wrap line before `)`"]
        );
    }

    #[test]
    fn test_object_creation_body_follows_brace_policy() {
        let src = "new T()\n{}";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::NewExpr, |b| {
            b.token(NodeKind::KwNew, "new");
            b.token(NodeKind::Identifier, "T");
            b.node(NodeKind::Arguments, |b| {
                b.token(NodeKind::LParen, "(");
                b.token(NodeKind::RParen, ")");
            });
            b.node(NodeKind::ClassBody, |b| {
                b.token(NodeKind::LBrace, "{");
                b.token(NodeKind::RBrace, "}");
            });
        });
        let tree = b.finish().unwrap();
        assert_eq!(
            run_check(&tree, src, false),
            vec!["2:1: `)` must appear on same line as `{`"]
        );
    }

    #[test]
    fn test_inline_contexts() {
        let src = "f(a, b); g(c);";
        let mut b = TreeBuilder::new(src);
        b.node(NodeKind::Block, |b| {
            for (name, args) in [("f", &["a", "b"][..]), ("g", &["c"][..])] {
                b.node(NodeKind::ExprStatement, |b| {
                    b.node(NodeKind::CallExpr, |b| {
                        b.token(NodeKind::Identifier, name);
                        b.node(NodeKind::Arguments, |b| {
                            b.token(NodeKind::LParen, "(");
                            for (i, arg) in args.iter().enumerate() {
                                if i > 0 {
                                    b.token(NodeKind::Comma, ",");
                                }
                                b.token(NodeKind::Identifier, arg);
                            }
                            b.token(NodeKind::RParen, ")");
                        });
                    });
                    b.token(NodeKind::Semi, ";");
                });
            }
        });
        let tree = b.finish().unwrap();
        let args: Vec<&str> = tree
            .preorder()
            .filter(|n| n.kind() == NodeKind::Identifier && is_inline(*n))
            .map(|n| n.text())
            .collect();
        assert_eq!(args, vec!["a", "b"]);
    }

    #[test]
    fn test_same_line_control_body_is_inline() {
        let build = |src: &str| {
            let mut b = TreeBuilder::new(src);
            b.node(NodeKind::WhileStatement, |b| {
                b.token(NodeKind::KwWhile, "while");
                b.token(NodeKind::LParen, "(");
                b.token(NodeKind::Identifier, "c");
                b.token(NodeKind::RParen, ")");
                b.node(NodeKind::ExprStatement, |b| {
                    b.token(NodeKind::Identifier, "x");
                    b.token(NodeKind::Semi, ";");
                });
            });
            b.finish().unwrap()
        };
        let tree = build("while (c) x;");
        let x = tree.root().child(4).unwrap().first_child().unwrap();
        assert!(is_inline(x));

        let tree = build("while (c)\n    x;");
        let x = tree.root().child(4).unwrap().first_child().unwrap();
        assert!(!is_inline(x));
    }
}

//! The child-sequence verifier
//!
//! Runs one [`Program`] against the children of one node. Every mismatch is
//! reported; a structural one also ends this node's verification.

use super::anchor::indentation_parent;
use super::expr;
use super::layout::{same_line, Context, WrapMode};
use crate::diagnostic::Message;
use crate::program::{Expect, Program, Step};
use crate::syntax::{Node, NodeKind};

/// Lookahead gives up after this many steps; loops always consume first
const LOOKAHEAD_LIMIT: usize = 256;

/// Per-invocation state, dropped when the node is done
struct Frame<'t> {
    node: Node<'t>,
    children: Vec<Node<'t>>,
    cursor: usize,
    pc: usize,
    /// Last token of the last consumed child
    previous: Option<Node<'t>>,
    /// The last consumed child itself
    last: Option<Node<'t>>,
    mode: WrapMode,
    base: usize,
}

impl<'t> Frame<'t> {
    fn current(&self) -> Option<Node<'t>> {
        self.children.get(self.cursor).copied()
    }
}

/// Verify `node`'s children against `program`
pub fn run(cx: &mut Context<'_>, node: Node<'_>, program: &Program) {
    let anchor = indentation_parent(node);
    let mut frame = Frame {
        node,
        children: node.children().collect(),
        cursor: 0,
        pc: 0,
        previous: None,
        last: None,
        mode: WrapMode::Unset,
        base: cx.base_of(anchor),
    };

    while let Some(step) = program.step(frame.pc) {
        let current = frame.current();
        log::trace!(
            "{} pc={} {} child={:?} mode={:?}",
            node.kind(),
            frame.pc,
            step,
            current,
            frame.mode
        );
        match step {
            Step::Expect(expect) => {
                if !consume(cx, &mut frame, expect) {
                    return;
                }
            }
            Step::Fork(target) => {
                frame.pc = if takes_branch(program, &frame, target) {
                    target
                } else {
                    frame.pc + 1
                };
            }
            Step::Branch(target) => frame.pc = target,
            Step::Label(_) => frame.pc += 1,
            Step::EndRun => {
                frame.mode = WrapMode::Unset;
                frame.pc += 1;
            }
            Step::Optional => {
                frame.pc = match next_expect(program, frame.pc + 1) {
                    Some((at, expect)) if !current.is_some_and(|c| expect.accepts(c)) => at + 1,
                    _ => frame.pc + 1,
                };
            }
            Step::End => {
                if let Some(extra) = current {
                    cx.report(
                        extra,
                        Message::ExtraToken {
                            token: extra.describe(),
                        },
                        None,
                    );
                }
                return;
            }
            op => {
                if let Some(child) = current {
                    apply_layout(cx, &mut frame, op, child, program.multiple_per_line());
                }
                frame.pc += 1;
            }
        }
    }
}

/// Match the current child against a token expectation; false stops the run
fn consume(cx: &mut Context<'_>, frame: &mut Frame<'_>, expect: Expect) -> bool {
    let Some(child) = frame.current() else {
        let (at, prev) = match frame.previous {
            Some(prev) => (prev, prev.text().to_string()),
            None => (frame.node, frame.node.kind().display_name().to_string()),
        };
        cx.report(at, Message::MissingToken { prev }, None);
        return false;
    };
    if !expect.accepts(child) {
        cx.report(
            child,
            Message::UnexpectedToken {
                expected: expected_name(expect),
                actual: child.describe(),
            },
            None,
        );
        return false;
    }
    if expect == Expect::Expr {
        let base = cx.source.indentation(child.leftmost().line());
        expr::check(cx, child, base, expr::is_inline(child));
    }
    frame.previous = Some(child.rightmost());
    frame.last = Some(child);
    frame.cursor += 1;
    frame.pc += 1;
    true
}

fn expected_name(expect: Expect) -> String {
    match expect {
        Expect::Kind(kind) => kind.display_name().to_string(),
        Expect::Any => "token".to_string(),
        Expect::Expr => "expression".to_string(),
    }
}

/// First token expectation at or after `pc`, skipping layout opcodes
fn next_expect(program: &Program, mut pc: usize) -> Option<(usize, Expect)> {
    while let Some(step) = program.step(pc) {
        match step {
            Step::Expect(expect) => return Some((pc, expect)),
            s if s.is_layout() => pc += 1,
            _ => return None,
        }
    }
    None
}

/// How strongly the path starting at `pc` accepts `child`: `None` rejects,
/// higher values are more specific, and 0 means "accepts because no child
/// is left".
fn acceptance(program: &Program, mut pc: usize, child: Option<Node<'_>>, budget: &mut usize) -> Option<u8> {
    loop {
        if *budget == 0 {
            return None;
        }
        *budget -= 1;
        match program.step(pc)? {
            Step::Expect(expect) => {
                return child
                    .filter(|c| expect.accepts(*c))
                    .map(|_| expect.specificity());
            }
            Step::End => return child.is_none().then_some(0),
            Step::Branch(target) => pc = target,
            Step::Fork(target) => {
                let here = acceptance(program, pc + 1, child, budget);
                let there = acceptance(program, target, child, budget);
                return here.max(there);
            }
            Step::Optional => match next_expect(program, pc + 1) {
                Some((_, expect)) if child.is_some_and(|c| expect.accepts(c)) => {
                    return Some(expect.specificity());
                }
                Some((at, _)) => pc = at + 1,
                None => pc += 1,
            },
            _ => pc += 1,
        }
    }
}

/// FORK: jump when the target accepts the current child.
///
/// When both paths accept, the more specific expectation wins, so a concrete
/// child always beats an END target. Equal specificity is ambiguous; the
/// branch is taken and the input flagged for review.
fn takes_branch(program: &Program, frame: &Frame<'_>, target: usize) -> bool {
    let child = frame.current();
    let mut budget = LOOKAHEAD_LIMIT;
    let there = acceptance(program, target, child, &mut budget);
    let mut budget = LOOKAHEAD_LIMIT;
    let here = acceptance(program, frame.pc + 1, child, &mut budget);
    match (here, there) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(h), Some(t)) if h != t => t > h,
        (Some(_), Some(_)) => {
            if let Some(c) = child {
                log::warn!(
                    "ambiguous FORK in {} program at step {}: both paths accept `{}` (line {}); taking the branch",
                    program.kind(),
                    frame.pc,
                    c.describe(),
                    c.line()
                );
            }
            true
        }
    }
}

/// A pure keyword-modifier list may share a line with what follows it
fn ends_with_modifier(last: Option<Node<'_>>) -> bool {
    last.is_some_and(|n| {
        n.kind() == NodeKind::Modifiers
            && n.last_child().is_some_and(|m| m.kind() == NodeKind::Modifier)
    })
}

fn apply_layout(
    cx: &mut Context<'_>,
    frame: &mut Frame<'_>,
    op: Step,
    child: Node<'_>,
    multiple_per_line: bool,
) {
    let base = frame.base;
    let Some(prev) = frame.previous else {
        return;
    };
    match op {
        Step::NoWrap => cx.no_wrap(prev, child),
        Step::MayWrap => cx.may_wrap(prev, child, base),
        Step::MustWrap => {
            if same_line(prev, child) && ends_with_modifier(frame.last) {
                return;
            }
            cx.must_wrap(prev, child, base);
        }
        Step::Unindent => {
            match frame.mode {
                WrapMode::SameLine => cx.no_wrap(prev, child),
                WrapMode::Wrapped => cx.must_wrap(prev, child, base),
                // nothing in the run, but a closer on its own line still aligns
                WrapMode::Unset => {
                    if !same_line(prev, child) {
                        cx.expect_column(child, base);
                    }
                }
            }
            frame.mode = WrapMode::Unset;
        }
        Step::IndentIfChildren if !child.has_children() => {
            // empty bodies stay on the opening line
            cx.no_wrap(prev, child);
            frame.mode = WrapMode::SameLine;
        }
        Step::MayIndent | Step::IndentIfChildren | Step::MustIndent => {
            let same = same_line(prev, child);
            let indent = base + cx.offset();
            if op == Step::MustIndent {
                if same {
                    cx.must_wrap_violation(child, indent);
                } else {
                    check_indented(cx, frame, child);
                }
                frame.mode = WrapMode::Wrapped;
                return;
            }
            match (frame.mode, same) {
                (WrapMode::Unset, true) => frame.mode = WrapMode::SameLine,
                (WrapMode::Unset, false) => {
                    frame.mode = WrapMode::Wrapped;
                    check_indented(cx, frame, child);
                }
                (WrapMode::SameLine, true) => {}
                (WrapMode::SameLine, false) | (WrapMode::Wrapped, false) => {
                    if frame.mode == WrapMode::SameLine && !multiple_per_line {
                        cx.must_wrap_violation(child, indent);
                    } else {
                        check_indented(cx, frame, child);
                    }
                }
                (WrapMode::Wrapped, true) => {
                    if !multiple_per_line {
                        cx.must_wrap_violation(child, indent);
                    }
                }
            }
        }
        _ => {}
    }
}

/// An element that starts a line sits one level in, or for case-like
/// elements, in line with the previous one
fn check_indented(cx: &mut Context<'_>, frame: &Frame<'_>, child: Node<'_>) {
    let indent = frame.base + cx.offset();
    if !child.kind().is_case_like() {
        cx.expect_column(child, indent);
        return;
    }
    let previous_case = frame.children[..frame.cursor]
        .iter()
        .rev()
        .find(|c| c.kind().is_case_like());
    match previous_case {
        Some(case) => {
            let column = cx.column(*case);
            cx.expect_column(child, column);
        }
        None => {
            let actual = cx.column(child);
            if actual != frame.base {
                cx.expect_column(child, indent);
            }
        }
    }
}

//! Tree-walk driver
//!
//! Visits every node of a tree once, in document order, and runs the
//! construct program for its kind. Expressions are checked from inside the
//! programs that expect them. A structural error stops only the node it was
//! found in; siblings and ancestors are still visited.

mod anchor;
mod expr;
mod interpreter;
mod layout;

pub use anchor::indentation_parent;
pub use layout::WrapMode;

use crate::column::SourceText;
use crate::config::LayoutSettings;
use crate::diagnostic::{Finding, Message};
use crate::program::ProgramTable;
use crate::syntax::{Node, NodeKind, SyntaxTree};
use layout::Context;

/// State carried across one walk; a fresh one starts every tree
#[derive(Debug, Default)]
struct WalkState<'t> {
    /// Last field or local declaration visited
    last_declaration: Option<Node<'t>>,
}

/// Verifies trees against a program table
pub struct Verifier<'a> {
    table: &'a ProgramTable,
    layout: &'a LayoutSettings,
}

impl<'a> Verifier<'a> {
    pub fn new(table: &'a ProgramTable, layout: &'a LayoutSettings) -> Self {
        Self { table, layout }
    }

    /// Walk `tree` and hand every finding to `report`, in walk order
    pub fn verify(&self, tree: &SyntaxTree, source: &SourceText, report: &mut dyn FnMut(Finding)) {
        let mut cx = Context::new(source, self.layout, report);
        let mut state = WalkState::default();
        for node in tree.preorder() {
            if let Some(program) = self.table.get(node.kind()) {
                interpreter::run(&mut cx, node, program);
            }
            if self.layout.align_declarations {
                align_declaration(&mut cx, &mut state, node);
            }
        }
    }

    /// All findings of `tree`, ordered by position
    pub fn findings(&self, tree: &SyntaxTree, source: &SourceText) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.verify(tree, source, &mut |f| findings.push(f));
        findings.sort_by_key(|f| (f.line, f.column));
        findings
    }
}

fn is_declaration(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::FieldDecl | NodeKind::LocalVarDecl)
}

fn assign_token(decl: Node<'_>) -> Option<Node<'_>> {
    decl.children().find(|c| c.kind() == NodeKind::Assign)
}

/// Consecutive declarations on adjacent lines line up their `=`
fn align_declaration<'t>(cx: &mut Context<'_>, state: &mut WalkState<'t>, node: Node<'t>) {
    if !is_declaration(node.kind()) {
        return;
    }
    let previous = state.last_declaration.replace(node);
    let Some(prev) = previous.filter(|p| node.prev_sibling() == Some(*p) && p.kind() == node.kind())
    else {
        return;
    };
    if prev.rightmost().line() + 1 != node.line() {
        return;
    }
    if let (Some(above), Some(here)) = (assign_token(prev), assign_token(node)) {
        let expected = cx.column(above);
        let actual = cx.column(here);
        if expected != actual {
            cx.report(
                here,
                Message::Column {
                    token: here.text().to_string(),
                    expected: expected + 1,
                    actual: actual + 1,
                },
                Some(expected),
            );
        }
    }
}

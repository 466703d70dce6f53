//! Line and column checks shared by the interpreter and the expression checker

use crate::column::SourceText;
use crate::config::LayoutSettings;
use crate::diagnostic::{Finding, Message};
use crate::syntax::Node;

/// The three-state register deciding how the rest of a run must be laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// No element of the run placed yet
    #[default]
    Unset,
    /// The first element stayed on the opening line
    SameLine,
    /// The first element started a new, indented line
    Wrapped,
}

/// Everything a check needs besides the nodes themselves
pub struct Context<'a> {
    pub source: &'a SourceText,
    pub layout: &'a LayoutSettings,
    report: &'a mut dyn FnMut(Finding),
}

impl<'a> Context<'a> {
    pub fn new(
        source: &'a SourceText,
        layout: &'a LayoutSettings,
        report: &'a mut dyn FnMut(Finding),
    ) -> Self {
        Self {
            source,
            layout,
            report,
        }
    }

    pub fn offset(&self) -> usize {
        self.layout.basic_offset
    }

    /// Expanded 0-based column of a node's first token
    pub fn column(&self, node: Node<'_>) -> usize {
        let token = node.leftmost();
        self.source.column_of(token.line(), token.column())
    }

    /// Indentation of the line an anchor starts on
    pub fn base_of(&self, anchor: Node<'_>) -> usize {
        self.source.indentation(anchor.leftmost().line())
    }

    pub fn report(&mut self, at: Node<'_>, message: Message, indent: Option<usize>) {
        let token = at.leftmost();
        let finding = Finding {
            line: token.line(),
            column: self.column(token) + 1,
            raw_column: token.column(),
            length: token.text().chars().count().max(1),
            message,
            indent,
        };
        log::trace!("finding {}", finding);
        (self.report)(finding);
    }

    /// `next`'s first token must sit at `expected`
    pub fn expect_column(&mut self, next: Node<'_>, expected: usize) {
        let actual = self.column(next);
        if actual != expected {
            self.report(
                next,
                Message::Column {
                    token: next.leftmost().describe(),
                    expected: expected + 1,
                    actual: actual + 1,
                },
                Some(expected),
            );
        }
    }

    /// `prev` (a token) and `next` must share a line
    pub fn no_wrap(&mut self, prev: Node<'_>, next: Node<'_>) {
        if !same_line(prev, next) {
            self.same_line_violation(prev, next);
        }
    }

    pub fn same_line_violation(&mut self, prev: Node<'_>, next: Node<'_>) {
        self.report(
            next,
            Message::SameLine {
                prev: describe_last(prev),
                next: next.leftmost().describe(),
            },
            None,
        );
    }

    pub fn must_wrap_violation(&mut self, next: Node<'_>, indent: usize) {
        self.report(
            next,
            Message::MustWrap {
                next: next.leftmost().describe(),
            },
            Some(indent),
        );
    }

    /// Either on `prev`'s line or wrapped to `column`
    pub fn may_wrap(&mut self, prev: Node<'_>, next: Node<'_>, column: usize) {
        if !same_line(prev, next) {
            self.expect_column(next, column);
        }
    }

    /// On a new line, at `column`
    pub fn must_wrap(&mut self, prev: Node<'_>, next: Node<'_>, column: usize) {
        if same_line(prev, next) {
            self.must_wrap_violation(next, column);
        } else {
            self.expect_column(next, column);
        }
    }
}

/// Whether `next` starts on the line where `prev` ends
pub fn same_line(prev: Node<'_>, next: Node<'_>) -> bool {
    prev.rightmost().line() == next.leftmost().line()
}

/// Text of the last token of `node`, for messages
pub fn describe_last(node: Node<'_>) -> String {
    let token = node.rightmost();
    if token.is_token() {
        token.text().to_string()
    } else {
        node.describe()
    }
}

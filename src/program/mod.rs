//! Instruction programs for the child-sequence verifier
//!
//! A [`Program`] is a flat list of [`Step`]s describing the children one
//! construct kind expects, in order, and the wrap policy between them.
//! Programs are authored with symbolic labels ([`Step<u8>`]) and resolved
//! once, at construction, into direct jump indices.

pub mod table;

pub use table::ProgramTable;

use crate::syntax::{Node, NodeKind};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error building a program; these are authoring mistakes, never input errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("{kind}: jump to undefined label {label}")]
    DanglingLabel { kind: NodeKind, label: u8 },

    #[error("{kind}: label {label} defined more than once")]
    DuplicateLabel { kind: NodeKind, label: u8 },

    #[error("{kind}: program must finish with END")]
    MissingEnd { kind: NodeKind },

    #[error("{kind}: loop at step {at} consumes no child")]
    EmptyLoop { kind: NodeKind, at: usize },
}

/// What a token expectation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Exactly this kind
    Kind(NodeKind),
    /// Any single child
    Any,
    /// An expression, handed to the expression checker once consumed
    Expr,
}

impl Expect {
    pub fn accepts(self, node: Node<'_>) -> bool {
        match self {
            Expect::Kind(kind) => node.kind() == kind,
            Expect::Any => true,
            Expect::Expr => node.kind().is_expression(),
        }
    }

    /// How specific the expectation is; used to settle FORK lookahead
    pub fn specificity(self) -> u8 {
        match self {
            Expect::Kind(_) => 3,
            Expect::Expr => 2,
            Expect::Any => 1,
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Kind(kind) => write!(f, "`{}`", kind),
            Expect::Any => f.write_str("ANY"),
            Expect::Expr => f.write_str("EXPR"),
        }
    }
}

/// One instruction.
///
/// `L` is the jump operand: a label number while authoring, a step index
/// once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<L = usize> {
    Expect(Expect),
    /// Jump to `L` if the step there accepts the current child
    Fork(L),
    /// Unconditional jump
    Branch(L),
    Label(u8),
    /// The next token expectation may be skipped
    Optional,
    End,
    MayIndent,
    IndentIfChildren,
    /// Like `MayIndent`, but the element must start a new line
    MustIndent,
    Unindent,
    /// Closes the current run without checking the next token
    EndRun,
    MayWrap,
    MustWrap,
    NoWrap,
}

impl<L> Step<L> {
    /// Wrap-policy opcodes constrain layout but never consume a child
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            Step::MayIndent
                | Step::IndentIfChildren
                | Step::MustIndent
                | Step::Unindent
                | Step::EndRun
                | Step::MayWrap
                | Step::MustWrap
                | Step::NoWrap
        )
    }
}

/// Authoring shorthand for a kind expectation
pub fn tok(kind: NodeKind) -> Step<u8> {
    Step::Expect(Expect::Kind(kind))
}

pub const ANY: Step<u8> = Step::Expect(Expect::Any);
pub const EXPR: Step<u8> = Step::Expect(Expect::Expr);

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Expect(e) => write!(f, "{}", e),
            Step::Fork(at) => write!(f, "FORK @{}", at),
            Step::Branch(at) => write!(f, "BRANCH @{}", at),
            Step::Label(n) => write!(f, "LABEL {}", n),
            Step::Optional => f.write_str("OPTIONAL"),
            Step::End => f.write_str("END"),
            Step::MayIndent => f.write_str("MAY_INDENT"),
            Step::IndentIfChildren => f.write_str("INDENT_IF_CHILDREN"),
            Step::MustIndent => f.write_str("MUST_INDENT"),
            Step::Unindent => f.write_str("UNINDENT"),
            Step::EndRun => f.write_str("END_RUN"),
            Step::MayWrap => f.write_str("MAY_WRAP"),
            Step::MustWrap => f.write_str("MUST_WRAP"),
            Step::NoWrap => f.write_str("NO_WRAP"),
        }
    }
}

/// A validated, label-resolved program for one construct kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    kind: NodeKind,
    steps: Vec<Step>,
    multiple_per_line: bool,
}

impl Program {
    /// Resolve labels and validate the program shape.
    ///
    /// Jumps land on the step right after their label. `multiple_per_line`
    /// lets elements of a run share a line in either wrap mode.
    pub fn new(
        kind: NodeKind,
        authored: Vec<Step<u8>>,
        multiple_per_line: bool,
    ) -> Result<Self, ProgramError> {
        let mut labels: HashMap<u8, usize> = HashMap::new();
        for (at, step) in authored.iter().enumerate() {
            if let Step::Label(n) = *step {
                if labels.insert(n, at + 1).is_some() {
                    return Err(ProgramError::DuplicateLabel { kind, label: n });
                }
            }
        }

        let resolve = |label: u8| {
            labels
                .get(&label)
                .copied()
                .ok_or(ProgramError::DanglingLabel { kind, label })
        };

        let steps = authored
            .iter()
            .map(|step| {
                Ok(match *step {
                    Step::Fork(label) => Step::Fork(resolve(label)?),
                    Step::Branch(label) => Step::Branch(resolve(label)?),
                    Step::Expect(e) => Step::Expect(e),
                    Step::Label(n) => Step::Label(n),
                    Step::Optional => Step::Optional,
                    Step::End => Step::End,
                    Step::MayIndent => Step::MayIndent,
                    Step::IndentIfChildren => Step::IndentIfChildren,
                    Step::MustIndent => Step::MustIndent,
                    Step::Unindent => Step::Unindent,
                    Step::EndRun => Step::EndRun,
                    Step::MayWrap => Step::MayWrap,
                    Step::MustWrap => Step::MustWrap,
                    Step::NoWrap => Step::NoWrap,
                })
            })
            .collect::<Result<Vec<Step>, ProgramError>>()?;

        if steps.last() != Some(&Step::End) {
            return Err(ProgramError::MissingEnd { kind });
        }

        for (at, step) in steps.iter().enumerate() {
            if let Step::Branch(target) = *step {
                let consumes = steps[target.min(at)..at]
                    .iter()
                    .any(|s| matches!(s, Step::Expect(_)));
                if target <= at && !consumes {
                    return Err(ProgramError::EmptyLoop { kind, at });
                }
            }
        }

        log::debug!("program for {} resolved: {} steps", kind, steps.len());
        Ok(Self {
            kind,
            steps,
            multiple_per_line,
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, pc: usize) -> Option<Step> {
        self.steps.get(pc).copied()
    }

    pub fn multiple_per_line(&self) -> bool {
        self.multiple_per_line
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.multiple_per_line {
            f.write_str(" (multiple per line)")?;
        }
        f.write_str(":")?;
        for (at, step) in self.steps.iter().enumerate() {
            write!(f, "\n  {:>3}  {}", at, step)?;
        }
        Ok(())
    }
}

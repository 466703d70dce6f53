//! Wrapcheck - syntax-tree line-wrap and indentation verifier
//!
//! Checks that an already-parsed syntax tree is laid out (wrapped, indented,
//! aligned) the way a configurable set of layout policies requires, and
//! reports precise diagnostics where it is not. Parsing is not part of this
//! crate: trees arrive through [`syntax::TreeBuilder`] or as serialized tree
//! documents (`*.tree.json`, `*.tree.yaml`).
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> Verifier -> Interpreter (per construct Program)
//!                                       \-> Expression checker
//! ```
//!
//! Each construct kind has a small Program: expected child kinds mixed with
//! wrap-policy opcodes, forks and labels. The interpreter runs one Program
//! over one node's children and reports every mismatch as a [`Finding`];
//! the engine turns findings into [`Diagnostic`]s for output and fixing.
//!
//! ```
//! use wrapcheck::syntax::{NodeKind, TreeBuilder};
//! use wrapcheck::{LayoutSettings, ProgramTable, SourceText, Verifier};
//!
//! let src = "f(a,\n  b);";
//! let mut b = TreeBuilder::new(src);
//! b.node(NodeKind::ExprStatement, |b| {
//!     b.node(NodeKind::CallExpr, |b| {
//!         b.token(NodeKind::Identifier, "f");
//!         b.node(NodeKind::Arguments, |b| {
//!             b.token(NodeKind::LParen, "(");
//!             b.token(NodeKind::Identifier, "a");
//!             b.token(NodeKind::Comma, ",");
//!             b.token(NodeKind::Identifier, "b");
//!             b.token(NodeKind::RParen, ")");
//!         });
//!     });
//!     b.token(NodeKind::Semi, ";");
//! });
//! let tree = b.finish().unwrap();
//!
//! let layout = LayoutSettings::default();
//! let table = ProgramTable::from_settings(&layout).unwrap();
//! let findings = Verifier::new(&table, &layout).findings(&tree, &SourceText::new(src, 4));
//! assert_eq!(findings[0].to_string(), "2:3: `b` must appear in column 5, not 3");
//! ```

pub mod column;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod engine;
pub mod fixer;
pub mod output;
pub mod program;
pub mod syntax;
pub mod verifier;

// Re-export main types
pub use column::{expanded_column, indentation_width, SourceText};
pub use config::{Config, LayoutSettings, WrapPolicy};
pub use diagnostic::{Diagnostic, Finding, Fix, FixSafety, Location, Message, Severity};
pub use document::{Document, DocumentError};
pub use engine::{Engine, EngineError, LintResult};
pub use fixer::{suggest_fix, FixMode, FixResult, Fixer};
pub use output::{
    CompactFormatter, GithubFormatter, JsonFormatter, OutputFormatter, TextFormatter,
};
pub use program::{Program, ProgramError, ProgramTable, Step};
pub use syntax::{Node, NodeKind, SyntaxTree, TreeBuilder, TreeError};
pub use verifier::{Verifier, WrapMode};

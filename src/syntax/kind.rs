//! The closed set of syntax node kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a syntax node.
///
/// Tokens are leaves and carry source text. Constructs are composite nodes
/// whose children are tokens and other constructs, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Tokens
    Identifier,
    Literal,
    Modifier,
    Operator,
    KwPackage,
    KwImport,
    KwClass,
    KwInterface,
    KwExtends,
    KwImplements,
    KwThrows,
    KwIf,
    KwElse,
    KwFor,
    KwWhile,
    KwDo,
    KwTry,
    KwCatch,
    KwFinally,
    KwSwitch,
    KwCase,
    KwDefault,
    KwReturn,
    KwThrow,
    KwBreak,
    KwContinue,
    KwNew,
    KwSynchronized,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Colon,
    Question,
    Assign,
    At,

    // Declarations
    CompilationUnit,
    PackageDecl,
    ImportDecl,
    ClassDecl,
    InterfaceDecl,
    Modifiers,
    Annotation,
    ExtendsClause,
    ImplementsClause,
    ThrowsClause,
    ClassBody,
    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Parameters,
    Parameter,
    ArrayType,

    // Statements
    Block,
    LocalVarDecl,
    ExprStatement,
    IfStatement,
    ForStatement,
    ForEachStatement,
    WhileStatement,
    DoStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    SwitchStatement,
    SwitchCase,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    SynchronizedStatement,
    EmptyStatement,

    // Expressions
    ArrayInitializer,
    Arguments,
    BinaryExpr,
    UnaryExpr,
    TernaryExpr,
    IndexExpr,
    CallExpr,
    FieldAccess,
    ParenExpr,
    NewExpr,
}

impl NodeKind {
    /// Whether nodes of this kind are leaves carrying source text
    pub fn is_token(self) -> bool {
        (self as u8) <= (NodeKind::At as u8)
    }

    /// Kinds that may stand where an expression is expected.
    ///
    /// Array initializers count as expressions but keep their own program;
    /// the expression checker treats them as opaque operands.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::Literal
                | NodeKind::ArrayInitializer
                | NodeKind::BinaryExpr
                | NodeKind::UnaryExpr
                | NodeKind::TernaryExpr
                | NodeKind::IndexExpr
                | NodeKind::CallExpr
                | NodeKind::FieldAccess
                | NodeKind::ParenExpr
                | NodeKind::NewExpr
        )
    }

    /// Case-style kinds may align with their container instead of indenting
    pub fn is_case_like(self) -> bool {
        matches!(self, NodeKind::SwitchCase)
    }

    /// Fixed spelling of punctuation and keyword tokens
    pub fn spelling(self) -> Option<&'static str> {
        let s = match self {
            NodeKind::KwPackage => "package",
            NodeKind::KwImport => "import",
            NodeKind::KwClass => "class",
            NodeKind::KwInterface => "interface",
            NodeKind::KwExtends => "extends",
            NodeKind::KwImplements => "implements",
            NodeKind::KwThrows => "throws",
            NodeKind::KwIf => "if",
            NodeKind::KwElse => "else",
            NodeKind::KwFor => "for",
            NodeKind::KwWhile => "while",
            NodeKind::KwDo => "do",
            NodeKind::KwTry => "try",
            NodeKind::KwCatch => "catch",
            NodeKind::KwFinally => "finally",
            NodeKind::KwSwitch => "switch",
            NodeKind::KwCase => "case",
            NodeKind::KwDefault => "default",
            NodeKind::KwReturn => "return",
            NodeKind::KwThrow => "throw",
            NodeKind::KwBreak => "break",
            NodeKind::KwContinue => "continue",
            NodeKind::KwNew => "new",
            NodeKind::KwSynchronized => "synchronized",
            NodeKind::LParen => "(",
            NodeKind::RParen => ")",
            NodeKind::LBrace => "{",
            NodeKind::RBrace => "}",
            NodeKind::LBracket => "[",
            NodeKind::RBracket => "]",
            NodeKind::Semi => ";",
            NodeKind::Comma => ",",
            NodeKind::Dot => ".",
            NodeKind::Colon => ":",
            NodeKind::Question => "?",
            NodeKind::Assign => "=",
            NodeKind::At => "@",
            _ => return None,
        };
        Some(s)
    }

    /// Name used in diagnostics when a kind (not a concrete token) is meant
    pub fn display_name(self) -> &'static str {
        if let Some(s) = self.spelling() {
            return s;
        }
        match self {
            NodeKind::Identifier => "identifier",
            NodeKind::Literal => "literal",
            NodeKind::Modifier => "modifier",
            NodeKind::Operator => "operator",
            NodeKind::CompilationUnit => "compilation unit",
            NodeKind::PackageDecl => "package declaration",
            NodeKind::ImportDecl => "import declaration",
            NodeKind::ClassDecl => "class declaration",
            NodeKind::InterfaceDecl => "interface declaration",
            NodeKind::Modifiers => "modifiers",
            NodeKind::Annotation => "annotation",
            NodeKind::ExtendsClause => "extends clause",
            NodeKind::ImplementsClause => "implements clause",
            NodeKind::ThrowsClause => "throws clause",
            NodeKind::ClassBody => "class body",
            NodeKind::FieldDecl => "field declaration",
            NodeKind::MethodDecl => "method declaration",
            NodeKind::ConstructorDecl => "constructor declaration",
            NodeKind::Parameters => "parameter list",
            NodeKind::Parameter => "parameter",
            NodeKind::ArrayType => "array type",
            NodeKind::Block => "block",
            NodeKind::LocalVarDecl => "variable declaration",
            NodeKind::ExprStatement => "expression statement",
            NodeKind::IfStatement => "if statement",
            NodeKind::ForStatement => "for statement",
            NodeKind::ForEachStatement => "for-each statement",
            NodeKind::WhileStatement => "while statement",
            NodeKind::DoStatement => "do statement",
            NodeKind::TryStatement => "try statement",
            NodeKind::CatchClause => "catch clause",
            NodeKind::FinallyClause => "finally clause",
            NodeKind::SwitchStatement => "switch statement",
            NodeKind::SwitchCase => "case group",
            NodeKind::ReturnStatement => "return statement",
            NodeKind::ThrowStatement => "throw statement",
            NodeKind::BreakStatement => "break statement",
            NodeKind::ContinueStatement => "continue statement",
            NodeKind::SynchronizedStatement => "synchronized statement",
            NodeKind::EmptyStatement => "empty statement",
            NodeKind::ArrayInitializer => "array initializer",
            NodeKind::Arguments => "argument list",
            NodeKind::BinaryExpr => "binary expression",
            NodeKind::UnaryExpr => "unary expression",
            NodeKind::TernaryExpr => "conditional expression",
            NodeKind::IndexExpr => "index expression",
            NodeKind::CallExpr => "method call",
            NodeKind::FieldAccess => "field access",
            NodeKind::ParenExpr => "parenthesized expression",
            NodeKind::NewExpr => "object creation",
            _ => "token",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_partition() {
        assert!(NodeKind::Identifier.is_token());
        assert!(NodeKind::At.is_token());
        assert!(NodeKind::RBrace.is_token());
        assert!(!NodeKind::CompilationUnit.is_token());
        assert!(!NodeKind::Block.is_token());
        assert!(!NodeKind::NewExpr.is_token());
    }

    #[test]
    fn test_expression_kinds() {
        assert!(NodeKind::Identifier.is_expression());
        assert!(NodeKind::CallExpr.is_expression());
        assert!(NodeKind::ArrayInitializer.is_expression());
        assert!(!NodeKind::Arguments.is_expression());
        assert!(!NodeKind::Block.is_expression());
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeKind::LBrace.to_string(), "{");
        assert_eq!(NodeKind::KwCatch.to_string(), "catch");
        assert_eq!(NodeKind::Identifier.to_string(), "identifier");
        assert_eq!(NodeKind::Block.to_string(), "block");
    }

    #[test]
    fn test_serde_names() {
        let kind: NodeKind = serde_json::from_str("\"if_statement\"").unwrap();
        assert_eq!(kind, NodeKind::IfStatement);
        let kind: NodeKind = serde_json::from_str("\"l_brace\"").unwrap();
        assert_eq!(kind, NodeKind::LBrace);
        assert_eq!(serde_json::to_string(&NodeKind::KwTry).unwrap(), "\"kw_try\"");
    }
}

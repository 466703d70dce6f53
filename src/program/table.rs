//! One program per construct kind, instantiated from the layout settings
//!
//! Each construct has a single template; the configured policies decide
//! which wrap opcode sits at each boundary.

use super::{tok, Program, ProgramError, Step, ANY, EXPR};
use crate::config::{LayoutSettings, WrapPolicy};
use crate::syntax::NodeKind as K;
use std::collections::HashMap;

use Step::{Branch, End, Fork, IndentIfChildren, Label, MayIndent, MustIndent, NoWrap, Optional};

/// Wrap opcode for a boundary that wraps back to the anchor column
fn wrap_step(policy: WrapPolicy) -> Step<u8> {
    match policy {
        WrapPolicy::Must => Step::MustWrap,
        WrapPolicy::May => Step::MayWrap,
        WrapPolicy::No => NoWrap,
    }
}

/// Wrap opcode for a boundary that wraps one level in
fn indent_step(policy: WrapPolicy) -> Step<u8> {
    match policy {
        WrapPolicy::Must => MustIndent,
        WrapPolicy::May => MayIndent,
        WrapPolicy::No => NoWrap,
    }
}

/// Opcodes for the first and the following elements of a list
fn run_steps(policy: WrapPolicy) -> (Step<u8>, Step<u8>) {
    match policy {
        WrapPolicy::Must => (MustIndent, MayIndent),
        WrapPolicy::May => (MayIndent, MayIndent),
        WrapPolicy::No => (NoWrap, NoWrap),
    }
}

/// Opcode before the delimiter closing a list
fn close_step(policy: WrapPolicy) -> Step<u8> {
    match policy {
        WrapPolicy::Must => Step::Unindent,
        WrapPolicy::May => Step::MayWrap,
        WrapPolicy::No => NoWrap,
    }
}

/// `{ member* }` with every member in one run
fn body(open: K, close: K, element: Step<u8>, one_line: bool) -> Vec<Step<u8>> {
    let first = if one_line { IndentIfChildren } else { MustIndent };
    vec![
        tok(open),
        Fork(1),
        first,
        element,
        Label(0),
        Fork(1),
        MayIndent,
        element,
        Branch(0),
        Label(1),
        Step::Unindent,
        tok(close),
        End,
    ]
}

/// `( element (, element)* )` with an optional trailing comma
fn list(
    open: K,
    close: K,
    element: Step<u8>,
    policy: WrapPolicy,
    closing: WrapPolicy,
    trailing_comma: bool,
) -> Vec<Step<u8>> {
    let (first, rest) = run_steps(policy);
    let mut steps = vec![tok(open), Fork(1), first, element, Label(0), Fork(1), NoWrap, tok(K::Comma)];
    if trailing_comma {
        steps.push(Fork(1));
    }
    steps.extend([rest, element, Branch(0), Label(1), close_step(closing), tok(close), End]);
    steps
}

/// `keyword type (, type)*`
fn type_list(keyword: K) -> Vec<Step<u8>> {
    vec![
        tok(keyword),
        NoWrap,
        ANY,
        Label(0),
        Fork(1),
        NoWrap,
        tok(K::Comma),
        MayIndent,
        ANY,
        Branch(0),
        Label(1),
        End,
    ]
}

/// `( header )` of a control statement
fn condition(keyword: K) -> Vec<Step<u8>> {
    vec![tok(keyword), NoWrap, tok(K::LParen), NoWrap, EXPR, NoWrap, tok(K::RParen)]
}

/// The layout table: construct kind to program
#[derive(Debug, Clone)]
pub struct ProgramTable {
    programs: HashMap<K, Program>,
}

impl ProgramTable {
    /// Build every construct program for the given policy values
    pub fn from_settings(layout: &LayoutSettings) -> Result<Self, ProgramError> {
        let wrap = &layout.wrap;
        let one_line = &layout.allow_one_line;
        let many = &layout.multiple_per_line;

        let annotated = wrap_step(wrap.after_annotations);
        let brace = wrap_step(wrap.left_brace);
        let body_step = indent_step(wrap.statement_body);

        // `body | { block }` after a control-statement header
        let statement_body = |steps: &mut Vec<Step<u8>>, skip: u8, done: u8| {
            steps.extend([
                Fork(skip),
                body_step,
                ANY,
                Branch(done),
                Label(skip),
                brace,
                tok(K::Block),
                Label(done),
            ]);
        };

        let mut authored: Vec<(K, Vec<Step<u8>>, bool)> = Vec::new();

        authored.push((
            K::CompilationUnit,
            vec![Label(0), Fork(1), Step::MustWrap, ANY, Branch(0), Label(1), End],
            false,
        ));
        authored.push((
            K::PackageDecl,
            vec![tok(K::KwPackage), NoWrap, EXPR, NoWrap, tok(K::Semi), End],
            false,
        ));
        authored.push((
            K::ImportDecl,
            vec![
                tok(K::KwImport),
                Optional,
                NoWrap,
                tok(K::Modifier),
                NoWrap,
                EXPR,
                NoWrap,
                tok(K::Semi),
                End,
            ],
            false,
        ));

        // Clauses after a declaration name form one run that may share lines
        let mut class = vec![Optional, tok(K::Modifiers), annotated, tok(K::KwClass), NoWrap, tok(K::Identifier)];
        class.extend([Optional, indent_step(wrap.extends), tok(K::ExtendsClause)]);
        class.extend([Optional, indent_step(wrap.implements), tok(K::ImplementsClause)]);
        class.extend([brace, tok(K::ClassBody), End]);
        authored.push((K::ClassDecl, class, true));

        let mut interface = vec![Optional, tok(K::Modifiers), annotated, tok(K::KwInterface), NoWrap, tok(K::Identifier)];
        interface.extend([Optional, indent_step(wrap.extends), tok(K::ExtendsClause)]);
        interface.extend([brace, tok(K::ClassBody), End]);
        authored.push((K::InterfaceDecl, interface, true));

        authored.push((
            K::Modifiers,
            vec![
                Label(0),
                Fork(1),
                wrap_step(wrap.annotations),
                tok(K::Annotation),
                Branch(0),
                Label(1),
                Fork(2),
                annotated,
                tok(K::Modifier),
                Label(3),
                Fork(2),
                NoWrap,
                tok(K::Modifier),
                Branch(3),
                Label(2),
                End,
            ],
            false,
        ));
        authored.push((
            K::Annotation,
            vec![tok(K::At), NoWrap, EXPR, Optional, NoWrap, tok(K::Arguments), End],
            false,
        ));
        authored.push((K::ExtendsClause, type_list(K::KwExtends), many.type_lists));
        authored.push((K::ImplementsClause, type_list(K::KwImplements), many.type_lists));
        authored.push((K::ThrowsClause, type_list(K::KwThrows), many.type_lists));
        authored.push((
            K::ClassBody,
            body(K::LBrace, K::RBrace, ANY, one_line.class_bodies),
            many.members,
        ));

        let declaration = |semicolon: Vec<Step<u8>>| {
            let mut steps = vec![
                Optional,
                tok(K::Modifiers),
                annotated,
                ANY,
                NoWrap,
                tok(K::Identifier),
                Fork(0),
                NoWrap,
                tok(K::Assign),
                indent_step(wrap.assignment),
                EXPR,
                Label(0),
            ];
            steps.extend(semicolon);
            steps.push(End);
            steps
        };
        authored.push((K::FieldDecl, declaration(vec![NoWrap, tok(K::Semi)]), false));
        // In a for header the semicolon belongs to the loop
        authored.push((
            K::LocalVarDecl,
            declaration(vec![Optional, NoWrap, tok(K::Semi)]),
            false,
        ));

        let mut method = vec![
            Optional,
            tok(K::Modifiers),
            annotated,
            ANY,
            NoWrap,
            tok(K::Identifier),
            NoWrap,
            tok(K::Parameters),
            Optional,
            indent_step(wrap.throws),
            tok(K::ThrowsClause),
        ];
        method.extend([Fork(0), NoWrap, tok(K::Semi), Branch(1), Label(0), brace, tok(K::Block), Label(1), End]);
        authored.push((K::MethodDecl, method, true));

        authored.push((
            K::ConstructorDecl,
            vec![
                Optional,
                tok(K::Modifiers),
                annotated,
                tok(K::Identifier),
                NoWrap,
                tok(K::Parameters),
                Optional,
                indent_step(wrap.throws),
                tok(K::ThrowsClause),
                brace,
                tok(K::Block),
                End,
            ],
            true,
        ));
        authored.push((
            K::Parameters,
            list(
                K::LParen,
                K::RParen,
                tok(K::Parameter),
                wrap.parameters,
                wrap.closing_paren,
                false,
            ),
            many.parameters,
        ));
        authored.push((
            K::Parameter,
            vec![Optional, tok(K::Modifiers), NoWrap, ANY, NoWrap, tok(K::Identifier), End],
            false,
        ));
        authored.push((
            K::ArrayType,
            vec![ANY, NoWrap, tok(K::LBracket), NoWrap, tok(K::RBracket), End],
            false,
        ));

        authored.push((
            K::Block,
            body(K::LBrace, K::RBrace, ANY, one_line.blocks),
            many.statements,
        ));
        authored.push((K::ExprStatement, vec![EXPR, NoWrap, tok(K::Semi), End], false));

        // A non-block then-branch closes its run at `else`
        let after_body = if wrap.statement_body == WrapPolicy::No {
            wrap_step(wrap.else_)
        } else {
            Step::Unindent
        };
        let mut if_stmt = condition(K::KwIf);
        if_stmt.extend([
            Fork(0),
            body_step,
            ANY,
            Fork(2),
            after_body,
            tok(K::KwElse),
            Branch(3),
            Label(0),
            brace,
            tok(K::Block),
            Fork(2),
            wrap_step(wrap.else_),
            tok(K::KwElse),
            Label(3),
            Fork(4),
            Fork(5),
            body_step,
            ANY,
            Branch(2),
            Label(4),
            NoWrap,
            tok(K::IfStatement),
            Branch(2),
            Label(5),
            brace,
            tok(K::Block),
            Label(2),
            End,
        ]);
        authored.push((K::IfStatement, if_stmt, false));

        let mut for_stmt = vec![
            tok(K::KwFor),
            NoWrap,
            tok(K::LParen),
            Fork(0),
            NoWrap,
            ANY,
            Label(0),
            NoWrap,
            tok(K::Semi),
            Fork(1),
            MayIndent,
            EXPR,
            Label(1),
            NoWrap,
            tok(K::Semi),
            Fork(2),
            MayIndent,
            EXPR,
            Label(2),
            NoWrap,
            tok(K::RParen),
            // the header run is over; the body starts its own
            Step::EndRun,
        ];
        statement_body(&mut for_stmt, 3, 4);
        for_stmt.push(End);
        authored.push((K::ForStatement, for_stmt, false));

        let mut for_each = vec![
            tok(K::KwFor),
            NoWrap,
            tok(K::LParen),
            NoWrap,
            tok(K::Parameter),
            NoWrap,
            tok(K::Colon),
            MayIndent,
            EXPR,
            NoWrap,
            tok(K::RParen),
            Step::EndRun,
        ];
        statement_body(&mut for_each, 0, 1);
        for_each.push(End);
        authored.push((K::ForEachStatement, for_each, false));

        let mut while_stmt = condition(K::KwWhile);
        statement_body(&mut while_stmt, 0, 1);
        while_stmt.push(End);
        authored.push((K::WhileStatement, while_stmt, false));

        let mut do_stmt = vec![tok(K::KwDo)];
        statement_body(&mut do_stmt, 0, 1);
        do_stmt.extend([wrap_step(wrap.do_while), tok(K::KwWhile), NoWrap, tok(K::LParen)]);
        do_stmt.extend([NoWrap, EXPR, NoWrap, tok(K::RParen), NoWrap, tok(K::Semi), End]);
        authored.push((K::DoStatement, do_stmt, false));

        authored.push((
            K::TryStatement,
            vec![
                tok(K::KwTry),
                brace,
                tok(K::Block),
                Label(0),
                Fork(1),
                wrap_step(wrap.catch),
                tok(K::CatchClause),
                Branch(0),
                Label(1),
                Optional,
                wrap_step(wrap.finally),
                tok(K::FinallyClause),
                End,
            ],
            false,
        ));
        authored.push((
            K::CatchClause,
            vec![
                tok(K::KwCatch),
                NoWrap,
                tok(K::LParen),
                NoWrap,
                tok(K::Parameter),
                NoWrap,
                tok(K::RParen),
                brace,
                tok(K::Block),
                End,
            ],
            false,
        ));
        authored.push((K::FinallyClause, vec![tok(K::KwFinally), brace, tok(K::Block), End], false));

        let mut switch = condition(K::KwSwitch);
        switch.push(brace);
        switch.extend(body(
            K::LBrace,
            K::RBrace,
            tok(K::SwitchCase),
            one_line.switch_bodies,
        ));
        authored.push((K::SwitchStatement, switch, many.case_groups));
        authored.push((
            K::SwitchCase,
            vec![
                Fork(0),
                tok(K::KwCase),
                NoWrap,
                EXPR,
                NoWrap,
                tok(K::Colon),
                Branch(1),
                Label(0),
                tok(K::KwDefault),
                NoWrap,
                tok(K::Colon),
                Label(1),
                Fork(2),
                MayIndent,
                ANY,
                Branch(1),
                Label(2),
                End,
            ],
            many.statements,
        ));

        authored.push((
            K::ReturnStatement,
            vec![tok(K::KwReturn), Optional, NoWrap, EXPR, NoWrap, tok(K::Semi), End],
            false,
        ));
        authored.push((
            K::ThrowStatement,
            vec![tok(K::KwThrow), NoWrap, EXPR, NoWrap, tok(K::Semi), End],
            false,
        ));
        for (kind, keyword) in [(K::BreakStatement, K::KwBreak), (K::ContinueStatement, K::KwContinue)] {
            authored.push((
                kind,
                vec![tok(keyword), Optional, NoWrap, tok(K::Identifier), NoWrap, tok(K::Semi), End],
                false,
            ));
        }
        let mut synchronized = condition(K::KwSynchronized);
        synchronized.extend([brace, tok(K::Block), End]);
        authored.push((K::SynchronizedStatement, synchronized, false));
        authored.push((K::EmptyStatement, vec![tok(K::Semi), End], false));

        authored.push((
            K::ArrayInitializer,
            list(
                K::LBrace,
                K::RBrace,
                EXPR,
                WrapPolicy::May,
                wrap.closing_paren,
                true,
            ),
            many.array_elements,
        ));
        authored.push((
            K::Arguments,
            list(
                K::LParen,
                K::RParen,
                EXPR,
                wrap.arguments,
                wrap.closing_paren,
                false,
            ),
            many.arguments,
        ));

        let mut programs = HashMap::new();
        for (kind, steps, multiple) in authored {
            programs.insert(kind, Program::new(kind, steps, multiple)?);
        }
        log::debug!("instantiated {} construct programs", programs.len());
        Ok(Self { programs })
    }

    pub fn get(&self, kind: K) -> Option<&Program> {
        self.programs.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Programs ordered by construct kind
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        let mut programs: Vec<&Program> = self.programs.values().collect();
        programs.sort_by_key(|p| p.kind());
        programs.into_iter()
    }
}

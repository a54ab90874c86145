//! Recursive-descent parser with panic-mode recovery.
//!
//! Every grammar rule is a method on [`Parser`] that builds and returns its
//! own AST node. The rules are spread across three files mirroring the
//! grammar's layers:
//!
//! - [`decl`] — compilation unit, imports, structures, functions
//! - [`stmt`] — block, simple, and compound statements
//! - [`expr`] — the expression precedence cascade
//!
//! ## Recovery
//!
//! Before invoking a child rule that may fail, a rule pushes the terminals
//! it expects *after* the child onto the follow stack — through the RAII
//! [`FollowScope`] guard, so early returns cannot desynchronize the stack.
//! On a mismatch the parser reports one `UNEXPECTED_TOKEN` diagnostic
//! (suppressed while already recovering), then discards tokens until it
//! sees end-of-stream or any kind on the follow stack, scanning the stack
//! top-down so the innermost rule resynchronizes first. The next successful
//! match clears the recovery flag, so each recovery window reports exactly
//! one diagnostic.
//!
//! ## Lookahead
//!
//! The grammar is predictive except for one `LA(3)` decision: a simple
//! statement opens a variable declaration when it starts with `var`/`let`,
//! or with `IDENTIFIER IDENTIFIER`, or with `IDENTIFIER '[' ']'`; anything
//! else is an expression statement.

mod decl;
mod expr;
mod stmt;

#[cfg(test)]
mod tests;

use crate::ast::{CompilationUnit, NodeId};
use crate::diagnostics::{DiagnosticCode, DiagnosticSink};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};
use kush_base::Interner;
use std::ops::{Deref, DerefMut};

pub struct Parser<'a> {
    tokens: TokenStream,
    pub(crate) interner: &'a mut Interner,
    sink: &'a mut DiagnosticSink,
    follow_set: Vec<TokenKind>,
    recovery: bool,
    next_node_id: u32,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: TokenStream,
        interner: &'a mut Interner,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        Parser {
            tokens,
            interner,
            sink,
            follow_set: Vec::with_capacity(16),
            recovery: false,
            next_node_id: 0,
        }
    }

    /// Parses one compilation unit to end-of-stream.
    pub fn parse(&mut self) -> CompilationUnit {
        self.parse_compilation_unit()
    }

    pub(crate) fn node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub(crate) fn la(&mut self, k: usize) -> TokenKind {
        self.tokens.la(k)
    }

    pub(crate) fn lt(&mut self, k: usize) -> Token {
        self.tokens.lt(k)
    }

    pub(crate) fn consume(&mut self) {
        self.tokens.consume();
    }

    pub(crate) fn consume_and_yield(&mut self) -> Token {
        let token = self.tokens.lt(1);
        self.tokens.consume();
        token
    }

    /// Reports a syntax error and discards tokens until a follow token or
    /// end-of-stream is seen. The panic-mode strategy: control then returns
    /// to the calling rule, which finds its expected terminal next.
    fn recover(&mut self) {
        self.recovery = true;

        if self.follow_set.is_empty() {
            return;
        }

        'discard: loop {
            let la1 = self.tokens.la(1);
            if la1 == TokenKind::EndOfStream {
                break;
            }
            // Tokens expected by the nearest active rule win, hence the
            // top-down scan.
            for &kind in self.follow_set.iter().rev() {
                if la1 == kind {
                    break 'discard;
                }
            }
            self.tokens.consume();
        }
    }

    pub(crate) fn report_and_recover(&mut self, expected: TokenKind) {
        // A diagnostic inside a recovery window would duplicate the one
        // that opened it.
        if !self.recovery {
            let lt1 = self.tokens.lt(1);
            self.sink
                .syntactic(DiagnosticCode::UnexpectedToken, &lt1, Some(expected));
        }
        self.recover();
    }

    /// Reports a contextual syntactic violation the follow-token mechanism
    /// cannot catch, without entering recovery.
    pub(crate) fn report_contextual(&mut self, code: DiagnosticCode, token: &Token) {
        self.sink.syntactic(code, token, None);
    }

    /// Matches the expected kind, consuming on success.
    ///
    /// On success the recovery flag clears. On failure the parser reports
    /// and recovers; the returned token is the mismatched lookahead, so
    /// callers always have a token to anchor spans on.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Token {
        let lt1 = self.tokens.lt(1);
        if lt1.kind == kind {
            self.recovery = false;
            // The token stream prohibits consuming end-of-stream.
            if lt1.kind != TokenKind::EndOfStream {
                self.tokens.consume();
            }
        } else {
            self.report_and_recover(kind);
        }
        lt1
    }

    /// Matches any of the expected kinds, consuming on success.
    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Token {
        let lt1 = self.tokens.lt(1);
        if kinds.contains(&lt1.kind) {
            self.recovery = false;
            if lt1.kind != TokenKind::EndOfStream {
                self.tokens.consume();
            }
        } else {
            self.report_and_recover(kinds[0]);
        }
        lt1
    }

    /// Pushes follow tokens for the duration of the returned guard.
    pub(crate) fn follow<'p>(&'p mut self, kinds: &[TokenKind]) -> FollowScope<'p, 'a> {
        for &kind in kinds {
            self.follow_set.push(kind);
        }
        FollowScope {
            count: kinds.len(),
            parser: self,
        }
    }
}

/// Scoped handle that pops its follow tokens when dropped.
///
/// Rules access the parser through the guard (`Deref`/`DerefMut`), so an
/// early return inside a rule still unwinds the follow stack correctly.
pub struct FollowScope<'p, 'a> {
    parser: &'p mut Parser<'a>,
    count: usize,
}

impl<'p, 'a> Drop for FollowScope<'p, 'a> {
    fn drop(&mut self) {
        for _ in 0..self.count {
            self.parser.follow_set.pop();
        }
    }
}

impl<'p, 'a> Deref for FollowScope<'p, 'a> {
    type Target = Parser<'a>;
    fn deref(&self) -> &Self::Target {
        self.parser
    }
}

impl<'p, 'a> DerefMut for FollowScope<'p, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.parser
    }
}

/// Types acceptable where a value type is required.
pub(crate) const TYPE_TOKENS: &[TokenKind] = &[
    TokenKind::KeywordBoolean,
    TokenKind::KeywordI8,
    TokenKind::KeywordI16,
    TokenKind::KeywordI32,
    TokenKind::KeywordI64,
    TokenKind::KeywordF32,
    TokenKind::KeywordF64,
    TokenKind::Identifier,
];

/// Types acceptable as a return type; adds `void`.
pub(crate) const RETURN_TYPE_TOKENS: &[TokenKind] = &[
    TokenKind::KeywordBoolean,
    TokenKind::KeywordI8,
    TokenKind::KeywordI16,
    TokenKind::KeywordI32,
    TokenKind::KeywordI64,
    TokenKind::KeywordF32,
    TokenKind::KeywordF64,
    TokenKind::KeywordVoid,
    TokenKind::Identifier,
];

pub(crate) fn is_type(kind: TokenKind) -> bool {
    TYPE_TOKENS.contains(&kind)
}

pub(crate) fn is_return_type(kind: TokenKind) -> bool {
    RETURN_TYPE_TOKENS.contains(&kind)
}

pub(crate) fn is_component_follow(kind: TokenKind) -> bool {
    kind == TokenKind::KeywordStruct || kind == TokenKind::KeywordStatic || is_return_type(kind)
}

pub(crate) fn is_layout(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline | TokenKind::Indentation | TokenKind::Dedentation
    )
}

pub(crate) fn is_simple_statement_follow(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::KeywordVar
            | TokenKind::KeywordLet
            | TokenKind::KeywordBreak
            | TokenKind::KeywordReturn
            | TokenKind::KeywordThrow
    ) || is_expression_follow(kind)
}

pub(crate) fn is_compound_statement_follow(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KeywordIf
            | TokenKind::Hash
            | TokenKind::KeywordWhile
            | TokenKind::KeywordFor
            | TokenKind::KeywordTry
    )
}

pub(crate) fn is_statement_follow(kind: TokenKind) -> bool {
    is_simple_statement_follow(kind) || is_compound_statement_follow(kind)
}

pub(crate) fn is_expression_follow(kind: TokenKind) -> bool {
    is_unary_operator(kind) || is_primary_expression_follow(kind)
}

pub(crate) fn is_assignment_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::AsteriskEqual
            | TokenKind::ForwardSlashEqual
            | TokenKind::ModulusEqual
            | TokenKind::PlusEqual
            | TokenKind::DashEqual
            | TokenKind::LeftAngleBracket2Equal
            | TokenKind::RightAngleBracket2Equal
            | TokenKind::RightAngleBracket3Equal
            | TokenKind::AmpersandEqual
            | TokenKind::CaretEqual
            | TokenKind::VerticalBarEqual
    )
}

pub(crate) fn is_equality_operator(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Equal2 | TokenKind::ExclamationMarkEqual)
}

pub(crate) fn is_relational_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftAngleBracket
            | TokenKind::RightAngleBracket
            | TokenKind::LeftAngleBracketEqual
            | TokenKind::RightAngleBracketEqual
    )
}

pub(crate) fn is_shift_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftAngleBracket2
            | TokenKind::RightAngleBracket2
            | TokenKind::RightAngleBracket3
    )
}

pub(crate) fn is_additive_operator(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Plus | TokenKind::Dash)
}

pub(crate) fn is_multiplicative_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Asterisk | TokenKind::ForwardSlash | TokenKind::Modulus
    )
}

pub(crate) fn is_unary_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus | TokenKind::Dash | TokenKind::Tilde | TokenKind::ExclamationMark
    )
}

pub(crate) fn is_postfix_part_follow(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftSquareBracket | TokenKind::LeftParenthesis | TokenKind::Dot
    )
}

pub(crate) fn is_literal(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntegerLiteral
            | TokenKind::FloatingPointLiteral
            | TokenKind::StringLiteral
            | TokenKind::KeywordTrue
            | TokenKind::KeywordFalse
            | TokenKind::KeywordNull
            | TokenKind::KeywordThis
    )
}

pub(crate) fn is_primary_expression_follow(kind: TokenKind) -> bool {
    is_literal(kind)
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::LeftParenthesis
                | TokenKind::LeftBrace
                | TokenKind::LeftSquareBracket
                | TokenKind::KeywordNew
        )
}

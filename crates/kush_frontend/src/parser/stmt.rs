//! Statement rules: blocks, simple statements, and compound statements.

use super::{
    is_compound_statement_follow, is_expression_follow, is_simple_statement_follow,
    is_statement_follow, Parser,
};
use crate::ast::{
    BlockStatement, BreakStatement, CatchClause, IfClause, IfStatement, IterativeKind,
    IterativeStatement, ReturnStatement, Statement, StorageKind, ThrowStatement, TryStatement,
    VariableDeclaration,
};
use crate::diagnostics::DiagnosticCode;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// ```text
    /// blockStatement
    /// :    '{' statement* '}'
    /// ;
    /// ```
    pub(crate) fn parse_block_statement(&mut self) -> BlockStatement {
        let id = self.node_id();

        let start = self.match_token(TokenKind::LeftBrace);
        // If a statement fails, discard tokens until the closing brace.
        let mut guard = self.follow(&[TokenKind::RightBrace]);

        let mut statements = Vec::new();
        while is_statement_follow(guard.la(1)) {
            let la1 = guard.la(1);
            if is_simple_statement_follow(la1) {
                if let Some(statement) = guard.parse_simple_statement() {
                    statements.push(statement);
                }
            } else if is_compound_statement_follow(la1) {
                statements.push(guard.parse_compound_statement());
            }
        }

        drop(guard);
        let stop = self.match_token(TokenKind::RightBrace);

        BlockStatement {
            id,
            statements,
            span: start.span.merge(stop.span),
        }
    }

    /// ```text
    /// simpleStatement
    /// :    (variableDeclaration | expression | breakStatement
    ///      | returnStatement | throwStatement)? ';'
    /// ;
    /// ```
    ///
    /// Returns `None` for the empty statement, which has no node.
    pub(crate) fn parse_simple_statement(&mut self) -> Option<Statement> {
        let mut guard = self.follow(&[TokenKind::Semicolon]);

        let la1 = guard.la(1);
        let statement = if guard.follows_variable_declaration() {
            Some(Statement::Variable(guard.parse_variable_declaration()))
        } else if is_expression_follow(la1) {
            Some(Statement::Expression(guard.parse_expression()))
        } else {
            match la1 {
                TokenKind::Semicolon => None,
                TokenKind::KeywordBreak => Some(guard.parse_break_statement()),
                TokenKind::KeywordReturn => Some(guard.parse_return_statement()),
                TokenKind::KeywordThrow => Some(guard.parse_throw_statement()),
                _ => None,
            }
        };

        drop(guard);
        self.match_token(TokenKind::Semicolon);

        statement
    }

    /// The parser's one `LA(3)` decision.
    ///
    /// ```text
    /// followVariableDeclaration
    /// :    'let'
    /// |    'var'
    /// |    IDENTIFIER (('[' ']') | IDENTIFIER)
    /// ;
    /// ```
    fn follows_variable_declaration(&mut self) -> bool {
        let la1 = self.la(1);
        la1 == TokenKind::KeywordLet
            || la1 == TokenKind::KeywordVar
            || (la1 == TokenKind::Identifier
                && ((self.la(2) == TokenKind::LeftSquareBracket
                    && self.la(3) == TokenKind::RightSquareBracket)
                    || self.la(2) == TokenKind::Identifier))
    }

    /// ```text
    /// variableDeclaration
    /// :    ('var' | 'let' | type) variableDeclarator (',' variableDeclarator)*
    /// ;
    /// ```
    pub(crate) fn parse_variable_declaration(&mut self) -> VariableDeclaration {
        let la1 = self.la(1);
        let start = self.lt(1).span;

        let kind = match la1 {
            TokenKind::KeywordVar => {
                self.consume();
                StorageKind::Inferred
            }
            TokenKind::KeywordLet => {
                self.consume();
                StorageKind::Constant
            }
            _ => StorageKind::Typed(self.parse_type()),
        };

        let mut declarators = Vec::new();
        declarators.push(self.parse_storage_declarator());

        while self.la(1) == TokenKind::Comma {
            self.consume();
            declarators.push(self.parse_storage_declarator());
        }

        let span = declarators
            .last()
            .map(|d| {
                d.initializer
                    .as_ref()
                    .map(|e| e.span())
                    .unwrap_or(d.identifier.span)
            })
            .map(|s| start.merge(s))
            .unwrap_or(start);

        VariableDeclaration {
            kind,
            declarators,
            span,
        }
    }

    /// ```text
    /// breakStatement
    /// :    'break' IDENTIFIER?
    /// ;
    /// ```
    fn parse_break_statement(&mut self) -> Statement {
        let keyword = self.match_token(TokenKind::KeywordBreak);

        let mut label = None;
        if self.la(1) == TokenKind::Identifier {
            label = Some(self.consume_and_yield());
        }

        let span = label.map(|t| keyword.span.merge(t.span)).unwrap_or(keyword.span);
        Statement::Break(BreakStatement {
            keyword,
            label,
            span,
        })
    }

    /// ```text
    /// returnStatement
    /// :    'return' expression
    /// ;
    /// ```
    fn parse_return_statement(&mut self) -> Statement {
        let keyword = self.match_token(TokenKind::KeywordReturn);
        let expression = self.parse_expression();
        let span = keyword.span.merge(expression.span());
        Statement::Return(ReturnStatement {
            keyword,
            expression,
            span,
        })
    }

    /// ```text
    /// throwStatement
    /// :    'throw' expression?
    /// ;
    /// ```
    fn parse_throw_statement(&mut self) -> Statement {
        let keyword = self.match_token(TokenKind::KeywordThrow);

        let mut expression = None;
        if is_expression_follow(self.la(1)) {
            expression = Some(self.parse_expression());
        }

        let span = expression
            .as_ref()
            .map(|e| keyword.span.merge(e.span()))
            .unwrap_or(keyword.span);
        Statement::Throw(ThrowStatement {
            keyword,
            expression,
            span,
        })
    }

    /// ```text
    /// compoundStatement
    /// :    ifStatement
    /// |    iterativeStatement
    /// |    tryStatement
    /// ;
    /// ```
    pub(crate) fn parse_compound_statement(&mut self) -> Statement {
        match self.la(1) {
            TokenKind::KeywordIf => self.parse_if_statement(),
            TokenKind::Hash | TokenKind::KeywordWhile | TokenKind::KeywordFor => {
                self.parse_iterative_statement()
            }
            _ => self.parse_try_statement(),
        }
    }

    /// ```text
    /// ifStatement
    /// :    ifClause elseIfClause* elseClause?
    /// ;
    /// ```
    fn parse_if_statement(&mut self) -> Statement {
        let if_clause = self.parse_if_clause(false);

        let mut else_if_clauses = Vec::new();
        while self.la(1) == TokenKind::KeywordElse && self.la(2) == TokenKind::KeywordIf {
            else_if_clauses.push(self.parse_if_clause(true));
        }

        let mut else_clause = None;
        if self.la(1) == TokenKind::KeywordElse {
            self.consume();
            else_clause = Some(self.parse_block_statement());
        }

        let mut span = if_clause.span;
        if let Some(clause) = else_if_clauses.last() {
            span = span.merge(clause.span);
        }
        if let Some(block) = &else_clause {
            span = span.merge(block.span);
        }

        Statement::If(IfStatement {
            if_clause,
            else_if_clauses,
            else_clause,
            span,
        })
    }

    /// ```text
    /// ifClause      :    'if' expression blockStatement ;
    /// elseIfClause  :    'else' 'if' expression blockStatement ;
    /// ```
    fn parse_if_clause(&mut self, else_if: bool) -> IfClause {
        if else_if {
            self.match_token(TokenKind::KeywordElse);
        }
        let keyword = self.match_token(TokenKind::KeywordIf);
        let condition = self.parse_expression();
        let body = self.parse_block_statement();
        let span = keyword.span.merge(body.span);

        IfClause {
            keyword,
            condition,
            body,
            span,
        }
    }

    /// ```text
    /// iterativeStatement
    /// :    labelClause? (whileStatement | forStatement)
    /// ;
    ///
    /// labelClause     :    '#' IDENTIFIER ;
    /// whileStatement  :    'while' expression blockStatement ;
    /// forStatement    :    'for' 'let' IDENTIFIER ':' expression blockStatement ;
    /// ```
    fn parse_iterative_statement(&mut self) -> Statement {
        let mut start = None;
        let mut label = None;
        if self.la(1) == TokenKind::Hash {
            let hash = self.consume_and_yield();
            start = Some(hash.span);
            label = Some(self.match_token(TokenKind::Identifier));
        }

        let (kind, body) = match self.la(1) {
            TokenKind::KeywordWhile => {
                let keyword = self.consume_and_yield();
                let condition = self.parse_expression();
                let body = self.parse_block_statement();
                (IterativeKind::While { keyword, condition }, body)
            }
            TokenKind::KeywordFor => {
                let keyword = self.consume_and_yield();
                self.match_token(TokenKind::KeywordLet);
                let parameter = self.match_token(TokenKind::Identifier);
                self.match_token(TokenKind::Colon);
                let sequence = self.parse_expression();
                let body = self.parse_block_statement();
                (
                    IterativeKind::For {
                        keyword,
                        parameter,
                        sequence,
                    },
                    body,
                )
            }
            _ => {
                self.report_and_recover(TokenKind::KeywordWhile);
                let keyword = self.lt(1);
                let body = self.parse_block_statement();
                (
                    IterativeKind::While {
                        keyword,
                        condition: crate::ast::Expression::Error(keyword),
                    },
                    body,
                )
            }
        };

        let keyword_span = match &kind {
            IterativeKind::While { keyword, .. } => keyword.span,
            IterativeKind::For { keyword, .. } => keyword.span,
        };
        let span = start.unwrap_or(keyword_span).merge(body.span);

        Statement::Iterative(IterativeStatement {
            label,
            kind,
            body,
            span,
        })
    }

    /// ```text
    /// tryStatement
    /// :    'try' blockStatement catchClause* finallyClause?
    /// ;
    /// ```
    ///
    /// A bare try block is grammatical but the language requires at least
    /// one catch or finally clause; that contextual rule is checked here
    /// because no follow token can express it.
    fn parse_try_statement(&mut self) -> Statement {
        let keyword = self.match_token(TokenKind::KeywordTry);
        let try_clause = self.parse_block_statement();

        let mut catch_clauses = Vec::new();
        while self.la(1) == TokenKind::KeywordCatch {
            catch_clauses.push(self.parse_catch_clause());
        }

        let mut finally_clause = None;
        if self.la(1) == TokenKind::KeywordFinally {
            self.consume();
            finally_clause = Some(self.parse_block_statement());
        }

        if catch_clauses.is_empty() && finally_clause.is_none() {
            self.report_contextual(
                DiagnosticCode::TryStatementExpectsCatchOrFinally,
                &keyword,
            );
        }

        let mut span = keyword.span.merge(try_clause.span);
        if let Some(clause) = catch_clauses.last() {
            span = span.merge(clause.span);
        }
        if let Some(block) = &finally_clause {
            span = span.merge(block.span);
        }

        Statement::Try(TryStatement {
            keyword,
            try_clause,
            catch_clauses,
            finally_clause,
            span,
        })
    }

    /// ```text
    /// catchClause
    /// :    'catch' catchFilter? IDENTIFIER blockStatement
    /// ;
    ///
    /// catchFilter
    /// :    (STRING_LITERAL | IDENTIFIER) ('|' (STRING_LITERAL | IDENTIFIER))*
    /// ;
    /// ```
    fn parse_catch_clause(&mut self) -> CatchClause {
        const FILTER_TOKENS: &[TokenKind] = &[TokenKind::StringLiteral, TokenKind::Identifier];

        let keyword = self.match_token(TokenKind::KeywordCatch);

        let mut captures = Vec::new();
        if self.la(1) == TokenKind::StringLiteral
            || (self.la(1) == TokenKind::Identifier
                && matches!(
                    self.la(2),
                    TokenKind::Identifier | TokenKind::VerticalBar
                ))
        {
            captures.push(self.match_any(FILTER_TOKENS));
            while self.la(1) == TokenKind::VerticalBar {
                self.consume();
                captures.push(self.match_any(FILTER_TOKENS));
            }
        }

        let parameter = self.match_token(TokenKind::Identifier);
        let body = self.parse_block_statement();
        let span = keyword.span.merge(body.span);

        CatchClause {
            keyword,
            captures,
            parameter,
            body,
            span,
        }
    }
}

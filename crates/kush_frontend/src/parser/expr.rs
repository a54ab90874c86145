//! The expression precedence cascade.
//!
//! ```text
//! expression -> assignment -> conditional -> logicalOr -> logicalAnd
//! -> inclusiveOr -> exclusiveOr -> and -> equality -> relational
//! -> shift -> additive -> multiplicative -> unary -> postfix -> primary
//! ```
//!
//! Left-associative levels share one chain helper that records every
//! `(operator, operand)` pair, so the tree preserves evaluation order.

use super::{
    is_additive_operator, is_assignment_operator, is_equality_operator, is_expression_follow,
    is_literal, is_multiplicative_operator, is_postfix_part_follow,
    is_primary_expression_follow, is_relational_operator, is_shift_operator, is_unary_operator,
    Parser,
};
use crate::ast::{
    ArrayExpression, AssignmentExpression, BinaryExpression, ConditionalExpression, Expression,
    FunctionArguments, GroupedExpression, InitializerExpression, MemberAccess, NewExpression,
    PostfixExpression, PostfixPart, Subscript, UnaryExpression,
};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    /// ```text
    /// expression
    /// :    assignmentExpression
    /// ;
    /// ```
    pub(crate) fn parse_expression(&mut self) -> Expression {
        self.parse_assignment_expression()
    }

    /// ```text
    /// expressions
    /// :    expression (',' expression)*
    /// ;
    /// ```
    fn parse_expressions(&mut self) -> Vec<Expression> {
        let mut expressions = vec![self.parse_expression()];
        while self.la(1) == TokenKind::Comma {
            self.consume();
            expressions.push(self.parse_expression());
        }
        expressions
    }

    /// ```text
    /// assignmentExpression
    /// :    conditionalExpression (assignmentOperator assignmentExpression)?
    /// ;
    /// ```
    fn parse_assignment_expression(&mut self) -> Expression {
        let left = self.parse_conditional_expression();

        if is_assignment_operator(self.la(1)) {
            let operator = self.consume_and_yield();
            let right = self.parse_assignment_expression();
            let span = left.span().merge(right.span());
            return Expression::Assignment(AssignmentExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span,
            });
        }

        left
    }

    /// ```text
    /// conditionalExpression
    /// :    logicalOrExpression ('?' expression ':' conditionalExpression)?
    /// ;
    /// ```
    fn parse_conditional_expression(&mut self) -> Expression {
        let condition = self.parse_logical_or_expression();

        if self.la(1) == TokenKind::Hook {
            self.consume();
            let then_expression = self.parse_expression();
            self.match_token(TokenKind::Colon);
            let else_expression = self.parse_conditional_expression();
            let span = condition.span().merge(else_expression.span());
            return Expression::Conditional(ConditionalExpression {
                condition: Box::new(condition),
                then_expression: Box::new(then_expression),
                else_expression: Box::new(else_expression),
                span,
            });
        }

        condition
    }

    /// Parses one left-associative level: `next (op next)*`.
    ///
    /// A chain without operators collapses to its single operand.
    fn parse_left_chain(
        &mut self,
        next: fn(&mut Self) -> Expression,
        is_operator: fn(TokenKind) -> bool,
    ) -> Expression {
        let left = next(self);

        if !is_operator(self.la(1)) {
            return left;
        }

        let mut rest = Vec::new();
        while is_operator(self.la(1)) {
            let operator = self.consume_and_yield();
            let operand = next(self);
            rest.push((operator, operand));
        }

        let span = rest
            .last()
            .map(|(_, operand)| left.span().merge(operand.span()))
            .unwrap_or_else(|| left.span());

        Expression::Binary(BinaryExpression {
            left: Box::new(left),
            rest,
            span,
        })
    }

    fn parse_logical_or_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_logical_and_expression, |k| {
            k == TokenKind::VerticalBar2
        })
    }

    fn parse_logical_and_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_inclusive_or_expression, |k| {
            k == TokenKind::Ampersand2
        })
    }

    fn parse_inclusive_or_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_exclusive_or_expression, |k| {
            k == TokenKind::VerticalBar
        })
    }

    fn parse_exclusive_or_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_and_expression, |k| k == TokenKind::Caret)
    }

    fn parse_and_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_equality_expression, |k| {
            k == TokenKind::Ampersand
        })
    }

    fn parse_equality_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_relational_expression, is_equality_operator)
    }

    fn parse_relational_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_shift_expression, is_relational_operator)
    }

    fn parse_shift_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_additive_expression, is_shift_operator)
    }

    fn parse_additive_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_multiplicative_expression, is_additive_operator)
    }

    fn parse_multiplicative_expression(&mut self) -> Expression {
        self.parse_left_chain(Self::parse_unary_expression, is_multiplicative_operator)
    }

    /// ```text
    /// unaryExpression
    /// :    unaryOperator unaryExpression
    /// |    postfixExpression
    /// ;
    /// ```
    fn parse_unary_expression(&mut self) -> Expression {
        let la1 = self.la(1);

        if is_unary_operator(la1) {
            let operator = self.consume_and_yield();
            let operand = self.parse_unary_expression();
            let span = operator.span.merge(operand.span());
            return Expression::Unary(UnaryExpression {
                operator,
                operand: Box::new(operand),
                span,
            });
        }

        if is_primary_expression_follow(la1) {
            return self.parse_postfix_expression();
        }

        self.report_and_recover(TokenKind::IntegerLiteral);
        Expression::Error(self.lt(1))
    }

    /// ```text
    /// postfixExpression
    /// :    primaryExpression postfixPart*
    /// ;
    ///
    /// postfixPart
    /// :    subscript
    /// |    functionArguments
    /// |    memberAccess
    /// ;
    /// ```
    fn parse_postfix_expression(&mut self) -> Expression {
        let primary = self.parse_primary_expression();

        if !is_postfix_part_follow(self.la(1)) {
            return primary;
        }

        let mut parts = Vec::new();
        loop {
            match self.la(1) {
                TokenKind::LeftSquareBracket => {
                    parts.push(PostfixPart::Subscript(self.parse_subscript()));
                }
                TokenKind::LeftParenthesis => {
                    parts.push(PostfixPart::Arguments(self.parse_function_arguments()));
                }
                TokenKind::Dot => {
                    parts.push(PostfixPart::MemberAccess(self.parse_member_access()));
                }
                _ => break,
            }
        }

        let span = match parts.last() {
            Some(PostfixPart::Subscript(s)) => primary.span().merge(s.span),
            Some(PostfixPart::Arguments(a)) => primary.span().merge(a.span),
            Some(PostfixPart::MemberAccess(m)) => primary.span().merge(m.identifier.span),
            None => primary.span(),
        };

        Expression::Postfix(PostfixExpression {
            primary: Box::new(primary),
            parts,
            span,
        })
    }

    /// ```text
    /// subscript
    /// :    '[' expression ']'
    /// ;
    /// ```
    fn parse_subscript(&mut self) -> Subscript {
        let bracket = self.match_token(TokenKind::LeftSquareBracket);
        let mut guard = self.follow(&[TokenKind::RightSquareBracket]);
        let index = guard.parse_expression();
        drop(guard);
        let stop = self.match_token(TokenKind::RightSquareBracket);

        Subscript {
            bracket,
            index,
            span: bracket.span.merge(stop.span),
        }
    }

    /// ```text
    /// functionArguments
    /// :    '(' expressions? ')'
    /// ;
    /// ```
    pub(crate) fn parse_function_arguments(&mut self) -> FunctionArguments {
        let parenthesis = self.match_token(TokenKind::LeftParenthesis);

        let mut expressions = Vec::new();
        if is_expression_follow(self.la(1)) {
            let mut guard = self.follow(&[TokenKind::RightParenthesis]);
            expressions = guard.parse_expressions();
        }

        let stop = self.match_token(TokenKind::RightParenthesis);

        FunctionArguments {
            parenthesis,
            expressions,
            span: parenthesis.span.merge(stop.span),
        }
    }

    /// ```text
    /// memberAccess
    /// :    '.' IDENTIFIER
    /// ;
    /// ```
    fn parse_member_access(&mut self) -> MemberAccess {
        let dot = self.match_token(TokenKind::Dot);
        let identifier = self.match_token(TokenKind::Identifier);
        MemberAccess { dot, identifier }
    }

    /// ```text
    /// primaryExpression
    /// :    IDENTIFIER
    /// |    literal
    /// |    '(' expression ')'
    /// |    initializerExpression
    /// |    arrayExpression
    /// |    newExpression
    /// ;
    /// ```
    fn parse_primary_expression(&mut self) -> Expression {
        let la1 = self.la(1);

        if is_literal(la1) {
            return Expression::Literal(self.consume_and_yield());
        }

        match la1 {
            TokenKind::Identifier => Expression::Identifier(self.consume_and_yield()),
            TokenKind::LeftParenthesis => {
                let start = self.consume_and_yield();
                let mut guard = self.follow(&[TokenKind::RightParenthesis]);
                let inner = guard.parse_expression();
                drop(guard);
                let stop = self.match_token(TokenKind::RightParenthesis);
                Expression::Grouped(GroupedExpression {
                    inner: Box::new(inner),
                    span: start.span.merge(stop.span),
                })
            }
            TokenKind::LeftBrace => self.parse_initializer_expression(),
            TokenKind::LeftSquareBracket => self.parse_array_expression(),
            TokenKind::KeywordNew => self.parse_new_expression(),
            _ => {
                self.report_and_recover(TokenKind::Identifier);
                Expression::Error(self.lt(1))
            }
        }
    }

    /// ```text
    /// initializerExpression
    /// :    '{' (initializerEntry (',' initializerEntry)*)? '}'
    /// ;
    ///
    /// initializerEntry
    /// :    IDENTIFIER ':' expression
    /// ;
    /// ```
    fn parse_initializer_expression(&mut self) -> Expression {
        let start = self.match_token(TokenKind::LeftBrace);
        let mut guard = self.follow(&[TokenKind::RightBrace]);

        let mut entries = Vec::new();
        if guard.la(1) == TokenKind::Identifier {
            loop {
                let key = guard.match_token(TokenKind::Identifier);
                guard.match_token(TokenKind::Colon);
                let value = guard.parse_expression();
                entries.push((key, value));

                if guard.la(1) != TokenKind::Comma {
                    break;
                }
                guard.consume();
            }
        }

        drop(guard);
        let stop = self.match_token(TokenKind::RightBrace);

        Expression::Initializer(InitializerExpression {
            entries,
            span: start.span.merge(stop.span),
        })
    }

    /// ```text
    /// arrayExpression
    /// :    '[' expressions? ']'
    /// ;
    /// ```
    fn parse_array_expression(&mut self) -> Expression {
        let start = self.match_token(TokenKind::LeftSquareBracket);

        let mut elements = Vec::new();
        if is_expression_follow(self.la(1)) {
            let mut guard = self.follow(&[TokenKind::RightSquareBracket]);
            elements = guard.parse_expressions();
        }

        let stop = self.match_token(TokenKind::RightSquareBracket);

        Expression::Array(ArrayExpression {
            elements,
            span: start.span.merge(stop.span),
        })
    }

    /// ```text
    /// newExpression
    /// :    'new' IDENTIFIER functionArguments?
    /// ;
    /// ```
    fn parse_new_expression(&mut self) -> Expression {
        let keyword = self.match_token(TokenKind::KeywordNew);
        let type_name = self.match_token(TokenKind::Identifier);

        let mut arguments = None;
        if self.la(1) == TokenKind::LeftParenthesis {
            arguments = Some(self.parse_function_arguments());
        }

        let span = arguments
            .as_ref()
            .map(|a| keyword.span.merge(a.span))
            .unwrap_or_else(|| keyword.span.merge(type_name.span));

        Expression::New(NewExpression {
            keyword,
            type_name,
            arguments,
            span,
        })
    }
}

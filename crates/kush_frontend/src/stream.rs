//! Buffered lookahead over the lexer's output.
//!
//! The parser never talks to the lexer directly; it peeks and consumes
//! through a [`TokenStream`], which filters hidden-channel tokens
//! (whitespace, comments) and keeps a small buffer of upcoming
//! default-channel tokens to satisfy the parser's `LA(3)` lookahead.
//!
//! Consuming past the `EndOfStream` token is prohibited: once the stream
//! reaches it, `la`/`lt` return it repeatedly and `consume` is a no-op.

use crate::token::{Channel, Token, TokenKind};
use std::collections::VecDeque;

/// A buffered, channel-filtered view over a unit's tokens.
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Index of the next unexamined token in `tokens`.
    cursor: usize,
    /// Indices of buffered default-channel tokens, in order.
    buffer: VecDeque<usize>,
}

impl TokenStream {
    /// Wraps the raw token list produced by the lexer.
    ///
    /// The list is expected to end with an `EndOfStream` token; the lexer
    /// always produces one.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            buffer: VecDeque::new(),
        }
    }

    /// Peeks the kind of the k-th (1-based) default-channel token.
    pub fn la(&mut self, k: usize) -> TokenKind {
        self.lt(k).kind
    }

    /// Peeks the k-th (1-based) default-channel token.
    pub fn lt(&mut self, k: usize) -> Token {
        debug_assert!(k >= 1, "lookahead is 1-based");
        self.fill(k);
        match self.buffer.get(k - 1) {
            Some(&index) => self.tokens[index],
            // Past the end: the buffer's last entry is the end-of-stream
            // token, which answers every deeper lookahead.
            None => self
                .buffer
                .back()
                .map(|&index| self.tokens[index])
                .unwrap_or_else(|| self.end_of_stream()),
        }
    }

    /// Advances past one default-channel token.
    ///
    /// Hidden tokens in between are skipped transparently. The end-of-stream
    /// token is never consumed.
    pub fn consume(&mut self) {
        self.fill(1);
        if let Some(&index) = self.buffer.front() {
            if self.tokens[index].kind != TokenKind::EndOfStream {
                self.buffer.pop_front();
            }
        }
    }

    /// Ensures the buffer holds `k` default-channel tokens, or as many as
    /// remain up to and including end-of-stream.
    fn fill(&mut self, k: usize) {
        while self.buffer.len() < k {
            let Some(token) = self.tokens.get(self.cursor) else {
                break;
            };
            let index = self.cursor;
            self.cursor += 1;
            if token.channel == Channel::Default {
                self.buffer.push_back(index);
                if token.kind == TokenKind::EndOfStream {
                    break;
                }
            }
        }
    }

    fn end_of_stream(&self) -> Token {
        // The lexer terminates every unit with an end-of-stream token; this
        // fallback only matters for an empty token list.
        self.tokens
            .last()
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::EndOfStream,
                text: kush_base::Name::EMPTY,
                channel: Channel::Default,
                span: kush_base::Span::default(),
                file: crate::token::FileId(0),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use crate::lexer::Lexer;
    use crate::token::FileId;
    use kush_base::Interner;

    fn stream_of(source: &str) -> (TokenStream, Interner) {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new();
        let tokens = Lexer::new(source, FileId(0), &mut interner, &mut sink).tokenize();
        (TokenStream::new(tokens), interner)
    }

    #[test]
    fn lookahead_skips_hidden_tokens() {
        let (mut stream, _) = stream_of("a /* gap */ b");
        assert_eq!(stream.la(1), TokenKind::Identifier);
        assert_eq!(stream.la(2), TokenKind::Identifier);
        assert_eq!(stream.la(3), TokenKind::EndOfStream);
    }

    #[test]
    fn lt_returns_token_values() {
        let (mut stream, interner) = stream_of("x = 1;");
        let token = stream.lt(1);
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(interner.resolve(token.text), "x");
        assert_eq!(stream.lt(2).kind, TokenKind::Equal);
    }

    #[test]
    fn consume_advances_one_default_token() {
        let (mut stream, _) = stream_of("a b c");
        stream.consume();
        assert_eq!(stream.la(1), TokenKind::Identifier);
        stream.consume();
        assert_eq!(stream.la(1), TokenKind::Identifier);
        stream.consume();
        assert_eq!(stream.la(1), TokenKind::EndOfStream);
    }

    #[test]
    fn end_of_stream_is_sticky() {
        let (mut stream, _) = stream_of("a");
        stream.consume();
        assert_eq!(stream.la(1), TokenKind::EndOfStream);
        stream.consume();
        stream.consume();
        assert_eq!(stream.la(1), TokenKind::EndOfStream);
        assert_eq!(stream.la(5), TokenKind::EndOfStream);
    }

    #[test]
    fn deep_lookahead_fills_lazily() {
        let (mut stream, _) = stream_of("a b c d e");
        assert_eq!(stream.la(5), TokenKind::Identifier);
        assert_eq!(stream.la(1), TokenKind::Identifier);
        assert_eq!(stream.la(6), TokenKind::EndOfStream);
    }
}

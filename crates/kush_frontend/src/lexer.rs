//! Hand-written lexer for KUSH source text.
//!
//! The lexer transforms a byte stream into a lazy sequence of [`Token`]s,
//! synthesizing layout tokens from a block-structured indentation model:
//!
//! - **Indentation**: leading spaces are measured against a stack of widths,
//!   emitting `Indentation`/`Dedentation` tokens as blocks deepen or close.
//! - **Enclosures**: while any `()`, `[]`, or `{}` pair is open, layout
//!   tokens are suppressed entirely.
//! - **Channels**: whitespace and comments are emitted on the hidden channel
//!   so the parser never observes them.
//!
//! A single recognition may raise a diagnostic (malformed escape, trailing
//! underscore, unterminated literal) without aborting tokenization; the
//! offending span is always attached to a token so downstream phases keep
//! going.
//!
//! ## Buffering
//!
//! Layout processing can produce several tokens from one newline (a newline,
//! then any number of dedentations), and the end of the stream may flush the
//! whole indentation stack at once. [`Lexer::next_token`] therefore drains an
//! internal queue that the recognition loop fills.

use crate::diagnostics::{DiagnosticCode, DiagnosticSink};
use crate::token::{keyword_kind, Channel, FileId, Token, TokenKind};
use kush_base::{Interner, Span};
use std::collections::VecDeque;

/// Converts KUSH source bytes into tokens.
pub struct Lexer<'s, 'a> {
    source: &'s [u8],
    interner: &'a mut Interner,
    sink: &'a mut DiagnosticSink,
    file: FileId,

    /// The lookahead byte, or `None` at end of stream.
    la1: Option<u8>,
    /// Number of bytes consumed so far.
    pos: usize,
    line: u32,
    column: u32,

    start_index: usize,
    start_line: u32,
    start_column: u32,

    kind: TokenKind,
    channel: Channel,
    error: Option<DiagnosticCode>,

    tokens: VecDeque<Token>,
    /// Stack of indentation widths; never holds zero entries.
    indentations: Vec<u32>,
    /// Depth of open `()`, `[]`, `{}` pairs.
    enclosures: u32,
    hit_end_of_stream: bool,
}

impl<'s, 'a> Lexer<'s, 'a> {
    pub fn new(
        source: &'s str,
        file: FileId,
        interner: &'a mut Interner,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        let bytes = source.as_bytes();
        Self {
            source: bytes,
            interner,
            sink,
            file,
            la1: bytes.first().copied(),
            pos: 0,
            line: 1,
            column: 1,
            start_index: 0,
            start_line: 1,
            start_column: 1,
            kind: TokenKind::Unknown,
            channel: Channel::Default,
            error: None,
            tokens: VecDeque::new(),
            indentations: Vec::new(),
            enclosures: 0,
            hit_end_of_stream: false,
        }
    }

    /// Tokenizes the whole input, ending with the `EndOfStream` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::EndOfStream;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Recognizes and returns the next token.
    ///
    /// Once the `EndOfStream` token has been produced, every further call
    /// returns another `EndOfStream` token.
    pub fn next_token(&mut self) -> Token {
        while self.tokens.is_empty() {
            self.begin_token();

            match self.la1 {
                None => {
                    if !self.indentations.is_empty() {
                        // The stream ended inside a block. Emit one imaginary
                        // newline so the last statement terminates, then
                        // unwind the indentation stack.
                        let newline = self.synthetic_token(TokenKind::Newline, "\n");
                        self.tokens.push_back(newline);
                        while !self.indentations.is_empty() {
                            let dedentation = self.synthetic_token(TokenKind::Dedentation, "");
                            self.tokens.push_back(dedentation);
                            self.indentations.pop();
                        }
                    }
                    self.kind = TokenKind::EndOfStream;
                    self.hit_end_of_stream = true;
                }

                Some(b' ') | Some(b'\r') | Some(b'\n') => {
                    if self.handle_whitespace_and_layout() {
                        continue;
                    }
                }

                Some(b'!') => {
                    self.consume();
                    if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::ExclamationMarkEqual;
                    } else {
                        self.kind = TokenKind::ExclamationMark;
                    }
                }

                Some(b'@') => {
                    self.consume();
                    self.kind = TokenKind::At;
                }

                Some(b'#') => {
                    self.consume();
                    self.kind = TokenKind::Hash;
                }

                Some(b'%') => {
                    self.consume();
                    if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::ModulusEqual;
                    } else {
                        self.kind = TokenKind::Modulus;
                    }
                }

                Some(b'&') => {
                    self.consume();
                    if self.la1 == Some(b'&') {
                        self.consume();
                        self.kind = TokenKind::Ampersand2;
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::AmpersandEqual;
                    } else {
                        self.kind = TokenKind::Ampersand;
                    }
                }

                Some(b'(') => {
                    self.consume();
                    self.kind = TokenKind::LeftParenthesis;
                    // Layout tokens inside an enclosure would derail the
                    // parser; mark this enclosure.
                    self.enclosures += 1;
                }

                Some(b')') => {
                    self.consume();
                    self.kind = TokenKind::RightParenthesis;
                    self.enclosures = self.enclosures.saturating_sub(1);
                }

                Some(b'*') => {
                    self.consume();
                    if self.la1 == Some(b'*') {
                        self.consume();
                        if self.la1 == Some(b'=') {
                            self.consume();
                            self.kind = TokenKind::Asterisk2Equal;
                        } else {
                            self.kind = TokenKind::Asterisk2;
                        }
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::AsteriskEqual;
                    } else {
                        self.kind = TokenKind::Asterisk;
                    }
                }

                Some(b'+') => {
                    self.consume();
                    if self.la1 == Some(b'+') {
                        self.consume();
                        self.kind = TokenKind::Plus2;
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::PlusEqual;
                    } else {
                        self.kind = TokenKind::Plus;
                    }
                }

                Some(b',') => {
                    self.consume();
                    self.kind = TokenKind::Comma;
                }

                Some(b'-') => {
                    self.consume();
                    if self.la1 == Some(b'-') {
                        self.consume();
                        self.kind = TokenKind::Dash2;
                    } else if self.la1 == Some(b'>') {
                        self.consume();
                        self.kind = TokenKind::Arrow;
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::DashEqual;
                    } else {
                        self.kind = TokenKind::Dash;
                    }
                }

                Some(b'.') => {
                    self.consume();
                    if self.la1 == Some(b'.') {
                        self.consume();
                        if self.la1 == Some(b'.') {
                            self.consume();
                            self.kind = TokenKind::Ellipsis;
                        } else {
                            self.kind = TokenKind::Dot2;
                        }
                    } else {
                        self.kind = TokenKind::Dot;
                    }
                }

                Some(b'/') => {
                    self.consume();
                    if self.la1 == Some(b'/') {
                        self.single_line_comment();
                    } else if self.la1 == Some(b'*') {
                        self.multi_line_comment();
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::ForwardSlashEqual;
                    } else {
                        self.kind = TokenKind::ForwardSlash;
                    }
                }

                Some(b':') => {
                    self.consume();
                    if self.la1 == Some(b':') {
                        self.consume();
                        self.kind = TokenKind::Colon2;
                    } else {
                        self.kind = TokenKind::Colon;
                    }
                }

                Some(b';') => {
                    self.consume();
                    self.kind = TokenKind::Semicolon;
                }

                Some(b'<') => {
                    self.consume();
                    if self.la1 == Some(b'<') {
                        self.consume();
                        if self.la1 == Some(b'=') {
                            self.consume();
                            self.kind = TokenKind::LeftAngleBracket2Equal;
                        } else {
                            self.kind = TokenKind::LeftAngleBracket2;
                        }
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::LeftAngleBracketEqual;
                    } else {
                        self.kind = TokenKind::LeftAngleBracket;
                    }
                }

                Some(b'>') => {
                    self.consume();
                    if self.la1 == Some(b'>') {
                        self.consume();
                        if self.la1 == Some(b'>') {
                            self.consume();
                            if self.la1 == Some(b'=') {
                                self.consume();
                                self.kind = TokenKind::RightAngleBracket3Equal;
                            } else {
                                self.kind = TokenKind::RightAngleBracket3;
                            }
                        } else if self.la1 == Some(b'=') {
                            self.consume();
                            self.kind = TokenKind::RightAngleBracket2Equal;
                        } else {
                            self.kind = TokenKind::RightAngleBracket2;
                        }
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::RightAngleBracketEqual;
                    } else {
                        self.kind = TokenKind::RightAngleBracket;
                    }
                }

                Some(b'=') => {
                    self.consume();
                    if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::Equal2;
                    } else {
                        self.kind = TokenKind::Equal;
                    }
                }

                Some(b'?') => {
                    self.consume();
                    self.kind = TokenKind::Hook;
                }

                Some(b'{') => {
                    self.consume();
                    self.kind = TokenKind::LeftBrace;
                    self.enclosures += 1;
                }

                Some(b'}') => {
                    self.consume();
                    self.kind = TokenKind::RightBrace;
                    self.enclosures = self.enclosures.saturating_sub(1);
                }

                Some(b'[') => {
                    self.consume();
                    self.kind = TokenKind::LeftSquareBracket;
                    self.enclosures += 1;
                }

                Some(b']') => {
                    self.consume();
                    self.kind = TokenKind::RightSquareBracket;
                    self.enclosures = self.enclosures.saturating_sub(1);
                }

                Some(b'^') => {
                    self.consume();
                    if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::CaretEqual;
                    } else {
                        self.kind = TokenKind::Caret;
                    }
                }

                Some(b'|') => {
                    self.consume();
                    if self.la1 == Some(b'|') {
                        self.consume();
                        self.kind = TokenKind::VerticalBar2;
                    } else if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::VerticalBarEqual;
                    } else {
                        self.kind = TokenKind::VerticalBar;
                    }
                }

                Some(b'~') => {
                    self.consume();
                    if self.la1 == Some(b'=') {
                        self.consume();
                        self.kind = TokenKind::TildeEqual;
                    } else {
                        self.kind = TokenKind::Tilde;
                    }
                }

                Some(quote @ b'"') | Some(quote @ b'\'') => {
                    self.string_literal(quote);
                }

                Some(byte) if is_identifier_start(byte) => {
                    self.identifier_or_keyword();
                }

                Some(byte) if is_decimal_digit(byte) => {
                    self.number_literal();
                }

                Some(_) => {
                    self.error = Some(DiagnosticCode::UnknownCharacter);
                    self.consume();
                    self.kind = TokenKind::Unknown;
                }
            }

            let token = self.create_token();
            self.tokens.push_back(token);

            // The lexer has no recovery strategy; whatever went wrong during
            // this recognition is recorded here, attached to the token.
            if let Some(code) = self.error.take() {
                self.sink.lexical(code, &token);
            }
        }

        // The queue is non-empty here by construction.
        self.tokens.pop_front().unwrap_or_else(|| self.synthetic_token(TokenKind::EndOfStream, ""))
    }

    fn begin_token(&mut self) {
        self.kind = TokenKind::Unknown;
        self.channel = Channel::Default;
        self.start_index = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
        self.error = None;
    }

    fn consume(&mut self) {
        self.pos += 1;
        self.column += 1;
        self.la1 = self.source.get(self.pos).copied();
    }

    fn on_newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn peek2(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    fn is_input_start(&self) -> bool {
        self.start_index == 0
    }

    /// Handles spaces, carriage returns, and newlines.
    ///
    /// Returns `true` when the caller should restart recognition because the
    /// consumed characters produced either nothing (blank line, enclosed
    /// newline) or layout tokens that were pushed directly onto the queue.
    /// Returns `false` when a hidden whitespace token should be created.
    fn handle_whitespace_and_layout(&mut self) -> bool {
        let mut indentation: u32 = 0;

        if self.la1 == Some(b' ') {
            while self.la1 == Some(b' ') {
                indentation += 1;
                self.consume();
            }
            if !self.is_input_start() {
                self.kind = TokenKind::Whitespace;
                self.channel = Channel::Hidden;
                return false;
            }
        } else {
            if self.la1 == Some(b'\r') {
                self.consume();
                if self.la1 == Some(b'\n') {
                    self.consume();
                }
            } else {
                self.consume();
            }
            self.on_newline();

            while self.la1 == Some(b' ') {
                indentation += 1;
                self.consume();
            }
        }

        // Inside an enclosure, on a blank line, or on a line holding only a
        // comment, the layout model stays silent.
        let blank = matches!(self.la1, Some(b'\r') | Some(b'\n'));
        let comment_line = self.la1 == Some(b'/')
            && matches!(self.peek2(), Some(b'/') | Some(b'*'));
        if self.enclosures > 0 || blank || comment_line {
            return true;
        }

        let newline = self.synthetic_token(TokenKind::Newline, "\n");
        self.tokens.push_back(newline);

        let previous = self.indentations.last().copied().unwrap_or(0);
        if indentation > previous {
            self.indentations.push(indentation);
            let token = self.synthetic_token(TokenKind::Indentation, "");
            self.tokens.push_back(token);
        } else if indentation < previous {
            while self
                .indentations
                .last()
                .map_or(false, |&width| width > indentation)
            {
                let token = self.synthetic_token(TokenKind::Dedentation, "");
                self.tokens.push_back(token);
                self.indentations.pop();
            }

            // The shallower width must land on a level that was previously
            // pushed; dedenting to an unseen width is a layout error.
            let landed = self.indentations.last().copied().unwrap_or(0);
            if landed != indentation {
                let marker = self.synthetic_token(TokenKind::Dedentation, "");
                self.sink
                    .lexical(DiagnosticCode::InvalidIndentationLevel, &marker);
            }
        }

        true
    }

    fn single_line_comment(&mut self) {
        // The second '/' is the current lookahead.
        self.consume();
        while !matches!(self.la1, None | Some(b'\n')) {
            self.consume();
        }
        self.kind = TokenKind::SingleLineComment;
        self.channel = Channel::Hidden;
    }

    fn multi_line_comment(&mut self) {
        // The '*' is the current lookahead.
        self.consume();

        loop {
            match self.la1 {
                None => {
                    self.error = Some(DiagnosticCode::UnterminatedMultiLineComment);
                    break;
                }
                Some(b'*') => {
                    self.consume();
                    if self.la1 == Some(b'/') {
                        self.consume();
                        break;
                    }
                }
                Some(b'\n') => {
                    self.consume();
                    self.on_newline();
                }
                Some(_) => {
                    self.consume();
                }
            }
        }

        self.kind = TokenKind::MultiLineComment;
        self.channel = Channel::Hidden;
    }

    fn string_literal(&mut self, terminator: u8) {
        // The opening quote is the current lookahead.
        self.consume();

        while self.la1 != Some(terminator) {
            match self.la1 {
                None | Some(b'\n') => {
                    self.error = Some(DiagnosticCode::UnterminatedStringLiteral);
                    break;
                }
                Some(b'\\') => {
                    self.consume();
                    match self.la1 {
                        Some(byte) if is_basic_escape(byte) => {
                            self.consume();
                        }
                        Some(b'u') => {
                            self.consume();
                            for _ in 0..4 {
                                match self.la1 {
                                    Some(byte) if is_hexadecimal_digit(byte) => self.consume(),
                                    _ => {
                                        self.error = Some(
                                            DiagnosticCode::MalformedUnicodeCharacterSequence,
                                        );
                                        break;
                                    }
                                }
                            }
                        }
                        Some(_) => {
                            self.error = Some(DiagnosticCode::InvalidEscapeSequence);
                            self.consume();
                        }
                        None => {
                            self.error = Some(DiagnosticCode::UnterminatedStringLiteral);
                            break;
                        }
                    }
                }
                Some(_) => {
                    self.consume();
                }
            }
        }

        if self.la1 == Some(terminator) {
            self.consume();
        }

        self.kind = TokenKind::StringLiteral;
    }

    fn identifier_or_keyword(&mut self) {
        self.consume();
        while self.la1.map_or(false, is_identifier_part) {
            self.consume();
        }

        let text = &self.source[self.start_index..self.pos];
        self.kind = std::str::from_utf8(text)
            .ok()
            .and_then(keyword_kind)
            .unwrap_or(TokenKind::Identifier);
    }

    /// Recognizes integer literals in four radices and decimal
    /// floating-point literals.
    ///
    /// All integer radices map to the single `IntegerLiteral` kind. A letter
    /// immediately following the digits is a diagnostic; the letter is left
    /// for the next recognition.
    fn number_literal(&mut self) {
        self.kind = TokenKind::IntegerLiteral;

        if self.la1 == Some(b'0') {
            self.consume();
            match self.la1 {
                Some(byte) if is_binary_prefix(byte) => {
                    self.radix_digits(is_binary_digit);
                }
                Some(byte) if is_octal_prefix(byte) => {
                    self.radix_digits(is_octal_digit);
                }
                Some(byte) if is_hexadecimal_prefix(byte) => {
                    self.radix_digits(is_hexadecimal_digit);
                }
                Some(byte) if is_decimal_digit(byte) || byte == b'_' => {
                    self.decimal_tail();
                    self.float_tail();
                }
                // `e`/`E` may still begin an exponent; every other letter
                // is an invalid radix prefix.
                Some(byte) if is_letter(byte) && !matches!(byte, b'e' | b'E') => {
                    self.error = Some(DiagnosticCode::InvalidIntegerLiteralPrefix);
                    return;
                }
                _ => {
                    self.float_tail();
                }
            }
        } else {
            self.consume();
            self.decimal_tail();
            self.float_tail();
        }

        if self.error.is_none() && self.la1.map_or(false, is_letter) {
            self.error = Some(DiagnosticCode::InvalidIntegerLiteralPrefix);
        }
    }

    /// Consumes the prefix character, then at least one digit of the given
    /// class followed by digits or underscores.
    fn radix_digits(&mut self, is_digit: fn(u8) -> bool) {
        // The prefix character is the current lookahead.
        self.consume();

        match self.la1 {
            Some(byte) if is_digit(byte) => {
                self.consume();
                let mut previous = 0u8;
                while self.la1.map_or(false, |b| is_digit(b) || b == b'_') {
                    previous = self.la1.unwrap_or(0);
                    self.consume();
                }
                if previous == b'_' {
                    self.error = Some(DiagnosticCode::ExpectedDigitAfterUnderscore);
                }
            }
            _ => {
                self.error = Some(DiagnosticCode::ExpectedDigitAfterUnderscore);
                if self.la1.is_some() {
                    self.consume();
                }
            }
        }
    }

    /// Consumes decimal digits and underscores after the first digit,
    /// flagging a trailing underscore.
    fn decimal_tail(&mut self) {
        let mut previous = 0u8;
        while self
            .la1
            .map_or(false, |b| is_decimal_digit(b) || b == b'_')
        {
            previous = self.la1.unwrap_or(0);
            self.consume();
        }
        if previous == b'_' {
            self.error = Some(DiagnosticCode::ExpectedDigitAfterUnderscore);
        }
    }

    /// Extends a decimal integer into a floating-point literal when a
    /// fraction or exponent follows.
    ///
    /// The `'.'` only begins a fraction when a digit follows, so range
    /// operators after an integer (`1..2`) lex unchanged.
    fn float_tail(&mut self) {
        if self.error.is_some() {
            return;
        }

        let mut float = false;

        if self.la1 == Some(b'.') && self.peek2().map_or(false, is_decimal_digit) {
            self.consume();
            self.consume();
            self.decimal_tail();
            float = true;
        }

        if self.error.is_none() && matches!(self.la1, Some(b'e') | Some(b'E')) {
            let exponent_follows = match self.peek2() {
                Some(byte) if is_decimal_digit(byte) => true,
                Some(b'+') | Some(b'-') => self
                    .source
                    .get(self.pos + 2)
                    .copied()
                    .map_or(false, is_decimal_digit),
                _ => false,
            };
            if exponent_follows {
                self.consume();
                if matches!(self.la1, Some(b'+') | Some(b'-')) {
                    self.consume();
                }
                self.decimal_tail();
                float = true;
            }
        }

        if float {
            self.kind = TokenKind::FloatingPointLiteral;
        }
    }

    fn current_span(&self) -> Span {
        Span {
            start: self.start_index,
            end: self.pos,
            start_line: self.start_line,
            start_column: self.start_column,
            stop_line: self.line,
            stop_column: self.column.saturating_sub(1).max(1),
        }
    }

    fn create_token(&mut self) -> Token {
        let lexeme = &self.source[self.start_index..self.pos];
        let text = match std::str::from_utf8(lexeme) {
            Ok(text) => self.interner.intern(text),
            Err(_) => self.interner.intern(&String::from_utf8_lossy(lexeme)),
        };

        Token {
            kind: self.kind,
            text,
            channel: self.channel,
            span: self.current_span(),
            file: self.file,
        }
    }

    /// Builds an imaginary token at the current region; layout and
    /// end-of-stream tokens are not backed by their lexeme in the source.
    fn synthetic_token(&mut self, kind: TokenKind, text: &str) -> Token {
        let text = self.interner.intern(text);
        Token {
            kind,
            text,
            channel: Channel::Default,
            span: self.current_span(),
            file: self.file,
        }
    }
}

fn is_binary_prefix(byte: u8) -> bool {
    byte == b'b' || byte == b'B'
}

fn is_octal_prefix(byte: u8) -> bool {
    byte == b'c' || byte == b'C'
}

fn is_hexadecimal_prefix(byte: u8) -> bool {
    byte == b'x' || byte == b'X'
}

fn is_binary_digit(byte: u8) -> bool {
    byte == b'0' || byte == b'1'
}

fn is_octal_digit(byte: u8) -> bool {
    (b'0'..=b'7').contains(&byte)
}

fn is_decimal_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

fn is_hexadecimal_digit(byte: u8) -> bool {
    byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte) || (b'A'..=b'F').contains(&byte)
}

fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_basic_escape(byte: u8) -> bool {
    matches!(byte, b'b' | b'f' | b'n' | b'r' | b't' | b'\\' | b'"' | b'\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    struct Lexed {
        tokens: Vec<Token>,
        codes: Vec<DiagnosticCode>,
        interner: Interner,
        source: String,
    }

    impl Lexed {
        fn kinds(&self) -> Vec<TokenKind> {
            self.tokens.iter().map(|t| t.kind).collect()
        }

        fn default_kinds(&self) -> Vec<TokenKind> {
            self.tokens
                .iter()
                .filter(|t| t.channel == Channel::Default)
                .map(|t| t.kind)
                .collect()
        }

        fn text_of(&self, index: usize) -> &str {
            self.interner.resolve(self.tokens[index].text)
        }
    }

    fn lex(source: &str) -> Lexed {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new();
        let tokens = Lexer::new(source, FileId(0), &mut interner, &mut sink).tokenize();
        let codes = sink.diagnostics().iter().map(|d| d.code).collect();
        Lexed {
            tokens,
            codes,
            interner,
            source: source.to_string(),
        }
    }

    #[test]
    fn maximal_munch_over_angle_brackets() {
        let lexed = lex(">>>= >>> >>= >> >= >");
        let kinds: Vec<_> = lexed
            .tokens
            .iter()
            .filter(|t| t.channel == Channel::Default && t.kind != TokenKind::EndOfStream)
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::RightAngleBracket3Equal,
                TokenKind::RightAngleBracket3,
                TokenKind::RightAngleBracket2Equal,
                TokenKind::RightAngleBracket2,
                TokenKind::RightAngleBracketEqual,
                TokenKind::RightAngleBracket,
            ]
        );
    }

    #[test]
    fn compound_operators_lex_as_units() {
        let lexed = lex("(a **= b) ->c ... .. . ~=");
        assert!(lexed.kinds().contains(&TokenKind::Asterisk2Equal));
        assert!(lexed.kinds().contains(&TokenKind::Arrow));
        assert!(lexed.kinds().contains(&TokenKind::Ellipsis));
        assert!(lexed.kinds().contains(&TokenKind::Dot2));
        assert!(lexed.kinds().contains(&TokenKind::Dot));
        assert!(lexed.kinds().contains(&TokenKind::TildeEqual));
        assert!(lexed.codes.is_empty());
    }

    #[test]
    fn keywords_and_identifiers_split_correctly() {
        let lexed = lex("struct weights;");
        assert_eq!(lexed.tokens[0].kind, TokenKind::KeywordStruct);
        // "weights" starts with 'w' like a keyword but stays an identifier.
        assert_eq!(lexed.tokens[2].kind, TokenKind::Identifier);
        assert_eq!(lexed.text_of(2), "weights");
    }

    #[test]
    fn token_lexemes_round_trip_through_spans() {
        let source = "i32 add(i32 x) { return x + 0x2A; }";
        let lexed = lex(source);
        for token in &lexed.tokens {
            if token.kind == TokenKind::EndOfStream || token.is_layout() {
                continue;
            }
            let expected = &source[token.span.start..token.span.end];
            assert_eq!(
                lexed.interner.resolve(token.text),
                expected,
                "lexeme mismatch for {:?}",
                token.kind
            );
            assert!(token.span.end > token.span.start);
        }
    }

    #[test]
    fn integer_literals_in_four_radices() {
        let lexed = lex("0b1010 0c17 0xFF 1_000 0");
        let literals: Vec<_> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::IntegerLiteral)
            .collect();
        assert_eq!(literals.len(), 5);
        assert!(lexed.codes.is_empty());
    }

    #[test]
    fn trailing_underscore_is_flagged() {
        let lexed = lex("1_000_");
        assert_eq!(lexed.codes, vec![DiagnosticCode::ExpectedDigitAfterUnderscore]);
        assert_eq!(lexed.tokens[0].kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn invalid_radix_prefix_is_flagged() {
        let lexed = lex("0z1");
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::InvalidIntegerLiteralPrefix));
    }

    #[test]
    fn letter_after_digits_is_flagged() {
        let lexed = lex("123abc");
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::InvalidIntegerLiteralPrefix));
        // The letter begins the next token.
        assert_eq!(lexed.tokens[0].kind, TokenKind::IntegerLiteral);
        assert_eq!(lexed.tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn out_of_radix_digit_starts_a_new_literal() {
        let lexed = lex("0b12");
        let literals: Vec<_> = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::IntegerLiteral)
            .collect();
        assert_eq!(literals.len(), 2);
    }

    #[test]
    fn floating_point_literals() {
        let lexed = lex("3.14 1e10 2.5e-3 1..2");
        let kinds = lexed.default_kinds();
        let floats = kinds
            .iter()
            .filter(|&&k| k == TokenKind::FloatingPointLiteral)
            .count();
        assert_eq!(floats, 3);
        // `1..2` stays integer, range, integer.
        assert!(kinds.contains(&TokenKind::Dot2));
        assert!(lexed.codes.is_empty());
    }

    #[test]
    fn string_literals_with_escapes() {
        let lexed = lex(r#""line\nbreak" 'quo\'te' "uniAcode""#);
        let strings = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StringLiteral)
            .count();
        assert_eq!(strings, 3);
        assert!(lexed.codes.is_empty());
    }

    #[test]
    fn unterminated_string_is_flagged_and_lexing_continues() {
        let lexed = lex("\"open\nnext");
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::UnterminatedStringLiteral));
        assert!(lexed
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn malformed_escapes_are_flagged() {
        let lexed = lex(r#""bad\q" "short\u12""#);
        assert!(lexed.codes.contains(&DiagnosticCode::InvalidEscapeSequence));
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::MalformedUnicodeCharacterSequence));
    }

    #[test]
    fn comments_ride_the_hidden_channel() {
        let lexed = lex("a // note\nb /* block\ncomment */ c");
        let hidden: Vec<_> = lexed
            .tokens
            .iter()
            .filter(|t| t.channel == Channel::Hidden)
            .map(|t| t.kind)
            .collect();
        assert!(hidden.contains(&TokenKind::SingleLineComment));
        assert!(hidden.contains(&TokenKind::MultiLineComment));

        let visible = lexed.default_kinds();
        assert!(!visible.contains(&TokenKind::SingleLineComment));
        assert!(!visible.contains(&TokenKind::MultiLineComment));
    }

    #[test]
    fn unterminated_block_comment_is_flagged() {
        let lexed = lex("/* never closed");
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::UnterminatedMultiLineComment));
        assert_eq!(lexed.tokens.last().map(|t| t.kind), Some(TokenKind::EndOfStream));
    }

    #[test]
    fn unknown_character_produces_token_and_diagnostic() {
        let lexed = lex("a $ b");
        assert!(lexed.codes.contains(&DiagnosticCode::UnknownCharacter));
        assert!(lexed.kinds().contains(&TokenKind::Unknown));
        // Both identifiers survive.
        let identifiers = lexed
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .count();
        assert_eq!(identifiers, 2);
    }

    #[test]
    fn indentation_and_dedentation_balance() {
        let source = "one\n    two\n        three\nfour\n";
        let lexed = lex(source);
        let kinds = lexed.kinds();
        let indents = kinds.iter().filter(|&&k| k == TokenKind::Indentation).count();
        let dedents = kinds.iter().filter(|&&k| k == TokenKind::Dedentation).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
    }

    #[test]
    fn end_of_stream_flushes_open_blocks() {
        // No trailing newline: the lexer fabricates a newline, then unwinds.
        let lexed = lex("one\n    two");
        let kinds = lexed.kinds();
        let indents = kinds.iter().filter(|&&k| k == TokenKind::Indentation).count();
        let dedents = kinds.iter().filter(|&&k| k == TokenKind::Dedentation).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
        let newlines = kinds.iter().filter(|&&k| k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
        assert_eq!(kinds.last(), Some(&TokenKind::EndOfStream));
    }

    #[test]
    fn enclosures_suppress_layout() {
        let source = "call(\n    one,\n    two\n)\n";
        let lexed = lex(source);
        let kinds = lexed.kinds();
        assert!(!kinds.contains(&TokenKind::Indentation));
        assert!(!kinds.contains(&TokenKind::Dedentation));
        // The only newline is the one after the closing parenthesis.
        let newlines = kinds.iter().filter(|&&k| k == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn braces_count_as_enclosures() {
        let source = "i32 f() {\n    return 1;\n}\n";
        let lexed = lex(source);
        let kinds = lexed.kinds();
        assert!(!kinds.contains(&TokenKind::Indentation));
        assert!(!kinds.contains(&TokenKind::Dedentation));
    }

    #[test]
    fn blank_lines_produce_no_layout() {
        let source = "one\n\n   \n\ntwo\n";
        let lexed = lex(source);
        let kinds = lexed.kinds();
        assert!(!kinds.contains(&TokenKind::Indentation));
        // One newline before "two", one after it.
        let newlines = kinds.iter().filter(|&&k| k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn comment_only_lines_produce_no_layout() {
        let source = "one\n    // indented note\ntwo\n";
        let lexed = lex(source);
        let kinds = lexed.kinds();
        assert!(!kinds.contains(&TokenKind::Indentation));
        assert!(!kinds.contains(&TokenKind::Dedentation));
    }

    #[test]
    fn mismatched_dedent_level_is_flagged() {
        let source = "one\n        two\n    three\n";
        let lexed = lex(source);
        assert!(lexed
            .codes
            .contains(&DiagnosticCode::InvalidIndentationLevel));
        // Tokenization continued to the end regardless.
        assert_eq!(
            lexed.tokens.last().map(|t| t.kind),
            Some(TokenKind::EndOfStream)
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let lexed = lex("ab\n  cd");
        let cd = lexed
            .tokens
            .iter()
            .find(|t| lexed.interner.resolve(t.text) == "cd")
            .copied()
            .expect("cd token");
        assert_eq!(cd.span.start_line, 2);
        assert_eq!(cd.span.start_column, 3);
    }

    #[test]
    fn multibyte_text_passes_through_strings() {
        let source = "\"héllo wörld\"";
        let lexed = lex(source);
        assert_eq!(lexed.tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(lexed.text_of(0), source);
        assert_eq!(lexed.source.len(), lexed.tokens[0].span.end);
    }

    #[test]
    fn next_token_is_sticky_at_end_of_stream() {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new();
        let mut lexer = Lexer::new("x", FileId(0), &mut interner, &mut sink);
        let _ = lexer.next_token();
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfStream);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfStream);
    }
}

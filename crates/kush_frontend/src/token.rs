//! Token types for the KUSH lexer and parser.
//!
//! This module defines the vocabulary of the KUSH language at the token
//! level. Tokens are the atomic syntactic units produced by the lexer and
//! consumed by the parser through the token stream.
//!
//! ## Token Categories
//!
//! | Category | Examples | Description |
//! |----------|----------|-------------|
//! | **Layout** | indentation, dedentation, newline | Synthesized from the block-structured layout model |
//! | **Trivia** | whitespace, comments | Emitted on the hidden channel |
//! | **Operators** | `>>>=`, `->`, `..`, `+=` | Recognized by maximal munch over 1–4 characters |
//! | **Keywords** | `struct`, `var`, `try` | Exact-matched against identifier lexemes |
//! | **Literals** | `0x2A`, `3.14`, `"text"` | Integer, floating-point, and string literals |
//!
//! ## Channels
//!
//! Every token carries a [`Channel`]. Whitespace and comments are preserved
//! on the hidden channel so tools can reconstruct the source, while the
//! parser's lookahead only ever observes the default channel.

use kush_base::{Name, Span};
use serde::{Deserialize, Serialize};

/// Identifies the source file a token came from.
///
/// File ids are opaque handles allocated by the session; diagnostics use
/// them to recover the path for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// The channel a token is emitted on.
///
/// The token stream only surfaces [`Channel::Default`] tokens to the parser;
/// hidden tokens are preserved in the raw token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Visible to the parser.
    Default,
    /// Whitespace and comments; skipped by the token stream.
    Hidden,
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An unrecognized character; carries a diagnostic.
    Unknown,

    Indentation,
    Dedentation,
    Whitespace,
    Newline,
    EndOfStream,

    ExclamationMarkEqual,
    ExclamationMark,
    At,
    Hash,
    ModulusEqual,
    Modulus,
    Ampersand2,
    AmpersandEqual,
    Ampersand,
    LeftParenthesis,
    RightParenthesis,
    Asterisk2Equal,
    Asterisk2,
    AsteriskEqual,
    Asterisk,
    Plus2,
    PlusEqual,
    Plus,
    Comma,
    Dash2,
    Arrow,
    DashEqual,
    Dash,
    Ellipsis,
    Dot2,
    Dot,
    SingleLineComment,
    MultiLineComment,
    ForwardSlashEqual,
    ForwardSlash,
    Colon2,
    Colon,
    Semicolon,
    LeftAngleBracket2Equal,
    LeftAngleBracket2,
    LeftAngleBracketEqual,
    LeftAngleBracket,
    RightAngleBracket3Equal,
    RightAngleBracket3,
    RightAngleBracket2Equal,
    RightAngleBracket2,
    RightAngleBracketEqual,
    RightAngleBracket,
    Equal2,
    Equal,
    Hook,
    LeftBrace,
    RightBrace,
    LeftSquareBracket,
    RightSquareBracket,
    CaretEqual,
    Caret,
    VerticalBar2,
    VerticalBarEqual,
    VerticalBar,
    TildeEqual,
    Tilde,

    Identifier,

    KeywordBoolean,
    KeywordBreak,
    KeywordCatch,
    KeywordContinue,
    KeywordElse,
    KeywordF32,
    KeywordF64,
    KeywordFalse,
    KeywordFinally,
    KeywordFor,
    KeywordI16,
    KeywordI32,
    KeywordI64,
    KeywordI8,
    KeywordIf,
    KeywordImport,
    KeywordLet,
    KeywordNew,
    KeywordNull,
    KeywordReturn,
    KeywordStatic,
    KeywordStruct,
    KeywordThis,
    KeywordThrow,
    KeywordTrue,
    KeywordTry,
    KeywordVar,
    KeywordVoid,
    KeywordWhile,
    KeywordWith,

    IntegerLiteral,
    FloatingPointLiteral,
    StringLiteral,
}

impl TokenKind {
    /// Returns the canonical spelling of the token kind, or a `<...>`
    /// placeholder for kinds without a fixed lexeme.
    pub fn literal_name(self) -> &'static str {
        match self {
            TokenKind::Unknown => "<unknown>",
            TokenKind::Indentation => "<indentation>",
            TokenKind::Dedentation => "<dedentation>",
            TokenKind::Whitespace => "<white_space>",
            TokenKind::Newline => "<newline>",
            TokenKind::EndOfStream => "<end_of_stream>",
            TokenKind::ExclamationMarkEqual => "!=",
            TokenKind::ExclamationMark => "!",
            TokenKind::At => "@",
            TokenKind::Hash => "#",
            TokenKind::ModulusEqual => "%=",
            TokenKind::Modulus => "%",
            TokenKind::Ampersand2 => "&&",
            TokenKind::AmpersandEqual => "&=",
            TokenKind::Ampersand => "&",
            TokenKind::LeftParenthesis => "(",
            TokenKind::RightParenthesis => ")",
            TokenKind::Asterisk2Equal => "**=",
            TokenKind::Asterisk2 => "**",
            TokenKind::AsteriskEqual => "*=",
            TokenKind::Asterisk => "*",
            TokenKind::Plus2 => "++",
            TokenKind::PlusEqual => "+=",
            TokenKind::Plus => "+",
            TokenKind::Comma => ",",
            TokenKind::Dash2 => "--",
            TokenKind::Arrow => "->",
            TokenKind::DashEqual => "-=",
            TokenKind::Dash => "-",
            TokenKind::Ellipsis => "...",
            TokenKind::Dot2 => "..",
            TokenKind::Dot => ".",
            TokenKind::SingleLineComment => "<single_line_comment>",
            TokenKind::MultiLineComment => "<multi_line_comment>",
            TokenKind::ForwardSlashEqual => "/=",
            TokenKind::ForwardSlash => "/",
            TokenKind::Colon2 => "::",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LeftAngleBracket2Equal => "<<=",
            TokenKind::LeftAngleBracket2 => "<<",
            TokenKind::LeftAngleBracketEqual => "<=",
            TokenKind::LeftAngleBracket => "<",
            TokenKind::RightAngleBracket3Equal => ">>>=",
            TokenKind::RightAngleBracket3 => ">>>",
            TokenKind::RightAngleBracket2Equal => ">>=",
            TokenKind::RightAngleBracket2 => ">>",
            TokenKind::RightAngleBracketEqual => ">=",
            TokenKind::RightAngleBracket => ">",
            TokenKind::Equal2 => "==",
            TokenKind::Equal => "=",
            TokenKind::Hook => "?",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftSquareBracket => "[",
            TokenKind::RightSquareBracket => "]",
            TokenKind::CaretEqual => "^=",
            TokenKind::Caret => "^",
            TokenKind::VerticalBar2 => "||",
            TokenKind::VerticalBarEqual => "|=",
            TokenKind::VerticalBar => "|",
            TokenKind::TildeEqual => "~=",
            TokenKind::Tilde => "~",
            TokenKind::Identifier => "<identifier>",
            TokenKind::KeywordBoolean => "boolean",
            TokenKind::KeywordBreak => "break",
            TokenKind::KeywordCatch => "catch",
            TokenKind::KeywordContinue => "continue",
            TokenKind::KeywordElse => "else",
            TokenKind::KeywordF32 => "f32",
            TokenKind::KeywordF64 => "f64",
            TokenKind::KeywordFalse => "false",
            TokenKind::KeywordFinally => "finally",
            TokenKind::KeywordFor => "for",
            TokenKind::KeywordI16 => "i16",
            TokenKind::KeywordI32 => "i32",
            TokenKind::KeywordI64 => "i64",
            TokenKind::KeywordI8 => "i8",
            TokenKind::KeywordIf => "if",
            TokenKind::KeywordImport => "import",
            TokenKind::KeywordLet => "let",
            TokenKind::KeywordNew => "new",
            TokenKind::KeywordNull => "null",
            TokenKind::KeywordReturn => "return",
            TokenKind::KeywordStatic => "static",
            TokenKind::KeywordStruct => "struct",
            TokenKind::KeywordThis => "this",
            TokenKind::KeywordThrow => "throw",
            TokenKind::KeywordTrue => "true",
            TokenKind::KeywordTry => "try",
            TokenKind::KeywordVar => "var",
            TokenKind::KeywordVoid => "void",
            TokenKind::KeywordWhile => "while",
            TokenKind::KeywordWith => "with",
            TokenKind::IntegerLiteral => "<integer_literal>",
            TokenKind::FloatingPointLiteral => "<floating_point_literal>",
            TokenKind::StringLiteral => "<string_literal>",
        }
    }
}

/// Maps an identifier lexeme to its keyword kind, if any.
///
/// Dispatches on the first character and then exact-matches only the
/// keywords of the observed length, so most identifiers are rejected after
/// a single byte comparison.
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    let first = text.as_bytes().first().copied()?;
    let kind = match first {
        b'b' => match text {
            "boolean" => TokenKind::KeywordBoolean,
            "break" => TokenKind::KeywordBreak,
            _ => return None,
        },
        b'c' => match text {
            "catch" => TokenKind::KeywordCatch,
            "continue" => TokenKind::KeywordContinue,
            _ => return None,
        },
        b'e' => match text {
            "else" => TokenKind::KeywordElse,
            _ => return None,
        },
        b'f' => match text {
            "f32" => TokenKind::KeywordF32,
            "f64" => TokenKind::KeywordF64,
            "false" => TokenKind::KeywordFalse,
            "finally" => TokenKind::KeywordFinally,
            "for" => TokenKind::KeywordFor,
            _ => return None,
        },
        b'i' => match text {
            "i16" => TokenKind::KeywordI16,
            "i32" => TokenKind::KeywordI32,
            "i64" => TokenKind::KeywordI64,
            "i8" => TokenKind::KeywordI8,
            "if" => TokenKind::KeywordIf,
            "import" => TokenKind::KeywordImport,
            _ => return None,
        },
        b'l' => match text {
            "let" => TokenKind::KeywordLet,
            _ => return None,
        },
        b'n' => match text {
            "new" => TokenKind::KeywordNew,
            "null" => TokenKind::KeywordNull,
            _ => return None,
        },
        b'r' => match text {
            "return" => TokenKind::KeywordReturn,
            _ => return None,
        },
        b's' => match text {
            "static" => TokenKind::KeywordStatic,
            "struct" => TokenKind::KeywordStruct,
            _ => return None,
        },
        b't' => match text {
            "this" => TokenKind::KeywordThis,
            "throw" => TokenKind::KeywordThrow,
            "true" => TokenKind::KeywordTrue,
            "try" => TokenKind::KeywordTry,
            _ => return None,
        },
        b'v' => match text {
            "var" => TokenKind::KeywordVar,
            "void" => TokenKind::KeywordVoid,
            _ => return None,
        },
        b'w' => match text {
            "while" => TokenKind::KeywordWhile,
            "with" => TokenKind::KeywordWith,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

/// A lexical token.
///
/// Tokens are immutable after construction and freely shared between the
/// token stream, the AST, and diagnostics. The span carries both the
/// half-open byte range `[start, end)` into the unit's source and the
/// inclusive, 1-based line/column range of the same region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The interned lexeme. Synthetic tokens may carry an empty lexeme.
    pub text: Name,
    pub channel: Channel,
    pub span: Span,
    pub file: FileId,
}

impl Token {
    /// Returns `true` for the layout kinds the lexer synthesizes.
    pub fn is_layout(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Indentation | TokenKind::Dedentation | TokenKind::Newline
        )
    }
}

//! Structured diagnostics with stable codes.
//!
//! Every phase of the front-end reports problems through one
//! [`DiagnosticSink`]; nothing short-circuits on the first error. A
//! diagnostic is identified by its stable [`DiagnosticCode`], carries the
//! exact source span of the offending token, and optionally a hint (the
//! expected token for syntax errors, a did-you-mean suggestion for
//! unresolved identifiers).
//!
//! ## Rendering
//!
//! [`Diagnostic::display_with_source`] produces a terminal-friendly report
//! with the source line, a caret underline, and an optional `help:` line:
//!
//! ```text
//! error: UNDECLARED_IDENTIFIER
//!   --> sample.k:3:9
//!    3 | var z = unknownName;
//!      |         ^^^^^^^^^^^
//!      | help: did you mean 'knownName'?
//! ```

use crate::style::Style;
use crate::token::{FileId, Token, TokenKind};
use kush_base::Span;
use serde::{Deserialize, Serialize};

/// The front-end phase a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lexical,
    Syntactic,
    Semantic,
}

/// Stable identifiers for every diagnostic the front-end can produce.
///
/// Consumers may rely on these identities; the serialized form is the
/// screaming-snake spelling (`DUPLICATE_FUNCTION_OVERLOAD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Lexical
    UnknownCharacter,
    UnterminatedStringLiteral,
    UnterminatedMultiLineComment,
    MalformedUnicodeCharacterSequence,
    InvalidEscapeSequence,
    InvalidIntegerLiteralPrefix,
    ExpectedDigitAfterUnderscore,
    InvalidIndentationLevel,

    // Syntactic
    UnexpectedToken,
    TryStatementExpectsCatchOrFinally,

    // Semantic
    RedeclarationOfSymbolAsVariable,
    RedeclarationOfSymbolAsConstant,
    RedeclarationOfSymbolAsParameter,
    RedeclarationOfSymbolAsVariableParameter,
    RedeclarationOfSymbolAsLabel,
    RedeclarationOfSymbolAsLoopParameter,
    RedeclarationOfSymbolAsCatchParameter,
    RedeclarationOfSymbolAsClass,
    RedeclarationOfSymbolAsFunction,
    RedeclarationOfSymbolPreviouslyImported,
    MultipleFunctionOverloadsWithVariableParameter,
    DuplicateFunctionOverload,
    FunctionDeclarationExceedsParameterThreshold,
    FunctionDeclarationCausesAnotherFunctionToExceedParameterThreshold,
    StaticInitializerWithParameters,
    UnknownClass,
    UndeclaredClass,
    UndeclaredIdentifier,
    InvalidLvalue,
    VariableTreatedAsFunction,
    InstantiationOfNonClassSymbol,
    NoSuitableConstructor,
}

impl DiagnosticCode {
    /// The stable screaming-snake spelling of this code.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticCode::UnknownCharacter => "UNKNOWN_CHARACTER",
            DiagnosticCode::UnterminatedStringLiteral => "UNTERMINATED_STRING_LITERAL",
            DiagnosticCode::UnterminatedMultiLineComment => "UNTERMINATED_MULTI_LINE_COMMENT",
            DiagnosticCode::MalformedUnicodeCharacterSequence => {
                "MALFORMED_UNICODE_CHARACTER_SEQUENCE"
            }
            DiagnosticCode::InvalidEscapeSequence => "INVALID_ESCAPE_SEQUENCE",
            DiagnosticCode::InvalidIntegerLiteralPrefix => "INVALID_INTEGER_LITERAL_PREFIX",
            DiagnosticCode::ExpectedDigitAfterUnderscore => "EXPECTED_DIGIT_AFTER_UNDERSCORE",
            DiagnosticCode::InvalidIndentationLevel => "INVALID_INDENTATION_LEVEL",
            DiagnosticCode::UnexpectedToken => "UNEXPECTED_TOKEN",
            DiagnosticCode::TryStatementExpectsCatchOrFinally => {
                "TRY_STATEMENT_EXPECTS_CATCH_OR_FINALLY"
            }
            DiagnosticCode::RedeclarationOfSymbolAsVariable => {
                "REDECLARATION_OF_SYMBOL_AS_VARIABLE"
            }
            DiagnosticCode::RedeclarationOfSymbolAsConstant => {
                "REDECLARATION_OF_SYMBOL_AS_CONSTANT"
            }
            DiagnosticCode::RedeclarationOfSymbolAsParameter => {
                "REDECLARATION_OF_SYMBOL_AS_PARAMETER"
            }
            DiagnosticCode::RedeclarationOfSymbolAsVariableParameter => {
                "REDECLARATION_OF_SYMBOL_AS_VARIABLE_PARAMETER"
            }
            DiagnosticCode::RedeclarationOfSymbolAsLabel => "REDECLARATION_OF_SYMBOL_AS_LABEL",
            DiagnosticCode::RedeclarationOfSymbolAsLoopParameter => {
                "REDECLARATION_OF_SYMBOL_AS_LOOP_PARAMETER"
            }
            DiagnosticCode::RedeclarationOfSymbolAsCatchParameter => {
                "REDECLARATION_OF_SYMBOL_AS_CATCH_PARAMETER"
            }
            DiagnosticCode::RedeclarationOfSymbolAsClass => "REDECLARATION_OF_SYMBOL_AS_CLASS",
            DiagnosticCode::RedeclarationOfSymbolAsFunction => {
                "REDECLARATION_OF_SYMBOL_AS_FUNCTION"
            }
            DiagnosticCode::RedeclarationOfSymbolPreviouslyImported => {
                "REDECLARATION_OF_SYMBOL_PREVIOUSLY_IMPORTED"
            }
            DiagnosticCode::MultipleFunctionOverloadsWithVariableParameter => {
                "MULTIPLE_FUNCTION_OVERLOADS_WITH_VARIABLE_PARAMETER"
            }
            DiagnosticCode::DuplicateFunctionOverload => "DUPLICATE_FUNCTION_OVERLOAD",
            DiagnosticCode::FunctionDeclarationExceedsParameterThreshold => {
                "FUNCTION_DECLARATION_EXCEEDS_PARAMETER_THRESHOLD"
            }
            DiagnosticCode::FunctionDeclarationCausesAnotherFunctionToExceedParameterThreshold => {
                "FUNCTION_DECLARATION_CAUSES_ANOTHER_FUNCTION_TO_EXCEED_PARAMETER_THRESHOLD"
            }
            DiagnosticCode::StaticInitializerWithParameters => {
                "STATIC_INITIALIZER_WITH_PARAMETERS"
            }
            DiagnosticCode::UnknownClass => "UNKNOWN_CLASS",
            DiagnosticCode::UndeclaredClass => "UNDECLARED_CLASS",
            DiagnosticCode::UndeclaredIdentifier => "UNDECLARED_IDENTIFIER",
            DiagnosticCode::InvalidLvalue => "INVALID_LVALUE",
            DiagnosticCode::VariableTreatedAsFunction => "VARIABLE_TREATED_AS_FUNCTION",
            DiagnosticCode::InstantiationOfNonClassSymbol => "INSTANTIATION_OF_NON_CLASS_SYMBOL",
            DiagnosticCode::NoSuitableConstructor => "NO_SUITABLE_CONSTRUCTOR",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single reported problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub phase: Phase,
    pub code: DiagnosticCode,
    /// Byte range of the offending token.
    #[serde(skip)]
    pub span: Span,
    /// 1-based line of the offending token's first character.
    pub line: u32,
    /// 1-based column of the offending token's first character.
    pub column: u32,
    pub file: FileId,
    /// Auxiliary data: expected token, suggestion, and the like.
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Renders this diagnostic against the source text it was reported on.
    pub fn display_with_source(&self, source: &str, path: &str) -> String {
        let (line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = self.span.len().max(1).min(line_content.len().saturating_sub(col).max(1));
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let error_label = Style::bold_red("error");
        let line_num_str = Style::blue(&format!("{:4}", self.line));
        let pipe = Style::blue("|");

        let mut result = format!(
            "{}: {}\n  --> {}:{}:{}\n{} {} {}\n     {} {}",
            error_label,
            self.code,
            path,
            self.line,
            self.column,
            line_num_str,
            pipe,
            line_content,
            pipe,
            Style::red(&underline),
        );

        if let Some(hint) = &self.hint {
            let help = Style::cyan("help");
            result.push_str(&format!("\n     {} {}: {}", pipe, help, hint));
        }

        result
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, &'a str) {
        let mut line_start = 0;
        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_start, &source[line_start..line_end])
    }
}

/// Accumulates every diagnostic produced for a batch.
///
/// The pipeline never short-circuits; a compilation "fails" iff the sink is
/// non-empty once both semantic passes have run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a lexical error on the token carrying the offending span.
    pub fn lexical(&mut self, code: DiagnosticCode, token: &Token) {
        self.push(Phase::Lexical, code, token, None);
    }

    /// Reports a syntax error, recording the expected token as the hint.
    pub fn syntactic(&mut self, code: DiagnosticCode, token: &Token, expected: Option<TokenKind>) {
        let hint = expected.map(|kind| format!("expected '{}'", kind.literal_name()));
        self.push(Phase::Syntactic, code, token, hint);
    }

    /// Reports a semantic error on the given token.
    pub fn semantic(&mut self, code: DiagnosticCode, token: &Token) {
        self.push(Phase::Semantic, code, token, None);
    }

    /// Reports a semantic error with an auxiliary hint.
    pub fn semantic_with_hint(&mut self, code: DiagnosticCode, token: &Token, hint: String) {
        self.push(Phase::Semantic, code, token, Some(hint));
    }

    fn push(
        &mut self,
        phase: Phase,
        code: DiagnosticCode,
        token: &Token,
        hint: Option<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            phase,
            code,
            span: token.span,
            line: token.span.start_line,
            column: token.span.start_column,
            file: token.file,
            hint,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Channel;
    use kush_base::Interner;

    fn token_at(start: usize, end: usize, line: u32, column: u32) -> Token {
        let mut interner = Interner::new();
        Token {
            kind: TokenKind::Identifier,
            text: interner.intern("x"),
            channel: Channel::Default,
            span: Span {
                start,
                end,
                start_line: line,
                start_column: column,
                stop_line: line,
                stop_column: column + (end.saturating_sub(start).max(1) as u32) - 1,
            },
            file: FileId(0),
        }
    }

    #[test]
    fn sink_accumulates_in_order() {
        let mut sink = DiagnosticSink::new();
        sink.lexical(DiagnosticCode::UnknownCharacter, &token_at(0, 1, 1, 1));
        sink.semantic(DiagnosticCode::UndeclaredIdentifier, &token_at(4, 5, 1, 5));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.diagnostics()[0].phase, Phase::Lexical);
        assert_eq!(sink.diagnostics()[1].code, DiagnosticCode::UndeclaredIdentifier);
    }

    #[test]
    fn codes_serialize_to_stable_names() {
        let json = serde_json::to_string(&DiagnosticCode::DuplicateFunctionOverload).unwrap();
        assert_eq!(json, "\"DUPLICATE_FUNCTION_OVERLOAD\"");
        assert_eq!(
            DiagnosticCode::InvalidLvalue.to_string(),
            "INVALID_LVALUE"
        );
    }

    #[test]
    fn display_points_at_offending_span() {
        let source = "var z = unknownName;";
        let token = token_at(8, 19, 1, 9);
        let mut sink = DiagnosticSink::new();
        sink.semantic(DiagnosticCode::UndeclaredIdentifier, &token);

        let rendered = sink.diagnostics()[0].display_with_source(source, "sample.k");
        assert!(rendered.contains("UNDECLARED_IDENTIFIER"));
        assert!(rendered.contains("sample.k:1:9"));
        assert!(rendered.contains("unknownName"));
        assert!(rendered.contains("^^^^^^^^^^^"));
    }

    #[test]
    fn expected_token_becomes_hint() {
        let mut sink = DiagnosticSink::new();
        sink.syntactic(
            DiagnosticCode::UnexpectedToken,
            &token_at(0, 1, 1, 1),
            Some(TokenKind::Semicolon),
        );
        assert_eq!(sink.diagnostics()[0].hint.as_deref(), Some("expected ';'"));
    }
}

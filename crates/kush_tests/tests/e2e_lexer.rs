//! Lexer-level properties checked through the public pipeline: span
//! round-trips, layout balance, and enclosure suppression.

mod common;

use common::compile;
use kush_frontend::{Channel, TokenKind};

const SAMPLE_PROGRAM: &str = "\
struct Printable {
    i32 tag;
}

struct Matrix : Printable {
    i32[] cells;
    i32 width;

    Matrix new(i32 size) {
        return this;
    }
}

i32 sum(i32 first, i32 ...rest) {
    var total = first;
    // fold the tail
    for let value : rest {
        total += value;
    }
    return total;
}
";

#[test]
fn every_real_token_round_trips_through_its_span() {
    let batch = compile(SAMPLE_PROGRAM);
    let unit = &batch.units[0];

    for token in &unit.tokens {
        if token.kind == TokenKind::EndOfStream
            || matches!(
                token.kind,
                TokenKind::Indentation | TokenKind::Dedentation | TokenKind::Newline
            )
        {
            continue;
        }
        let expected = &unit.text[token.span.start..token.span.end];
        assert_eq!(
            batch.interner.resolve(token.text),
            expected,
            "lexeme mismatch for {:?} at {:?}",
            token.kind,
            token.span
        );
        assert!(token.span.end > token.span.start);
    }
}

#[test]
fn hidden_tokens_never_surface_on_the_default_channel() {
    let batch = compile(SAMPLE_PROGRAM);
    for token in &batch.units[0].tokens {
        if matches!(
            token.kind,
            TokenKind::Whitespace | TokenKind::SingleLineComment | TokenKind::MultiLineComment
        ) {
            assert_eq!(token.channel, Channel::Hidden);
        } else {
            assert_eq!(token.channel, Channel::Default);
        }
    }
}

#[test]
fn indentations_and_dedentations_balance() {
    // Indentation-styled text outside enclosures, with and without a
    // trailing newline.
    for source in [
        "alpha\n    beta\n        gamma\ndelta\n",
        "alpha\n    beta\n        gamma",
        "alpha\n  beta\ngamma\n  delta\n",
    ] {
        let batch = compile(source);
        let kinds: Vec<_> = batch.units[0].tokens.iter().map(|t| t.kind).collect();
        let indents = kinds
            .iter()
            .filter(|&&k| k == TokenKind::Indentation)
            .count();
        let dedents = kinds
            .iter()
            .filter(|&&k| k == TokenKind::Dedentation)
            .count();
        assert_eq!(indents, dedents, "unbalanced layout for {:?}", source);
    }
}

#[test]
fn no_layout_tokens_inside_enclosures() {
    let batch = compile(SAMPLE_PROGRAM);
    let unit = &batch.units[0];

    let mut depth = 0usize;
    for token in &unit.tokens {
        match token.kind {
            TokenKind::LeftParenthesis | TokenKind::LeftBrace | TokenKind::LeftSquareBracket => {
                depth += 1;
            }
            TokenKind::RightParenthesis
            | TokenKind::RightBrace
            | TokenKind::RightSquareBracket => {
                depth = depth.saturating_sub(1);
            }
            TokenKind::Indentation | TokenKind::Dedentation | TokenKind::Newline => {
                assert_eq!(depth, 0, "layout token emitted inside an enclosure");
            }
            _ => {}
        }
    }
}

#[test]
fn the_sample_program_is_clean() {
    let batch = compile(SAMPLE_PROGRAM);
    assert!(batch.succeeded(), "{}", batch.render_diagnostics());
}

#[test]
fn lexical_diagnostics_do_not_stop_tokenization() {
    let source = "void f() { var s = \"open;\nvar t = 0z9; }";
    let batch = compile(source);
    // The unterminated string and the bad radix prefix are both reported,
    // and the token list still terminates properly.
    let codes: Vec<_> = batch.diagnostics.iter().map(|d| d.code).collect();
    assert!(codes.contains(&kush_frontend::DiagnosticCode::UnterminatedStringLiteral));
    assert!(codes.contains(&kush_frontend::DiagnosticCode::InvalidIntegerLiteralPrefix));
    assert_eq!(
        batch.units[0].tokens.last().map(|t| t.kind),
        Some(TokenKind::EndOfStream)
    );
}

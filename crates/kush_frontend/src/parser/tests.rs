use super::Parser;
use crate::ast::*;
use crate::diagnostics::{DiagnosticCode, DiagnosticSink};
use crate::lexer::Lexer;
use crate::stream::TokenStream;
use crate::token::FileId;
use kush_base::Interner;

struct Parsed {
    unit: CompilationUnit,
    codes: Vec<DiagnosticCode>,
    interner: Interner,
}

fn parse(source: &str) -> Parsed {
    let mut interner = Interner::new();
    let mut sink = DiagnosticSink::new();
    let tokens = Lexer::new(source, FileId(0), &mut interner, &mut sink).tokenize();
    let stream = TokenStream::new(tokens);
    let unit = Parser::new(stream, &mut interner, &mut sink).parse();
    let codes = sink.diagnostics().iter().map(|d| d.code).collect();
    Parsed {
        unit,
        codes,
        interner,
    }
}

fn only_function(parsed: &Parsed) -> &FunctionDeclaration {
    match &parsed.unit.declarations[0] {
        ComponentDeclaration::Function(function) => function,
        other => panic!("expected a function declaration, got {:?}", other),
    }
}

fn body_statements<'u>(parsed: &'u Parsed) -> &'u [Statement] {
    &only_function(parsed).body.statements
}

#[test]
fn unit_with_imports_and_function() {
    let parsed = parse("import io.console;\n\nvoid main() { return 0; }\n");
    assert!(parsed.codes.is_empty(), "unexpected: {:?}", parsed.codes);
    assert_eq!(parsed.unit.imports.len(), 1);
    assert_eq!(parsed.unit.declarations.len(), 1);
}

#[test]
fn import_collects_dotted_segments() {
    let parsed = parse("import a.b.C;");
    let import = &parsed.unit.imports[0];
    let segments: Vec<_> = import
        .identifiers
        .iter()
        .map(|t| parsed.interner.resolve(t.text))
        .collect();
    assert_eq!(segments, vec!["a", "b", "C"]);
    assert!(!import.wildcard);
    assert!(import.alias.is_none());
}

#[test]
fn import_wildcard_and_alias() {
    let parsed = parse("import a.b.*;\nimport a.b.C as D;\n");
    assert!(parsed.codes.is_empty());
    assert!(parsed.unit.imports[0].wildcard);
    let alias = parsed.unit.imports[1].alias.expect("alias");
    assert_eq!(parsed.interner.resolve(alias.text), "D");
}

#[test]
fn variable_declaration_needs_two_tokens_of_type() {
    // `i32 x = 1;` declares; `x = 1;` assigns.
    let parsed = parse("void f() { i32 x = 1; x = 2; }");
    assert!(parsed.codes.is_empty());
    let statements = body_statements(&parsed);
    assert!(matches!(statements[0], Statement::Variable(_)));
    assert!(matches!(statements[1], Statement::Expression(_)));
}

#[test]
fn array_typed_declaration_uses_la3() {
    let parsed = parse("void f() { Matrix[] cells; cells[0] = 1; }");
    assert!(parsed.codes.is_empty());
    let statements = body_statements(&parsed);
    assert!(matches!(statements[0], Statement::Variable(_)));
    assert!(matches!(statements[1], Statement::Expression(_)));
}

#[test]
fn variadic_parameter_parses() {
    let parsed = parse("void log(i32 level, i32 ...rest) { }");
    assert!(parsed.codes.is_empty());
    let function = only_function(&parsed);
    assert_eq!(function.fixed_parameters.len(), 1);
    let variadic = function.variadic_parameter.as_ref().expect("variadic");
    assert_eq!(parsed.interner.resolve(variadic.identifier.text), "rest");
}

#[test]
fn static_function_parses() {
    let parsed = parse("static void setup() { }");
    assert!(parsed.codes.is_empty());
    assert!(only_function(&parsed).is_static);
}

#[test]
fn empty_block_is_legal() {
    let parsed = parse("void f() { }");
    assert!(parsed.codes.is_empty());
    assert!(body_statements(&parsed).is_empty());
}

#[test]
fn structure_with_fields_and_supertypes() {
    let parsed = parse("struct Point : Object, Printable { i32 x; i32 y = 0; }");
    assert!(parsed.codes.is_empty());
    let structure = match &parsed.unit.declarations[0] {
        ComponentDeclaration::Structure(s) => s,
        other => panic!("expected structure, got {:?}", other),
    };
    assert_eq!(structure.supertypes.len(), 2);
    assert_eq!(structure.members.len(), 2);
}

#[test]
fn structure_function_member_and_constructor() {
    let parsed = parse("struct Point { i32 x; Point new(i32 x) { return this; } }");
    assert!(parsed.codes.is_empty(), "unexpected: {:?}", parsed.codes);
    let structure = match &parsed.unit.declarations[0] {
        ComponentDeclaration::Structure(s) => s,
        other => panic!("expected structure, got {:?}", other),
    };
    assert!(matches!(structure.members[0], StructureMember::Field(_)));
    assert!(matches!(structure.members[1], StructureMember::Function(_)));
}

#[test]
fn binary_chain_stores_every_pair() {
    let parsed = parse("void f() { var r = a + b - c + d; }");
    assert!(parsed.codes.is_empty());
    let statements = body_statements(&parsed);
    let Statement::Variable(declaration) = &statements[0] else {
        panic!("expected declaration");
    };
    let initializer = declaration.declarators[0].initializer.as_ref().expect("init");
    let Expression::Binary(chain) = initializer else {
        panic!("expected binary chain, got {:?}", initializer);
    };
    assert_eq!(chain.rest.len(), 3);
}

#[test]
fn conditional_and_compound_expressions_parse() {
    let parsed = parse(
        "void f() { var r = flag ? {x: 1, y: [1, 2]} : new Point(1); r >>>= 2; }",
    );
    assert!(parsed.codes.is_empty(), "unexpected: {:?}", parsed.codes);
}

#[test]
fn postfix_parts_accumulate_in_order() {
    let parsed = parse("void f() { rows[0].cells(1).length; }");
    assert!(parsed.codes.is_empty());
    let Statement::Expression(Expression::Postfix(postfix)) = &body_statements(&parsed)[0]
    else {
        panic!("expected postfix expression");
    };
    assert_eq!(postfix.parts.len(), 4);
    assert!(matches!(postfix.parts[0], PostfixPart::Subscript(_)));
    assert!(matches!(postfix.parts[1], PostfixPart::MemberAccess(_)));
    assert!(matches!(postfix.parts[2], PostfixPart::Arguments(_)));
    assert!(matches!(postfix.parts[3], PostfixPart::MemberAccess(_)));
}

#[test]
fn statements_cover_the_grammar() {
    let parsed = parse(
        "void f() {\
           ;\
           var v = 1;\
           let c = 2;\
           break out;\
           return v;\
           throw;\
           if v { } else if c { } else { }\
           #out while true { break out; }\
           for let item : v { }\
           try { } catch Error | 'panic' e { } finally { }\
         }",
    );
    assert!(parsed.codes.is_empty(), "unexpected: {:?}", parsed.codes);
}

#[test]
fn try_without_catch_or_finally_is_diagnosed() {
    let parsed = parse("void f() { try { } }");
    assert_eq!(
        parsed.codes,
        vec![DiagnosticCode::TryStatementExpectsCatchOrFinally]
    );
}

#[test]
fn missing_semicolon_reports_one_error() {
    let parsed = parse("void f() { var a = 1 var b = 2; }");
    // Recovery discards to the block's follow token; only the terminator
    // diagnostic is reported.
    assert_eq!(parsed.codes, vec![DiagnosticCode::UnexpectedToken]);
    let statements = body_statements(&parsed);
    assert_eq!(statements.len(), 1);
}

#[test]
fn garbled_statement_recovers_at_semicolon() {
    let parsed = parse("void f() { var a = ^; var b = 2; }");
    assert_eq!(parsed.codes, vec![DiagnosticCode::UnexpectedToken]);
    let statements = body_statements(&parsed);
    assert_eq!(statements.len(), 2);
}

#[test]
fn recovery_is_deterministic() {
    let source = "void f() { var = 1; g(; } struct { }";
    let first = parse(source);
    let second = parse(source);
    assert_eq!(first.codes, second.codes);
    assert_eq!(format!("{:?}", first.unit), format!("{:?}", second.unit));
}

#[test]
fn unexpected_top_level_token_is_reported_once() {
    let parsed = parse("try { }");
    assert_eq!(parsed.codes, vec![DiagnosticCode::UnexpectedToken]);
}

#[test]
fn layout_between_declarations_is_tolerated() {
    let parsed = parse("import a.b;\n\n\nvoid f() { }\n\nvoid g() { }\n");
    assert!(parsed.codes.is_empty());
    assert_eq!(parsed.unit.declarations.len(), 2);
}

#[test]
fn unit_span_covers_the_source() {
    let source = "void f() { }";
    let parsed = parse(source);
    assert_eq!(parsed.unit.span.start, 0);
    assert_eq!(parsed.unit.span.end, source.len());
}

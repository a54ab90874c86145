//! Abstract syntax tree for KUSH compilation units.
//!
//! Nodes are plain tagged variants with owned children; a parent exclusively
//! owns its subtree and no back-pointers exist. Every node carries the span
//! covering its first through last token.
//!
//! Nodes that open a lexical scope (`CompilationUnit`,
//! `StructureDeclaration`, `FunctionDeclaration`, `BlockStatement`) carry a
//! [`NodeId`] allocated by the parser. The semantic passes key their
//! scope annotations on these ids instead of mutating the tree.
//!
//! Left-associative operator chains store each `(operator, operand)` pair
//! explicitly ([`BinaryExpression::rest`]), so the tree reflects
//! left-to-right evaluation order.

use crate::token::Token;
use kush_base::Span;

/// Identity of a scope-opening AST node, unique within its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// The root production: imports followed by structure and function
/// declarations.
#[derive(Debug)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub imports: Vec<ImportDeclaration>,
    pub declarations: Vec<ComponentDeclaration>,
    pub span: Span,
}

/// `import a.b.C;`, `import a.b.*;`, or `import a.b.C as D;`.
#[derive(Debug)]
pub struct ImportDeclaration {
    /// The dotted name, one token per segment.
    pub identifiers: Vec<Token>,
    pub wildcard: bool,
    pub alias: Option<Token>,
    pub span: Span,
}

#[derive(Debug)]
pub enum ComponentDeclaration {
    Structure(StructureDeclaration),
    Function(FunctionDeclaration),
}

/// `struct Name : Super1, Super2 { members }`.
#[derive(Debug)]
pub struct StructureDeclaration {
    pub id: NodeId,
    pub identifier: Token,
    pub supertypes: Vec<Token>,
    pub members: Vec<StructureMember>,
    pub span: Span,
}

#[derive(Debug)]
pub enum StructureMember {
    Field(VariableDeclaration),
    Function(FunctionDeclaration),
}

/// A type token with its declared dimensionality (`i32[][]` has two).
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub base: Token,
    pub dimensions: usize,
}

#[derive(Debug)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub is_static: bool,
    pub return_type: TypeAnnotation,
    pub identifier: Token,
    pub fixed_parameters: Vec<FunctionParameter>,
    pub variadic_parameter: Option<FunctionParameter>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    pub base_type: TypeAnnotation,
    pub identifier: Token,
}

/// `{ statement* }`; opens a local scope.
#[derive(Debug)]
pub struct BlockStatement {
    pub id: NodeId,
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug)]
pub enum Statement {
    Variable(VariableDeclaration),
    Expression(Expression),
    Break(BreakStatement),
    Return(ReturnStatement),
    Throw(ThrowStatement),
    If(IfStatement),
    Iterative(IterativeStatement),
    Try(TryStatement),
}

/// How a variable declaration binds storage.
#[derive(Debug)]
pub enum StorageKind {
    /// `var` — inferred, mutable.
    Inferred,
    /// `let` — inferred, constant.
    Constant,
    /// An explicit type.
    Typed(TypeAnnotation),
}

#[derive(Debug)]
pub struct VariableDeclaration {
    pub kind: StorageKind,
    pub declarators: Vec<StorageDeclarator>,
    pub span: Span,
}

/// `IDENTIFIER ('=' expression)?`.
#[derive(Debug)]
pub struct StorageDeclarator {
    pub identifier: Token,
    pub initializer: Option<Expression>,
}

#[derive(Debug)]
pub struct BreakStatement {
    pub keyword: Token,
    pub label: Option<Token>,
    pub span: Span,
}

#[derive(Debug)]
pub struct ReturnStatement {
    pub keyword: Token,
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug)]
pub struct ThrowStatement {
    pub keyword: Token,
    pub expression: Option<Expression>,
    pub span: Span,
}

#[derive(Debug)]
pub struct IfStatement {
    pub if_clause: IfClause,
    pub else_if_clauses: Vec<IfClause>,
    pub else_clause: Option<BlockStatement>,
    pub span: Span,
}

#[derive(Debug)]
pub struct IfClause {
    pub keyword: Token,
    pub condition: Expression,
    pub body: BlockStatement,
    pub span: Span,
}

/// `#label? (while | for)` — a possibly labeled loop.
#[derive(Debug)]
pub struct IterativeStatement {
    pub label: Option<Token>,
    pub kind: IterativeKind,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug)]
pub enum IterativeKind {
    While {
        keyword: Token,
        condition: Expression,
    },
    /// `for let x : sequence` — for-each over a sequence.
    For {
        keyword: Token,
        parameter: Token,
        sequence: Expression,
    },
}

#[derive(Debug)]
pub struct TryStatement {
    pub keyword: Token,
    pub try_clause: BlockStatement,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_clause: Option<BlockStatement>,
    pub span: Span,
}

/// `catch (filter ('|' filter)*)? IDENTIFIER block`.
#[derive(Debug)]
pub struct CatchClause {
    pub keyword: Token,
    /// String-literal or identifier filters; empty means catch-all.
    pub captures: Vec<Token>,
    pub parameter: Token,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug)]
pub enum Expression {
    Assignment(AssignmentExpression),
    Conditional(ConditionalExpression),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Postfix(PostfixExpression),
    /// A primary identifier reference.
    Identifier(Token),
    /// Integer, floating-point, and string literals, plus the keyword
    /// literals `true`, `false`, `null`, and `this`.
    Literal(Token),
    Grouped(GroupedExpression),
    Initializer(InitializerExpression),
    Array(ArrayExpression),
    New(NewExpression),
    /// Placeholder produced during panic-mode recovery; the token is the
    /// lookahead that failed to start an expression. Semantic passes skip
    /// these subtrees.
    Error(Token),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Assignment(e) => e.span,
            Expression::Conditional(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Postfix(e) => e.span,
            Expression::Identifier(t) | Expression::Literal(t) | Expression::Error(t) => t.span,
            Expression::Grouped(e) => e.span,
            Expression::Initializer(e) => e.span,
            Expression::Array(e) => e.span,
            Expression::New(e) => e.span,
        }
    }
}

/// `conditional assignmentOperator assignment` — right associative.
#[derive(Debug)]
pub struct AssignmentExpression {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub span: Span,
}

/// `condition '?' then ':' else`.
#[derive(Debug)]
pub struct ConditionalExpression {
    pub condition: Box<Expression>,
    pub then_expression: Box<Expression>,
    pub else_expression: Box<Expression>,
    pub span: Span,
}

/// A left-associative operator chain at one precedence level.
///
/// `rest` is non-empty; a chain with no operators is represented by its
/// operand directly.
#[derive(Debug)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub rest: Vec<(Token, Expression)>,
    pub span: Span,
}

#[derive(Debug)]
pub struct UnaryExpression {
    pub operator: Token,
    pub operand: Box<Expression>,
    pub span: Span,
}

/// A primary expression followed by one or more postfix parts.
///
/// `parts` is non-empty; a bare primary is represented by itself.
#[derive(Debug)]
pub struct PostfixExpression {
    pub primary: Box<Expression>,
    pub parts: Vec<PostfixPart>,
    pub span: Span,
}

#[derive(Debug)]
pub enum PostfixPart {
    Subscript(Subscript),
    Arguments(FunctionArguments),
    MemberAccess(MemberAccess),
}

/// `'[' expression ']'`.
#[derive(Debug)]
pub struct Subscript {
    pub bracket: Token,
    pub index: Expression,
    pub span: Span,
}

/// `'(' expressions? ')'`.
#[derive(Debug)]
pub struct FunctionArguments {
    pub parenthesis: Token,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

/// `'.' IDENTIFIER`.
#[derive(Debug)]
pub struct MemberAccess {
    pub dot: Token,
    pub identifier: Token,
}

/// `'(' expression ')'`.
#[derive(Debug)]
pub struct GroupedExpression {
    pub inner: Box<Expression>,
    pub span: Span,
}

/// `'{' (IDENTIFIER ':' expression (',' ...)*)? '}'`.
#[derive(Debug)]
pub struct InitializerExpression {
    pub entries: Vec<(Token, Expression)>,
    pub span: Span,
}

/// `'[' expressions? ']'`.
#[derive(Debug)]
pub struct ArrayExpression {
    pub elements: Vec<Expression>,
    pub span: Span,
}

/// `'new' IDENTIFIER arguments?`.
#[derive(Debug)]
pub struct NewExpression {
    pub keyword: Token,
    pub type_name: Token,
    pub arguments: Option<FunctionArguments>,
    pub span: Span,
}

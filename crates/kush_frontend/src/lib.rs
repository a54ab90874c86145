//! # kush-frontend
//!
//! The front-end of the KUSH compiler: a hand-written lexer, a
//! recursive-descent parser with panic-mode recovery, and a two-pass
//! semantic analyzer that turn source text into a resolved, scoped AST.
//!
//! ## Quick Start
//!
//! ```
//! use kush_frontend::Session;
//!
//! let batch = Session::default().compile("sample.k", "void main() { var x = 1; }");
//! assert!(batch.succeeded());
//! ```
//!
//! ## Architecture
//!
//! The pipeline is strictly linear per compilation unit:
//!
//! 1. **Lexer** ([`lexer`]) — byte stream to tokens, with an
//!    indentation-stack layout model, an enclosure counter that suppresses
//!    layout inside `()`/`[]`/`{}`, and hidden-channel trivia.
//!
//! 2. **Token stream** ([`stream`]) — buffered `LA(k)` lookahead over the
//!    default channel.
//!
//! 3. **Parser** ([`parser`]) — predictive recursive descent over the
//!    grammar, recovering at follow tokens contributed by each active rule.
//!
//! 4. **Definition pass** ([`analysis::definition`]) — scope tree
//!    construction and symbol registration, including function overload
//!    sets with the parameter-threshold rule.
//!
//! 5. **Resolution pass** ([`analysis::resolution`]) — name binding,
//!    placeholder/value classification of assignment targets, inheritance
//!    link-up, and import wiring through the global registry.
//!
//! Across a batch, phases 4 and 5 run in bulk: every unit is defined before
//! any unit resolves, so cross-unit references need no forward
//! declarations.
//!
//! ## Diagnostics
//!
//! No error is fatal. Every phase reports structured diagnostics with
//! stable codes into one [`DiagnosticSink`] and continues; a compilation
//! fails iff the sink is non-empty at the end.

pub mod analysis;
pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod registry;
pub mod scope;
pub mod session;
pub mod stream;
pub mod style;
pub mod suggest;
pub mod symbol;
pub mod token;

pub use analysis::resolution::KERNEL_QUALIFIED_NAME;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Phase};
pub use lexer::Lexer;
pub use parser::Parser;
pub use printer::AstPrinter;
pub use registry::Registry;
pub use scope::{Scope, ScopeId, ScopeKind, SymbolTable};
pub use session::{Batch, CompileOptions, Session, SourceFile, Unit};
pub use stream::TokenStream;
pub use symbol::{Symbol, SymbolId, SymbolKind};
pub use token::{Channel, FileId, Token, TokenKind};

// Re-export the structural atoms for consumers of the resolved tree.
pub use kush_base::{Interner, Name, Span};

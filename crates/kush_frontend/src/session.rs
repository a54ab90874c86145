//! Batch compilation driver.
//!
//! A [`Session`] drives the front-end pipeline per compilation unit —
//! source bytes → tokens → AST — and then runs the semantic passes in two
//! bulk phases across the whole batch: the definition pass over *every*
//! unit populates the global registry before the resolution pass binds a
//! single name. That ordering is what lets units reference classes from
//! sibling units without forward declarations.
//!
//! ```
//! use kush_frontend::{Session, SourceFile};
//!
//! let batch = Session::default()
//!     .compile_batch(vec![SourceFile::new("sample.k", "void main() { }")]);
//! assert!(batch.succeeded());
//! ```

use crate::analysis::definition::define_unit;
use crate::analysis::resolution::resolve_unit;
use crate::analysis::{AnalysisContext, ScopeMap};
use crate::ast::CompilationUnit;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::registry::Registry;
use crate::scope::{ScopeId, SymbolTable};
use crate::stream::TokenStream;
use crate::token::{FileId, Token};
use kush_base::Interner;

/// Batch-level configuration.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Set when compiling the core library itself; suppresses the implicit
    /// kernel import.
    pub core_library: bool,
    /// Package assigned to files that do not carry their own.
    pub default_package: String,
}

/// One input file: an opaque path (used for diagnostics and the synthetic
/// class name), an optional package, and the UTF-8 source text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub package: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            package: String::new(),
            text: text.into(),
        }
    }

    pub fn with_package(
        path: impl Into<String>,
        package: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            package: package.into(),
            text: text.into(),
        }
    }
}

/// The per-unit artifacts a batch retains after compilation.
#[derive(Debug)]
pub struct Unit {
    pub file: FileId,
    pub path: String,
    pub text: String,
    /// The full token list, hidden channel included.
    pub tokens: Vec<Token>,
    pub ast: CompilationUnit,
    /// Scope annotations keyed by scope-opening node identity.
    pub scopes: ScopeMap,
    /// The unit's root scope.
    pub root_scope: ScopeId,
}

/// Everything a batch compilation produced.
#[derive(Debug)]
pub struct Batch {
    pub units: Vec<Unit>,
    pub diagnostics: Vec<Diagnostic>,
    pub table: SymbolTable,
    pub registry: Registry,
    pub interner: Interner,
}

impl Batch {
    /// A compilation fails iff at least one diagnostic accumulated.
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn unit(&self, file: FileId) -> Option<&Unit> {
        self.units.iter().find(|u| u.file == file)
    }

    /// Renders every diagnostic against its unit's source.
    pub fn render_diagnostics(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let (source, path) = self
                .unit(diagnostic.file)
                .map(|u| (u.text.as_str(), u.path.as_str()))
                .unwrap_or(("", "<unknown>"));
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&diagnostic.display_with_source(source, path));
        }
        out
    }
}

/// Drives front-end compilation of one or more units.
#[derive(Debug, Default)]
pub struct Session {
    options: CompileOptions,
}

impl Session {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Compiles a single unit.
    pub fn compile(self, path: impl Into<String>, text: impl Into<String>) -> Batch {
        self.compile_batch(vec![SourceFile::new(path, text)])
    }

    /// Compiles a batch of units: lex and parse each, then the definition
    /// pass over all units, then the resolution pass over all units.
    pub fn compile_batch(self, files: Vec<SourceFile>) -> Batch {
        let mut interner = Interner::new();
        let mut sink = DiagnosticSink::new();
        let mut table = SymbolTable::new();
        let mut registry = Registry::new();

        struct Staged {
            file: FileId,
            path: String,
            package: String,
            text: String,
            tokens: Vec<Token>,
            ast: CompilationUnit,
            scopes: ScopeMap,
            root_scope: Option<ScopeId>,
        }

        let mut staged: Vec<Staged> = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let file_id = FileId(index as u32);
            let tokens =
                Lexer::new(&file.text, file_id, &mut interner, &mut sink).tokenize();
            let stream = TokenStream::new(tokens.clone());
            let ast = Parser::new(stream, &mut interner, &mut sink).parse();

            let package = if file.package.is_empty() {
                self.options.default_package.clone()
            } else {
                file.package
            };

            staged.push(Staged {
                file: file_id,
                path: file.path,
                package,
                text: file.text,
                tokens,
                ast,
                scopes: ScopeMap::new(),
                root_scope: None,
            });
        }

        // Definition phase: every unit registers its classes before any
        // name is bound.
        for unit in &mut staged {
            let stem = file_stem(&unit.path).to_string();
            let mut ctx = AnalysisContext {
                table: &mut table,
                registry: &mut registry,
                interner: &mut interner,
                sink: &mut sink,
            };
            let root = define_unit(&unit.ast, &mut ctx, &mut unit.scopes, &stem, &unit.package);
            unit.root_scope = Some(root);
        }

        // Resolution phase: the registry is read-only from here on.
        for unit in &staged {
            let mut ctx = AnalysisContext {
                table: &mut table,
                registry: &mut registry,
                interner: &mut interner,
                sink: &mut sink,
            };
            resolve_unit(&unit.ast, &mut ctx, &unit.scopes, self.options.core_library);
        }

        let units = staged
            .into_iter()
            .map(|unit| Unit {
                file: unit.file,
                path: unit.path,
                text: unit.text,
                tokens: unit.tokens,
                ast: unit.ast,
                root_scope: unit.root_scope.unwrap_or(ScopeId(0)),
                scopes: unit.scopes,
            })
            .collect();

        Batch {
            units,
            diagnostics: sink.into_diagnostics(),
            table,
            registry,
            interner,
        }
    }
}

/// Extracts the file stem: the final path segment without its extension.
/// Names the synthetic class that owns a unit's free functions.
fn file_stem(path: &str) -> &str {
    let name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

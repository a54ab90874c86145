//! The two semantic passes over parsed compilation units.
//!
//! [`definition`] builds the scope tree and registers symbols; it runs over
//! every unit of a batch before [`resolution`] binds any identifier, so
//! cross-unit references need no forward declarations. Both passes share an
//! [`AnalysisContext`] — the batch's symbol table, global registry,
//! interner, and diagnostic sink — and communicate through the per-unit
//! [`ScopeMap`], which records the scope each scope-opening AST node
//! produced.

pub mod definition;
pub mod resolution;

use crate::ast::NodeId;
use crate::diagnostics::DiagnosticSink;
use crate::registry::Registry;
use crate::scope::{ScopeId, SymbolTable};
use kush_base::Interner;
use std::collections::HashMap;

/// Side table from a scope-opening AST node to the scope it opened.
pub type ScopeMap = HashMap<NodeId, ScopeId>;

/// The shared mutable state both passes operate on.
pub struct AnalysisContext<'a> {
    pub table: &'a mut SymbolTable,
    pub registry: &'a mut Registry,
    pub interner: &'a mut Interner,
    pub sink: &'a mut DiagnosticSink,
}

//! The global symbol registry shared across a batch's compilation units.
//!
//! Maps fully qualified class names (`package.Name`, interned) to class
//! symbols. The definition phase is the only writer; once resolution
//! begins, the registry is read-only. It lives and dies with its batch.

use crate::symbol::SymbolId;
use kush_base::Name;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Registry {
    classes: HashMap<Name, SymbolId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class under its qualified name. A later registration of
    /// the same name wins; duplicate class declarations are diagnosed at
    /// their declaration site, not here.
    pub fn register(&mut self, qualified_name: Name, symbol: SymbolId) {
        self.classes.insert(qualified_name, symbol);
    }

    pub fn resolve(&self, qualified_name: Name) -> Option<SymbolId> {
        self.classes.get(&qualified_name).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

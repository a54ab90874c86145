//! Lexical scopes and the batch-wide symbol table.
//!
//! Scopes form a tree: every scope except a compilation-unit root has a
//! parent, and a scope's parent chain always terminates at its unit's root.
//! Scopes and symbols live in index arenas owned by one [`SymbolTable`] per
//! batch, so external symbols can point across compilation units without
//! ownership cycles.

use crate::symbol::{Symbol, SymbolId, SymbolKind};
use kush_base::Name;
use std::collections::HashMap;

/// Index of a scope in the batch-wide scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    CompilationUnit,
    Class,
    Function,
    Local,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// `None` only for a compilation-unit root.
    pub parent: Option<ScopeId>,
    pub symbols: HashMap<Name, SymbolId>,
    /// The class or function symbol that owns this scope, if any.
    pub owner: Option<SymbolId>,
}

/// Owns every scope and symbol of a batch.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            symbols: HashMap::new(),
            owner: None,
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// Binds `name` to `symbol` in the given scope.
    pub fn define(&mut self, scope: ScopeId, name: Name, symbol: SymbolId) {
        self.scope_mut(scope).symbols.insert(name, symbol);
    }

    /// Looks `name` up in one scope only.
    pub fn lookup_local(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        self.scope(scope).symbols.get(&name).copied()
    }

    /// Resolves `name` through the scope chain, innermost first.
    pub fn resolve(&self, scope: ScopeId, name: Name) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(&symbol) = self.scope(id).symbols.get(&name) {
                return Some(symbol);
            }
            current = self.scope(id).parent;
        }
        None
    }

    /// Follows an external symbol through to its registry target.
    pub fn target(&self, id: SymbolId) -> SymbolId {
        match self.symbol(id).kind {
            SymbolKind::External { target } => target,
            _ => id,
        }
    }

    /// Finds the nearest enclosing scope of the given kind, starting from
    /// `scope` itself.
    pub fn enclosing(&self, scope: ScopeId, kind: ScopeKind) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scope(id).kind == kind {
                return Some(id);
            }
            current = self.scope(id).parent;
        }
        None
    }

    /// Iterates every symbol in the batch, in creation order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Every name visible from `scope`, for did-you-mean suggestions.
    pub fn visible_names(&self, scope: ScopeId) -> Vec<Name> {
        let mut names = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            names.extend(self.scope(id).symbols.keys().copied());
            current = self.scope(id).parent;
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Modifiers;
    use kush_base::Interner;

    fn storage_symbol(name: Name, scope: ScopeId) -> Symbol {
        Symbol {
            name,
            declaration: None,
            enclosing_scope: scope,
            modifiers: Modifiers::default(),
            external: false,
            kind: SymbolKind::Variable,
        }
    }

    #[test]
    fn resolve_walks_the_parent_chain() {
        let mut interner = Interner::new();
        let mut table = SymbolTable::new();
        let unit = table.new_scope(ScopeKind::CompilationUnit, None);
        let function = table.new_scope(ScopeKind::Function, Some(unit));
        let local = table.new_scope(ScopeKind::Local, Some(function));

        let name = interner.intern("total");
        let symbol = table.add_symbol(storage_symbol(name, unit));
        table.define(unit, name, symbol);

        assert_eq!(table.resolve(local, name), Some(symbol));
        assert_eq!(table.lookup_local(local, name), None);
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut interner = Interner::new();
        let mut table = SymbolTable::new();
        let unit = table.new_scope(ScopeKind::CompilationUnit, None);
        let local = table.new_scope(ScopeKind::Local, Some(unit));

        let name = interner.intern("x");
        let outer = table.add_symbol(storage_symbol(name, unit));
        let inner = table.add_symbol(storage_symbol(name, local));
        table.define(unit, name, outer);
        table.define(local, name, inner);

        assert_eq!(table.resolve(local, name), Some(inner));
        assert_eq!(table.resolve(unit, name), Some(outer));
    }

    #[test]
    fn external_symbols_deref_to_their_target() {
        let mut interner = Interner::new();
        let mut table = SymbolTable::new();
        let unit = table.new_scope(ScopeKind::CompilationUnit, None);

        let name = interner.intern("Widget");
        let target = table.add_symbol(storage_symbol(name, unit));
        let external = table.add_symbol(Symbol {
            name,
            declaration: None,
            enclosing_scope: unit,
            modifiers: Modifiers::default(),
            external: true,
            kind: SymbolKind::External { target },
        });

        assert_eq!(table.target(external), target);
        assert_eq!(table.target(target), target);
    }

    #[test]
    fn enclosing_finds_nearest_kind() {
        let mut table = SymbolTable::new();
        let unit = table.new_scope(ScopeKind::CompilationUnit, None);
        let class = table.new_scope(ScopeKind::Class, Some(unit));
        let function = table.new_scope(ScopeKind::Function, Some(class));
        let local = table.new_scope(ScopeKind::Local, Some(function));

        assert_eq!(table.enclosing(local, ScopeKind::Class), Some(class));
        assert_eq!(
            table.enclosing(local, ScopeKind::CompilationUnit),
            Some(unit)
        );
        assert_eq!(table.enclosing(unit, ScopeKind::Function), None);
    }
}

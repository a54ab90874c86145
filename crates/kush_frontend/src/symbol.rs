//! Symbols: the named entities the semantic passes declare and bind.
//!
//! A symbol records its declaring identifier token (absent for synthesized
//! entities such as the file-stem class), its enclosing scope, modifier
//! flags, and a kind-specific payload. Function symbols hold an overload
//! set of [`FunctionSignature`]s governed by the parameter-threshold rule;
//! class symbols hold their qualified name, their member scope, and the
//! superclass links the resolution pass fills in.

use crate::scope::ScopeId;
use crate::token::Token;
use kush_base::Name;

/// Index of a symbol in the batch-wide symbol arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Modifier flags carried by symbols and signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_variadic: bool,
}

#[derive(Debug)]
pub struct Symbol {
    pub name: Name,
    /// The declaring identifier token; `None` for synthesized symbols.
    pub declaration: Option<Token>,
    /// The scope the symbol is declared in.
    pub enclosing_scope: ScopeId,
    pub modifiers: Modifiers,
    /// Set for symbols imported from outside the current compilation unit.
    pub external: bool,
    pub kind: SymbolKind,
}

#[derive(Debug)]
pub enum SymbolKind {
    Variable,
    Constant,
    Label,
    Function(FunctionType),
    Class(ClassType),
    /// A view over a symbol from the global registry; lookups follow
    /// through to the target.
    External { target: SymbolId },
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable | SymbolKind::Constant)
    }

    pub fn function(&self) -> Option<&FunctionType> {
        match &self.kind {
            SymbolKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionType> {
        match &mut self.kind {
            SymbolKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<&ClassType> {
        match &self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn class_mut(&mut self) -> Option<&mut ClassType> {
        match &mut self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// The overload set of a function name within one scope.
#[derive(Debug, Default)]
pub struct FunctionType {
    pub signatures: Vec<FunctionSignature>,
    /// Fixed-parameter count of the variadic overload, once one exists.
    /// Every non-variadic overload must stay strictly below it.
    pub parameter_threshold: Option<usize>,
}

impl FunctionType {
    /// Finds the signature declared with the given fixed-parameter count.
    pub fn signature_by_arity(&self, fixed: usize) -> Option<&FunctionSignature> {
        self.signatures
            .iter()
            .find(|s| s.fixed_parameters.len() == fixed)
    }

    pub fn signature_by_arity_mut(&mut self, fixed: usize) -> Option<&mut FunctionSignature> {
        self.signatures
            .iter_mut()
            .find(|s| s.fixed_parameters.len() == fixed)
    }
}

/// One overload: its parameter shape and modifiers.
#[derive(Debug)]
pub struct FunctionSignature {
    pub fixed_parameters: Vec<ParameterDescriptor>,
    pub variadic_parameter: Option<ParameterDescriptor>,
    pub modifiers: Modifiers,
    /// Allocated in declaration order within the enclosing class during the
    /// resolution pass.
    pub table_index: Option<u32>,
}

/// A formal parameter as recorded in a signature.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub type_name: Name,
    pub dimensions: usize,
    pub name: Name,
}

/// Class payload: qualified name, member scope, superclass links.
#[derive(Debug)]
pub struct ClassType {
    /// `package.Name`, interned.
    pub qualified_name: Name,
    pub class_scope: ScopeId,
    /// Filled during resolution; identities into the symbol arena, not
    /// ownership.
    pub superclasses: Vec<SymbolId>,
}

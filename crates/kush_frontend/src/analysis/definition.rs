//! The definition pass: scope construction and symbol registration.
//!
//! A preorder walk over one unit's AST that installs the compilation-unit
//! scope, opens class/function/local scopes (recording each in the unit's
//! [`ScopeMap`]), and defines symbols for every declaration. Redeclarations
//! are diagnosed with a code naming the offending declaration's flavor;
//! erroneous declarations are suppressed but the walk continues.
//!
//! Functions declared outside any structure attach to a synthesized class
//! named after the source file's stem, created lazily on the first such
//! function and registered in the global registry like any other class.

use super::{AnalysisContext, ScopeMap};
use crate::ast::{
    BlockStatement, CompilationUnit, ComponentDeclaration, FunctionDeclaration, IterativeKind,
    Statement, StorageKind, StructureDeclaration, StructureMember, VariableDeclaration,
};
use crate::diagnostics::DiagnosticCode;
use crate::scope::{ScopeId, ScopeKind};
use crate::symbol::{
    ClassType, FunctionSignature, FunctionType, Modifiers, ParameterDescriptor, Symbol,
    SymbolId, SymbolKind,
};
use crate::token::Token;

/// Runs the definition pass over one unit, returning its root scope.
pub fn define_unit(
    unit: &CompilationUnit,
    ctx: &mut AnalysisContext<'_>,
    scopes: &mut ScopeMap,
    file_stem: &str,
    package: &str,
) -> ScopeId {
    let unit_scope = ctx.table.new_scope(ScopeKind::CompilationUnit, None);
    scopes.insert(unit.id, unit_scope);

    let mut pass = Definition {
        ctx,
        scopes,
        current: unit_scope,
        unit_scope,
        file_class_scope: None,
        file_stem,
        package,
    };

    for declaration in &unit.declarations {
        match declaration {
            ComponentDeclaration::Structure(structure) => pass.define_structure(structure),
            ComponentDeclaration::Function(function) => pass.define_top_level_function(function),
        }
    }

    unit_scope
}

struct Definition<'a, 'c> {
    ctx: &'c mut AnalysisContext<'a>,
    scopes: &'c mut ScopeMap,
    current: ScopeId,
    unit_scope: ScopeId,
    file_class_scope: Option<ScopeId>,
    file_stem: &'c str,
    package: &'c str,
}

impl<'a, 'c> Definition<'a, 'c> {
    fn qualified_name(&mut self, name: &str) -> kush_base::Name {
        if self.package.is_empty() {
            self.ctx.interner.intern(name)
        } else {
            self.ctx.interner.intern(&format!("{}.{}", self.package, name))
        }
    }

    /// Lazily synthesizes the class that owns the unit's free functions.
    fn ensure_file_class(&mut self) -> ScopeId {
        if let Some(scope) = self.file_class_scope {
            return scope;
        }

        let class_scope = self.ctx.table.new_scope(ScopeKind::Class, Some(self.unit_scope));
        let stem = self.file_stem;
        let name = self.ctx.interner.intern(stem);
        let qualified_name = self.qualified_name(stem);

        let symbol = self.ctx.table.add_symbol(Symbol {
            name,
            declaration: None,
            enclosing_scope: self.unit_scope,
            modifiers: Modifiers::default(),
            external: false,
            kind: SymbolKind::Class(ClassType {
                qualified_name,
                class_scope,
                superclasses: Vec::new(),
            }),
        });
        self.ctx.table.scope_mut(class_scope).owner = Some(symbol);
        self.ctx.table.define(self.unit_scope, name, symbol);
        self.ctx.registry.register(qualified_name, symbol);

        self.file_class_scope = Some(class_scope);
        class_scope
    }

    fn define_top_level_function(&mut self, function: &FunctionDeclaration) {
        let class_scope = self.ensure_file_class();
        let saved = self.current;
        self.current = class_scope;
        self.define_function(function);
        self.current = saved;
    }

    fn define_structure(&mut self, structure: &StructureDeclaration) {
        let class_scope = self.ctx.table.new_scope(ScopeKind::Class, Some(self.current));
        self.scopes.insert(structure.id, class_scope);

        let name = structure.identifier.text;
        let text = self.ctx.interner.resolve(name).to_string();
        let qualified_name = self.qualified_name(&text);

        let symbol = self.ctx.table.add_symbol(Symbol {
            name,
            declaration: Some(structure.identifier),
            enclosing_scope: self.current,
            modifiers: Modifiers::default(),
            external: false,
            kind: SymbolKind::Class(ClassType {
                qualified_name,
                class_scope,
                superclasses: Vec::new(),
            }),
        });
        self.ctx.table.scope_mut(class_scope).owner = Some(symbol);

        if self.ctx.table.lookup_local(self.current, name).is_some() {
            self.ctx
                .sink
                .semantic(DiagnosticCode::RedeclarationOfSymbolAsClass, &structure.identifier);
        } else {
            self.ctx.table.define(self.current, name, symbol);
            self.ctx.registry.register(qualified_name, symbol);
        }

        let saved = self.current;
        self.current = class_scope;
        for member in &structure.members {
            match member {
                StructureMember::Field(field) => self.define_variable_declaration(field),
                StructureMember::Function(function) => self.define_function(function),
            }
        }
        self.current = saved;
    }

    fn define_function(&mut self, function: &FunctionDeclaration) {
        let fixed_count = function.fixed_parameters.len();
        let has_variadic = function.variadic_parameter.is_some();

        if function.is_static && (fixed_count > 0 || has_variadic) {
            self.ctx.sink.semantic(
                DiagnosticCode::StaticInitializerWithParameters,
                &function.identifier,
            );
        } else {
            let name = function.identifier.text;
            match self.ctx.table.lookup_local(self.current, name) {
                Some(existing) => {
                    if self.ctx.table.symbol(existing).is_function() {
                        self.declare_overloaded_function(existing, function);
                    } else {
                        self.ctx.sink.semantic(
                            DiagnosticCode::RedeclarationOfSymbolAsFunction,
                            &function.identifier,
                        );
                    }
                }
                None => self.declare_function(function),
            }
        }

        // A function scope opens regardless of the declaration being
        // erroneous, so the body still defines and resolves.
        let function_scope = self.ctx.table.new_scope(ScopeKind::Function, Some(self.current));
        self.scopes.insert(function.id, function_scope);

        let saved = self.current;
        self.current = function_scope;

        for parameter in &function.fixed_parameters {
            self.define_parameter(
                parameter.identifier,
                Modifiers::default(),
                DiagnosticCode::RedeclarationOfSymbolAsParameter,
            );
        }
        if let Some(parameter) = &function.variadic_parameter {
            self.define_parameter(
                parameter.identifier,
                Modifiers {
                    is_variadic: true,
                    ..Modifiers::default()
                },
                DiagnosticCode::RedeclarationOfSymbolAsVariableParameter,
            );
        }

        self.define_block(&function.body);
        self.current = saved;
    }

    fn signature_of(&mut self, function: &FunctionDeclaration) -> FunctionSignature {
        let descriptor = |p: &crate::ast::FunctionParameter| ParameterDescriptor {
            type_name: p.base_type.base.text,
            dimensions: p.base_type.dimensions,
            name: p.identifier.text,
        };

        FunctionSignature {
            fixed_parameters: function.fixed_parameters.iter().map(descriptor).collect(),
            variadic_parameter: function.variadic_parameter.as_ref().map(descriptor),
            modifiers: Modifiers {
                is_static: function.is_static,
                is_variadic: function.variadic_parameter.is_some(),
            },
            table_index: None,
        }
    }

    fn declare_function(&mut self, function: &FunctionDeclaration) {
        let signature = self.signature_of(function);
        let parameter_threshold = function
            .variadic_parameter
            .as_ref()
            .map(|_| function.fixed_parameters.len());

        let symbol = self.ctx.table.add_symbol(Symbol {
            name: function.identifier.text,
            declaration: Some(function.identifier),
            enclosing_scope: self.current,
            modifiers: Modifiers {
                is_static: function.is_static,
                ..Modifiers::default()
            },
            external: false,
            kind: SymbolKind::Function(FunctionType {
                signatures: vec![signature],
                parameter_threshold,
            }),
        });
        self.ctx
            .table
            .define(self.current, function.identifier.text, symbol);
    }

    /// Adds an overload to an existing function symbol, enforcing the
    /// overload-set rules.
    ///
    /// If an overload with `k` fixed parameters declares a variadic tail,
    /// `k` becomes the set's parameter threshold and every non-variadic
    /// overload must declare strictly fewer fixed parameters.
    fn declare_overloaded_function(&mut self, existing: SymbolId, function: &FunctionDeclaration) {
        let fixed_count = function.fixed_parameters.len();
        let has_variadic = function.variadic_parameter.is_some();

        let Some(function_type) = self.ctx.table.symbol(existing).function() else {
            return;
        };
        let mut threshold = function_type.parameter_threshold;
        let shapes: Vec<(usize, bool)> = function_type
            .signatures
            .iter()
            .map(|s| (s.fixed_parameters.len(), s.variadic_parameter.is_some()))
            .collect();

        // The declaration being processed may itself establish the
        // threshold.
        if threshold.is_none() && has_variadic {
            threshold = Some(fixed_count);
        }

        let mut error = false;
        for (fixed, variadic) in shapes {
            if variadic && has_variadic {
                let token = function
                    .variadic_parameter
                    .as_ref()
                    .map(|p| p.identifier)
                    .unwrap_or(function.identifier);
                self.ctx.sink.semantic(
                    DiagnosticCode::MultipleFunctionOverloadsWithVariableParameter,
                    &token,
                );
                error = true;
            } else if fixed == fixed_count && !variadic && !has_variadic {
                self.ctx.sink.semantic(
                    DiagnosticCode::DuplicateFunctionOverload,
                    &function.identifier,
                );
                error = true;
                break;
            } else if has_variadic {
                // The new threshold may invalidate previously legal
                // overloads; the report points at the declaration that
                // caused it.
                if threshold.map_or(false, |t| fixed >= t) {
                    self.ctx.sink.semantic(
                        DiagnosticCode::FunctionDeclarationCausesAnotherFunctionToExceedParameterThreshold,
                        &function.identifier,
                    );
                    error = true;
                }
            } else if threshold.map_or(false, |t| fixed_count >= t) {
                self.ctx.sink.semantic(
                    DiagnosticCode::FunctionDeclarationExceedsParameterThreshold,
                    &function.identifier,
                );
                error = true;
                break;
            }
        }

        let signature = if error {
            None
        } else {
            Some(self.signature_of(function))
        };
        if let Some(function_type) = self.ctx.table.symbol_mut(existing).function_mut() {
            function_type.parameter_threshold = threshold;
            if let Some(signature) = signature {
                function_type.signatures.push(signature);
            }
        }
    }

    fn define_block(&mut self, block: &BlockStatement) {
        let scope = self.ctx.table.new_scope(ScopeKind::Local, Some(self.current));
        self.scopes.insert(block.id, scope);

        let saved = self.current;
        self.current = scope;
        for statement in &block.statements {
            self.define_statement(statement);
        }
        self.current = saved;
    }

    /// Opens the block's scope with a parameter (loop or catch variable)
    /// pre-defined inside it.
    fn define_block_with_parameter(
        &mut self,
        block: &BlockStatement,
        parameter: Token,
        kind: SymbolKind,
        code: DiagnosticCode,
    ) {
        let scope = self.ctx.table.new_scope(ScopeKind::Local, Some(self.current));
        self.scopes.insert(block.id, scope);

        let saved = self.current;
        self.current = scope;
        if self.ctx.table.resolve(self.current, parameter.text).is_some() {
            self.ctx.sink.semantic(code, &parameter);
        } else {
            self.insert_symbol(parameter, kind, Modifiers::default());
        }
        for statement in &block.statements {
            self.define_statement(statement);
        }
        self.current = saved;
    }

    /// Parameters may not redeclare any name visible from the function
    /// scope.
    fn define_parameter(&mut self, token: Token, modifiers: Modifiers, code: DiagnosticCode) {
        if self.ctx.table.resolve(self.current, token.text).is_some() {
            self.ctx.sink.semantic(code, &token);
        } else {
            self.insert_symbol(token, SymbolKind::Constant, modifiers);
        }
    }

    fn define_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Variable(declaration) => self.define_variable_declaration(declaration),
            Statement::Expression(_)
            | Statement::Break(_)
            | Statement::Return(_)
            | Statement::Throw(_) => {}
            Statement::If(statement) => {
                self.define_block(&statement.if_clause.body);
                for clause in &statement.else_if_clauses {
                    self.define_block(&clause.body);
                }
                if let Some(block) = &statement.else_clause {
                    self.define_block(block);
                }
            }
            Statement::Iterative(statement) => {
                if let Some(label) = statement.label {
                    self.define_label(label);
                }
                match &statement.kind {
                    IterativeKind::While { .. } => self.define_block(&statement.body),
                    IterativeKind::For { parameter, .. } => self.define_block_with_parameter(
                        &statement.body,
                        *parameter,
                        SymbolKind::Variable,
                        DiagnosticCode::RedeclarationOfSymbolAsLoopParameter,
                    ),
                }
            }
            Statement::Try(statement) => {
                self.define_block(&statement.try_clause);
                for clause in &statement.catch_clauses {
                    self.define_block_with_parameter(
                        &clause.body,
                        clause.parameter,
                        SymbolKind::Constant,
                        DiagnosticCode::RedeclarationOfSymbolAsCatchParameter,
                    );
                }
                if let Some(block) = &statement.finally_clause {
                    self.define_block(block);
                }
            }
        }
    }

    fn define_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        let constant = matches!(declaration.kind, StorageKind::Constant);
        let code = if constant {
            DiagnosticCode::RedeclarationOfSymbolAsConstant
        } else {
            DiagnosticCode::RedeclarationOfSymbolAsVariable
        };

        for declarator in &declaration.declarators {
            let kind = if constant {
                SymbolKind::Constant
            } else {
                SymbolKind::Variable
            };
            self.define_storage(declarator.identifier, kind, Modifiers::default(), code);
        }
    }

    fn define_storage(
        &mut self,
        token: Token,
        kind: SymbolKind,
        modifiers: Modifiers,
        code: DiagnosticCode,
    ) {
        if self.ctx.table.lookup_local(self.current, token.text).is_some() {
            self.ctx.sink.semantic(code, &token);
            return;
        }
        self.insert_symbol(token, kind, modifiers);
    }

    fn insert_symbol(&mut self, token: Token, kind: SymbolKind, modifiers: Modifiers) {
        let symbol = self.ctx.table.add_symbol(Symbol {
            name: token.text,
            declaration: Some(token),
            enclosing_scope: self.current,
            modifiers,
            external: false,
            kind,
        });
        self.ctx.table.define(self.current, token.text, symbol);
    }

    fn define_label(&mut self, token: Token) {
        self.define_storage(
            token,
            SymbolKind::Label,
            Modifiers::default(),
            DiagnosticCode::RedeclarationOfSymbolAsLabel,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::DiagnosticCode;
    use crate::session::{Batch, Session};

    fn compile(source: &str) -> Batch {
        Session::default().compile("test.k", source)
    }

    fn codes(source: &str) -> Vec<DiagnosticCode> {
        compile(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn duplicate_overload_is_diagnosed_once() {
        let source = "i32 f(i32 x, i32 y) { return x + y; }\n\
                      i32 f(i32 x, i32 y) { return x - y; }\n";
        assert_eq!(codes(source), vec![DiagnosticCode::DuplicateFunctionOverload]);
    }

    #[test]
    fn distinct_arities_overload_cleanly() {
        let source = "i32 f(i32 x) { return x; }\n\
                      i32 f(i32 x, i32 y) { return x + y; }\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn later_overload_exceeding_threshold_is_diagnosed() {
        let source = "void g(i32 x, i32 ...rest) { }\n\
                      void g(i32 a, i32 b) { }\n";
        assert_eq!(
            codes(source),
            vec![DiagnosticCode::FunctionDeclarationExceedsParameterThreshold]
        );
    }

    #[test]
    fn variadic_declared_later_points_at_itself() {
        let source = "void g(i32 a, i32 b) { }\n\
                      void g(i32 x, i32 ...rest) { }\n";
        let batch = compile(source);
        let codes: Vec<_> = batch.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::FunctionDeclarationCausesAnotherFunctionToExceedParameterThreshold]
        );
        // The report anchors on the variadic declaration, line 2.
        assert_eq!(batch.diagnostics[0].line, 2);
    }

    #[test]
    fn second_variadic_overload_is_diagnosed() {
        let source = "void g(i32 ...rest) { }\n\
                      void g(i32 x, i32 ...more) { }\n";
        assert_eq!(
            codes(source),
            vec![DiagnosticCode::MultipleFunctionOverloadsWithVariableParameter]
        );
    }

    #[test]
    fn variadic_below_threshold_coexists_with_smaller_overloads() {
        let source = "void g(i32 a) { }\n\
                      void g(i32 x, i32 y, i32 ...rest) { }\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn overload_set_invariants_hold_after_definition() {
        let source = "void g() { }\n\
                      void g(i32 a) { }\n\
                      void g(i32 x, i32 y, i32 ...rest) { }\n\
                      void g(i32 p, i32 q) { }\n";
        let batch = compile(source);

        for (_, symbol) in batch.table.symbols() {
            let Some(function) = symbol.function() else {
                continue;
            };
            let variadics = function
                .signatures
                .iter()
                .filter(|s| s.variadic_parameter.is_some())
                .count();
            assert!(variadics <= 1);

            let mut arities: Vec<_> = function
                .signatures
                .iter()
                .filter(|s| s.variadic_parameter.is_none())
                .map(|s| s.fixed_parameters.len())
                .collect();
            arities.sort_unstable();
            arities.dedup();
            assert_eq!(
                arities.len(),
                function
                    .signatures
                    .iter()
                    .filter(|s| s.variadic_parameter.is_none())
                    .count()
            );

            if let Some(threshold) = function.parameter_threshold {
                for signature in &function.signatures {
                    if signature.variadic_parameter.is_none() {
                        assert!(signature.fixed_parameters.len() < threshold);
                    }
                }
            }
        }
    }

    #[test]
    fn static_initializer_with_parameters_is_diagnosed() {
        assert_eq!(
            codes("static void setup(i32 x) { }"),
            vec![DiagnosticCode::StaticInitializerWithParameters]
        );
        assert!(codes("static void setup() { }").is_empty());
    }

    #[test]
    fn redeclaration_codes_name_the_new_declaration() {
        assert_eq!(
            codes("void f() { var x = 1; var x = 2; }"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsVariable]
        );
        assert_eq!(
            codes("void f() { var x = 1; let x = 2; }"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsConstant]
        );
        assert_eq!(
            codes("void f(i32 x, i32 x) { }"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsParameter]
        );
        assert_eq!(
            codes("void f(i32 x, i32 ...x) { }"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsVariableParameter]
        );
        assert_eq!(
            codes("struct A { i32 x; }\nstruct A { i32 y; }\n"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsClass]
        );
        assert_eq!(
            codes("struct S { i32 f; void f() { } }"),
            vec![DiagnosticCode::RedeclarationOfSymbolAsFunction]
        );
    }

    #[test]
    fn loop_parameter_may_not_shadow_a_visible_name() {
        let source = "void f() { var item = 1; for let item : item { } }";
        let reported = codes(source);
        assert_eq!(
            reported,
            vec![DiagnosticCode::RedeclarationOfSymbolAsLoopParameter]
        );
    }

    #[test]
    fn catch_parameter_may_not_shadow_a_visible_name() {
        let source = "void f() { var e = 1; try { } catch e { } }";
        assert_eq!(
            codes(source),
            vec![DiagnosticCode::RedeclarationOfSymbolAsCatchParameter]
        );
    }

    #[test]
    fn duplicate_label_is_diagnosed() {
        let source = "void f() { #out while true { } #out while true { } }";
        assert_eq!(codes(source), vec![DiagnosticCode::RedeclarationOfSymbolAsLabel]);
    }

    #[test]
    fn shadowing_an_outer_scope_is_not_a_redeclaration() {
        let source = "void f(i32 x) { if true { var x = 2; } }";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn walking_continues_past_an_erroneous_declaration() {
        // Both redeclarations are reported; neither aborts the pass.
        let source = "void f() { var a = 1; var a = 2; var b = 1; var b = 2; }";
        assert_eq!(
            codes(source),
            vec![
                DiagnosticCode::RedeclarationOfSymbolAsVariable,
                DiagnosticCode::RedeclarationOfSymbolAsVariable
            ]
        );
    }
}

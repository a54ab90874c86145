//! The resolution pass: name binding, lvalue classification, inheritance
//! link-up, and import wiring.
//!
//! A second preorder walk over each unit that re-enters the scopes recorded
//! by the definition pass. Runs only after the definition pass has covered
//! every unit of the batch, so imports and superclass names can refer to
//! classes from sibling units through the global registry.
//!
//! ## Placeholder vs value
//!
//! Assignment targets are validated through a single-slot label maintained
//! during the expression walk: `Placeholder` means the subexpression names
//! a storable location, `Value` means it only produces a value. Nested
//! expressions (grouping, subscripts, call arguments) save and restore the
//! label around their walk, so `x = (y = z)` classifies the outer target by
//! `x` alone. An assignment whose left side lands on `Value` is diagnosed
//! at the operator and its right side is skipped.

use super::{AnalysisContext, ScopeMap};
use crate::ast::{
    BlockStatement, CompilationUnit, ComponentDeclaration, Expression, FunctionDeclaration,
    ImportDeclaration, IterativeKind, NewExpression, PostfixExpression, PostfixPart, Statement,
    StructureDeclaration, StructureMember,
};
use crate::diagnostics::DiagnosticCode;
use crate::scope::{ScopeId, ScopeKind};
use crate::suggest::find_similar;
use crate::symbol::SymbolId;
use crate::token::Token;
use std::collections::HashMap;

/// The class every unit implicitly imports unless it is the core library.
pub const KERNEL_QUALIFIED_NAME: &str = "KUSH.core.KUSHKernel";

/// Expression classification for assignment-target validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprLabel {
    Unknown,
    Value,
    Placeholder,
}

/// What a primary-position identifier resolved to.
enum PrimaryResolution {
    NotIdentifier,
    Unresolved,
    Storage(Token),
    Other(SymbolId, Token),
}

/// Runs the resolution pass over one unit.
pub fn resolve_unit(
    unit: &CompilationUnit,
    ctx: &mut AnalysisContext<'_>,
    scopes: &ScopeMap,
    core_library: bool,
) {
    let Some(&unit_scope) = scopes.get(&unit.id) else {
        return;
    };

    let mut pass = Resolution {
        ctx,
        scopes,
        current: unit_scope,
        label: ExprLabel::Unknown,
        class_indices: HashMap::new(),
    };

    if !core_library {
        pass.apply_default_imports();
    }

    for import in &unit.imports {
        pass.resolve_import(import);
    }

    for declaration in &unit.declarations {
        match declaration {
            ComponentDeclaration::Structure(structure) => pass.resolve_structure(structure),
            ComponentDeclaration::Function(function) => pass.resolve_function(function),
        }
    }
}

struct Resolution<'a, 'c> {
    ctx: &'c mut AnalysisContext<'a>,
    scopes: &'c ScopeMap,
    current: ScopeId,
    label: ExprLabel,
    /// Next signature index per class scope.
    class_indices: HashMap<ScopeId, u32>,
}

impl<'a, 'c> Resolution<'a, 'c> {
    /// Copies every member of `KUSH.core.KUSHKernel` into the unit's root
    /// scope. Skipped silently when no core library is registered, so
    /// standalone units still compile.
    fn apply_default_imports(&mut self) {
        let qualified = self.ctx.interner.intern(KERNEL_QUALIFIED_NAME);
        let Some(kernel) = self.ctx.registry.resolve(qualified) else {
            return;
        };
        let kernel = self.ctx.table.target(kernel);
        let Some(class_scope) = self.ctx.table.symbol(kernel).class().map(|c| c.class_scope)
        else {
            return;
        };

        let members: Vec<_> = self
            .ctx
            .table
            .scope(class_scope)
            .symbols
            .iter()
            .map(|(&name, &symbol)| (name, symbol))
            .collect();
        for (name, symbol) in members {
            if self.ctx.table.lookup_local(self.current, name).is_none() {
                self.ctx.table.define(self.current, name, symbol);
            }
        }
    }

    /// Binds an import to an external symbol in the unit scope.
    fn resolve_import(&mut self, import: &ImportDeclaration) {
        if import.wildcard {
            // Wildcard imports await qualified-member resolution.
            return;
        }

        let Some(last) = import.identifiers.last().copied() else {
            return;
        };

        let mut dotted = String::new();
        for (i, token) in import.identifiers.iter().enumerate() {
            if i > 0 {
                dotted.push('.');
            }
            dotted.push_str(self.ctx.interner.resolve(token.text));
        }
        let qualified = self.ctx.interner.intern(&dotted);

        let Some(target) = self.ctx.registry.resolve(qualified) else {
            self.ctx.sink.semantic(DiagnosticCode::UnknownClass, &last);
            return;
        };

        let local = import.alias.unwrap_or(last);
        if let Some(existing) = self.ctx.table.lookup_local(self.current, local.text) {
            let at = self
                .ctx
                .table
                .symbol(existing)
                .declaration
                .unwrap_or(local);
            self.ctx
                .sink
                .semantic(DiagnosticCode::RedeclarationOfSymbolPreviouslyImported, &at);
            return;
        }

        let external = self.ctx.table.add_symbol(crate::symbol::Symbol {
            name: local.text,
            declaration: Some(local),
            enclosing_scope: self.current,
            modifiers: crate::symbol::Modifiers::default(),
            external: true,
            kind: crate::symbol::SymbolKind::External { target },
        });
        self.ctx.table.define(self.current, local.text, external);
    }

    fn resolve_structure(&mut self, structure: &StructureDeclaration) {
        let Some(&class_scope) = self.scopes.get(&structure.id) else {
            return;
        };

        // Supertype names resolve in the enclosing scope, before the class
        // scope is entered.
        let class_symbol = self.ctx.table.scope(class_scope).owner;
        for token in &structure.supertypes {
            match self.ctx.table.resolve(self.current, token.text) {
                None => self.ctx.sink.semantic(DiagnosticCode::UnknownClass, token),
                Some(found) => {
                    let target = self.ctx.table.target(found);
                    if self.ctx.table.symbol(target).is_class() {
                        if let Some(owner) = class_symbol {
                            if let Some(class) = self.ctx.table.symbol_mut(owner).class_mut() {
                                class.superclasses.push(target);
                            }
                        }
                    } else {
                        self.ctx.sink.semantic(DiagnosticCode::UnknownClass, token);
                    }
                }
            }
        }

        let saved = self.current;
        self.current = class_scope;
        for member in &structure.members {
            match member {
                StructureMember::Field(field) => {
                    for declarator in &field.declarators {
                        if let Some(initializer) = &declarator.initializer {
                            self.resolve_expression_root(initializer);
                        }
                    }
                }
                StructureMember::Function(function) => self.resolve_function(function),
            }
        }
        self.current = saved;
    }

    fn resolve_function(&mut self, function: &FunctionDeclaration) {
        let Some(&function_scope) = self.scopes.get(&function.id) else {
            return;
        };

        self.assign_signature_index(function, function_scope);

        let saved = self.current;
        self.current = function_scope;
        self.resolve_block(&function.body);
        self.current = saved;
    }

    /// Fixes the declaration-order index of the signature this declaration
    /// contributed to its overload set.
    fn assign_signature_index(&mut self, function: &FunctionDeclaration, scope: ScopeId) {
        let Some(found) = self.ctx.table.resolve(scope, function.identifier.text) else {
            return;
        };
        let target = self.ctx.table.target(found);
        let arity = function.fixed_parameters.len();

        let assignable = self
            .ctx
            .table
            .symbol(target)
            .function()
            .and_then(|f| f.signature_by_arity(arity))
            .map_or(false, |s| s.table_index.is_none());
        if !assignable {
            return;
        }

        let class_scope = self
            .ctx
            .table
            .enclosing(scope, ScopeKind::Class)
            .unwrap_or(scope);
        let counter = self.class_indices.entry(class_scope).or_insert(0);
        *counter += 1;
        let index = *counter;

        if let Some(signature) = self
            .ctx
            .table
            .symbol_mut(target)
            .function_mut()
            .and_then(|f| f.signature_by_arity_mut(arity))
        {
            signature.table_index = Some(index);
        }
    }

    fn resolve_block(&mut self, block: &BlockStatement) {
        let Some(&scope) = self.scopes.get(&block.id) else {
            return;
        };

        let saved = self.current;
        self.current = scope;
        for statement in &block.statements {
            self.resolve_statement(statement);
        }
        self.current = saved;
    }

    fn resolve_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Variable(declaration) => {
                for declarator in &declaration.declarators {
                    if let Some(initializer) = &declarator.initializer {
                        self.resolve_expression_root(initializer);
                    }
                }
            }
            Statement::Expression(expression) => self.resolve_expression_root(expression),
            Statement::Break(_) => {}
            Statement::Return(statement) => self.resolve_expression_root(&statement.expression),
            Statement::Throw(statement) => {
                if let Some(expression) = &statement.expression {
                    self.resolve_expression_root(expression);
                }
            }
            Statement::If(statement) => {
                self.resolve_expression_root(&statement.if_clause.condition);
                self.resolve_block(&statement.if_clause.body);
                for clause in &statement.else_if_clauses {
                    self.resolve_expression_root(&clause.condition);
                    self.resolve_block(&clause.body);
                }
                if let Some(block) = &statement.else_clause {
                    self.resolve_block(block);
                }
            }
            Statement::Iterative(statement) => {
                match &statement.kind {
                    IterativeKind::While { condition, .. } => {
                        self.resolve_expression_root(condition)
                    }
                    IterativeKind::For { sequence, .. } => self.resolve_expression_root(sequence),
                }
                self.resolve_block(&statement.body);
            }
            Statement::Try(statement) => {
                self.resolve_block(&statement.try_clause);
                for clause in &statement.catch_clauses {
                    self.resolve_block(&clause.body);
                }
                if let Some(block) = &statement.finally_clause {
                    self.resolve_block(block);
                }
            }
        }
    }

    /// Walks a statement-level expression with a fresh label slot.
    fn resolve_expression_root(&mut self, expression: &Expression) {
        self.label = ExprLabel::Unknown;
        self.resolve_expression(expression);
    }

    /// Walks a nested expression, preserving the enclosing label.
    ///
    /// Without this, the index of `a[0] = 1` would overwrite the subscript's
    /// placeholder classification with the literal's value label.
    fn resolve_inner_expression(&mut self, expression: &Expression) {
        let saved = self.label;
        self.resolve_expression(expression);
        self.label = saved;
    }

    fn resolve_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Assignment(assignment) => {
                self.resolve_expression(&assignment.left);
                if self.label == ExprLabel::Value {
                    self.ctx
                        .sink
                        .semantic(DiagnosticCode::InvalidLvalue, &assignment.operator);
                    // The right side is not walked when the target is
                    // invalid.
                } else {
                    self.resolve_expression(&assignment.right);
                }
            }
            Expression::Conditional(conditional) => {
                self.resolve_expression(&conditional.condition);
                self.resolve_expression(&conditional.then_expression);
                self.resolve_expression(&conditional.else_expression);
                self.label = ExprLabel::Value;
            }
            Expression::Binary(binary) => {
                self.resolve_expression(&binary.left);
                for (_, operand) in &binary.rest {
                    self.resolve_expression(operand);
                }
                self.label = ExprLabel::Value;
            }
            Expression::Unary(unary) => {
                self.resolve_expression(&unary.operand);
                self.label = ExprLabel::Value;
            }
            Expression::Postfix(postfix) => self.resolve_postfix(postfix),
            Expression::Identifier(token) => {
                self.resolve_identifier(token);
            }
            Expression::Literal(_) => {
                self.label = ExprLabel::Value;
            }
            Expression::Grouped(grouped) => {
                self.resolve_inner_expression(&grouped.inner);
                self.label = ExprLabel::Value;
            }
            Expression::Initializer(initializer) => {
                for (_, value) in &initializer.entries {
                    self.resolve_inner_expression(value);
                }
                self.label = ExprLabel::Value;
            }
            Expression::Array(array) => {
                for element in &array.elements {
                    self.resolve_inner_expression(element);
                }
                self.label = ExprLabel::Value;
            }
            Expression::New(new) => {
                self.resolve_new(new);
                self.label = ExprLabel::Value;
            }
            Expression::Error(_) => {}
        }
    }

    /// Resolves a primary identifier, classifying storage as a placeholder
    /// and diagnosing unresolved or prematurely used names.
    fn resolve_identifier(&mut self, token: &Token) -> PrimaryResolution {
        let Some(found) = self.ctx.table.resolve(self.current, token.text) else {
            self.report_undeclared(token);
            return PrimaryResolution::Unresolved;
        };

        // Locals may not be referenced before their declaration site.
        let symbol = self.ctx.table.symbol(found);
        if let Some(declaration) = symbol.declaration {
            if self.ctx.table.scope(symbol.enclosing_scope).kind == ScopeKind::Local
                && token.span.start <= declaration.span.start
            {
                self.ctx
                    .sink
                    .semantic(DiagnosticCode::UndeclaredIdentifier, token);
            }
        }

        let target = self.ctx.table.target(found);
        if self.ctx.table.symbol(target).is_storage() {
            self.label = ExprLabel::Placeholder;
            PrimaryResolution::Storage(*token)
        } else {
            PrimaryResolution::Other(target, *token)
        }
    }

    fn report_undeclared(&mut self, token: &Token) {
        let hint = {
            let names = self.ctx.table.visible_names(self.current);
            let used = self.ctx.interner.resolve(token.text);
            let candidates = names.iter().map(|&n| self.ctx.interner.resolve(n));
            find_similar(used, candidates, 2).map(|s| format!("did you mean '{}'?", s))
        };
        match hint {
            Some(hint) => {
                self.ctx
                    .sink
                    .semantic_with_hint(DiagnosticCode::UndeclaredIdentifier, token, hint)
            }
            None => self
                .ctx
                .sink
                .semantic(DiagnosticCode::UndeclaredIdentifier, token),
        }
    }

    fn resolve_postfix(&mut self, postfix: &PostfixExpression) {
        let primary = match &*postfix.primary {
            Expression::Identifier(token) => self.resolve_identifier(token),
            Expression::Literal(_) => {
                self.label = ExprLabel::Value;
                PrimaryResolution::NotIdentifier
            }
            other => {
                self.resolve_expression(other);
                self.label = ExprLabel::Value;
                PrimaryResolution::NotIdentifier
            }
        };

        let mut i = 0;
        while i < postfix.parts.len() {
            match &postfix.parts[i] {
                PostfixPart::Subscript(subscript) => {
                    self.label = ExprLabel::Placeholder;
                    self.resolve_inner_expression(&subscript.index);
                }
                PostfixPart::Arguments(arguments) => {
                    self.label = ExprLabel::Value;
                    if i == 0 {
                        match &primary {
                            PrimaryResolution::Storage(token) => {
                                self.ctx
                                    .sink
                                    .semantic(DiagnosticCode::VariableTreatedAsFunction, token);
                            }
                            PrimaryResolution::Other(symbol, token) => {
                                if !self.ctx.table.symbol(*symbol).is_function() {
                                    self.ctx.sink.semantic(
                                        DiagnosticCode::VariableTreatedAsFunction,
                                        token,
                                    );
                                }
                            }
                            _ => {}
                        }
                    }
                    for argument in &arguments.expressions {
                        self.resolve_inner_expression(argument);
                    }
                }
                PostfixPart::MemberAccess(_) => {
                    self.label = ExprLabel::Placeholder;
                    // A member access immediately invoked is a call, not a
                    // storable location.
                    if let Some(PostfixPart::Arguments(arguments)) = postfix.parts.get(i + 1) {
                        self.label = ExprLabel::Value;
                        for argument in &arguments.expressions {
                            self.resolve_inner_expression(argument);
                        }
                        i += 1;
                    }
                }
            }
            i += 1;
        }
    }

    /// Checks `new T(args)`: `T` must resolve to a class whose scope has a
    /// `new` member.
    fn resolve_new(&mut self, new: &NewExpression) {
        match self.ctx.table.resolve(self.current, new.type_name.text) {
            None => {
                self.ctx
                    .sink
                    .semantic(DiagnosticCode::UndeclaredClass, &new.type_name);
            }
            Some(found) => {
                let target = self.ctx.table.target(found);
                let class_scope = self.ctx.table.symbol(target).class().map(|c| c.class_scope);
                match class_scope {
                    Some(class_scope) => {
                        let constructor = self.ctx.interner.intern("new");
                        if self
                            .ctx
                            .table
                            .lookup_local(class_scope, constructor)
                            .is_none()
                        {
                            self.ctx
                                .sink
                                .semantic(DiagnosticCode::NoSuitableConstructor, &new.type_name);
                        }
                    }
                    None => {
                        self.ctx.sink.semantic(
                            DiagnosticCode::InstantiationOfNonClassSymbol,
                            &new.type_name,
                        );
                    }
                }
            }
        }

        if let Some(arguments) = &new.arguments {
            for argument in &arguments.expressions {
                self.resolve_inner_expression(argument);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::DiagnosticCode;
    use crate::session::{Batch, Session, SourceFile};

    fn compile(source: &str) -> Batch {
        Session::default().compile("test.k", source)
    }

    fn codes(source: &str) -> Vec<DiagnosticCode> {
        compile(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn undeclared_identifier_is_diagnosed() {
        assert_eq!(
            codes("void f() { var z = unknownName; }"),
            vec![DiagnosticCode::UndeclaredIdentifier]
        );
    }

    #[test]
    fn undeclared_identifier_suggests_a_near_miss() {
        let batch = compile("void f() { var counter = 1; var x = connter; }");
        assert_eq!(batch.diagnostics.len(), 1);
        let hint = batch.diagnostics[0].hint.as_deref().expect("hint");
        assert!(hint.contains("counter"), "hint was: {}", hint);
    }

    #[test]
    fn assignment_to_a_variable_is_clean() {
        assert!(codes("void f() { var y = 1; y = 2; }").is_empty());
    }

    #[test]
    fn assignment_to_a_parenthesized_expression_is_invalid() {
        assert_eq!(
            codes("void f() { var y = 1; (y + 1) = 3; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
        assert_eq!(
            codes("void f() { var y = 1; (y) = 3; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
    }

    #[test]
    fn subscript_and_member_targets_are_placeholders() {
        assert!(codes("void f() { var a = [1, 2]; a[0] = 9; }").is_empty());
        assert!(codes("void f() { var p = {x: 1}; p.x = 2; }").is_empty());
    }

    #[test]
    fn call_results_are_values() {
        assert_eq!(
            codes("void g() { }\nvoid f() { g() = 1; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
        assert_eq!(
            codes("void f() { var p = {x: 1}; p.x() = 1; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
    }

    #[test]
    fn conditional_results_are_values() {
        assert_eq!(
            codes("void f() { var a = 1; var b = 2; a ? a : b = 1; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
    }

    #[test]
    fn nested_assignment_does_not_leak_its_label() {
        assert!(codes("void f() { var x = 1; var y = 2; x = (y = 3); }").is_empty());
    }

    #[test]
    fn literal_assignment_targets_are_invalid() {
        assert_eq!(
            codes("void f() { 1 = 2; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
    }

    #[test]
    fn invalid_target_skips_the_right_hand_walk() {
        // `stillMissing` is never reported because the walk stops at the
        // invalid target.
        assert_eq!(
            codes("void f() { 1 = stillMissing; }"),
            vec![DiagnosticCode::InvalidLvalue]
        );
    }

    #[test]
    fn calling_a_variable_is_diagnosed() {
        assert_eq!(
            codes("void f() { var g = 1; g(); }"),
            vec![DiagnosticCode::VariableTreatedAsFunction]
        );
    }

    #[test]
    fn calling_a_function_is_clean() {
        assert!(codes("void g() { }\nvoid f() { g(); }").is_empty());
    }

    #[test]
    fn locals_resolve_only_after_their_declaration() {
        assert_eq!(
            codes("void f() { x = 1; var x = 2; }"),
            vec![DiagnosticCode::UndeclaredIdentifier]
        );
        assert!(codes("void f() { var x = 2; x = 1; }").is_empty());
    }

    #[test]
    fn parameters_resolve_before_any_statement() {
        assert!(codes("void f(i32 seed) { var x = seed; }").is_empty());
    }

    #[test]
    fn new_on_a_missing_name_is_undeclared_class() {
        assert_eq!(
            codes("void f() { var p = new Missing(); }"),
            vec![DiagnosticCode::UndeclaredClass]
        );
    }

    #[test]
    fn new_on_a_non_class_is_diagnosed() {
        assert_eq!(
            codes("void f() { var v = 1; var p = new v(); }"),
            vec![DiagnosticCode::InstantiationOfNonClassSymbol]
        );
    }

    #[test]
    fn new_without_a_constructor_is_diagnosed() {
        assert_eq!(
            codes("struct P { i32 x; }\nvoid f() { var p = new P(); }"),
            vec![DiagnosticCode::NoSuitableConstructor]
        );
    }

    #[test]
    fn new_with_a_constructor_is_clean() {
        let source = "struct P { i32 x; P new(i32 seed) { return this; } }\n\
                      void f() { var p = new P(1); }\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn unknown_supertype_is_diagnosed() {
        assert_eq!(
            codes("struct A : Missing { i32 x; }"),
            vec![DiagnosticCode::UnknownClass]
        );
    }

    #[test]
    fn resolved_supertypes_link_into_the_class() {
        let batch = compile("struct B { i32 b; }\nstruct A : B { i32 x; }\n");
        assert!(batch.succeeded(), "{}", batch.render_diagnostics());

        let class_a = batch
            .table
            .symbols()
            .find(|(_, s)| s.is_class() && batch.interner.resolve(s.name) == "A")
            .map(|(_, s)| s)
            .expect("class A");
        let supers = &class_a.class().expect("class payload").superclasses;
        assert_eq!(supers.len(), 1);
        assert_eq!(
            batch.interner.resolve(batch.table.symbol(supers[0]).name),
            "B"
        );
    }

    #[test]
    fn import_installs_an_external_symbol() {
        let batch = Session::default().compile_batch(vec![
            SourceFile::with_package("lib/C.k", "a.b", "struct C { i32 v; }"),
            SourceFile::new("main.k", "import a.b.C;"),
        ]);
        assert!(batch.succeeded(), "{}", batch.render_diagnostics());

        let main = &batch.units[1];
        let name = batch.interner.lookup("C").expect("interned");
        let symbol = batch
            .table
            .lookup_local(main.root_scope, name)
            .expect("external C");
        assert!(batch.table.symbol(symbol).external);
    }

    #[test]
    fn import_alias_binds_under_the_alias() {
        let batch = Session::default().compile_batch(vec![
            SourceFile::with_package("lib/C.k", "a.b", "struct C { i32 v; }"),
            SourceFile::new("main.k", "import a.b.C as Remote;"),
        ]);
        assert!(batch.succeeded(), "{}", batch.render_diagnostics());

        let main = &batch.units[1];
        let alias = batch.interner.lookup("Remote").expect("interned");
        assert!(batch.table.lookup_local(main.root_scope, alias).is_some());
    }

    #[test]
    fn unknown_import_is_diagnosed() {
        assert_eq!(
            codes("import no.such.Thing;"),
            vec![DiagnosticCode::UnknownClass]
        );
    }

    #[test]
    fn import_clashing_with_a_local_declaration_is_diagnosed() {
        let batch = Session::default().compile_batch(vec![
            SourceFile::with_package("lib/C.k", "a.b", "struct C { i32 v; }"),
            SourceFile::new("main.k", "import a.b.C;\nstruct C { i32 local; }"),
        ]);
        let codes: Vec<_> = batch.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::RedeclarationOfSymbolPreviouslyImported]
        );
    }

    #[test]
    fn signature_indices_increase_in_declaration_order() {
        let batch = compile(
            "void g() { }\nvoid g(i32 a) { }\nvoid h() { }\n",
        );
        assert!(batch.succeeded(), "{}", batch.render_diagnostics());

        let mut indices = Vec::new();
        for (_, symbol) in batch.table.symbols() {
            if let Some(function) = symbol.function() {
                for signature in &function.signatures {
                    indices.push(signature.table_index.expect("assigned"));
                }
            }
        }
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}

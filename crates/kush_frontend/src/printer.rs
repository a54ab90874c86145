//! Indented textual dumps of the syntax tree.
//!
//! Each rule prints its name on one line and its children one level
//! deeper; terminals print as `<lexeme>`. Useful for golden tests and for
//! eyeballing what the parser actually built out of a malformed input.
//!
//! ```text
//! compilationUnit
//!     functionDeclaration
//!         <void>
//!         <main>
//!         blockStatement
//! ```

use crate::ast::{
    BlockStatement, CatchClause, CompilationUnit, ComponentDeclaration, Expression,
    FunctionDeclaration, IfClause, ImportDeclaration, IterativeKind, PostfixPart, Statement,
    StorageKind, StructureDeclaration, StructureMember, TypeAnnotation,
};
use crate::token::Token;
use kush_base::Interner;

/// Renders an AST as an indented rule tree.
pub struct AstPrinter<'i> {
    interner: &'i Interner,
    out: String,
    depth: usize,
}

impl<'i> AstPrinter<'i> {
    pub fn new(interner: &'i Interner) -> Self {
        Self {
            interner,
            out: String::new(),
            depth: 0,
        }
    }

    /// Consumes the printer and returns the rendering of `unit`.
    pub fn print(mut self, unit: &CompilationUnit) -> String {
        self.rule("compilationUnit", |p| {
            for import in &unit.imports {
                p.import_declaration(import);
            }
            for declaration in &unit.declarations {
                match declaration {
                    ComponentDeclaration::Structure(structure) => {
                        p.structure_declaration(structure)
                    }
                    ComponentDeclaration::Function(function) => p.function_declaration(function),
                }
            }
        });
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn rule(&mut self, name: &str, children: impl FnOnce(&mut Self)) {
        self.line(name);
        self.depth += 1;
        children(self);
        self.depth -= 1;
    }

    fn terminal(&mut self, token: &Token) {
        let text = format!("<{}>", self.interner.resolve(token.text));
        self.line(&text);
    }

    fn import_declaration(&mut self, import: &ImportDeclaration) {
        self.rule("importDeclaration", |p| {
            for segment in &import.identifiers {
                p.terminal(segment);
            }
            if import.wildcard {
                p.line("<*>");
            }
            if let Some(alias) = &import.alias {
                p.terminal(alias);
            }
        });
    }

    fn type_annotation(&mut self, annotation: &TypeAnnotation) {
        self.rule("type", |p| {
            p.terminal(&annotation.base);
            for _ in 0..annotation.dimensions {
                p.line("<[]>");
            }
        });
    }

    fn structure_declaration(&mut self, structure: &StructureDeclaration) {
        self.rule("structureDeclaration", |p| {
            p.terminal(&structure.identifier);
            for supertype in &structure.supertypes {
                p.terminal(supertype);
            }
            for member in &structure.members {
                match member {
                    StructureMember::Field(field) => p.rule("structureMember", |p| {
                        p.variable_declaration_body(field);
                    }),
                    StructureMember::Function(function) => p.function_declaration(function),
                }
            }
        });
    }

    fn function_declaration(&mut self, function: &FunctionDeclaration) {
        self.rule("functionDeclaration", |p| {
            if function.is_static {
                p.line("<static>");
            }
            p.type_annotation(&function.return_type);
            p.terminal(&function.identifier);
            p.rule("functionParameters", |p| {
                for parameter in &function.fixed_parameters {
                    p.rule("functionParameter", |p| {
                        p.type_annotation(&parameter.base_type);
                        p.terminal(&parameter.identifier);
                    });
                }
                if let Some(parameter) = &function.variadic_parameter {
                    p.rule("variableFunctionParameter", |p| {
                        p.type_annotation(&parameter.base_type);
                        p.terminal(&parameter.identifier);
                    });
                }
            });
            p.block_statement(&function.body);
        });
    }

    fn block_statement(&mut self, block: &BlockStatement) {
        self.rule("blockStatement", |p| {
            for statement in &block.statements {
                p.statement(statement);
            }
        });
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Variable(declaration) => self.rule("variableDeclaration", |p| {
                p.variable_declaration_body(declaration);
            }),
            Statement::Expression(expression) => self.rule("expressionStatement", |p| {
                p.expression(expression);
            }),
            Statement::Break(statement) => self.rule("breakStatement", |p| {
                if let Some(label) = &statement.label {
                    p.terminal(label);
                }
            }),
            Statement::Return(statement) => self.rule("returnStatement", |p| {
                p.expression(&statement.expression);
            }),
            Statement::Throw(statement) => self.rule("throwStatement", |p| {
                if let Some(expression) = &statement.expression {
                    p.expression(expression);
                }
            }),
            Statement::If(statement) => self.rule("ifStatement", |p| {
                p.if_clause("ifClause", &statement.if_clause);
                for clause in &statement.else_if_clauses {
                    p.if_clause("elseIfClause", clause);
                }
                if let Some(block) = &statement.else_clause {
                    p.rule("elseClause", |p| p.block_statement(block));
                }
            }),
            Statement::Iterative(statement) => self.rule("iterativeStatement", |p| {
                if let Some(label) = &statement.label {
                    p.rule("labelClause", |p| p.terminal(label));
                }
                match &statement.kind {
                    IterativeKind::While { condition, .. } => p.rule("whileStatement", |p| {
                        p.expression(condition);
                        p.block_statement(&statement.body);
                    }),
                    IterativeKind::For {
                        parameter,
                        sequence,
                        ..
                    } => p.rule("forStatement", |p| {
                        p.terminal(parameter);
                        p.expression(sequence);
                        p.block_statement(&statement.body);
                    }),
                }
            }),
            Statement::Try(statement) => self.rule("tryStatement", |p| {
                p.rule("tryClause", |p| p.block_statement(&statement.try_clause));
                for clause in &statement.catch_clauses {
                    p.catch_clause(clause);
                }
                if let Some(block) = &statement.finally_clause {
                    p.rule("finallyClause", |p| p.block_statement(block));
                }
            }),
        }
    }

    fn if_clause(&mut self, name: &str, clause: &IfClause) {
        self.rule(name, |p| {
            p.expression(&clause.condition);
            p.block_statement(&clause.body);
        });
    }

    fn catch_clause(&mut self, clause: &CatchClause) {
        self.rule("catchClause", |p| {
            if !clause.captures.is_empty() {
                p.rule("catchFilter", |p| {
                    for capture in &clause.captures {
                        p.terminal(capture);
                    }
                });
            }
            p.terminal(&clause.parameter);
            p.block_statement(&clause.body);
        });
    }

    fn variable_declaration_body(&mut self, declaration: &crate::ast::VariableDeclaration) {
        match &declaration.kind {
            StorageKind::Inferred => self.line("<var>"),
            StorageKind::Constant => self.line("<let>"),
            StorageKind::Typed(annotation) => self.type_annotation(annotation),
        }
        for declarator in &declaration.declarators {
            self.rule("variableDeclarator", |p| {
                p.terminal(&declarator.identifier);
                if let Some(initializer) = &declarator.initializer {
                    p.expression(initializer);
                }
            });
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Assignment(assignment) => self.rule("assignmentExpression", |p| {
                p.expression(&assignment.left);
                p.terminal(&assignment.operator);
                p.expression(&assignment.right);
            }),
            Expression::Conditional(conditional) => self.rule("conditionalExpression", |p| {
                p.expression(&conditional.condition);
                p.expression(&conditional.then_expression);
                p.expression(&conditional.else_expression);
            }),
            Expression::Binary(binary) => self.rule("binaryExpression", |p| {
                p.expression(&binary.left);
                for (operator, operand) in &binary.rest {
                    p.terminal(operator);
                    p.expression(operand);
                }
            }),
            Expression::Unary(unary) => self.rule("unaryExpression", |p| {
                p.terminal(&unary.operator);
                p.expression(&unary.operand);
            }),
            Expression::Postfix(postfix) => self.rule("postfixExpression", |p| {
                p.expression(&postfix.primary);
                for part in &postfix.parts {
                    match part {
                        PostfixPart::Subscript(subscript) => p.rule("subscript", |p| {
                            p.expression(&subscript.index);
                        }),
                        PostfixPart::Arguments(arguments) => p.rule("functionArguments", |p| {
                            for argument in &arguments.expressions {
                                p.expression(argument);
                            }
                        }),
                        PostfixPart::MemberAccess(member) => p.rule("memberAccess", |p| {
                            p.terminal(&member.identifier);
                        }),
                    }
                }
            }),
            Expression::Identifier(token) | Expression::Literal(token) => self.terminal(token),
            Expression::Grouped(grouped) => self.rule("expression", |p| {
                p.expression(&grouped.inner);
            }),
            Expression::Initializer(initializer) => self.rule("initializerExpression", |p| {
                for (key, value) in &initializer.entries {
                    p.rule("initializerEntry", |p| {
                        p.terminal(key);
                        p.expression(value);
                    });
                }
            }),
            Expression::Array(array) => self.rule("arrayExpression", |p| {
                for element in &array.elements {
                    p.expression(element);
                }
            }),
            Expression::New(new) => self.rule("newExpression", |p| {
                p.terminal(&new.type_name);
                if let Some(arguments) = &new.arguments {
                    p.rule("functionArguments", |p| {
                        for argument in &arguments.expressions {
                            p.expression(argument);
                        }
                    });
                }
            }),
            Expression::Error(_) => self.line("<error>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn dump(source: &str) -> String {
        let batch = Session::default().compile("print.k", source);
        AstPrinter::new(&batch.interner).print(&batch.units[0].ast)
    }

    #[test]
    fn nesting_is_rendered_by_indentation() {
        let rendered = dump("void main() { return 0; }");
        assert!(rendered.starts_with("compilationUnit\n"));
        assert!(rendered.contains("    functionDeclaration\n"));
        assert!(rendered.contains("        <main>\n"));
        assert!(rendered.contains("returnStatement"));
        assert!(rendered.contains("<0>"));
    }

    #[test]
    fn operator_chains_interleave_operators_and_operands() {
        let rendered = dump("void f() { var r = a + b - c; }");
        let plus = rendered.find("<+>").expect("plus operator");
        let minus = rendered.find("<->").expect("minus operator");
        assert!(plus < minus);
    }

    #[test]
    fn imports_and_structures_are_covered() {
        let rendered = dump("import a.b.C;\nstruct S : C { i32 x; }\n");
        assert!(rendered.contains("importDeclaration"));
        assert!(rendered.contains("structureDeclaration"));
        assert!(rendered.contains("structureMember"));
        assert!(rendered.contains("<S>"));
    }

    #[test]
    fn identical_sources_render_identically() {
        let source = "void f() { try { g(; } catch e { } }";
        assert_eq!(dump(source), dump(source));
    }
}

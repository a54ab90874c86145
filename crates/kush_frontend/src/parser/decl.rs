//! Declaration-level rules: compilation unit, imports, structures,
//! functions.

use super::{is_component_follow, is_layout, Parser, RETURN_TYPE_TOKENS, TYPE_TOKENS};
use crate::ast::{
    CompilationUnit, ComponentDeclaration, FunctionDeclaration, FunctionParameter,
    ImportDeclaration, StorageDeclarator, StorageKind, StructureDeclaration, StructureMember,
    TypeAnnotation, VariableDeclaration,
};
use crate::token::{Token, TokenKind};

impl<'a> Parser<'a> {
    /// ```text
    /// compilationUnit
    /// :    layout* importDeclaration* componentDeclaration* EOS
    /// ;
    /// ```
    ///
    /// Layout tokens only surface between top-level declarations (every
    /// declaration body is brace-enclosed, which suppresses them); they are
    /// consumed and discarded here.
    pub(crate) fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let id = self.node_id();
        let start = self.lt(1).span;

        let mut imports = Vec::new();
        self.skip_layout();
        while self.la(1) == TokenKind::KeywordImport {
            imports.push(self.parse_import_declaration());
            self.skip_layout();
        }

        let mut declarations = Vec::new();
        while is_component_follow(self.la(1)) {
            if self.la(1) == TokenKind::KeywordStruct {
                declarations.push(ComponentDeclaration::Structure(
                    self.parse_structure_declaration(),
                ));
            } else {
                declarations.push(ComponentDeclaration::Function(
                    self.parse_function_declaration(),
                ));
            }
            self.skip_layout();
        }

        let stop = self.match_token(TokenKind::EndOfStream);

        CompilationUnit {
            id,
            imports,
            declarations,
            span: start.merge(stop.span),
        }
    }

    fn skip_layout(&mut self) {
        while is_layout(self.la(1)) {
            self.consume();
        }
    }

    /// ```text
    /// importDeclaration
    /// :    'import' IDENTIFIER ('.' IDENTIFIER)*
    ///      ('.' '*' | 'as' IDENTIFIER)? ';'
    /// ;
    /// ```
    ///
    /// `as` is contextual; the lexer has no such keyword.
    pub(crate) fn parse_import_declaration(&mut self) -> ImportDeclaration {
        let keyword = self.match_token(TokenKind::KeywordImport);

        // If the target fails, discard tokens until the terminating
        // semicolon.
        let mut guard = self.follow(&[TokenKind::Semicolon]);

        let mut identifiers = Vec::new();
        identifiers.push(guard.match_token(TokenKind::Identifier));

        while guard.la(1) == TokenKind::Dot && guard.la(2) == TokenKind::Identifier {
            guard.consume();
            identifiers.push(guard.match_token(TokenKind::Identifier));
        }

        let mut wildcard = false;
        if guard.la(1) == TokenKind::Dot {
            guard.consume();
            guard.match_token(TokenKind::Asterisk);
            wildcard = true;
        }

        let mut alias = None;
        if guard.la(1) == TokenKind::Identifier && guard.la(2) == TokenKind::Identifier {
            let marker = guard.lt(1);
            if guard.interner.resolve(marker.text) == "as" {
                guard.consume();
                alias = Some(guard.match_token(TokenKind::Identifier));
            }
        }

        drop(guard);
        let semicolon = self.match_token(TokenKind::Semicolon);

        ImportDeclaration {
            identifiers,
            wildcard,
            alias,
            span: keyword.span.merge(semicolon.span),
        }
    }

    /// ```text
    /// type        :    componentType ('[' ']')* ;
    /// returnType  :    type | 'void' ;
    /// ```
    fn parse_type_annotation(&mut self, include_void: bool) -> TypeAnnotation {
        let tokens = if include_void {
            RETURN_TYPE_TOKENS
        } else {
            TYPE_TOKENS
        };
        let base = self.match_any(tokens);

        let mut dimensions = 0;
        while self.la(1) == TokenKind::LeftSquareBracket {
            self.consume();
            self.match_token(TokenKind::RightSquareBracket);
            dimensions += 1;
        }

        TypeAnnotation { base, dimensions }
    }

    pub(crate) fn parse_type(&mut self) -> TypeAnnotation {
        self.parse_type_annotation(false)
    }

    pub(crate) fn parse_return_type(&mut self) -> TypeAnnotation {
        self.parse_type_annotation(true)
    }

    /// ```text
    /// functionDeclaration
    /// :    'static'? returnType IDENTIFIER functionParameters blockStatement
    /// ;
    /// ```
    pub(crate) fn parse_function_declaration(&mut self) -> FunctionDeclaration {
        let is_static = if self.la(1) == TokenKind::KeywordStatic {
            self.consume();
            true
        } else {
            false
        };

        // If the signature fails, skip tokens until ';', '{', or '}'.
        let mut guard = self.follow(&[
            TokenKind::Semicolon,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
        ]);
        let return_type = guard.parse_return_type();
        let identifier = guard.match_token(TokenKind::Identifier);
        drop(guard);

        self.parse_function_rest(is_static, return_type, identifier)
    }

    /// Parses parameters and body once the signature head is known; shared
    /// with structure members, which disambiguate fields from functions
    /// after the identifier.
    pub(crate) fn parse_function_rest(
        &mut self,
        is_static: bool,
        return_type: TypeAnnotation,
        identifier: Token,
    ) -> FunctionDeclaration {
        let id = self.node_id();

        let mut guard = self.follow(&[
            TokenKind::Semicolon,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
        ]);
        let (fixed_parameters, variadic_parameter) = guard.parse_function_parameters();
        drop(guard);

        let body = self.parse_block_statement();
        let span = return_type.base.span.merge(body.span);

        FunctionDeclaration {
            id,
            is_static,
            return_type,
            identifier,
            fixed_parameters,
            variadic_parameter,
            body,
            span,
        }
    }

    /// ```text
    /// functionParameters
    /// :    '(' (functionParameter (',' functionParameter)*)? ')'
    /// ;
    ///
    /// functionParameter
    /// :    type IDENTIFIER
    /// |    type '...' IDENTIFIER          -- final position only
    /// ;
    /// ```
    fn parse_function_parameters(
        &mut self,
    ) -> (Vec<FunctionParameter>, Option<FunctionParameter>) {
        let mut fixed = Vec::new();
        let mut variadic = None;

        self.match_token(TokenKind::LeftParenthesis);
        let mut guard = self.follow(&[TokenKind::RightParenthesis]);

        if super::is_type(guard.la(1)) {
            let mut first = true;
            loop {
                if !first {
                    guard.match_token(TokenKind::Comma);
                }
                first = false;

                let base_type = guard.parse_type();
                if guard.la(1) == TokenKind::Ellipsis {
                    guard.consume();
                    let identifier = guard.match_token(TokenKind::Identifier);
                    variadic = Some(FunctionParameter {
                        base_type,
                        identifier,
                    });
                    break;
                }
                let identifier = guard.match_token(TokenKind::Identifier);
                fixed.push(FunctionParameter {
                    base_type,
                    identifier,
                });

                if guard.la(1) != TokenKind::Comma {
                    break;
                }
            }
        }

        drop(guard);
        self.match_token(TokenKind::RightParenthesis);

        (fixed, variadic)
    }

    /// ```text
    /// structureDeclaration
    /// :    'struct' IDENTIFIER (':' IDENTIFIER (',' IDENTIFIER)*)?
    ///      '{' structureMember* '}'
    /// ;
    /// ```
    pub(crate) fn parse_structure_declaration(&mut self) -> StructureDeclaration {
        let id = self.node_id();
        let keyword = self.match_token(TokenKind::KeywordStruct);
        let identifier = self.match_token(TokenKind::Identifier);

        let mut supertypes = Vec::new();
        if self.la(1) == TokenKind::Colon {
            self.consume();
            supertypes.push(self.match_token(TokenKind::Identifier));
            while self.la(1) == TokenKind::Comma {
                self.consume();
                supertypes.push(self.match_token(TokenKind::Identifier));
            }
        }

        self.match_token(TokenKind::LeftBrace);
        let mut guard = self.follow(&[TokenKind::RightBrace]);

        let mut members = Vec::new();
        while is_component_follow(guard.la(1)) {
            members.push(guard.parse_structure_member());
        }

        drop(guard);
        let stop = self.match_token(TokenKind::RightBrace);

        StructureDeclaration {
            id,
            identifier,
            supertypes,
            members,
            span: keyword.span.merge(stop.span),
        }
    }

    /// ```text
    /// structureMember
    /// :    variableDeclaration ';'
    /// |    functionDeclaration
    /// ;
    /// ```
    ///
    /// Both alternatives begin `type IDENTIFIER`; a following `'('` selects
    /// the function form.
    fn parse_structure_member(&mut self) -> StructureMember {
        let is_static = if self.la(1) == TokenKind::KeywordStatic {
            self.consume();
            true
        } else {
            false
        };

        let mut guard = self.follow(&[
            TokenKind::Semicolon,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
        ]);
        let base_type = guard.parse_return_type();
        // Constructors are functions named `new`; the keyword doubles as
        // the member identifier there.
        let identifier =
            guard.match_any(&[TokenKind::Identifier, TokenKind::KeywordNew]);
        let is_function = guard.la(1) == TokenKind::LeftParenthesis;
        drop(guard);

        if is_function {
            return StructureMember::Function(self.parse_function_rest(
                is_static,
                base_type,
                identifier,
            ));
        }

        let mut guard = self.follow(&[TokenKind::Semicolon]);
        let mut declarators = Vec::new();
        declarators.push(guard.parse_storage_declarator_with(identifier));
        while guard.la(1) == TokenKind::Comma {
            guard.consume();
            let declarator = guard.parse_storage_declarator();
            declarators.push(declarator);
        }
        drop(guard);

        let semicolon = self.match_token(TokenKind::Semicolon);
        let span = base_type.base.span.merge(semicolon.span);

        StructureMember::Field(VariableDeclaration {
            kind: StorageKind::Typed(base_type),
            declarators,
            span,
        })
    }

    /// ```text
    /// variableDeclarator
    /// :    IDENTIFIER ('=' expression)?
    /// ;
    /// ```
    pub(crate) fn parse_storage_declarator(&mut self) -> StorageDeclarator {
        let identifier = self.match_token(TokenKind::Identifier);
        self.parse_storage_declarator_with(identifier)
    }

    pub(crate) fn parse_storage_declarator_with(
        &mut self,
        identifier: Token,
    ) -> StorageDeclarator {
        let mut initializer = None;
        if self.la(1) == TokenKind::Equal {
            self.consume();
            initializer = Some(self.parse_expression());
        }
        StorageDeclarator {
            identifier,
            initializer,
        }
    }
}

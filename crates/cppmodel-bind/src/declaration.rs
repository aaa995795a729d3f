use cppmodel_ast::{
    CoreDeclaratorAst, DeclarationAst, DeclarationKind, DeclaratorAst, ExpressionAst, ExpressionKind, NameAst,
    Offset, QtPropertyAst, QtSection, SpecialMember, SpecifierAst, StatementAst, TemplateParameterAst,
    TemplateParameterKind,
};
use cppmodel_core::{
    FullySpecifiedType, FunctionFlags, MethodKey, NameId, QtPropertyFlags, SourceLocation, Storage, StringLiteral,
    SymbolId, SymbolKind, Visibility,
};
use tracing::{debug, trace};

use crate::bind::Bind;
use crate::specifier::DeclSpecifiers;

fn qt_property_flag(item: &str) -> Option<QtPropertyFlags> {
    Some(match item {
        "READ" => QtPropertyFlags::READ,
        "WRITE" => QtPropertyFlags::WRITE,
        "RESET" => QtPropertyFlags::RESET,
        "NOTIFY" => QtPropertyFlags::NOTIFY,
        "DESIGNABLE" => QtPropertyFlags::DESIGNABLE,
        "SCRIPTABLE" => QtPropertyFlags::SCRIPTABLE,
        "STORED" => QtPropertyFlags::STORED,
        "USER" => QtPropertyFlags::USER,
        "CONSTANT" => QtPropertyFlags::CONSTANT,
        "FINAL" => QtPropertyFlags::FINAL,
        "MEMBER" => QtPropertyFlags::MEMBER,
        _ => return None,
    })
}

impl Bind<'_> {
    pub(crate) fn declaration(&mut self, ast: &DeclarationAst<'_>) {
        self.guarded(ast.offset, |this| this.visit_declaration(ast));
    }

    fn visit_declaration(&mut self, ast: &DeclarationAst<'_>) {
        match &ast.kind {
            DeclarationKind::Simple {
                specifiers,
                declarators,
            } => self.simple_declaration(specifiers, declarators),
            DeclarationKind::FunctionDefinition {
                specifiers,
                declarator,
                ctor_initializers,
                body,
                end,
            } => self.function_definition(ast.offset, specifiers, declarator, ctor_initializers, *body, *end),
            DeclarationKind::Namespace {
                name,
                is_inline,
                members,
                lbrace,
                rbrace,
            } => self.namespace(ast.offset, *name, *is_inline, members, *lbrace, *rbrace),
            DeclarationKind::NamespaceAlias { alias, target } => {
                let alias = self.control.identifier_name(*alias);
                let target = self.name(target);
                let location = self.location(ast.offset);
                let symbol = self.control.new_namespace_alias(location, Some(alias));
                if let SymbolKind::NamespaceAlias(data) = &mut self.control.symbol_mut(symbol).kind {
                    data.namespace_name = Some(target);
                }
                self.declare_member(symbol);
            }
            DeclarationKind::Template {
                parameters,
                declaration,
                end,
            } => self.template(ast.offset, parameters, *declaration, *end),
            DeclarationKind::Access { access, section } => {
                self.visibility = match (access, section) {
                    (Some(access), _) => access.visibility(),
                    (None, QtSection::Signals) => Visibility::Protected,
                    (None, _) => self.visibility,
                };
                self.method_key = match section {
                    QtSection::Signals => MethodKey::Signal,
                    QtSection::Slots => MethodKey::Slot,
                    QtSection::None => MethodKey::Normal,
                };
            }
            DeclarationKind::Using { name } => {
                let (location, name) = self.located_name(name);
                let symbol = self.control.new_using_declaration(location, Some(name));
                self.declare_member(symbol);
            }
            DeclarationKind::UsingDirective { name } => {
                let (location, name) = self.located_name(name);
                let symbol = self.control.new_using_namespace_directive(location, Some(name));
                self.declare_member(symbol);
            }
            DeclarationKind::Alias { name, type_id } => {
                let ty = self.type_id(type_id);
                let name = self.control.identifier_name(*name);
                let location = self.location(ast.offset);
                let symbol = self.control.new_declaration(location, Some(name));
                self.control.set_symbol_type(symbol, ty);
                self.control.symbol_mut(symbol).storage = Storage::Typedef;
                self.declare_member(symbol);
            }
            DeclarationKind::Linkage { members } => {
                for member in members {
                    self.declaration(member);
                }
            }
            DeclarationKind::StaticAssert { condition } => {
                self.expression(condition);
            }
            DeclarationKind::Empty => {}
            DeclarationKind::QtProperty(property) => self.qt_property(property),
            DeclarationKind::QtEnums { names, is_flags } => {
                if *is_flags {
                    trace!(offset = ast.offset, "Q_FLAGS declares no symbols");
                    return;
                }
                for name in names {
                    let (location, name) = self.located_name(name);
                    let symbol = self.control.new_qt_enum(location, Some(name));
                    self.declare_member(symbol);
                }
            }
            DeclarationKind::ObjCClass(class) => self.objc_class(class),
            DeclarationKind::ObjCProtocol(protocol) => self.objc_protocol(protocol),
            DeclarationKind::ObjCClassForward { names } => {
                for (offset, name) in names {
                    let location = self.location(*offset);
                    let name = self.control.identifier_name(*name);
                    let symbol = self.control.new_objc_forward_class_declaration(location, Some(name));
                    self.declare_member(symbol);
                }
            }
            DeclarationKind::ObjCProtocolForward { names } => {
                for (offset, name) in names {
                    let location = self.location(*offset);
                    let name = self.control.identifier_name(*name);
                    let symbol = self.control.new_objc_forward_protocol_declaration(location, Some(name));
                    self.declare_member(symbol);
                }
            }
            DeclarationKind::ObjCMethod(method) => self.objc_method(method),
            DeclarationKind::ObjCProperty {
                attributes,
                specifiers,
                declarators,
            } => self.objc_property(attributes, specifiers, declarators),
            DeclarationKind::ObjCVisibility(visibility) => self.objc_visibility = *visibility,
        }
    }

    fn located_name(&mut self, name: &NameAst<'_>) -> (SourceLocation, NameId) {
        (self.location(name.offset), self.name(name))
    }

    /// Give `symbol` the visibility of the current section and add it to
    /// the current scope.
    pub(crate) fn declare_member(&mut self, symbol: SymbolId) {
        let visibility = self.member_visibility();
        self.control.symbol_mut(symbol).visibility = visibility;
        self.add_member(symbol);
    }

    /// Storage, attributes and visibility taken from the specifiers.
    pub(crate) fn set_decl_specifiers(&mut self, symbol: SymbolId, specifiers: &DeclSpecifiers) {
        let visibility = self.member_visibility();
        let symbol = self.control.symbol_mut(symbol);
        symbol.visibility = visibility;
        symbol.storage = specifiers.storage();
        symbol.flags |= specifiers.symbol_flags();
    }

    fn set_function_specifiers(&mut self, function: SymbolId, specifiers: &DeclSpecifiers, declarator: &DeclaratorAst<'_>) {
        let is_pure = declarator.initializer.is_some_and(|init| match init.kind {
            ExpressionKind::NumericLiteral(literal) => self.control.literals().number_value(literal) == Some(0),
            _ => false,
        });
        let method_key = specifiers.method_key.unwrap_or(self.method_key);
        let ty = &specifiers.ty;
        if let Some(data) = self.control.symbol_mut(function).as_function_mut() {
            data.flags.set(FunctionFlags::VIRTUAL, ty.is_virtual() || is_pure);
            data.flags.set(FunctionFlags::STATIC, ty.is_static());
            data.flags.set(FunctionFlags::EXPLICIT, ty.is_explicit());
            data.flags.set(FunctionFlags::CONSTEXPR, specifiers.is_constexpr);
            data.flags.set(FunctionFlags::PURE_VIRTUAL, is_pure);
            data.flags.set(FunctionFlags::DEFAULTED, declarator.special == Some(SpecialMember::Default));
            data.flags.set(FunctionFlags::DELETED, declarator.special == Some(SpecialMember::Delete));
            data.method_key = method_key;
        }
    }

    // ---------------------------------------------------------------------
    // Simple declarations
    // ---------------------------------------------------------------------

    fn simple_declaration(&mut self, specifiers: &[&SpecifierAst<'_>], declarators: &[&DeclaratorAst<'_>]) {
        let specifiers = self.specifiers(specifiers);
        if declarators.is_empty() {
            self.forward_class_declaration(&specifiers);
            return;
        }
        for declarator in declarators {
            self.declare(&specifiers, declarator);
        }
    }

    /// `class X;` and `friend class X;`
    fn forward_class_declaration(&mut self, specifiers: &DeclSpecifiers) {
        let Some((name, offset)) = specifiers.elaborated_class else {
            return;
        };
        let location = self.location(offset);
        let symbol = self.control.new_forward_class_declaration(location, Some(name));
        self.set_decl_specifiers(symbol, specifiers);
        self.add_member(symbol);
    }

    /// Declare what one declarator names in the current scope. A function
    /// declarator is recorded as a declaration of function type; the
    /// function itself is named and attached to the scope but is not a
    /// member.
    pub(crate) fn declare(&mut self, specifiers: &DeclSpecifiers, declarator: &DeclaratorAst<'_>) -> Option<SymbolId> {
        if let Some(CoreDeclaratorAst::Decomposition(names)) = &declarator.core {
            for name in names {
                let (location, name) = self.located_name(name);
                let symbol = self.control.new_declaration(location, Some(name));
                self.control.set_symbol_type(symbol, specifiers.ty);
                self.set_decl_specifiers(symbol, specifiers);
                self.add_member(symbol);
            }
            if let Some(initializer) = declarator.initializer {
                self.expression(initializer);
            }
            return None;
        }

        let declared = self.declarator(declarator, specifiers.ty);
        let Some(name) = declared.name else {
            debug!(offset = declarator.offset, "declarator without a name");
            return None;
        };
        let location = self.location(declared.offset);
        let symbol = self.control.new_declaration(location, Some(name));
        let initializer = declarator.initializer.map(|init| self.initializer(init));
        if let Some(data) = self.control.symbol_mut(symbol).as_declaration_mut() {
            data.ty = declared.ty;
            data.initializer = initializer;
        }
        self.set_decl_specifiers(symbol, specifiers);

        if let Some(function) = self.function_of(&declared.ty) {
            self.control.set_symbol_name(function, Some(name));
            if let Some(scope) = self.scope {
                self.control.set_enclosing_scope(function, scope);
            }
            self.set_decl_specifiers(function, specifiers);
            self.set_function_specifiers(function, specifiers, declarator);
        }
        self.add_member(symbol);
        Some(symbol)
    }

    fn initializer(&mut self, ast: &ExpressionAst<'_>) -> StringLiteral {
        self.expression(ast);
        self.spelled(ast)
    }

    // ---------------------------------------------------------------------
    // Function definitions
    // ---------------------------------------------------------------------

    fn function_definition(
        &mut self,
        offset: Offset,
        specifiers: &[&SpecifierAst<'_>],
        declarator: &DeclaratorAst<'_>,
        ctor_initializers: &[&ExpressionAst<'_>],
        body: Option<&StatementAst<'_>>,
        end: Offset,
    ) {
        let specifiers = self.specifiers(specifiers);
        let declared = self.declarator(declarator, specifiers.ty);
        let Some(function) = self.function_of(&declared.ty) else {
            debug!(offset, "function definition without a function declarator");
            return;
        };
        self.control.set_symbol_name(function, declared.name);
        self.set_decl_specifiers(function, &specifiers);
        self.set_function_specifiers(function, &specifiers, declarator);
        self.control.set_scope_range(function, offset, end);
        self.add_member(function);

        if self.options.skip_function_bodies {
            return;
        }
        self.with_scope(function, |this| {
            this.with_visibility(Visibility::Public, |this| {
                for initializer in ctor_initializers {
                    this.expression(initializer);
                }
                if let Some(body) = body {
                    this.statement(body);
                }
            })
        });
    }

    // ---------------------------------------------------------------------
    // Namespaces and templates
    // ---------------------------------------------------------------------

    fn namespace(
        &mut self,
        offset: Offset,
        name: Option<&NameAst<'_>>,
        is_inline: bool,
        members: &[&DeclarationAst<'_>],
        lbrace: Offset,
        rbrace: Offset,
    ) {
        let location = self.location(name.map_or(offset, |name| name.offset));
        let name = name.map(|name| self.name(name));
        let namespace = self.control.new_namespace(location, name);
        if let SymbolKind::Namespace(data) = &mut self.control.symbol_mut(namespace).kind {
            data.is_inline = is_inline;
        }
        self.control.set_scope_range(namespace, lbrace, rbrace);
        self.declare_member(namespace);

        self.with_scope(namespace, |this| {
            this.with_visibility(Visibility::Public, |this| {
                for member in members {
                    this.declaration(member);
                }
            })
        });
    }

    fn template(
        &mut self,
        offset: Offset,
        parameters: &[&TemplateParameterAst<'_>],
        declaration: Option<&DeclarationAst<'_>>,
        end: Offset,
    ) {
        let location = self.location(offset);
        let template = self.control.new_template(location);
        self.control.set_scope_range(template, offset, end);
        self.declare_member(template);

        self.with_scope(template, |this| {
            for parameter in parameters {
                this.template_parameter(parameter);
            }
            if let Some(declaration) = declaration {
                this.declaration(declaration);
            }
        });
    }

    /// Type and template template parameters become typename arguments,
    /// non-type parameters plain arguments. A template template parameter
    /// keeps only its name and default.
    fn template_parameter(&mut self, ast: &TemplateParameterAst<'_>) {
        match &ast.kind {
            TemplateParameterKind::Type {
                name,
                is_class,
                default,
                ..
            } => {
                let name = name.map(|name| self.control.identifier_name(name));
                let location = self.location(ast.offset);
                let argument = self.control.new_typename_argument(location, name);
                let ty = default.map(|default| self.type_id(default)).unwrap_or_default();
                if let SymbolKind::TypenameArgument(data) = &mut self.control.symbol_mut(argument).kind {
                    data.ty = ty;
                    data.is_class_declarator = *is_class;
                }
                self.add_member(argument);
            }
            TemplateParameterKind::NonType(parameter) => {
                self.parameter(parameter);
            }
            TemplateParameterKind::Template { name, default, .. } => {
                let name = name.map(|name| self.control.identifier_name(name));
                let location = self.location(ast.offset);
                let argument = self.control.new_typename_argument(location, name);
                let ty = default
                    .map(|default| {
                        let default = self.name(default);
                        FullySpecifiedType::new(self.control.named_type(default))
                    })
                    .unwrap_or_default();
                if let SymbolKind::TypenameArgument(data) = &mut self.control.symbol_mut(argument).kind {
                    data.ty = ty;
                    data.is_class_declarator = true;
                }
                self.add_member(argument);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Qt
    // ---------------------------------------------------------------------

    /// `Q_PROPERTY(type name READ get WRITE set ...)`. Designable,
    /// scriptable and stored are on unless an item turns them off.
    fn qt_property(&mut self, ast: &QtPropertyAst<'_>) {
        let ty = self.type_id(ast.type_id);
        let name = self.control.identifier_name(ast.name);
        let location = self.location(ast.offset);
        let property = self.control.new_qt_property_declaration(location, Some(name));

        let mut flags = QtPropertyFlags::DESIGNABLE | QtPropertyFlags::SCRIPTABLE | QtPropertyFlags::STORED;
        for item in &ast.items {
            let spelling = self.control.spelling(item.name);
            let Some(flag) = qt_property_flag(&spelling) else {
                debug!(item = %spelling, "unknown Q_PROPERTY item");
                continue;
            };
            let enabled = match item.value {
                Some(value) => {
                    self.expression(value);
                    !matches!(value.kind, ExpressionKind::BoolLiteral(false))
                }
                None => true,
            };
            flags.set(flag, enabled);
        }
        if let SymbolKind::QtPropertyDeclaration(data) = &mut self.control.symbol_mut(property).kind {
            data.ty = ty;
            data.flags = flags;
        }
        self.declare_member(property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qt_property_items() {
        assert_eq!(qt_property_flag("READ"), Some(QtPropertyFlags::READ));
        assert_eq!(qt_property_flag("MEMBER"), Some(QtPropertyFlags::MEMBER));
        assert_eq!(qt_property_flag("REVISION"), None);
    }
}

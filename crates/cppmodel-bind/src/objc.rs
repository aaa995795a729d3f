use cppmodel_ast::{
    DeclaratorAst, NameAst, ObjCClassAst, ObjCMessageArgumentAst, ObjCMethodAst, ObjCPropertyAttributeAst,
    ObjCProtocolAst, SpecifierAst,
};
use cppmodel_core::{FullySpecifiedType, NameId, ObjCPropertyAttributes, SymbolId, SymbolKind, Visibility};
use smallvec::SmallVec;
use tracing::debug;

use crate::bind::Bind;
use crate::specifier::attribute_flags;

impl Bind<'_> {
    /// Objective-C's implicit `id`.
    fn objc_id_type(&mut self) -> FullySpecifiedType {
        let id = self.control.name_from_str("id");
        FullySpecifiedType::new(self.control.named_type(id))
    }

    /// Protocols adopted by `owner`, as base-protocol symbols.
    fn objc_protocol_refs(&mut self, owner: SymbolId, protocols: &[&NameAst<'_>]) {
        for protocol in protocols {
            let name = self.name(protocol);
            let location = self.location(protocol.offset);
            let base = self.control.new_objc_base_protocol(location, Some(name));
            self.control.add_objc_protocol(owner, base);
        }
    }

    /// `@interface` or `@implementation`, categories included. Instance
    /// variables default to `@protected`; the members after the braces are
    /// public.
    pub(crate) fn objc_class(&mut self, ast: &ObjCClassAst<'_>) {
        let name = self.name(ast.name);
        let location = self.location(ast.name.offset);
        let class = self.control.new_objc_class(location, Some(name));
        let category = ast.category.map(|category| self.name(category));
        let base_class = ast.superclass.map(|superclass| {
            let name = self.name(superclass);
            let location = self.location(superclass.offset);
            let base = self.control.new_objc_base_class(location, Some(name));
            self.control.set_enclosing_scope(base, class);
            base
        });
        if let Some(data) = self.control.symbol_mut(class).as_objc_class_mut() {
            data.is_interface = ast.is_interface;
            data.category_name = category;
            data.base_class = base_class;
        }
        self.objc_protocol_refs(class, &ast.protocols);
        self.control.set_scope_range(class, ast.offset, ast.end);
        self.declare_member(class);

        self.with_scope(class, |this| {
            this.with_objc_visibility(Visibility::Protected, |this| {
                for ivar in &ast.instance_variables {
                    this.declaration(ivar);
                }
            });
            this.with_objc_visibility(Visibility::Public, |this| {
                for member in &ast.members {
                    this.declaration(member);
                }
            });
        });
    }

    pub(crate) fn objc_protocol(&mut self, ast: &ObjCProtocolAst<'_>) {
        let name = self.name(ast.name);
        let location = self.location(ast.name.offset);
        let protocol = self.control.new_objc_protocol(location, Some(name));
        self.objc_protocol_refs(protocol, &ast.protocols);
        self.control.set_scope_range(protocol, ast.offset, ast.end);
        self.declare_member(protocol);

        self.with_scope(protocol, |this| {
            for member in &ast.members {
                this.declaration(member);
            }
        });
    }

    /// A method named by its selector, `foo:bar:`, with one argument per
    /// selector part that takes one.
    pub(crate) fn objc_method(&mut self, ast: &ObjCMethodAst<'_>) {
        let names: SmallVec<[NameId; 4]> = ast
            .selector
            .iter()
            .map(|part| {
                let identifier = part.name.unwrap_or_else(|| self.control.identifier(""));
                self.control.identifier_name(identifier)
            })
            .collect();
        let has_arguments = ast.selector.iter().any(|part| part.argument.is_some());
        let selector = self.control.selector_name_id(&names, has_arguments);

        let return_type = match ast.return_type {
            Some(type_id) => self.type_id(type_id),
            None => self.objc_id_type(),
        };
        let mut attributes = FullySpecifiedType::default();
        self.attributes(&ast.attributes, &mut attributes);

        let location = self.location(ast.offset);
        let method = self.control.new_objc_method(location, Some(selector));
        let symbol = self.control.symbol_mut(method);
        symbol.flags |= attribute_flags(&attributes);
        if let Some(data) = symbol.as_objc_method_mut() {
            data.return_type = return_type;
            data.is_variadic = ast.is_variadic;
            data.is_class_method = ast.is_class_method;
        }
        self.control.set_scope_range(method, ast.offset, ast.end);
        self.declare_member(method);

        self.with_scope(method, |this| {
            for part in &ast.selector {
                if let Some(argument) = &part.argument {
                    this.objc_argument(argument);
                }
            }
            if let Some(body) = ast.body
                && !this.options.skip_function_bodies
            {
                this.statement(body);
            }
        });
    }

    fn objc_argument(&mut self, ast: &ObjCMessageArgumentAst<'_>) {
        let ty = match ast.type_id {
            Some(type_id) => self.type_id(type_id),
            None => self.objc_id_type(),
        };
        let name = self.control.identifier_name(ast.name);
        let location = self.location(ast.offset);
        let argument = self.control.new_argument(location, Some(name));
        self.control.set_symbol_type(argument, ty);
        self.add_member(argument);
    }

    /// `@property (nonatomic, getter=isOn) BOOL on;`
    pub(crate) fn objc_property(
        &mut self,
        attributes: &[ObjCPropertyAttributeAst<'_>],
        specifiers: &[&SpecifierAst<'_>],
        declarators: &[&DeclaratorAst<'_>],
    ) {
        let specifiers = self.specifiers(specifiers);
        let mut flags = ObjCPropertyAttributes::empty();
        let mut getter = None;
        let mut setter = None;
        for attribute in attributes {
            let spelling = self.control.spelling(attribute.name);
            let flag = match spelling.as_str() {
                "assign" => ObjCPropertyAttributes::ASSIGN,
                "retain" => ObjCPropertyAttributes::RETAIN,
                "copy" => ObjCPropertyAttributes::COPY,
                "readonly" => ObjCPropertyAttributes::READONLY,
                "readwrite" => ObjCPropertyAttributes::READWRITE,
                "nonatomic" => ObjCPropertyAttributes::NONATOMIC,
                "atomic" => ObjCPropertyAttributes::ATOMIC,
                "strong" => ObjCPropertyAttributes::STRONG,
                "weak" => ObjCPropertyAttributes::WEAK,
                "getter" => {
                    getter = attribute.method.map(|method| self.name(method));
                    ObjCPropertyAttributes::GETTER
                }
                "setter" => {
                    setter = attribute.method.map(|method| self.name(method));
                    ObjCPropertyAttributes::SETTER
                }
                _ => {
                    debug!(attribute = %spelling, "unknown property attribute");
                    continue;
                }
            };
            flags |= flag;
        }

        for declarator in declarators {
            let declared = self.declarator(declarator, specifiers.ty);
            let location = self.location(declared.offset);
            let property = self.control.new_objc_property_declaration(location, declared.name);
            if let SymbolKind::ObjCPropertyDeclaration(data) = &mut self.control.symbol_mut(property).kind {
                data.ty = declared.ty;
                data.attributes = flags;
                data.getter_name = getter;
                data.setter_name = setter;
            }
            self.set_decl_specifiers(property, &specifiers);
            self.add_member(property);
        }
    }
}

//! Folding decl-specifier sequences into a [`FullySpecifiedType`], and the
//! class and enum specifiers that introduce scopes along the way.

use cppmodel_ast::{
    AccessSpecifier, BaseSpecifierAst, ClassSpecifierAst, ElaboratedKey, EnumSpecifierAst, EnumeratorAst,
    ExpressionKind, Offset, SimpleSpecifier, SpecifierAst, SpecifierKind,
};
use cppmodel_core::{
    ClassKey, FloatKind, FullySpecifiedType, Identifier, IntegerKind, MethodKey, Name, NameId, Storage,
    SymbolFlags, SymbolId, SymbolKind, Type, Visibility,
};
use tracing::debug;

use crate::bind::Bind;

/// What a decl-specifier sequence folds into.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DeclSpecifiers {
    pub ty: FullySpecifiedType,
    /// Set by `Q_SIGNAL`, `Q_SLOT` and `Q_INVOKABLE`.
    pub method_key: Option<MethodKey>,
    pub is_constexpr: bool,
    /// `class X` / `struct X` / `union X` written as an elaborated type.
    pub elaborated_class: Option<(NameId, Offset)>,
}

impl DeclSpecifiers {
    /// Storage class of a declaration with these specifiers.
    pub fn storage(&self) -> Storage {
        let ty = &self.ty;
        if ty.is_typedef() {
            Storage::Typedef
        } else if ty.is_friend() {
            Storage::Friend
        } else if ty.is_auto() {
            Storage::Auto
        } else if ty.is_register() {
            Storage::Register
        } else if ty.is_static() {
            Storage::Static
        } else if ty.is_extern() {
            Storage::Extern
        } else if ty.is_mutable() {
            Storage::Mutable
        } else {
            Storage::None
        }
    }

    pub fn symbol_flags(&self) -> SymbolFlags {
        attribute_flags(&self.ty)
    }
}

pub(crate) fn attribute_flags(ty: &FullySpecifiedType) -> SymbolFlags {
    let mut flags = SymbolFlags::empty();
    flags.set(SymbolFlags::DEPRECATED, ty.is_deprecated());
    flags.set(SymbolFlags::UNAVAILABLE, ty.is_unavailable());
    flags
}

impl Bind<'_> {
    pub(crate) fn specifiers(&mut self, specifiers: &[&SpecifierAst<'_>]) -> DeclSpecifiers {
        let mut out = DeclSpecifiers::default();
        for specifier in specifiers {
            self.specifier(specifier, &mut out);
        }
        // `unsigned x;`
        if !out.ty.is_valid() && (out.ty.is_signed() || out.ty.is_unsigned()) {
            out.ty.set_type(self.control.integer_type(IntegerKind::Int));
        }
        out
    }

    fn specifier(&mut self, ast: &SpecifierAst<'_>, out: &mut DeclSpecifiers) {
        match &ast.kind {
            SpecifierKind::Simple(simple) => self.simple_specifier(*simple, out),
            SpecifierKind::Attribute(attribute) => self.attribute(*attribute, &mut out.ty),
            SpecifierKind::Named(name) => {
                let name = self.name(name);
                out.ty.set_type(self.control.named_type(name));
            }
            SpecifierKind::Elaborated { key, name } => {
                let offset = name.offset;
                let name = self.name(name);
                if matches!(key, ElaboratedKey::Class | ElaboratedKey::Struct | ElaboratedKey::Union) {
                    out.elaborated_class = Some((name, offset));
                }
                out.ty.set_type(self.control.named_type(name));
            }
            SpecifierKind::Class(class) => {
                let ty = self.class_specifier(class);
                out.ty.set_type(ty.ty());
            }
            SpecifierKind::Enum(enumeration) => {
                let ty = self.enum_specifier(enumeration);
                out.ty.set_type(ty.ty());
            }
            SpecifierKind::Decltype(expression) => {
                let ty = self.expression(expression);
                out.ty.set_type(ty.ty());
            }
        }
    }

    fn simple_specifier(&mut self, specifier: SimpleSpecifier, out: &mut DeclSpecifiers) {
        let (integer, float) = match self.control.ty(out.ty.ty()) {
            Type::Integer(kind) => (Some(*kind), None),
            Type::Float(kind) => (None, Some(*kind)),
            _ => (None, None),
        };
        let ty = &mut out.ty;
        let builtin = match specifier {
            SimpleSpecifier::Const => {
                ty.set_const(true);
                None
            }
            SimpleSpecifier::Volatile => {
                ty.set_volatile(true);
                None
            }
            SimpleSpecifier::Signed => {
                ty.set_signed(true);
                None
            }
            SimpleSpecifier::Unsigned => {
                ty.set_unsigned(true);
                None
            }
            SimpleSpecifier::Friend => {
                ty.set_friend(true);
                None
            }
            SimpleSpecifier::Auto => {
                ty.set_auto(true);
                None
            }
            SimpleSpecifier::Register => {
                ty.set_register(true);
                None
            }
            SimpleSpecifier::Static => {
                ty.set_static(true);
                None
            }
            SimpleSpecifier::Extern => {
                ty.set_extern(true);
                None
            }
            SimpleSpecifier::Mutable => {
                ty.set_mutable(true);
                None
            }
            SimpleSpecifier::Typedef => {
                ty.set_typedef(true);
                None
            }
            SimpleSpecifier::Inline => {
                ty.set_inline(true);
                None
            }
            SimpleSpecifier::Virtual => {
                ty.set_virtual(true);
                None
            }
            SimpleSpecifier::Explicit => {
                ty.set_explicit(true);
                None
            }
            SimpleSpecifier::Constexpr => {
                out.is_constexpr = true;
                None
            }
            SimpleSpecifier::QtSignal => {
                out.method_key = Some(MethodKey::Signal);
                None
            }
            SimpleSpecifier::QtSlot => {
                out.method_key = Some(MethodKey::Slot);
                None
            }
            SimpleSpecifier::QtInvokable => {
                out.method_key = Some(MethodKey::Invokable);
                None
            }
            SimpleSpecifier::Char => Some(Type::Integer(IntegerKind::Char)),
            SimpleSpecifier::Char16 => Some(Type::Integer(IntegerKind::Char16)),
            SimpleSpecifier::Char32 => Some(Type::Integer(IntegerKind::Char32)),
            SimpleSpecifier::WideChar => Some(Type::Integer(IntegerKind::WideChar)),
            SimpleSpecifier::Bool => Some(Type::Integer(IntegerKind::Bool)),
            SimpleSpecifier::Short => Some(Type::Integer(IntegerKind::Short)),
            // `short int`, `long int`, `unsigned long long int` keep their width.
            SimpleSpecifier::Int => match integer {
                Some(IntegerKind::Short | IntegerKind::Long | IntegerKind::LongLong) => None,
                _ => Some(Type::Integer(IntegerKind::Int)),
            },
            SimpleSpecifier::Long => match (integer, float) {
                (Some(IntegerKind::Long), _) => Some(Type::Integer(IntegerKind::LongLong)),
                (_, Some(FloatKind::Double)) => Some(Type::Float(FloatKind::LongDouble)),
                _ => Some(Type::Integer(IntegerKind::Long)),
            },
            SimpleSpecifier::Float => Some(Type::Float(FloatKind::Float)),
            SimpleSpecifier::Double => match integer {
                Some(IntegerKind::Long) => Some(Type::Float(FloatKind::LongDouble)),
                _ => Some(Type::Float(FloatKind::Double)),
            },
            SimpleSpecifier::Void => Some(Type::Void),
        };
        let id = match builtin {
            Some(Type::Integer(kind)) => self.control.integer_type(kind),
            Some(Type::Float(kind)) => self.control.float_type(kind),
            Some(Type::Void) => self.control.void_type(),
            _ => return,
        };
        out.ty.set_type(id);
    }

    /// `deprecated` and `unavailable` mark the declaration; other
    /// attributes are ignored.
    pub(crate) fn attribute(&self, attribute: Identifier, ty: &mut FullySpecifiedType) {
        match self.control.spelling(attribute).trim_matches('_') {
            "deprecated" => ty.set_deprecated(true),
            "unavailable" => ty.set_unavailable(true),
            _ => {}
        }
    }

    pub(crate) fn attributes(&self, attributes: &[&SpecifierAst<'_>], ty: &mut FullySpecifiedType) {
        for attribute in attributes {
            if let SpecifierKind::Attribute(id) = attribute.kind {
                self.attribute(id, ty);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Classes
    // ---------------------------------------------------------------------

    /// A class name must be an identifier or template-id. Anything else is
    /// replaced by its identifier, and a missing name by an anonymous one
    /// keyed on the class token.
    pub(crate) fn ensure_valid_class_name(&mut self, name: Option<NameId>, class_token: Offset) -> NameId {
        let Some(name) = name else {
            return self.control.anonymous_name_id(class_token);
        };
        let unqualified = self.control.unqualified_name(name);
        match self.control.name(unqualified) {
            Name::Identifier(_) | Name::TemplateId { .. } | Name::Anonymous { .. } => name,
            _ => {
                debug!(offset = class_token, "invalid class name replaced");
                match self.control.name_identifier(unqualified) {
                    Some(identifier) => self.control.identifier_name(identifier),
                    None => self.control.anonymous_name_id(class_token),
                }
            }
        }
    }

    pub(crate) fn class_specifier(&mut self, ast: &ClassSpecifierAst<'_>) -> FullySpecifiedType {
        self.guarded(ast.offset, |this| this.bind_class(ast))
    }

    fn bind_class(&mut self, ast: &ClassSpecifierAst<'_>) -> FullySpecifiedType {
        let name = ast.name.map(|name| self.name(name));
        let name = self.ensure_valid_class_name(name, ast.offset);
        let location = self.location(ast.name.map_or(ast.offset, |name| name.offset));
        let class = self.control.new_class(location, Some(name));

        let mut attributes = FullySpecifiedType::default();
        self.attributes(&ast.attributes, &mut attributes);
        let visibility = self.member_visibility();
        let symbol = self.control.symbol_mut(class);
        symbol.visibility = visibility;
        symbol.flags |= attribute_flags(&attributes);
        if let Some(data) = symbol.as_class_mut() {
            data.key = ast.key;
            data.is_final = ast.is_final;
        }
        self.control.set_scope_range(class, ast.lbrace, ast.rbrace);
        self.add_member(class);

        let default_visibility = match ast.key {
            ClassKey::Class => Visibility::Private,
            ClassKey::Struct | ClassKey::Union => Visibility::Public,
        };
        for base in &ast.bases {
            self.base_class(class, base, default_visibility);
        }

        self.with_scope(class, |this| {
            this.with_visibility(default_visibility, |this| {
                this.with_method_key(MethodKey::Normal, |this| {
                    for member in &ast.members {
                        this.declaration(member);
                    }
                })
            })
        });
        self.self_type(class)
    }

    fn base_class(&mut self, class: SymbolId, ast: &BaseSpecifierAst<'_>, default_visibility: Visibility) {
        let name = self.name(ast.name);
        let location = self.location(ast.name.offset);
        let base = self.control.new_base_class(location, Some(name));
        let ty = FullySpecifiedType::new(self.control.named_type(name));
        let symbol = self.control.symbol_mut(base);
        symbol.visibility = ast.access.map_or(default_visibility, AccessSpecifier::visibility);
        if let SymbolKind::BaseClass(data) = &mut symbol.kind {
            data.ty = ty;
            data.is_virtual = ast.is_virtual;
            data.is_variadic = ast.is_variadic;
        }
        self.control.add_base_class(class, base);
    }

    // ---------------------------------------------------------------------
    // Enums
    // ---------------------------------------------------------------------

    pub(crate) fn enum_specifier(&mut self, ast: &EnumSpecifierAst<'_>) -> FullySpecifiedType {
        self.guarded(ast.offset, |this| this.bind_enum(ast))
    }

    fn bind_enum(&mut self, ast: &EnumSpecifierAst<'_>) -> FullySpecifiedType {
        let name = ast.name.map(|name| self.name(name));
        let location = self.location(ast.name.map_or(ast.offset, |name| name.offset));
        let enumeration = self.control.new_enum(location, name);
        let underlying = self.specifiers(&ast.underlying).ty;
        let visibility = self.member_visibility();
        let symbol = self.control.symbol_mut(enumeration);
        symbol.visibility = visibility;
        if let SymbolKind::Enum(data) = &mut symbol.kind {
            data.is_scoped = ast.is_scoped;
            data.underlying = underlying;
        }
        self.control.set_scope_range(enumeration, ast.lbrace, ast.rbrace);
        self.add_member(enumeration);

        let ty = self.self_type(enumeration);
        self.with_scope(enumeration, |this| {
            let mut next = Some(0);
            for enumerator in &ast.enumerators {
                next = this.enumerator(enumerator, ty, next);
            }
        });
        ty
    }

    /// Declare one enumerator. Without an initializer its value continues
    /// from the previous one. Returns the value the next enumerator gets.
    fn enumerator(&mut self, ast: &EnumeratorAst<'_>, ty: FullySpecifiedType, next: Option<u64>) -> Option<u64> {
        let name = self.control.identifier_name(ast.name);
        let location = self.location(ast.offset);
        let enumerator = self.control.new_enumerator_declaration(location, Some(name));
        let (spelling, value) = match ast.value {
            Some(value) => {
                self.expression(value);
                let number = match value.kind {
                    ExpressionKind::NumericLiteral(literal) => self.control.literals().number_value(literal),
                    _ => None,
                };
                (Some(self.spelled(value)), number)
            }
            None => (next.map(|n| self.control.string_literal(n.to_string())), next),
        };
        if let SymbolKind::EnumeratorDeclaration(data) = &mut self.control.symbol_mut(enumerator).kind {
            data.ty = ty;
            data.constant_value = spelling;
        }
        self.add_member(enumerator);
        value.and_then(|v| v.checked_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_prefers_typedef() {
        let mut specifiers = DeclSpecifiers::default();
        assert_eq!(specifiers.storage(), Storage::None);
        specifiers.ty.set_static(true);
        assert_eq!(specifiers.storage(), Storage::Static);
        specifiers.ty.set_typedef(true);
        assert_eq!(specifiers.storage(), Storage::Typedef);
    }

    #[test]
    fn attribute_bits_become_symbol_flags() {
        let mut ty = FullySpecifiedType::default();
        assert!(attribute_flags(&ty).is_empty());
        ty.set_deprecated(true);
        assert_eq!(attribute_flags(&ty), SymbolFlags::DEPRECATED);
    }
}

use crate::control::Control;
use crate::fully_specified::FullySpecifiedType;
use crate::literals::Identifier;
use crate::name::{Name, NameId, OperatorKind, TemplateArgument};
use crate::symbol::SymbolId;
use crate::types::{FloatKind, IntegerKind, Type};

/// One method per type kind. Payloads are handed over by value so a visitor
/// may hold `&mut Control` while it runs.
pub trait TypeVisitor {
    fn visit_undefined_type(&mut self) {}
    fn visit_void_type(&mut self) {}
    fn visit_integer_type(&mut self, _kind: IntegerKind) {}
    fn visit_float_type(&mut self, _kind: FloatKind) {}
    fn visit_pointer_type(&mut self, _element: FullySpecifiedType) {}
    fn visit_pointer_to_member_type(&mut self, _member_name: NameId, _element: FullySpecifiedType) {}
    fn visit_reference_type(&mut self, _element: FullySpecifiedType, _rvalue: bool) {}
    fn visit_array_type(&mut self, _element: FullySpecifiedType, _size: u32) {}
    fn visit_named_type(&mut self, _name: NameId) {}
    fn visit_user_defined_type(&mut self, _symbol: SymbolId) {}
}

pub fn accept_type<V: TypeVisitor + ?Sized>(ty: &Type, visitor: &mut V) {
    match ty {
        Type::Undefined => visitor.visit_undefined_type(),
        Type::Void => visitor.visit_void_type(),
        Type::Integer(kind) => visitor.visit_integer_type(*kind),
        Type::Float(kind) => visitor.visit_float_type(*kind),
        Type::Pointer(element) => visitor.visit_pointer_type(*element),
        Type::PointerToMember { member_name, element } => {
            visitor.visit_pointer_to_member_type(*member_name, *element)
        }
        Type::Reference { element, rvalue } => visitor.visit_reference_type(*element, *rvalue),
        Type::Array { element, size } => visitor.visit_array_type(*element, *size),
        Type::Named(name) => visitor.visit_named_type(*name),
        Type::UserDefined(symbol) => visitor.visit_user_defined_type(*symbol),
    }
}

pub trait NameVisitor {
    fn visit_identifier(&mut self, _identifier: Identifier) {}
    fn visit_anonymous_name_id(&mut self, _class_token: u32) {}
    fn visit_template_name_id(
        &mut self,
        _identifier: Identifier,
        _arguments: &[TemplateArgument],
        _is_specialization: bool,
    ) {
    }
    fn visit_destructor_name_id(&mut self, _name: NameId) {}
    fn visit_operator_name_id(&mut self, _kind: OperatorKind) {}
    fn visit_conversion_name_id(&mut self, _ty: FullySpecifiedType) {}
    fn visit_qualified_name_id(&mut self, _base: Option<NameId>, _name: NameId) {}
    fn visit_selector_name_id(&mut self, _names: &[NameId], _has_arguments: bool) {}
}

pub fn accept_name<V: NameVisitor + ?Sized>(name: &Name, visitor: &mut V) {
    match name {
        Name::Identifier(id) => visitor.visit_identifier(*id),
        Name::Anonymous { class_token } => visitor.visit_anonymous_name_id(*class_token),
        Name::TemplateId {
            identifier,
            arguments,
            is_specialization,
        } => visitor.visit_template_name_id(*identifier, arguments, *is_specialization),
        Name::Destructor(inner) => visitor.visit_destructor_name_id(*inner),
        Name::Operator(kind) => visitor.visit_operator_name_id(*kind),
        Name::Conversion(ty) => visitor.visit_conversion_name_id(*ty),
        Name::Qualified { base, name } => visitor.visit_qualified_name_id(*base, *name),
        Name::Selector { names, has_arguments } => visitor.visit_selector_name_id(names, *has_arguments),
    }
}

/// Pre-order walk over a symbol and its members.
pub trait SymbolVisitor {
    /// Return `false` to skip the members of `symbol`.
    fn visit_symbol(&mut self, ctl: &Control, symbol: SymbolId, depth: usize) -> bool;

    fn end_visit_symbol(&mut self, _ctl: &Control, _symbol: SymbolId, _depth: usize) {}
}

pub fn walk_symbols<V: SymbolVisitor + ?Sized>(ctl: &Control, root: SymbolId, visitor: &mut V) {
    walk_at(ctl, root, 0, visitor);
}

fn walk_at<V: SymbolVisitor + ?Sized>(ctl: &Control, symbol: SymbolId, depth: usize, visitor: &mut V) {
    if visitor.visit_symbol(ctl, symbol, depth) {
        for member in ctl.members(symbol) {
            walk_at(ctl, *member, depth + 1, visitor);
        }
    }
    visitor.end_visit_symbol(ctl, symbol, depth);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SourceLocation;

    struct Collect(Vec<(SymbolId, usize)>);

    impl SymbolVisitor for Collect {
        fn visit_symbol(&mut self, ctl: &Control, symbol: SymbolId, depth: usize) -> bool {
            self.0.push((symbol, depth));
            !ctl.symbol(symbol).is_function()
        }
    }

    #[test]
    fn walk_is_preorder_and_can_prune() {
        let mut ctl = Control::new();
        let loc = SourceLocation::default();
        let ns = ctl.new_namespace(loc, None);
        let class = ctl.new_class(loc, None);
        let field = ctl.new_declaration(loc, None);
        let method = ctl.new_function(loc, None);
        let arg = ctl.new_argument(loc, None);
        ctl.add_member(ns, class);
        ctl.add_member(class, field);
        ctl.add_member(class, method);
        ctl.add_member(method, arg);

        let mut collect = Collect(Vec::new());
        walk_symbols(&ctl, ns, &mut collect);
        assert_eq!(collect.0, vec![(ns, 0), (class, 1), (field, 2), (method, 2)]);
    }

    #[derive(Default)]
    struct KindCounter {
        pointers: usize,
        named: usize,
    }

    impl TypeVisitor for KindCounter {
        fn visit_pointer_type(&mut self, _element: FullySpecifiedType) {
            self.pointers += 1;
        }

        fn visit_named_type(&mut self, _name: NameId) {
            self.named += 1;
        }
    }

    #[test]
    fn type_dispatch() {
        let mut ctl = Control::new();
        let name = ctl.name_from_str("T");
        let named = ctl.named_type(name);
        let ptr = ctl.pointer_type(FullySpecifiedType::new(named));

        let mut counter = KindCounter::default();
        accept_type(ctl.ty(ptr), &mut counter);
        accept_type(ctl.ty(named), &mut counter);
        accept_type(ctl.ty(ctl.void_type()), &mut counter);
        assert_eq!((counter.pointers, counter.named), (1, 1));
    }
}

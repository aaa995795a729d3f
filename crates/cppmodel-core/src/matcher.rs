//! Structural equivalence of types and names.
//!
//! [`Matcher::match_type`] and [`Matcher::match_name`] take the identity fast
//! path and then dispatch on the pair of kinds. Differing kinds never match.
//! Each kind has its own hook, defaulting to the rules in [`structural`], so a
//! policy only overrides the kinds it cares about.
//!
//! [`DefaultMatcher`] and [`TypeMatcher`] recurse without a guard and do not
//! terminate on genuinely cyclic structures (a template-id that is its own
//! argument). Use [`SafeMatcher`] whenever such input is possible.

use smallvec::SmallVec;

use crate::control::Control;
use crate::fully_specified::FullySpecifiedType;
use crate::literals::Identifier;
use crate::name::{Name, NameId, OperatorKind, TemplateArgument};
use crate::symbol::SymbolId;
use crate::types::{FloatKind, IntegerKind, Type, TypeId};

pub trait Matcher {
    fn match_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::match_type(self, ctl, a, b)
    }

    fn match_name(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::match_name(self, ctl, a, b)
    }

    /// Two absent names match; an absent name never matches a present one.
    fn match_opt_name(&mut self, ctl: &Control, a: Option<NameId>, b: Option<NameId>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.match_name(ctl, a, b),
            _ => false,
        }
    }

    fn match_fully_specified(&mut self, ctl: &Control, a: &FullySpecifiedType, b: &FullySpecifiedType) -> bool {
        a.match_with(b, self, ctl)
    }

    // types

    fn match_undefined_type(&mut self) -> bool {
        true
    }

    fn match_void_type(&mut self) -> bool {
        true
    }

    fn match_integer_type(&mut self, a: IntegerKind, b: IntegerKind) -> bool {
        a == b
    }

    fn match_float_type(&mut self, a: FloatKind, b: FloatKind) -> bool {
        a == b
    }

    fn match_pointer_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::pointer(self, ctl, a, b)
    }

    fn match_pointer_to_member_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::pointer_to_member(self, ctl, a, b)
    }

    fn match_reference_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::reference(self, ctl, a, b)
    }

    fn match_array_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::array(self, ctl, a, b)
    }

    fn match_named_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        structural::named(self, ctl, a, b)
    }

    /// Function types. Identity only by default.
    fn match_function_type(&mut self, _ctl: &Control, a: SymbolId, b: SymbolId) -> bool {
        a == b
    }

    /// Every other symbol-as-type kind (class, enum, namespace, template,
    /// forward declarations, ObjC). Identity only.
    fn match_symbol_type(&mut self, _ctl: &Control, a: SymbolId, b: SymbolId) -> bool {
        a == b
    }

    // names

    fn match_identifier(&mut self, a: Identifier, b: Identifier) -> bool {
        a.equal_to(b)
    }

    fn match_anonymous_name(&mut self, a: u32, b: u32) -> bool {
        a == b
    }

    fn match_template_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::template_name_id(self, ctl, a, b)
    }

    fn match_destructor_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::destructor_name_id(self, ctl, a, b)
    }

    fn match_operator_name_id(&mut self, a: OperatorKind, b: OperatorKind) -> bool {
        a == b
    }

    fn match_conversion_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::conversion_name_id(self, ctl, a, b)
    }

    fn match_qualified_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::qualified_name_id(self, ctl, a, b)
    }

    fn match_selector_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        structural::selector_name_id(self, ctl, a, b)
    }
}

/// The rules every matcher starts from.
pub mod structural {
    use super::*;

    pub fn match_type<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (ctl.ty(a), ctl.ty(b)) {
            (Type::Undefined, Type::Undefined) => m.match_undefined_type(),
            (Type::Void, Type::Void) => m.match_void_type(),
            (Type::Integer(x), Type::Integer(y)) => m.match_integer_type(*x, *y),
            (Type::Float(x), Type::Float(y)) => m.match_float_type(*x, *y),
            (Type::Pointer(_), Type::Pointer(_)) => m.match_pointer_type(ctl, a, b),
            (Type::PointerToMember { .. }, Type::PointerToMember { .. }) => {
                m.match_pointer_to_member_type(ctl, a, b)
            }
            (Type::Reference { .. }, Type::Reference { .. }) => m.match_reference_type(ctl, a, b),
            (Type::Array { .. }, Type::Array { .. }) => m.match_array_type(ctl, a, b),
            (Type::Named(_), Type::Named(_)) => m.match_named_type(ctl, a, b),
            (Type::UserDefined(x), Type::UserDefined(y)) => {
                let (x, y) = (*x, *y);
                match (ctl.symbol(x).is_function(), ctl.symbol(y).is_function()) {
                    (true, true) => m.match_function_type(ctl, x, y),
                    (false, false) => {
                        std::mem::discriminant(&ctl.symbol(x).kind) == std::mem::discriminant(&ctl.symbol(y).kind)
                            && m.match_symbol_type(ctl, x, y)
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    pub fn match_name<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        if a == b {
            return true;
        }
        match (ctl.name(a), ctl.name(b)) {
            (Name::Identifier(x), Name::Identifier(y)) => m.match_identifier(*x, *y),
            (Name::Anonymous { class_token: x }, Name::Anonymous { class_token: y }) => {
                m.match_anonymous_name(*x, *y)
            }
            (Name::TemplateId { .. }, Name::TemplateId { .. }) => m.match_template_name_id(ctl, a, b),
            (Name::Destructor(_), Name::Destructor(_)) => m.match_destructor_name_id(ctl, a, b),
            (Name::Operator(x), Name::Operator(y)) => m.match_operator_name_id(*x, *y),
            (Name::Conversion(_), Name::Conversion(_)) => m.match_conversion_name_id(ctl, a, b),
            (Name::Qualified { .. }, Name::Qualified { .. }) => m.match_qualified_name_id(ctl, a, b),
            (Name::Selector { .. }, Name::Selector { .. }) => m.match_selector_name_id(ctl, a, b),
            _ => false,
        }
    }

    pub fn pointer<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        match (ctl.ty(a), ctl.ty(b)) {
            (Type::Pointer(x), Type::Pointer(y)) => m.match_fully_specified(ctl, x, y),
            _ => false,
        }
    }

    pub fn pointer_to_member<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        match (ctl.ty(a), ctl.ty(b)) {
            (
                Type::PointerToMember { member_name: xn, element: xe },
                Type::PointerToMember { member_name: yn, element: ye },
            ) => m.match_name(ctl, *xn, *yn) && m.match_fully_specified(ctl, xe, ye),
            _ => false,
        }
    }

    pub fn reference<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        match (ctl.ty(a), ctl.ty(b)) {
            (Type::Reference { element: xe, rvalue: xr }, Type::Reference { element: ye, rvalue: yr }) => {
                xr == yr && m.match_fully_specified(ctl, xe, ye)
            }
            _ => false,
        }
    }

    pub fn array<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        match (ctl.ty(a), ctl.ty(b)) {
            (Type::Array { element: xe, size: xs }, Type::Array { element: ye, size: ys }) => {
                xs == ys && m.match_fully_specified(ctl, xe, ye)
            }
            _ => false,
        }
    }

    pub fn named<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        match (ctl.ty(a), ctl.ty(b)) {
            (Type::Named(x), Type::Named(y)) => m.match_name(ctl, *x, *y),
            _ => false,
        }
    }

    pub fn template_argument<M: Matcher + ?Sized>(
        m: &mut M,
        ctl: &Control,
        a: &TemplateArgument,
        b: &TemplateArgument,
    ) -> bool {
        if a.numeric_literal != b.numeric_literal {
            return false;
        }
        m.match_fully_specified(ctl, &a.ty, &b.ty)
    }

    pub fn template_name_id<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        let (
            Name::TemplateId { identifier: xi, arguments: xa, is_specialization: xs },
            Name::TemplateId { identifier: yi, arguments: ya, is_specialization: ys },
        ) = (ctl.name(a), ctl.name(b))
        else {
            return false;
        };
        if xs != ys || !m.match_identifier(*xi, *yi) || xa.len() != ya.len() {
            return false;
        }
        xa.iter()
            .zip(ya.iter())
            .all(|(x, y)| template_argument(m, ctl, x, y))
    }

    pub fn destructor_name_id<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        match (ctl.name(a), ctl.name(b)) {
            (Name::Destructor(x), Name::Destructor(y)) => m.match_name(ctl, *x, *y),
            _ => false,
        }
    }

    pub fn conversion_name_id<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        match (ctl.name(a), ctl.name(b)) {
            (Name::Conversion(x), Name::Conversion(y)) => m.match_fully_specified(ctl, x, y),
            _ => false,
        }
    }

    pub fn qualified_name_id<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        match (ctl.name(a), ctl.name(b)) {
            (Name::Qualified { base: xb, name: xn }, Name::Qualified { base: yb, name: yn }) => {
                m.match_opt_name(ctl, *xb, *yb) && m.match_name(ctl, *xn, *yn)
            }
            _ => false,
        }
    }

    pub fn selector_name_id<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: NameId, b: NameId) -> bool {
        match (ctl.name(a), ctl.name(b)) {
            (
                Name::Selector { names: xn, has_arguments: xa },
                Name::Selector { names: yn, has_arguments: ya },
            ) => {
                xa == ya
                    && xn.len() == yn.len()
                    && xn.iter().zip(yn.iter()).all(|(x, y)| m.match_name(ctl, *x, *y))
            }
            _ => false,
        }
    }

    /// Return type, cv/ref qualifiers, variadic flag and pairwise parameters.
    pub fn function_signature<M: Matcher + ?Sized>(m: &mut M, ctl: &Control, a: SymbolId, b: SymbolId) -> bool {
        if a == b {
            return true;
        }
        let (Some(x), Some(y)) = (ctl.symbol(a).as_function(), ctl.symbol(b).as_function()) else {
            return false;
        };
        if x.is_const() != y.is_const()
            || x.is_volatile() != y.is_volatile()
            || x.is_variadic() != y.is_variadic()
            || x.ref_qualifier != y.ref_qualifier
        {
            return false;
        }
        if !m.match_fully_specified(ctl, &x.return_type, &y.return_type) {
            return false;
        }
        let argc = ctl.argument_count(a);
        if argc != ctl.argument_count(b) {
            return false;
        }
        (0..argc).all(|i| match (ctl.argument_at(a, i), ctl.argument_at(b, i)) {
            (Some(l), Some(r)) => {
                let (lt, rt) = (ctl.symbol_type(l), ctl.symbol_type(r));
                m.match_fully_specified(ctl, &lt, &rt)
            }
            _ => false,
        })
    }
}

/// Plain structural policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMatcher;

impl Matcher for DefaultMatcher {}

/// Structural policy that also compares function types by signature, so
/// function pointers from separate declarations are equivalent. Classes
/// and the other symbol kinds stay identity-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeMatcher;

impl Matcher for TypeMatcher {
    fn match_function_type(&mut self, ctl: &Control, a: SymbolId, b: SymbolId) -> bool {
        structural::function_signature(self, ctl, a, b)
    }
}

/// Cycle-guarded policy.
///
/// Keeps the pairs currently being compared for every recursive kind and
/// answers `false` when a pair is entered again, so self-referential types
/// and names terminate. Function types are compared as in [`TypeMatcher`].
#[derive(Debug, Default, Clone)]
pub struct SafeMatcher {
    type_stack: SmallVec<[(TypeId, TypeId); 8]>,
    name_stack: SmallVec<[(NameId, NameId); 8]>,
    symbol_stack: SmallVec<[(SymbolId, SymbolId); 4]>,
}

fn is_blocked<T: PartialEq + Copy>(stack: &[(T, T)], a: T, b: T) -> bool {
    stack
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

macro_rules! guarded {
    ($self:ident, $stack:ident, $a:ident, $b:ident, $body:expr) => {{
        if is_blocked(&$self.$stack, $a, $b) {
            return false;
        }
        $self.$stack.push(($a, $b));
        let matched = $body;
        $self.$stack.pop();
        matched
    }};
}

impl SafeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing in progress. True between top-level calls.
    pub fn is_idle(&self) -> bool {
        self.type_stack.is_empty() && self.name_stack.is_empty() && self.symbol_stack.is_empty()
    }
}

impl Matcher for SafeMatcher {
    fn match_pointer_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        guarded!(self, type_stack, a, b, structural::pointer(self, ctl, a, b))
    }

    fn match_pointer_to_member_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        guarded!(self, type_stack, a, b, structural::pointer_to_member(self, ctl, a, b))
    }

    fn match_reference_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        guarded!(self, type_stack, a, b, structural::reference(self, ctl, a, b))
    }

    fn match_array_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        guarded!(self, type_stack, a, b, structural::array(self, ctl, a, b))
    }

    fn match_named_type(&mut self, ctl: &Control, a: TypeId, b: TypeId) -> bool {
        guarded!(self, type_stack, a, b, structural::named(self, ctl, a, b))
    }

    fn match_function_type(&mut self, ctl: &Control, a: SymbolId, b: SymbolId) -> bool {
        guarded!(self, symbol_stack, a, b, structural::function_signature(self, ctl, a, b))
    }

    fn match_template_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        guarded!(self, name_stack, a, b, structural::template_name_id(self, ctl, a, b))
    }

    fn match_destructor_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        guarded!(self, name_stack, a, b, structural::destructor_name_id(self, ctl, a, b))
    }

    fn match_conversion_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        guarded!(self, name_stack, a, b, structural::conversion_name_id(self, ctl, a, b))
    }

    fn match_qualified_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        guarded!(self, name_stack, a, b, structural::qualified_name_id(self, ctl, a, b))
    }

    fn match_selector_name_id(&mut self, ctl: &Control, a: NameId, b: NameId) -> bool {
        guarded!(self, name_stack, a, b, structural::selector_name_id(self, ctl, a, b))
    }
}

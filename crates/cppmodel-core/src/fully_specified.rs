use std::cmp::Ordering;

use bitflags::bitflags;

use crate::control::Control;
use crate::matcher::Matcher;
use crate::types::TypeId;

bitflags! {
    /// Qualifier and specifier bits carried next to a type.
    ///
    /// The groups are laid out in separate bytes: qualifiers, storage class,
    /// function specifiers, attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Specifiers: u32 {
        const CONST       = 1 << 0;
        const VOLATILE    = 1 << 1;
        const SIGNED      = 1 << 2;
        const UNSIGNED    = 1 << 3;

        const FRIEND      = 1 << 8;
        const AUTO        = 1 << 9;
        const REGISTER    = 1 << 10;
        const STATIC      = 1 << 11;
        const EXTERN      = 1 << 12;
        const MUTABLE     = 1 << 13;
        const TYPEDEF     = 1 << 14;

        const INLINE      = 1 << 16;
        const VIRTUAL     = 1 << 17;
        const OVERRIDE    = 1 << 18;
        const FINAL       = 1 << 19;
        const EXPLICIT    = 1 << 20;

        const DEPRECATED  = 1 << 24;
        const UNAVAILABLE = 1 << 25;
    }
}

impl Specifiers {
    pub const QUALIFIERS: Self = Self::CONST
        .union(Self::VOLATILE)
        .union(Self::SIGNED)
        .union(Self::UNSIGNED);

    pub const STORAGE: Self = Self::FRIEND
        .union(Self::AUTO)
        .union(Self::REGISTER)
        .union(Self::STATIC)
        .union(Self::EXTERN)
        .union(Self::MUTABLE)
        .union(Self::TYPEDEF);

    pub const FUNCTION: Self = Self::INLINE
        .union(Self::VIRTUAL)
        .union(Self::OVERRIDE)
        .union(Self::FINAL)
        .union(Self::EXPLICIT);

    pub const ATTRIBUTES: Self = Self::DEPRECATED.union(Self::UNAVAILABLE);
}

/// A type together with its cv/sign qualifiers and declaration specifiers.
///
/// `==`, ordering and hashing look at the `(type id, flags)` pair only. Use
/// [`FullySpecifiedType::match_with`] for structural comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FullySpecifiedType {
    ty: TypeId,
    specifiers: Specifiers,
}

macro_rules! specifier_accessors {
    ($($get:ident, $set:ident => $flag:ident;)*) => {
        $(
            #[inline]
            pub fn $get(&self) -> bool {
                self.specifiers.contains(Specifiers::$flag)
            }

            #[inline]
            pub fn $set(&mut self, on: bool) {
                self.specifiers.set(Specifiers::$flag, on);
            }
        )*
    };
}

impl FullySpecifiedType {
    pub fn new(ty: TypeId) -> Self {
        Self {
            ty,
            specifiers: Specifiers::empty(),
        }
    }

    pub fn with_specifiers(ty: TypeId, specifiers: Specifiers) -> Self {
        Self { ty, specifiers }
    }

    #[inline]
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    #[inline]
    pub fn set_type(&mut self, ty: TypeId) {
        self.ty = ty;
    }

    /// Same flags, different type.
    pub fn with_type(self, ty: TypeId) -> Self {
        Self { ty, ..self }
    }

    /// False only for the undefined sentinel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.ty.is_undefined()
    }

    #[inline]
    pub fn specifiers(&self) -> Specifiers {
        self.specifiers
    }

    #[inline]
    pub fn set_specifiers(&mut self, specifiers: Specifiers) {
        self.specifiers = specifiers;
    }

    pub fn add_specifiers(&mut self, specifiers: Specifiers) {
        self.specifiers |= specifiers;
    }

    specifier_accessors! {
        is_const, set_const => CONST;
        is_volatile, set_volatile => VOLATILE;
        is_signed, set_signed => SIGNED;
        is_unsigned, set_unsigned => UNSIGNED;
        is_friend, set_friend => FRIEND;
        is_auto, set_auto => AUTO;
        is_register, set_register => REGISTER;
        is_static, set_static => STATIC;
        is_extern, set_extern => EXTERN;
        is_mutable, set_mutable => MUTABLE;
        is_typedef, set_typedef => TYPEDEF;
        is_inline, set_inline => INLINE;
        is_virtual, set_virtual => VIRTUAL;
        is_override, set_override => OVERRIDE;
        is_final, set_final => FINAL;
        is_explicit, set_explicit => EXPLICIT;
        is_deprecated, set_deprecated => DEPRECATED;
        is_unavailable, set_unavailable => UNAVAILABLE;
    }

    /// The type with storage, function-specifier and attribute bits cleared.
    /// cv/sign and `auto` survive.
    pub fn qualified_type(&self) -> Self {
        let mut ty = *self;
        ty.specifiers.remove(
            Specifiers::FRIEND
                | Specifiers::REGISTER
                | Specifiers::STATIC
                | Specifiers::EXTERN
                | Specifiers::MUTABLE
                | Specifiers::TYPEDEF
                | Specifiers::FUNCTION
                | Specifiers::ATTRIBUTES,
        );
        ty
    }

    /// Copy the cv/sign bits of `other` onto `self`.
    pub fn copy_qualifiers(&mut self, other: &FullySpecifiedType) {
        self.specifiers.remove(Specifiers::QUALIFIERS);
        self.specifiers |= other.specifiers & Specifiers::QUALIFIERS;
    }

    /// Structural comparison: qualifier bits must be equal, the rest of the
    /// flag word is ignored, and the types must match under `matcher`.
    pub fn match_with<M: Matcher + ?Sized>(
        &self,
        other: &FullySpecifiedType,
        matcher: &mut M,
        ctl: &Control,
    ) -> bool {
        if self.specifiers & Specifiers::QUALIFIERS != other.specifiers & Specifiers::QUALIFIERS {
            return false;
        }
        matcher.match_type(ctl, self.ty, other.ty)
    }
}

impl From<TypeId> for FullySpecifiedType {
    fn from(ty: TypeId) -> Self {
        Self::new(ty)
    }
}

impl PartialOrd for FullySpecifiedType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FullySpecifiedType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ty
            .cmp(&other.ty)
            .then_with(|| self.specifiers.bits().cmp(&other.specifiers.bits()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Control;
    use crate::matcher::DefaultMatcher;
    use crate::types::IntegerKind;

    #[test]
    fn default_is_undefined_sentinel() {
        let a = FullySpecifiedType::default();
        let b = FullySpecifiedType::default();
        assert!(!a.is_valid());
        assert_eq!(a.ty(), TypeId::UNDEFINED);
        assert_eq!(a.ty(), b.ty());
        assert_eq!(a.specifiers(), Specifiers::empty());
    }

    #[test]
    fn qualifier_masking() {
        let ctl = Control::new();
        let int = ctl.integer_type(IntegerKind::Int);

        let mut plain = FullySpecifiedType::new(int);
        plain.set_const(true);
        let mut decorated = plain;
        decorated.set_static(true);
        decorated.set_typedef(true);
        decorated.set_inline(true);
        decorated.set_virtual(true);
        decorated.set_deprecated(true);

        assert_ne!(plain, decorated);
        assert!(plain.match_with(&decorated, &mut DefaultMatcher, &ctl));
        assert_eq!(plain.qualified_type(), decorated.qualified_type());
    }

    #[test]
    fn cv_and_sign_participate_in_match() {
        let ctl = Control::new();
        let int = FullySpecifiedType::new(ctl.integer_type(IntegerKind::Int));
        let mut const_int = int;
        const_int.set_const(true);
        let mut unsigned_int = int;
        unsigned_int.set_unsigned(true);

        assert!(!int.match_with(&const_int, &mut DefaultMatcher, &ctl));
        assert!(!int.match_with(&unsigned_int, &mut DefaultMatcher, &ctl));
        assert!(const_int.qualified_type().is_const());
    }

    #[test]
    fn qualified_type_keeps_auto() {
        let mut ty = FullySpecifiedType::default();
        ty.set_auto(true);
        ty.set_extern(true);
        let q = ty.qualified_type();
        assert!(q.is_auto());
        assert!(!q.is_extern());
    }

    #[test]
    fn ordering_is_type_then_flags() {
        let ctl = Control::new();
        let int = FullySpecifiedType::new(ctl.integer_type(IntegerKind::Int));
        let mut const_int = int;
        const_int.set_const(true);
        let void = FullySpecifiedType::new(ctl.void_type());
        assert!(void < int);
        assert!(int < const_int);
    }
}

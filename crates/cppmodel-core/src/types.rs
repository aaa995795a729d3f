//! The type model.
//!
//! `Type` is a closed sum. Symbols that also introduce a type (classes,
//! functions, enums, namespaces, templates and their ObjC cousins) are reached
//! through [`Type::UserDefined`], which points back into the symbol arena.

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::fully_specified::FullySpecifiedType;
use crate::name::NameId;
use crate::symbol::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Slot 0 of every control. Shared by all default-constructed
    /// [`FullySpecifiedType`]s.
    pub const UNDEFINED: TypeId = TypeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_undefined(self) -> bool {
        self == Self::UNDEFINED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum IntegerKind {
    #[strum(serialize = "char")]
    Char,
    #[strum(serialize = "char16_t")]
    Char16,
    #[strum(serialize = "char32_t")]
    Char32,
    #[strum(serialize = "wchar_t")]
    WideChar,
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "short")]
    Short,
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "long")]
    Long,
    #[strum(serialize = "long long")]
    LongLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum FloatKind {
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "double")]
    Double,
    #[strum(serialize = "long double")]
    LongDouble,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Undefined,
    Void,
    Integer(IntegerKind),
    Float(FloatKind),
    Pointer(FullySpecifiedType),
    PointerToMember {
        member_name: NameId,
        element: FullySpecifiedType,
    },
    Reference {
        element: FullySpecifiedType,
        rvalue: bool,
    },
    Array {
        element: FullySpecifiedType,
        size: u32,
    },
    /// A name still waiting for lookup.
    Named(NameId),
    /// A symbol that doubles as a type.
    UserDefined(SymbolId),
}

static UNDEFINED_TYPE: Type = Type::Undefined;

impl Type {
    /// The process-wide "no type" value.
    pub fn undefined() -> &'static Type {
        &UNDEFINED_TYPE
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Type::Undefined)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_))
    }

    /// Element of a pointer, reference, pointer to member or array.
    pub fn element_type(&self) -> Option<FullySpecifiedType> {
        match self {
            Type::Pointer(element)
            | Type::PointerToMember { element, .. }
            | Type::Reference { element, .. }
            | Type::Array { element, .. } => Some(*element),
            _ => None,
        }
    }

    pub fn as_user_defined(&self) -> Option<SymbolId> {
        match self {
            Type::UserDefined(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<NameId> {
        match self {
            Type::Named(name) => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_singleton_is_shared() {
        assert!(std::ptr::eq(Type::undefined(), Type::undefined()));
        assert!(Type::undefined().is_undefined());
        assert!(TypeId::default().is_undefined());
    }

    #[test]
    fn kind_spellings() {
        assert_eq!(IntegerKind::LongLong.to_string(), "long long");
        assert_eq!(IntegerKind::WideChar.to_string(), "wchar_t");
        assert_eq!(FloatKind::LongDouble.to_string(), "long double");
    }
}
